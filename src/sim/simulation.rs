//! Simulation controller
//!
//! Owns the run state, the spawn source and the cue sink, and exposes the
//! four lifecycle operations drivers call: start, tick, score tick, restart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use super::source::{PcgSource, SpawnSource};
use super::state::{GameEvent, GamePhase, GameState, Snapshot};
use super::tick::{TickInput, score_tick, tick};
use crate::config::{ConfigError, GameConfig};

/// Receives cue events (sounds, flashes). Fire and forget.
pub trait CueSink {
    fn cue(&mut self, event: GameEvent);
}

/// Logs cues instead of playing them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCues;

impl CueSink for LogCues {
    fn cue(&mut self, event: GameEvent) {
        match event {
            GameEvent::Jumped => log::debug!("cue: jump"),
            other => log::info!("cue: {:?}", other),
        }
    }
}

/// Keeps every cue for later inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingCues {
    pub events: Vec<GameEvent>,
}

impl CueSink for RecordingCues {
    fn cue(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// Single owner of a run
#[derive(Debug)]
pub struct Simulation<S = PcgSource, C = LogCues> {
    config: GameConfig,
    state: GameState,
    source: S,
    cues: C,
}

impl Simulation {
    /// Seeded simulation that logs its cues
    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, PcgSource::new(seed), LogCues)
    }
}

impl<S: SpawnSource, C: CueSink> Simulation<S, C> {
    /// Create a simulation in the `Ready` phase. Call [`Simulation::start`] to begin.
    ///
    /// Fails if `config` does not pass [`GameConfig::validate`].
    pub fn new(config: GameConfig, source: S, cues: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Self {
            config,
            state,
            source,
            cues,
        })
    }

    /// Begin a run from a clean state
    pub fn start(&mut self) -> Snapshot {
        self.reset();
        log::info!("Run started");
        self.state.snapshot()
    }

    /// Advance one frame. No-op unless running.
    pub fn tick(&mut self, timestamp_ms: f64, jump_requested: bool) -> Snapshot {
        let input = TickInput {
            timestamp_ms,
            jump: jump_requested,
        };
        tick(&mut self.state, &input, &self.config, &mut self.source);
        self.flush_cues();
        self.state.snapshot()
    }

    /// Advance the score clock. No-op unless running.
    pub fn on_score_tick(&mut self) -> Snapshot {
        score_tick(&mut self.state, &self.config);
        self.flush_cues();
        self.state.snapshot()
    }

    /// Hard reset to a fresh running state, allowed from any phase
    pub fn restart(&mut self) -> Snapshot {
        let previous = self.state.phase;
        self.reset();
        self.cues.cue(GameEvent::Restarted);
        log::info!("Run restarted (was {:?})", previous);
        self.state.snapshot()
    }

    fn reset(&mut self) {
        self.state = GameState::new(&self.config);
        self.state.phase = GamePhase::Running;
    }

    fn flush_cues(&mut self) {
        for event in self.state.drain_events() {
            self.cues.cue(event);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// True while the clocks should keep firing
    pub fn is_active(&self) -> bool {
        self.state.is_running()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }
}

/// Simulation shared between clock threads
///
/// Every operation takes the lock, so the frame clock and the score clock
/// never interleave their read-modify-write of score and speed.
#[derive(Debug)]
pub struct SharedSimulation<S = PcgSource, C = LogCues> {
    inner: Arc<Mutex<Simulation<S, C>>>,
}

impl<S, C> Clone for SharedSimulation<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: SpawnSource, C: CueSink> SharedSimulation<S, C> {
    pub fn new(simulation: Simulation<S, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulation)),
        }
    }

    /// Lock for direct access. A panicked holder does not poison the run.
    pub fn lock(&self) -> MutexGuard<'_, Simulation<S, C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self) -> Snapshot {
        self.lock().start()
    }

    pub fn tick(&self, timestamp_ms: f64, jump_requested: bool) -> Snapshot {
        self.lock().tick(timestamp_ms, jump_requested)
    }

    pub fn on_score_tick(&self) -> Snapshot {
        self.lock().on_score_tick()
    }

    pub fn restart(&self) -> Snapshot {
        self.lock().restart()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_active()
    }

    /// Run the score clock on this thread until `running` clears
    ///
    /// The flag is read again after every sleep, so no score tick lands
    /// once the frame clock has stopped.
    pub fn run_score_clock(&self, period: Duration, running: &AtomicBool) {
        while running.load(Ordering::Acquire) {
            thread::sleep(period);
            if !running.load(Ordering::Acquire) {
                break;
            }
            self.on_score_tick();
        }
    }
}
