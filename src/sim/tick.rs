//! Per-frame simulation step
//!
//! Two clocks drive a run: [`tick`] once per display frame and
//! [`score_tick`] once per score period. Both are no-ops unless running.

use super::collision::hits_any_obstacle;
use super::source::SpawnSource;
use super::state::{Difficulty, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, shrink_interval};
use crate::config::GameConfig;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Frame clock timestamp (monotonic, ms)
    pub timestamp_ms: f64,
    /// Jump key pressed since the last frame (edge, not hold)
    pub jump: bool,
}

/// Jump press held between input events and the next frame
///
/// Presses only latch while a run is live, so a key hit on the game-over
/// screen can't fire on the first frame after a restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpLatch {
    pending: bool,
}

impl JumpLatch {
    /// Record a press. Ignored unless `phase` is `Running`.
    pub fn press(&mut self, phase: GamePhase) {
        if phase == GamePhase::Running {
            self.pending = true;
        }
    }

    /// Consume the press for this frame
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Advance the game state by one frame
///
/// Order within a frame: jump physics, scroll and prune, collision, spawn,
/// then the jump request. Spawning after the collision test means a new
/// obstacle can never end the run on the frame it appears.
pub fn tick<S: SpawnSource + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    config: &GameConfig,
    source: &mut S,
) {
    if !state.is_running() {
        return;
    }

    state.frame += 1;

    // First running frame arms the spawn clock
    let last_spawn_ms = *state.last_spawn_ms.get_or_insert(input.timestamp_ms);

    state
        .character
        .integrate(config.gravity, config.character_ground_y());

    let speed = state.difficulty.speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }
    state.obstacles.retain(|o| !o.is_off_screen());

    if hits_any_obstacle(
        &state.character,
        &state.obstacles,
        &config.character_inset,
        &config.obstacle_inset,
    ) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over at frame {} with score {}", state.frame, state.score);
        return;
    }

    if input.timestamp_ms - last_spawn_ms > state.spawn_interval_ms {
        spawn_obstacle(state, config, source);
        state.last_spawn_ms = Some(input.timestamp_ms);
    }

    if input.jump && state.character.launch(config.launch_velocity) {
        state.events.push(GameEvent::Jumped);
    }
}

/// Advance the score clock by one period
///
/// Every `difficulty_threshold` points the scroll speed rises and the spawn
/// interval bounds (and the pending interval) shrink toward the floor.
pub fn score_tick(state: &mut GameState, config: &GameConfig) {
    if !state.is_running() {
        return;
    }

    state.score += 1;

    // A zero threshold never steps
    if state.score.checked_rem(config.difficulty_threshold) == Some(0) {
        state.difficulty.step(config);
        state.spawn_interval_ms = shrink_interval(state.spawn_interval_ms, config);
        state.events.push(GameEvent::SpeedUp {
            level: state.difficulty.level,
            speed: state.difficulty.speed,
        });
        log::info!(
            "Difficulty {} at score {}: speed {}, spawn {}..{} ms",
            state.difficulty.level,
            state.score,
            state.difficulty.speed,
            state.difficulty.spawn_min_ms,
            state.difficulty.spawn_max_ms
        );
    }
}

/// Push one obstacle at the right edge and resample the spawn interval
///
/// Draw order is fixed (height, kind, interval) so scripted sources replay exactly.
pub fn spawn_obstacle<S: SpawnSource + ?Sized>(
    state: &mut GameState,
    config: &GameConfig,
    source: &mut S,
) {
    let jitter = (source.next_unit() * config.obstacle_height_jitter).floor();
    let kind = if source.next_unit() < config.hazard_chance {
        ObstacleKind::Hazard
    } else {
        ObstacleKind::Regular
    };
    let height = match kind {
        ObstacleKind::Regular => config.obstacle_base_height + jitter,
        ObstacleKind::Hazard => config.hazard_height,
    };

    state.obstacles.push(Obstacle::on_ground(
        kind,
        config.playfield_width,
        config.obstacle_width,
        height,
        config.ground_line(),
    ));

    state.spawn_interval_ms = sample_interval(source.next_unit(), &state.difficulty);

    log::debug!(
        "Spawned {:?} (h={}) at frame {}, next in {} ms",
        kind,
        height,
        state.frame,
        state.spawn_interval_ms
    );
}

/// Map a unit draw onto `[min, max)` in whole milliseconds
pub fn sample_interval(unit: f32, difficulty: &Difficulty) -> f64 {
    let span = difficulty.spawn_max_ms - difficulty.spawn_min_ms;
    (unit as f64 * span).floor() + difficulty.spawn_min_ms
}
