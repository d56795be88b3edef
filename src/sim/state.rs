//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; nothing is global.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but not started; ticks are ignored
    #[default]
    Ready,
    /// Active gameplay
    Running,
    /// Run ended on a collision; frozen until restart
    GameOver,
}

/// Notifications for audio/visual cues (fire and forget)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Character left the ground
    Jumped,
    /// Collision ended the run
    GameOver { score: u32 },
    /// Run was reset
    Restarted,
    /// Difficulty stepped up
    SpeedUp { level: u32, speed: f32 },
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner. X never changes during a run.
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (negative = upward)
    pub velocity: f32,
    pub airborne: bool,
}

impl Character {
    /// Character at rest with its top edge at `ground_y`
    pub fn grounded(x: f32, ground_y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_y),
            size: Vec2::new(width, height),
            velocity: 0.0,
            airborne: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::grounded(
            config.character_x,
            config.character_ground_y(),
            config.character_width,
            config.character_height,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Start a jump if standing. Returns true if the jump happened.
    pub fn launch(&mut self, launch_velocity: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.velocity = launch_velocity;
        self.airborne = true;
        true
    }

    /// One frame of jump physics. Returns true on the frame the character lands.
    pub fn integrate(&mut self, gravity: f32, ground_y: f32) -> bool {
        if !self.airborne {
            return false;
        }

        self.velocity += gravity;
        self.pos.y += self.velocity;

        if self.pos.y >= ground_y {
            self.pos.y = ground_y;
            self.velocity = 0.0;
            self.airborne = false;
            return true;
        }
        false
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Random-height block
    Regular,
    /// Fixed-height enemy
    Hazard,
}

/// An obstacle scrolling toward the character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Obstacle standing on the ground line with its left edge at `x`
    pub fn on_ground(kind: ObstacleKind, x: f32, width: f32, height: f32, ground_line: f32) -> Self {
        Self {
            pos: Vec2::new(x, ground_line - height),
            size: Vec2::new(width, height),
            kind,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// X of the right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// True once the obstacle has fully left the playfield on the left
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

/// Scroll speed and spawn pacing. Only ever gets harder within a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Difficulty steps taken so far
    pub level: u32,
    /// Horizontal scroll per frame
    pub speed: f32,
    /// Lower bound for resampled spawn intervals (ms)
    pub spawn_min_ms: f64,
    /// Upper bound for resampled spawn intervals (ms)
    pub spawn_max_ms: f64,
}

impl Difficulty {
    pub fn base(config: &GameConfig) -> Self {
        Self {
            level: 0,
            speed: config.base_speed,
            spawn_min_ms: config.spawn_interval_min_ms,
            spawn_max_ms: config.spawn_interval_max_ms,
        }
    }

    /// Take one difficulty step
    pub fn step(&mut self, config: &GameConfig) {
        self.level += 1;
        self.speed += config.speed_step;
        self.spawn_min_ms = shrink_interval(self.spawn_min_ms, config);
        self.spawn_max_ms = shrink_interval(self.spawn_max_ms, config);
    }
}

/// Reduce an interval by one step, never going below the floor and never growing
pub(crate) fn shrink_interval(interval_ms: f64, config: &GameConfig) -> f64 {
    (interval_ms - config.spawn_interval_step_ms)
        .max(config.spawn_interval_floor_ms)
        .min(interval_ms)
}

/// Complete state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub character: Character,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub difficulty: Difficulty,
    /// Interval that must elapse before the next spawn (ms)
    pub spawn_interval_ms: f64,
    /// Timestamp of the last spawn; `None` until the first running frame arms the clock
    pub last_spawn_ms: Option<f64>,
    pub score: u32,
    /// Frames advanced while running
    pub frame: u64,
    /// Cue events raised since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state, not yet running
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Ready,
            character: Character::from_config(config),
            obstacles: Vec::new(),
            difficulty: Difficulty::base(config),
            spawn_interval_ms: config.initial_spawn_interval_ms,
            last_spawn_ms: None,
            score: 0,
            frame: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take pending cue events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render-ready copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            game_over: self.is_game_over(),
            score: self.score,
            level: self.difficulty.level,
            speed: self.difficulty.speed,
            frame: self.frame,
            character: self.character,
            obstacles: self.obstacles.clone(),
        }
    }
}

/// What the presentation layer draws for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub game_over: bool,
    pub score: u32,
    pub level: u32,
    pub speed: f32,
    pub frame: u64,
    pub character: Character,
    pub obstacles: Vec<Obstacle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let config = GameConfig::default();
        let state = GameState::new(&config);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.last_spawn_ms.is_none());
        assert_eq!(state.spawn_interval_ms, 2000.0);
        assert_eq!(state.difficulty.speed, 10.0);
        assert_eq!(state.character.pos, Vec2::new(50.0, 220.0));
        assert!(!state.character.airborne);
    }

    #[test]
    fn test_launch_only_from_ground() {
        let mut character = Character::grounded(50.0, 220.0, 130.0, 130.0);
        assert!(character.launch(-20.0));
        assert_eq!(character.velocity, -20.0);
        assert!(character.airborne);

        // No double jump
        character.integrate(1.25, 220.0);
        assert!(!character.launch(-20.0));
        assert_eq!(character.velocity, -18.75);
    }

    #[test]
    fn test_integrate_lands_exactly_on_ground() {
        let mut character = Character::grounded(50.0, 220.0, 130.0, 130.0);
        character.launch(-20.0);

        let mut frames = 0;
        while !character.integrate(1.25, 220.0) {
            frames += 1;
            assert!(character.pos.y < 220.0);
            assert!(frames < 100, "character never landed");
        }
        // Landing frame included
        assert_eq!(frames + 1, 31);
        assert_eq!(character.pos.y, 220.0);
        assert_eq!(character.velocity, 0.0);
        assert!(!character.airborne);
    }

    #[test]
    fn test_integrate_clamps_overshoot() {
        let mut character = Character::grounded(0.0, 100.0, 10.0, 10.0);
        character.airborne = true;
        character.pos.y = 99.0;
        character.velocity = 7.0;
        assert!(character.integrate(1.0, 100.0));
        assert_eq!(character.pos.y, 100.0);
    }

    #[test]
    fn test_grounded_character_ignores_gravity() {
        let mut character = Character::grounded(0.0, 100.0, 10.0, 10.0);
        assert!(!character.integrate(1.25, 100.0));
        assert_eq!(character.pos.y, 100.0);
        assert_eq!(character.velocity, 0.0);
    }

    #[test]
    fn test_obstacle_sits_on_ground() {
        let obstacle = Obstacle::on_ground(ObstacleKind::Hazard, 800.0, 80.0, 70.0, 350.0);
        assert_eq!(obstacle.pos, Vec2::new(800.0, 280.0));
        assert_eq!(obstacle.rect().bottom(), 350.0);
        assert_eq!(obstacle.right(), 880.0);
    }

    #[test]
    fn test_off_screen_boundary() {
        let mut obstacle = Obstacle::on_ground(ObstacleKind::Regular, -80.0, 80.0, 50.0, 350.0);
        // Right edge exactly at 0 is still on screen
        assert!(!obstacle.is_off_screen());
        obstacle.pos.x = -80.5;
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_difficulty_step_floors_intervals() {
        let config = GameConfig::default();
        let mut difficulty = Difficulty::base(&config);
        difficulty.step(&config);
        assert_eq!(difficulty.level, 1);
        assert_eq!(difficulty.speed, 12.0);
        assert_eq!(difficulty.spawn_min_ms, 700.0);
        assert_eq!(difficulty.spawn_max_ms, 1900.0);

        for _ in 0..50 {
            difficulty.step(&config);
        }
        assert_eq!(difficulty.spawn_min_ms, 500.0);
        assert_eq!(difficulty.spawn_max_ms, 500.0);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let snapshot = state.snapshot();
        state.obstacles.push(Obstacle::on_ground(
            ObstacleKind::Regular,
            800.0,
            80.0,
            50.0,
            350.0,
        ));
        state.score = 7;
        assert!(snapshot.obstacles.is_empty());
        assert_eq!(snapshot.score, 0);
    }
}
