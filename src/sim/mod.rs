//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, constants in per-frame units
//! - Randomness only through an injected `SpawnSource`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod simulation;
pub mod source;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{Inset, Rect, character_hitbox, hits_any_obstacle, obstacle_hitbox};
pub use simulation::{CueSink, LogCues, RecordingCues, SharedSimulation, Simulation};
pub use source::{PcgSource, ScriptedSource, SpawnSource};
pub use state::{
    Character, Difficulty, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Snapshot,
};
pub use tick::{JumpLatch, TickInput, sample_interval, score_tick, spawn_obstacle, tick};
