//! Autopilot
//!
//! Plays the game for demos and soak tests: jumps so the apex of the arc
//! lines up with the middle of the obstacle's pass under the character.

use super::collision::{character_hitbox, obstacle_hitbox};
use super::state::{GamePhase, Snapshot};
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Horizontal gap (hitbox to hitbox) at which to jump for the given speed
    pub fn lead_distance(&self, config: &GameConfig, speed: f32) -> f32 {
        let apex_frames = -config.launch_velocity / config.gravity;
        let character_span = config.character_width
            - config.character_inset.left
            - config.character_inset.right;
        let obstacle_span =
            config.obstacle_width - config.obstacle_inset.left - config.obstacle_inset.right;
        let overlap_span = character_span + obstacle_span;

        (apex_frames * speed - overlap_span / 2.0).max(speed)
    }

    /// Decide whether to press jump this frame
    pub fn wants_jump(&self, snapshot: &Snapshot, config: &GameConfig) -> bool {
        if snapshot.phase != GamePhase::Running || snapshot.character.airborne {
            return false;
        }

        let character = character_hitbox(&snapshot.character, &config.character_inset);
        let lead = self.lead_distance(config, snapshot.speed);

        snapshot
            .obstacles
            .iter()
            .map(|o| obstacle_hitbox(o, &config.obstacle_inset))
            .filter(|hitbox| hitbox.right() > character.left())
            .map(|hitbox| hitbox.left() - character.right())
            .reduce(f32::min)
            .is_some_and(|gap| (0.0..=lead).contains(&gap))
    }
}
