//! Dino Jump - an endless-runner reflex game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (jump physics, spawning, collisions, scoring)
//! - `config`: Data-driven game tuning

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use sim::{Simulation, Snapshot};

/// Driver constants
pub mod consts {
    /// Nominal frame period of the native frame clock (~60 Hz)
    pub const FRAME_MS: u64 = 16;
    /// Frame budget for a headless native run before it is cut off
    pub const MAX_HEADLESS_FRAMES: u64 = 60 * 60 * 5;
}

/// Score as shown on the HUD: zero-padded to five digits
pub fn format_score(score: u32) -> String {
    format!("{:05}", score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_pads() {
        assert_eq!(format_score(0), "00000");
        assert_eq!(format_score(42), "00042");
        assert_eq!(format_score(123456), "123456");
    }
}
