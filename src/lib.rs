//! Arena Reflex - the motion-safety layer of an AI arena-shooter bot
//!
//! A slow strategic process (hundreds of milliseconds per decision) emits
//! coarse movement intents; the reflex layer turns the latest intent into
//! safe per-frame motion at the full simulation rate.
//!
//! Core modules:
//! - `reflex`: per-tick threat assessment, dodge synthesis, wall avoidance
//! - `intent`: latest-decision slot shared with the strategic producer
//! - `snapshot`: world-state payload sent to the strategic producer
//! - `tuning`: data-driven reflex balance

pub mod intent;
pub mod reflex;
pub mod snapshot;
pub mod tuning;

pub use intent::{DecisionSource, IntentDecision, IntentPublisher, IntentSlot, intent_slot};
pub use reflex::{
    AgentState, ArenaBounds, ObstacleRect, Projectile, ReflexCommand, Side, compute_reflex,
    nearest_wall_distances,
};
pub use snapshot::WorldSnapshot;
pub use tuning::{DifficultyTier, ReflexTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_W: f32 = 800.0;
    pub const ARENA_H: f32 = 600.0;

    /// Movement speeds (units/s) - the bot outruns the player
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const BOT_SPEED: f32 = 230.0;
    pub const PROJECTILE_SPEED: f32 = 420.0;

    /// Shot cooldowns (seconds) - the bot also fires faster
    pub const PLAYER_SHOT_COOLDOWN: f32 = 0.22;
    pub const BOT_SHOT_COOLDOWN: f32 = 0.14;

    /// Magnitudes below this normalize to the zero vector
    pub const NORMALIZE_EPS: f32 = 1e-6;
}

/// Normalize a vector, or return `Vec2::ZERO` when the magnitude is
/// degenerate. Callers treat zero as "no preferred direction".
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let mag = v.length();
    if mag < consts::NORMALIZE_EPS { Vec2::ZERO } else { v / mag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_unit_vector() {
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-5);
        assert!((n.x - 0.6).abs() < 1e-5);
        assert!((n.y - 0.8).abs() < 1e-5);
    }

    #[test]
    fn normalize_zero_and_subepsilon() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(normalize(Vec2::new(1e-8, -1e-8)), Vec2::ZERO);
    }

    proptest! {
        /// Output is either an exact zero or a unit vector, never NaN/inf.
        #[test]
        fn normalize_unit_or_zero(x in -1e4f32..1e4, y in -1e4f32..1e4) {
            let n = normalize(Vec2::new(x, y));
            prop_assert!(n.x.is_finite() && n.y.is_finite());
            if n == Vec2::ZERO {
                prop_assert!(Vec2::new(x, y).length() < 1e-3);
            } else {
                prop_assert!((n.length() - 1.0).abs() < 1e-3);
            }
        }
    }
}
