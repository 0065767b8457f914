//! Reflex tuning knobs
//!
//! Every threshold the reflex layer uses, exposed as named overridable
//! fields rather than buried constants. Difficulty tiers vary bot speed
//! and prediction horizon but reuse the same reflex logic unmodified.

use serde::{Deserialize, Serialize};

/// Tunable parameters for the reflex layer.
///
/// The probe distance and flip threshold are empirically tuned; treat
/// them as configuration, not derived quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflexTuning {
    /// Bot collision radius (units).
    pub agent_radius: f32,
    /// Projectile collision radius (units).
    pub projectile_radius: f32,
    /// Extra slack added on top of the two radii.
    pub margin_buffer: f32,
    /// Only react to shots whose closest approach is within this many
    /// seconds.
    pub danger_time_window: f32,
    /// Grace for shots that passed closest approach a moment ago.
    pub tca_grace: f32,
    /// Shots missing by more than this multiple of the collision margin
    /// are ignored.
    pub threat_miss_factor: f32,
    /// Soft repulsion zone near walls and the perimeter (units).
    pub wall_buffer: f32,
    /// How hard walls push back at contact.
    pub wall_repulse_strength: f32,
    /// Base multiplier for each threat's escape vector.
    pub dodge_base_strength: f32,
    /// How much strategic intent survives during an active dodge
    /// (0 = pure dodge, 1 = pure intent).
    pub intent_blend: f32,
    /// How far ahead to probe an escape direction for walls (units).
    pub probe_distance: f32,
    /// Flip to the opposite escape when the probe point's repulsion
    /// opposes the chosen direction more strongly than this dot product.
    pub probe_flip_threshold: f32,
    /// TCA floor so urgency stays bounded for point-blank shots.
    pub min_tca: f32,
    /// Damping applied to the always-on repulsion term in the blender.
    pub repulse_damping: f32,
}

impl Default for ReflexTuning {
    fn default() -> Self {
        Self {
            agent_radius: 16.0,
            projectile_radius: 5.0,
            margin_buffer: 8.0,
            danger_time_window: 1.2,
            tca_grace: 0.05,
            threat_miss_factor: 2.5,
            wall_buffer: 38.0,
            wall_repulse_strength: 1.8,
            dodge_base_strength: 3.5,
            intent_blend: 0.30,
            probe_distance: 30.0,
            probe_flip_threshold: -0.5,
            min_tca: 0.03,
            repulse_damping: 0.5,
        }
    }
}

impl ReflexTuning {
    /// Combined radius at which a shot counts as a hit.
    pub fn collision_margin(&self) -> f32 {
        self.agent_radius + self.projectile_radius + self.margin_buffer
    }
}

/// Difficulty tiers for the surrounding game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyTier {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Normal => "Normal",
            DifficultyTier::Hard => "Hard",
        }
    }

    /// Bot top speed for this tier (units/s).
    pub fn bot_speed(&self) -> f32 {
        match self {
            DifficultyTier::Easy => 190.0,
            DifficultyTier::Normal => 230.0,
            DifficultyTier::Hard => 260.0,
        }
    }

    /// Reflex tuning with this tier's prediction horizon applied.
    pub fn tuning(&self) -> ReflexTuning {
        let mut tuning = ReflexTuning::default();
        match self {
            DifficultyTier::Easy => tuning.danger_time_window = 0.8,
            DifficultyTier::Normal => {}
            DifficultyTier::Hard => tuning.danger_time_window = 1.5,
        }
        tuning
    }
}
