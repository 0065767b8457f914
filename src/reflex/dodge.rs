//! Dodge vector synthesis
//!
//! Converts each threatening projectile into a weighted perpendicular
//! escape direction and sums them into one composite plan. The escape
//! side is the one that widens the gap to the projectile's path, unless
//! a wall sits in the way.

use glam::Vec2;

use crate::normalize;
use crate::reflex::state::{ArenaBounds, ObstacleRect};
use crate::reflex::threat::Threat;
use crate::reflex::walls::wall_repulsion;
use crate::tuning::ReflexTuning;

/// Accumulated dodge response for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct DodgePlan {
    /// Unnormalized sum of weighted escape directions. Opposing threats
    /// of equal urgency can cancel this in perfectly symmetric setups;
    /// that degenerate case is accepted rather than special-cased.
    pub dir: Vec2,
    /// Largest single-threat urgency seen this tick.
    pub max_urgency: f32,
    /// Number of threats that contributed.
    pub threat_count: usize,
}

impl DodgePlan {
    pub fn is_active(&self) -> bool {
        self.threat_count > 0
    }
}

/// Build the composite dodge vector for the given threats.
pub fn synthesize_dodge(
    threats: &[Threat],
    agent_pos: Vec2,
    obstacles: &[ObstacleRect],
    bounds: ArenaBounds,
    tuning: &ReflexTuning,
) -> DodgePlan {
    let mut plan = DodgePlan::default();
    let margin = tuning.collision_margin();

    for threat in threats {
        let travel = normalize(threat.vel);

        // Two escape options, perpendicular to the projectile's path
        let perp_a = Vec2::new(travel.y, -travel.x);
        let perp_b = -perp_a;

        // Pick the side of the path the bot is already on at closest
        // approach, so the dodge widens separation instead of crossing
        // in front of the shot
        let at_tca = threat.pos + threat.vel * threat.tca.max(0.0);
        let to_agent = agent_pos - at_tca;
        let mut chosen = if perp_a.dot(to_agent) >= 0.0 { perp_a } else { perp_b };

        // Probe ahead along the escape; strongly opposed repulsion there
        // means the dodge would run into a wall or corner, so flip sides
        let probe = agent_pos + chosen * tuning.probe_distance;
        let probe_push = wall_repulsion(probe, obstacles, bounds, tuning);
        if probe_push.dot(chosen) < tuning.probe_flip_threshold {
            chosen = -chosen;
        }

        // Imminent shots dominate; near-misses contribute less than
        // dead-center hits
        let urgency = tuning.dodge_base_strength / threat.tca.max(tuning.min_tca);
        let hit_factor = (1.0 - threat.miss_distance / margin).max(0.0);
        let urgency = urgency * (0.4 + 0.6 * hit_factor);

        plan.dir += chosen * urgency;
        plan.max_urgency = plan.max_urgency.max(urgency);
        plan.threat_count += 1;
    }

    plan
}
