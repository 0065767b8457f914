//! The per-tick reflex decision
//!
//! Merges the composite dodge vector with the latest strategic intent,
//! applies wall repulsion and the hard perimeter clamp, and scales the
//! result to the bot's top speed. Pure function of its inputs: identical
//! inputs produce identical outputs, and nothing persists between calls.

use glam::Vec2;

use crate::normalize;
use crate::reflex::dodge::synthesize_dodge;
use crate::reflex::state::{AgentState, ArenaBounds, ObstacleRect, Projectile};
use crate::reflex::threat::assess_threats;
use crate::reflex::walls::wall_repulsion;
use crate::tuning::ReflexTuning;

/// Velocity and fire command for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflexCommand {
    pub velocity: Vec2,
    pub fire: bool,
}

/// Convert the latest strategic intent plus the current threat picture
/// into this tick's velocity and fire command.
///
/// The fire decision passes through untouched: the reflex layer only ever
/// steers, it never overrides the strategist's choice to shoot. `dt` is
/// part of the stable tick signature; the decision itself is
/// instantaneous.
pub fn compute_reflex(
    agent: &AgentState,
    projectiles: &[Projectile],
    obstacles: &[ObstacleRect],
    top_speed: f32,
    bounds: ArenaBounds,
    _dt: f32,
    tuning: &ReflexTuning,
) -> ReflexCommand {
    let threats = assess_threats(projectiles, agent.pos, tuning);
    let plan = synthesize_dodge(&threats, agent.pos, obstacles, bounds, tuning);

    let mut dir = if plan.is_active() {
        // Urgent threats squeeze the strategic intent down to a fraction
        // of its base weight; at maximum urgency only 30% of it survives
        let dodge_dir = normalize(plan.dir);
        let urgency_scale = (plan.max_urgency / tuning.dodge_base_strength).min(1.0);
        let blend = tuning.intent_blend * (1.0 - 0.7 * urgency_scale);
        dodge_dir * (1.0 - blend) + agent.intent_dir * blend
    } else {
        agent.intent_dir
    };

    // Soft wall repulsion applies even mid-dodge
    dir += wall_repulsion(agent.pos, obstacles, bounds, tuning) * tuning.repulse_damping;

    // Hard perimeter clamp: inside the buffer of an edge, never steer
    // further into it. Overrides the soft repulsion above.
    if agent.pos.x < tuning.wall_buffer && dir.x < 0.0 {
        dir.x = 0.0;
    }
    if agent.pos.x > bounds.width - tuning.wall_buffer && dir.x > 0.0 {
        dir.x = 0.0;
    }
    if agent.pos.y < tuning.wall_buffer && dir.y < 0.0 {
        dir.y = 0.0;
    }
    if agent.pos.y > bounds.height - tuning.wall_buffer && dir.y > 0.0 {
        dir.y = 0.0;
    }

    if plan.is_active() {
        log::trace!(
            "dodging {} threat(s), max urgency {:.2}",
            plan.threat_count,
            plan.max_urgency
        );
    }

    ReflexCommand {
        velocity: normalize(dir) * top_speed,
        fire: agent.fire_intent,
    }
}
