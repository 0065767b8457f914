//! World-state payload for the strategic producer
//!
//! Serialized form of everything the strategist sees for one decision.
//! Field names are part of the producer's prompt contract: `pos`, `vel`,
//! `predicted_pos`, `threats`, and `walls` as `[N, E, S, W]`. The wall
//! distances come from the same query the reflex layer uses, so the
//! producer never sees a stale or divergent view of the arena.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::reflex::{
    AgentState, ArenaBounds, ObstacleRect, Projectile, Side, nearest_wall_distances,
};

/// How far ahead the producer should lead the enemy, in seconds. Sized to
/// cover the producer's own decision latency.
pub const PREDICT_T: f32 = 0.35;

/// Own state as presented to the producer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BotSnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: i32,
    /// Whether the bot's weapon is off cooldown.
    pub ready: bool,
}

/// The opposing combatant, with a linear lead applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Where the enemy will be once the producer's decision lands.
    pub predicted_pos: Vec2,
}

/// A hostile projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatSnapshot {
    pub p: Vec2,
    pub v: Vec2,
}

/// Everything the strategic producer sees for one decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub bot: BotSnapshot,
    pub enemy: EnemySnapshot,
    pub threats: Vec<ThreatSnapshot>,
    /// Nearest-surface distances, `[north, east, south, west]`.
    pub walls: [f32; 4],
}

impl WorldSnapshot {
    /// Capture the current world through the producer's eyes.
    #[allow(clippy::too_many_arguments)]
    pub fn capture(
        agent: &AgentState,
        ready: bool,
        enemy_pos: Vec2,
        enemy_vel: Vec2,
        projectiles: &[Projectile],
        obstacles: &[ObstacleRect],
        bounds: ArenaBounds,
    ) -> Self {
        Self {
            bot: BotSnapshot {
                pos: agent.pos,
                vel: agent.vel,
                hp: agent.hp,
                ready,
            },
            enemy: EnemySnapshot {
                pos: enemy_pos,
                vel: enemy_vel,
                predicted_pos: enemy_pos + enemy_vel * PREDICT_T,
            },
            threats: projectiles
                .iter()
                .filter(|p| p.side == Side::Hostile)
                .map(|p| ThreatSnapshot { p: p.pos, v: p.vel })
                .collect(),
            walls: nearest_wall_distances(agent.pos, obstacles, bounds),
        }
    }

    /// JSON form sent to the producer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
