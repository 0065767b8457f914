//! Value types shared by the reflex pipeline
//!
//! Plain per-entity records. The reflex core reads these fresh each tick
//! and retains no reference across ticks.
//!
//! Coordinates are screen-space: origin at the arena's top-left corner,
//! +X right, +Y down, continuous (no grid quantization).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::intent::IntentDecision;

/// Which combatant fired a projectile, from the bot's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Friendly,
    Hostile,
}

/// The bot's kinematic state plus a snapshot of the latest strategic
/// intent.
///
/// Owned by the simulation tick loop. The intent fields are overwritten
/// only when the strategic producer publishes a new decision; the reflex
/// core treats them as read-only input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub hp: i32,
    /// Latest strategic movement direction, components in [-1, 1].
    pub intent_dir: Vec2,
    /// Latest strategic fire decision.
    pub fire_intent: bool,
}

impl AgentState {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            hp: 100,
            intent_dir: Vec2::ZERO,
            fire_intent: false,
        }
    }

    /// Overwrite the intent snapshot with a freshly read decision.
    pub fn apply_intent(&mut self, decision: IntentDecision) {
        self.intent_dir = decision.dir;
        self.fire_intent = decision.fire;
    }
}

/// A live projectile as seen by the reflex core this tick. Transient:
/// created when a shot is fired, dropped when it expires or hits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub side: Side,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, side: Side) -> Self {
        Self { pos, vel, side }
    }
}

/// Axis-aligned static obstacle, fixed for the duration of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ObstacleRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Closest point on the rectangle to `p` (`p` itself when inside).
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }
}

/// Playable rectangle of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
