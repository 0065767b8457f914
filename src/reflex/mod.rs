//! Per-tick reflex pipeline
//!
//! Everything here must be pure and deterministic:
//! - No internal state across ticks; the caller re-supplies all inputs
//! - No I/O, no blocking, no clock reads
//! - Degenerate geometry (zero vectors, empty lists) yields defined
//!   fallbacks, never an error

pub mod dodge;
pub mod state;
pub mod threat;
pub mod tick;
pub mod walls;

pub use dodge::{DodgePlan, synthesize_dodge};
pub use state::{AgentState, ArenaBounds, ObstacleRect, Projectile, Side};
pub use threat::{Approach, Threat, assess_threats, closest_approach};
pub use tick::{ReflexCommand, compute_reflex};
pub use walls::{nearest_wall_distances, wall_repulsion};
