//! Wall distance queries and the soft repulsion field
//!
//! `nearest_wall_distances` backs both the repulsion field below and the
//! snapshot payload sent to the strategic producer, so the two views of
//! the arena always agree.

use glam::Vec2;

use crate::normalize;
use crate::reflex::state::{ArenaBounds, ObstacleRect};
use crate::tuning::ReflexTuning;

/// Distance to the nearest bounding surface in each cardinal direction,
/// in `[north, east, south, west]` order (screen space, so north = -Y).
///
/// An obstacle edge counts toward a direction only when the obstacle
/// overlaps the query point's coordinate on the perpendicular axis.
pub fn nearest_wall_distances(
    pos: Vec2,
    obstacles: &[ObstacleRect],
    bounds: ArenaBounds,
) -> [f32; 4] {
    let mut north = pos.y;
    let mut east = bounds.width - pos.x;
    let mut south = bounds.height - pos.y;
    let mut west = pos.x;

    for rect in obstacles {
        let (x1, y1) = (rect.x, rect.y);
        let (x2, y2) = (rect.x + rect.w, rect.y + rect.h);
        let overlaps_x = x1 <= pos.x && pos.x <= x2;
        let overlaps_y = y1 <= pos.y && pos.y <= y2;

        if y2 <= pos.y && overlaps_x {
            north = north.min(pos.y - y2);
        }
        if y1 >= pos.y && overlaps_x {
            south = south.min(y1 - pos.y);
        }
        if x2 <= pos.x && overlaps_y {
            west = west.min(pos.x - x2);
        }
        if x1 >= pos.x && overlaps_y {
            east = east.min(x1 - pos.x);
        }
    }

    [north, east, south, west]
}

/// Soft repulsion away from arena edges and obstacle surfaces.
///
/// Zero outside the wall buffer; ramps linearly up to
/// `wall_repulse_strength` at contact. Contributions from multiple
/// surfaces sum, so corners push diagonally.
pub fn wall_repulsion(
    pos: Vec2,
    obstacles: &[ObstacleRect],
    bounds: ArenaBounds,
    tuning: &ReflexTuning,
) -> Vec2 {
    let mut push = Vec2::ZERO;

    // Arena perimeter
    let edges = [
        (pos.x, Vec2::X),
        (bounds.width - pos.x, Vec2::NEG_X),
        (pos.y, Vec2::Y),
        (bounds.height - pos.y, Vec2::NEG_Y),
    ];
    for (dist, dir) in edges {
        if dist < tuning.wall_buffer {
            push += dir * (1.0 - dist / tuning.wall_buffer) * tuning.wall_repulse_strength;
        }
    }

    // Obstacles: push along the vector from the closest surface point.
    // A point sitting exactly on a surface has no defined normal; skip it
    // and let the perimeter clamp deal with the degenerate case.
    for rect in obstacles {
        let away = pos - rect.closest_point(pos);
        let dist = away.length();
        if dist < tuning.wall_buffer && dist > 1e-3 {
            push += normalize(away) * (1.0 - dist / tuning.wall_buffer) * tuning.wall_repulse_strength;
        }
    }

    push
}
