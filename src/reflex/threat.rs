//! Closest-approach prediction and threat classification
//!
//! Each hostile projectile is tested against the bot treated as
//! momentarily stationary: solve for the time of closest approach along
//! the projectile's path, then judge whether the resulting miss distance
//! falls inside the danger envelope.

use glam::Vec2;

use crate::reflex::state::{Projectile, Side};
use crate::tuning::ReflexTuning;

/// Closest-approach solution for one projectile against a fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Approach {
    /// Time of closest approach in seconds. Negative means the projectile
    /// already passed its nearest point.
    pub tca: f32,
    /// Separation between projectile and target at that moment.
    pub miss_distance: f32,
}

/// Solve for the time and distance of closest approach.
///
/// A projectile with near-zero velocity is closest right now: `tca = 0`
/// and the miss distance is the current separation.
pub fn closest_approach(pos: Vec2, vel: Vec2, target: Vec2) -> Approach {
    let r = pos - target;
    let speed_sq = vel.length_squared();
    if speed_sq < 1e-6 {
        return Approach { tca: 0.0, miss_distance: r.length() };
    }

    let tca = -r.dot(vel) / speed_sq;
    let miss_distance = (r + vel * tca).length();
    Approach { tca, miss_distance }
}

/// A projectile judged to be on a near-term collision course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threat {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tca: f32,
    pub miss_distance: f32,
}

/// Classify projectiles against the bot's current position.
///
/// A projectile is a genuine threat when its closest approach falls inside
/// the danger window (with a small grace for shots that just passed) and
/// its miss distance is under the widened collision margin. Everything
/// else is ignored outright for this tick; there is no partial weighting.
/// Friendly shots never threaten, even if the caller forgets to filter.
pub fn assess_threats(
    projectiles: &[Projectile],
    agent_pos: Vec2,
    tuning: &ReflexTuning,
) -> Vec<Threat> {
    let margin = tuning.collision_margin();

    projectiles
        .iter()
        .filter(|p| p.side == Side::Hostile)
        .filter_map(|p| {
            let approach = closest_approach(p.pos, p.vel, agent_pos);
            if approach.tca < -tuning.tca_grace || approach.tca > tuning.danger_time_window {
                return None;
            }
            if approach.miss_distance >= margin * tuning.threat_miss_factor {
                return None;
            }
            Some(Threat {
                pos: p.pos,
                vel: p.vel,
                tca: approach.tca,
                miss_distance: approach.miss_distance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn head_on_shot_hits_dead_center() {
        // Shot 200 units north of the target, heading straight down
        let a = closest_approach(Vec2::new(400.0, 100.0), Vec2::new(0.0, 400.0), Vec2::new(400.0, 300.0));
        assert!((a.tca - 0.5).abs() < 1e-5);
        assert!(a.miss_distance < 1e-4);
    }

    #[test]
    fn stationary_projectile_is_closest_now() {
        let a = closest_approach(Vec2::new(430.0, 300.0), Vec2::ZERO, Vec2::new(400.0, 300.0));
        assert_eq!(a.tca, 0.0);
        assert!((a.miss_distance - 30.0).abs() < 1e-5);
    }

    #[test]
    fn receding_shot_has_negative_tca() {
        // Already past the target and flying away
        let a = closest_approach(Vec2::new(400.0, 350.0), Vec2::new(0.0, 400.0), Vec2::new(400.0, 300.0));
        assert!(a.tca < 0.0);
    }

    proptest! {
        /// The point at `tca` is the minimum of squared distance along the
        /// path: nudging time either way never gets closer.
        #[test]
        fn tca_minimizes_path_distance(
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            vx in -400.0f32..400.0, vy in -400.0f32..400.0,
            tx in -500.0f32..500.0, ty in -500.0f32..500.0,
        ) {
            let pos = glam::Vec2::new(px, py);
            let vel = glam::Vec2::new(vx, vy);
            let target = glam::Vec2::new(tx, ty);
            prop_assume!(vel.length_squared() >= 1e-3);

            let a = closest_approach(pos, vel, target);
            let dist_at = |t: f32| (pos + vel * t - target).length();

            prop_assert!((dist_at(a.tca) - a.miss_distance).abs() < 1e-2);
            prop_assert!(dist_at(a.tca) <= dist_at(a.tca + 0.01) + 1e-3);
            prop_assert!(dist_at(a.tca) <= dist_at(a.tca - 0.01) + 1e-3);
        }
    }

    #[test]
    fn incoming_shot_within_window_is_a_threat() {
        let tuning = ReflexTuning::default();
        let agent = Vec2::new(400.0, 300.0);
        let shots = [Projectile::new(
            Vec2::new(400.0, 100.0),
            Vec2::new(0.0, 420.0),
            Side::Hostile,
        )];
        let threats = assess_threats(&shots, agent, &tuning);
        assert_eq!(threats.len(), 1);
        assert!(threats[0].miss_distance < tuning.collision_margin());
    }

    #[test]
    fn distant_future_shot_is_ignored() {
        let tuning = ReflexTuning::default();
        let agent = Vec2::new(400.0, 300.0);
        // Arrives in ~4.8s, far outside the 1.2s window
        let shots = [Projectile::new(
            Vec2::new(400.0, -1700.0),
            Vec2::new(0.0, 420.0),
            Side::Hostile,
        )];
        assert!(assess_threats(&shots, agent, &tuning).is_empty());
    }

    #[test]
    fn wide_miss_is_ignored() {
        let tuning = ReflexTuning::default();
        let agent = Vec2::new(400.0, 300.0);
        // Passes 100 units to the side, well past 2.5x margin
        let shots = [Projectile::new(
            Vec2::new(300.0, 100.0),
            Vec2::new(0.0, 420.0),
            Side::Hostile,
        )];
        assert!(assess_threats(&shots, agent, &tuning).is_empty());
    }

    #[test]
    fn just_passed_shot_still_counts_within_grace() {
        let tuning = ReflexTuning::default();
        let agent = Vec2::new(400.0, 300.0);
        // Closest approach was ~0.02s ago, inside the 0.05s grace
        let shots = [Projectile::new(
            Vec2::new(400.0, 308.0),
            Vec2::new(0.0, 400.0),
            Side::Hostile,
        )];
        let threats = assess_threats(&shots, agent, &tuning);
        assert_eq!(threats.len(), 1);
        assert!(threats[0].tca < 0.0);
    }

    #[test]
    fn friendly_fire_never_threatens() {
        let tuning = ReflexTuning::default();
        let agent = Vec2::new(400.0, 300.0);
        let shots = [Projectile::new(
            Vec2::new(400.0, 100.0),
            Vec2::new(0.0, 420.0),
            Side::Friendly,
        )];
        assert!(assess_threats(&shots, agent, &tuning).is_empty());
    }
}
