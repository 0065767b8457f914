//! Arena Reflex headless demo
//!
//! Runs a ten-second match at 60 Hz: a scripted opponent orbits the arena
//! taking potshots while a simulated slow strategist publishes decisions
//! through the latest-value slot and the reflex layer keeps the bot
//! alive between them. No rendering; progress goes to the log.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tokio::sync::watch;

use arena_reflex::consts::{ARENA_H, ARENA_W, BOT_SHOT_COOLDOWN, PROJECTILE_SPEED, SIM_DT};
use arena_reflex::intent::{DecisionSource, IntentDecision, ProducerConfig, spawn_producer};
use arena_reflex::snapshot::PREDICT_T;
use arena_reflex::{
    AgentState, ArenaBounds, DifficultyTier, ObstacleRect, Projectile, Side, WorldSnapshot,
    compute_reflex, intent_slot, normalize,
};

/// Center block plus two flanking pillars.
fn arena_obstacles() -> Vec<ObstacleRect> {
    vec![
        ObstacleRect::new(350.0, 250.0, 100.0, 100.0),
        ObstacleRect::new(150.0, 100.0, 40.0, 160.0),
        ObstacleRect::new(610.0, 340.0, 40.0, 160.0),
    ]
}

fn inside_obstacle(pos: Vec2, obstacles: &[ObstacleRect]) -> bool {
    obstacles.iter().any(|r| r.closest_point(pos) == pos)
}

/// Stand-in strategist: chases the enemy's predicted position with a bit
/// of strafe, after a simulated remote round-trip.
struct ScriptedStrategist {
    rng: Mutex<Pcg32>,
}

impl ScriptedStrategist {
    fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(Pcg32::seed_from_u64(seed)) }
    }
}

#[async_trait]
impl DecisionSource for ScriptedStrategist {
    async fn decide(&self, snapshot: WorldSnapshot) -> Option<IntentDecision> {
        tokio::time::sleep(Duration::from_millis(280)).await;

        let chase = normalize(snapshot.enemy.predicted_pos - snapshot.bot.pos);
        let strafe = {
            let mut rng = self.rng.lock().ok()?;
            rng.random_range(-0.4..0.4)
        };
        let dir = chase + Vec2::new(-chase.y, chase.x) * strafe;
        Some(IntentDecision { dir: normalize(dir), fire: snapshot.bot.ready })
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let bounds = ArenaBounds::new(ARENA_W, ARENA_H);
    let obstacles = arena_obstacles();
    let tier = DifficultyTier::Normal;
    let tuning = tier.tuning();
    let top_speed = tier.bot_speed();
    log::info!("starting demo match, tier {}", tier.as_str());

    let mut agent = AgentState::new(Vec2::new(600.0, 300.0));
    let center = Vec2::new(ARENA_W / 2.0, ARENA_H / 2.0);
    let mut enemy_pos = center + Vec2::new(-180.0, 0.0);
    let mut enemy_vel = Vec2::ZERO;
    let mut projectiles: Vec<Projectile> = Vec::new();

    let (publisher, slot) = intent_slot();
    let (world_tx, world_rx) = watch::channel(WorldSnapshot::capture(
        &agent, true, enemy_pos, enemy_vel, &projectiles, &obstacles, bounds,
    ));
    let producer = spawn_producer(
        Arc::new(ScriptedStrategist::new(11)),
        move || world_rx.borrow().clone(),
        publisher,
        ProducerConfig::default(),
    );

    let mut rng = Pcg32::seed_from_u64(7);
    let mut ticker = tokio::time::interval(Duration::from_secs_f32(SIM_DT));
    let mut fire_cooldown = 0.0f32;
    let mut enemy_cooldown = 0.3f32;

    for tick_no in 0..600u32 {
        ticker.tick().await;
        let t = tick_no as f32 * SIM_DT;

        // Scripted opponent orbits the center and takes jittered potshots
        let theta = 0.6 * t + std::f32::consts::PI;
        enemy_pos = center + Vec2::new(theta.cos(), theta.sin()) * 180.0;
        enemy_vel = Vec2::new(-theta.sin(), theta.cos()) * 180.0 * 0.6;

        enemy_cooldown -= SIM_DT;
        if enemy_cooldown <= 0.0 {
            let jitter = Vec2::new(rng.random_range(-0.12..0.12), rng.random_range(-0.12..0.12));
            let aim = normalize(normalize(agent.pos - enemy_pos) + jitter);
            if aim != Vec2::ZERO {
                projectiles.push(Projectile::new(enemy_pos, aim * PROJECTILE_SPEED, Side::Hostile));
            }
            enemy_cooldown = 0.45;
        }

        // Advance shots; drop them at walls and arena edges
        for p in &mut projectiles {
            p.pos += p.vel * SIM_DT;
        }
        projectiles.retain(|p| {
            p.pos.x >= 0.0
                && p.pos.x <= bounds.width
                && p.pos.y >= 0.0
                && p.pos.y <= bounds.height
                && !inside_obstacle(p.pos, &obstacles)
        });

        // Freshest strategic decision, then the per-tick reflex
        agent.apply_intent(slot.latest());
        let cmd = compute_reflex(&agent, &projectiles, &obstacles, top_speed, bounds, SIM_DT, &tuning);

        // Minimal integration; the full game also resolves obstacle
        // push-out here
        agent.vel = cmd.velocity;
        agent.pos += agent.vel * SIM_DT;
        agent.pos.x = agent.pos.x.clamp(tuning.agent_radius, bounds.width - tuning.agent_radius);
        agent.pos.y = agent.pos.y.clamp(tuning.agent_radius, bounds.height - tuning.agent_radius);

        fire_cooldown -= SIM_DT;
        let ready = fire_cooldown <= 0.0;
        if cmd.fire && ready {
            let aim = normalize(enemy_pos + enemy_vel * PREDICT_T - agent.pos);
            if aim != Vec2::ZERO {
                projectiles.push(Projectile::new(agent.pos, aim * PROJECTILE_SPEED, Side::Friendly));
                fire_cooldown = BOT_SHOT_COOLDOWN;
            }
        }

        let _ = world_tx.send(WorldSnapshot::capture(
            &agent, ready, enemy_pos, enemy_vel, &projectiles, &obstacles, bounds,
        ));

        if tick_no % 60 == 0 {
            let hostile = projectiles.iter().filter(|p| p.side == Side::Hostile).count();
            log::info!(
                "t={t:4.1}s bot ({:3.0},{:3.0}) vel ({:4.0},{:4.0}) {hostile} hostile shots",
                agent.pos.x, agent.pos.y, agent.vel.x, agent.vel.y
            );
        }
    }

    producer.shutdown().await;
    log::info!("match over");
}
