//! Strategic intent plumbing
//!
//! The strategic producer is slow (hundreds of milliseconds per decision,
//! behind a remote call) while the reflex loop runs every frame. The two
//! sides meet at a single latest-value slot: the producer publishes whole
//! decisions, the loop reads the freshest one without ever blocking.
//! Decisions never queue; an unread value is simply overwritten.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;

use crate::snapshot::WorldSnapshot;

/// One whole strategic decision. Published and read atomically; readers
/// never observe a torn record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentDecision {
    /// Desired movement direction, components in [-1, 1].
    pub dir: Vec2,
    /// Whether the strategist wants to shoot this cycle.
    pub fire: bool,
}

/// Writer half of the latest-intent slot.
#[derive(Debug, Clone)]
pub struct IntentPublisher {
    tx: Arc<watch::Sender<IntentDecision>>,
}

impl IntentPublisher {
    /// Replace the slot's value with a newer decision.
    pub fn publish(&self, decision: IntentDecision) {
        self.tx.send_replace(decision);
    }
}

/// Reader half of the latest-intent slot.
#[derive(Debug, Clone)]
pub struct IntentSlot {
    rx: watch::Receiver<IntentDecision>,
}

impl IntentSlot {
    /// The most recently published decision, or the default "no intent"
    /// before the first one arrives. Never blocks, and keeps answering
    /// with the last-known value after the producer is gone.
    pub fn latest(&self) -> IntentDecision {
        *self.rx.borrow()
    }
}

/// Create a slot pair seeded with "no intent".
pub fn intent_slot() -> (IntentPublisher, IntentSlot) {
    let (tx, rx) = watch::channel(IntentDecision::default());
    (IntentPublisher { tx: Arc::new(tx) }, IntentSlot { rx })
}

/// The slow external strategic process.
#[async_trait]
pub trait DecisionSource: Send + Sync + 'static {
    /// Produce a decision for the given world snapshot. `None` means the
    /// response was unusable; the pool logs the skip and keeps the last
    /// published decision.
    async fn decide(&self, snapshot: WorldSnapshot) -> Option<IntentDecision>;
}

/// Producer pool settings.
#[derive(Debug, Clone, Copy)]
pub struct ProducerConfig {
    /// Delay between launching decision requests.
    pub fire_interval: Duration,
    /// Cap on overlapping in-flight requests.
    pub max_inflight: usize,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            fire_interval: Duration::from_millis(250),
            max_inflight: 4,
        }
    }
}

/// Running producer pool. Dropping the handle stops the pool without
/// waiting; call [`ProducerHandle::shutdown`] for an orderly stop.
pub struct ProducerHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ProducerHandle {
    /// Stop launching new requests, cancel in-flight ones, and wait for
    /// the pool to wind down. The slot keeps serving the last decision
    /// indefinitely.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// Spawn the strategic producer pool.
///
/// Every `fire_interval` the pool captures a fresh snapshot and launches
/// a decision request, allowing up to `max_inflight` overlapping calls;
/// whichever requests complete publish into the slot, freshest write
/// winning. When all permits are busy the launch is skipped rather than
/// queued, so a stalled remote can never build a backlog of stale
/// requests.
pub fn spawn_producer<S, F>(
    source: Arc<S>,
    capture: F,
    publisher: IntentPublisher,
    config: ProducerConfig,
) -> ProducerHandle
where
    S: DecisionSource,
    F: Fn() -> WorldSnapshot + Send + 'static,
{
    let (stop, stop_rx) = watch::channel(false);
    let limiter = Arc::new(Semaphore::new(config.max_inflight));

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.fire_interval);
        let mut stop_signal = stop_rx.clone();
        let mut workers: Vec<JoinHandle<()>> = Vec::new();
        let mut seq: u64 = 0;

        loop {
            tokio::select! {
                _ = stop_signal.changed() => break,
                _ = ticker.tick() => {}
            }
            seq += 1;

            let Ok(permit) = limiter.clone().try_acquire_owned() else {
                log::debug!("intent request {seq} skipped, pool saturated");
                continue;
            };

            let snapshot = capture();
            let source = Arc::clone(&source);
            let publisher = publisher.clone();
            let mut cancel = stop_rx.clone();

            workers.push(tokio::spawn(async move {
                let _permit = permit;
                tokio::select! {
                    _ = cancel.changed() => {
                        log::debug!("intent request {seq} cancelled");
                    }
                    decision = source.decide(snapshot) => match decision {
                        Some(decision) => {
                            log::debug!(
                                "intent request {seq} -> dir ({:.2}, {:.2}) fire {}",
                                decision.dir.x, decision.dir.y, decision.fire
                            );
                            publisher.publish(decision);
                        }
                        None => log::debug!("intent request {seq} unusable, keeping last"),
                    }
                }
            }));
            workers.retain(|w| !w.is_finished());
        }

        for worker in workers {
            let _ = worker.await;
        }
        log::debug!("intent producer pool stopped");
    });

    ProducerHandle { stop, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::consts::{ARENA_H, ARENA_W};
    use crate::reflex::{AgentState, ArenaBounds};

    fn empty_snapshot() -> WorldSnapshot {
        WorldSnapshot::capture(
            &AgentState::new(Vec2::new(400.0, 300.0)),
            true,
            Vec2::new(200.0, 150.0),
            Vec2::ZERO,
            &[],
            &[],
            ArenaBounds::new(ARENA_W, ARENA_H),
        )
    }

    struct FixedSource {
        decision: IntentDecision,
        delay: Duration,
        calls: AtomicU32,
    }

    #[async_trait]
    impl DecisionSource for FixedSource {
        async fn decide(&self, _snapshot: WorldSnapshot) -> Option<IntentDecision> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Some(self.decision)
        }
    }

    #[test]
    fn slot_defaults_to_no_intent() {
        let (_publisher, slot) = intent_slot();
        assert_eq!(slot.latest(), IntentDecision::default());
    }

    #[test]
    fn last_write_wins() {
        let (publisher, slot) = intent_slot();
        publisher.publish(IntentDecision { dir: Vec2::new(1.0, 0.0), fire: false });
        publisher.publish(IntentDecision { dir: Vec2::new(0.0, -1.0), fire: true });
        let latest = slot.latest();
        assert_eq!(latest.dir, Vec2::new(0.0, -1.0));
        assert!(latest.fire);
    }

    #[test]
    fn slot_survives_publisher_drop() {
        let (publisher, slot) = intent_slot();
        publisher.publish(IntentDecision { dir: Vec2::new(0.5, 0.5), fire: true });
        drop(publisher);
        assert_eq!(slot.latest().dir, Vec2::new(0.5, 0.5));
    }

    #[tokio::test]
    async fn pool_publishes_completed_decisions() {
        let (publisher, slot) = intent_slot();
        let source = Arc::new(FixedSource {
            decision: IntentDecision { dir: Vec2::new(-0.9, 0.3), fire: true },
            delay: Duration::from_millis(10),
            calls: AtomicU32::new(0),
        });
        let handle = spawn_producer(
            Arc::clone(&source),
            empty_snapshot,
            publisher,
            ProducerConfig { fire_interval: Duration::from_millis(20), max_inflight: 4 },
        );

        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.shutdown().await;

        assert!(source.calls.load(Ordering::SeqCst) >= 1);
        let latest = slot.latest();
        assert_eq!(latest.dir, Vec2::new(-0.9, 0.3));
        assert!(latest.fire);
    }

    #[tokio::test]
    async fn saturated_pool_skips_instead_of_queueing() {
        let (publisher, _slot) = intent_slot();
        // One permit and a decision slower than the whole test window:
        // only a single request can ever start
        let source = Arc::new(FixedSource {
            decision: IntentDecision::default(),
            delay: Duration::from_secs(30),
            calls: AtomicU32::new(0),
        });
        let handle = spawn_producer(
            Arc::clone(&source),
            empty_snapshot,
            publisher,
            ProducerConfig { fire_interval: Duration::from_millis(10), max_inflight: 1 },
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.shutdown().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_cancels_inflight_and_keeps_last_value() {
        let (publisher, slot) = intent_slot();
        publisher.publish(IntentDecision { dir: Vec2::new(1.0, 0.0), fire: false });

        let source = Arc::new(FixedSource {
            decision: IntentDecision { dir: Vec2::new(0.0, 1.0), fire: true },
            delay: Duration::from_secs(60),
            calls: AtomicU32::new(0),
        });
        let handle = spawn_producer(
            Arc::clone(&source),
            empty_snapshot,
            publisher,
            ProducerConfig { fire_interval: Duration::from_millis(10), max_inflight: 2 },
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        // Must return promptly despite the 60s in-flight decision
        tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
            .await
            .expect("shutdown should cancel in-flight requests");

        // The consumer continues with the last-known intent
        assert_eq!(slot.latest().dir, Vec2::new(1.0, 0.0));
    }

    struct RejectingSource;

    #[async_trait]
    impl DecisionSource for RejectingSource {
        async fn decide(&self, _snapshot: WorldSnapshot) -> Option<IntentDecision> {
            None
        }
    }

    #[tokio::test]
    async fn unusable_decisions_keep_the_last_value() {
        let (publisher, slot) = intent_slot();
        publisher.publish(IntentDecision { dir: Vec2::new(0.7, 0.0), fire: true });

        let handle = spawn_producer(
            Arc::new(RejectingSource),
            empty_snapshot,
            publisher,
            ProducerConfig { fire_interval: Duration::from_millis(10), max_inflight: 2 },
        );
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.shutdown().await;

        assert_eq!(slot.latest().dir, Vec2::new(0.7, 0.0));
    }
}
