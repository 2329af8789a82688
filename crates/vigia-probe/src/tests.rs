use crate::prober::Prober;
use crate::PingProbe;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Replays a fixed sequence of check outcomes, then repeats the last one.
struct ScriptedPing {
    outcomes: Vec<bool>,
    cursor: AtomicUsize,
}

impl ScriptedPing {
    fn new(outcomes: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            outcomes: outcomes.to_vec(),
            cursor: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PingProbe for ScriptedPing {
    async fn check(&self, _address: &str) -> bool {
        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        *self.outcomes.get(i).or(self.outcomes.last()).unwrap_or(&false)
    }
}

#[tokio::test]
async fn three_failures_is_down() {
    let ping = ScriptedPing::new(&[false, false, false]);
    let prober = Prober::new(ping, 3, 2);
    assert!(!prober.probe("192.168.0.1").await);
}

#[tokio::test]
async fn two_failures_one_success_is_down() {
    let ping = ScriptedPing::new(&[false, false, true]);
    let prober = Prober::new(ping, 3, 2);
    assert!(!prober.probe("192.168.0.2").await);
}

#[tokio::test]
async fn one_failure_two_successes_is_up() {
    let ping = ScriptedPing::new(&[false, true, true]);
    let prober = Prober::new(ping, 3, 2);
    assert!(prober.probe("192.168.0.3").await);
}

#[tokio::test]
async fn all_successes_is_up() {
    let ping = ScriptedPing::new(&[true, true, true]);
    let prober = Prober::new(ping, 3, 2);
    assert!(prober.probe("192.168.0.4").await);
}

#[tokio::test]
async fn stops_probing_once_threshold_reached() {
    let ping = ScriptedPing::new(&[false, false, true]);
    let prober = Prober::new(ping.clone(), 3, 2);
    assert!(!prober.probe("192.168.0.5").await);
    assert_eq!(ping.calls(), 2, "third check should not be issued");
}

#[tokio::test]
async fn verdict_carries_the_probed_address() {
    let ping = ScriptedPing::new(&[true]);
    let prober = Prober::new(ping, 3, 2);
    let verdict = prober.verdict("10.1.1.1").await;
    assert!(verdict.reachable);
    assert_eq!(verdict.address, "10.1.1.1");
}
