use crate::PingProbe;
use std::sync::Arc;
use vigia_common::types::ProbeVerdict;

/// Repeats the echo request against one address and reduces the outcomes
/// to a reachability verdict.
///
/// Checks run sequentially, never in parallel; the address is declared
/// unreachable as soon as `failure_threshold` checks have failed. There is
/// no backoff and no retry beyond the fixed attempt count.
pub struct Prober {
    pinger: Arc<dyn PingProbe>,
    attempts: u32,
    failure_threshold: u32,
}

impl Prober {
    pub fn new(pinger: Arc<dyn PingProbe>, attempts: u32, failure_threshold: u32) -> Self {
        Self {
            pinger,
            attempts,
            failure_threshold,
        }
    }

    /// Probes one address; `true` means reachable.
    pub async fn probe(&self, address: &str) -> bool {
        let mut failures = 0u32;
        for attempt in 1..=self.attempts {
            if !self.pinger.check(address).await {
                failures += 1;
                tracing::debug!(address, attempt, failures, "echo request failed");
                if failures >= self.failure_threshold {
                    return false;
                }
            }
        }
        true
    }

    /// Probes one address and wraps the outcome as a [`ProbeVerdict`].
    pub async fn verdict(&self, address: &str) -> ProbeVerdict {
        let reachable = self.probe(address).await;
        ProbeVerdict {
            address: address.to_string(),
            reachable,
        }
    }
}
