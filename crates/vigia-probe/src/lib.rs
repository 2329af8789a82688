//! Reachability probing for monitored gateway addresses.
//!
//! The [`PingProbe`] trait wraps a single system-level echo request;
//! [`prober::Prober`] repeats it and reduces the outcomes to a per-address
//! verdict. Probes run sequentially so that parallel pings do not distort
//! results under transient congestion.

pub mod pinger;
pub mod prober;

#[cfg(test)]
mod tests;

use async_trait::async_trait;

/// One blocking reachability check against an address.
///
/// Implementations report failure and timeout both as `false`; a probe
/// never raises an error. The production implementation is
/// [`pinger::SystemPing`]; tests substitute scripted fakes.
#[async_trait]
pub trait PingProbe: Send + Sync {
    /// Issues a single echo request. May take up to the probe's own
    /// timeout to resolve.
    async fn check(&self, address: &str) -> bool;
}
