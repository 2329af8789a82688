use serde::Deserialize;

/// What a clean cycle does to the consecutive-cycle counter.
///
/// The deployments this replaces disagreed on the point, so the behavior
/// is explicit configuration rather than a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetPolicy {
    /// A cycle with zero failures resets the counter (default).
    ClearCycle,
    /// Only an actual release resets the counter; clean cycles leave it
    /// untouched, so a flapping endpoint still accumulates.
    ReleaseOnly,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self::ClearCycle
    }
}

/// Outcome of observing one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The threshold was reached: send the incident report now.
    Release,
    /// First clean cycle after a failing stretch: the recovery message
    /// may be sent (deployments opt in via config).
    AllClear,
    /// Nothing to send this cycle.
    Suppress,
}

/// Suppresses repeat alerts for sustained failures.
///
/// Every failing cycle increments the counter; the alert is released only
/// when the counter reaches `threshold`, and the counter drops back to
/// zero immediately on release. With the default 360 s poll interval and
/// threshold 25 that is roughly one email every two and a half hours of
/// sustained failure instead of one per cycle.
pub struct NotificationThrottle {
    threshold: u32,
    reset_policy: ResetPolicy,
    consecutive_cycles: u32,
    failing: bool,
}

impl NotificationThrottle {
    pub fn new(threshold: u32, reset_policy: ResetPolicy) -> Self {
        Self {
            threshold,
            reset_policy,
            consecutive_cycles: 0,
            failing: false,
        }
    }

    /// Resumes with a counter already in progress. Used by tests and by
    /// deployments that persist the counter across restarts.
    pub fn resume_at(threshold: u32, reset_policy: ResetPolicy, consecutive_cycles: u32) -> Self {
        Self {
            threshold,
            reset_policy,
            consecutive_cycles,
            failing: consecutive_cycles > 0,
        }
    }

    /// Cycles accumulated since the last release or reset.
    pub fn consecutive_cycles(&self) -> u32 {
        self.consecutive_cycles
    }

    /// Feeds one cycle's outcome through the throttle.
    ///
    /// Delivery failure downstream must not be fed back: a released alert
    /// counts as attempted either way, so a broken mail relay cannot turn
    /// into a retry storm.
    pub fn observe(&mut self, has_failures: bool) -> ThrottleDecision {
        if has_failures {
            self.failing = true;
            self.consecutive_cycles += 1;
            if self.consecutive_cycles >= self.threshold {
                self.consecutive_cycles = 0;
                return ThrottleDecision::Release;
            }
            return ThrottleDecision::Suppress;
        }

        let was_failing = self.failing;
        self.failing = false;
        if self.reset_policy == ResetPolicy::ClearCycle {
            self.consecutive_cycles = 0;
        }
        if was_failing {
            ThrottleDecision::AllClear
        } else {
            ThrottleDecision::Suppress
        }
    }
}
