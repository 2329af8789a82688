//! Alerting decisions for the connectivity monitor.
//!
//! Three pieces, all pure against injected collaborators: the daily
//! [`window::ActiveWindow`] that gates when probing may run, the
//! [`report`] aggregator that turns failing addresses into rendered
//! incident lines, and the [`throttle::NotificationThrottle`] that decides
//! when a sustained failure is actually worth an email.

pub mod report;
pub mod throttle;
pub mod window;

#[cfg(test)]
mod tests;
