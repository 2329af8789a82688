//! Alert delivery for the connectivity monitor.
//!
//! The monitor hands a rendered [`AlertMessage`] to a [`Notifier`]; the
//! built-in implementation is the SMTP [`email::EmailChannel`]. Delivery
//! failure is an error the caller logs. The throttle state has already
//! advanced by the time a send happens, so a broken relay never causes a
//! retry storm.

pub mod email;
pub mod error;


use async_trait::async_trait;
use error::Result;

/// A rendered alert, transport-agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    /// Mail subject line.
    pub subject: String,
    /// Prominent heading at the top of the body.
    pub heading: String,
    /// One incident line per affected branch; may be empty for the
    /// all-clear message.
    pub body_lines: Vec<String>,
}

/// A delivery channel for alert messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers the message to the given recipients.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the channel itself does not
    /// retry.
    async fn send(&self, message: &AlertMessage, recipients: &[String]) -> Result<()>;

    /// Returns the channel type name (e.g., `"email"`).
    fn channel_name(&self) -> &str;
}
