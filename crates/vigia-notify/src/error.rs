/// Errors that can occur within the notification subsystem.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A sender or recipient address could not be parsed.
    #[error("Notify: invalid mailbox address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),

    /// The message itself could not be built.
    #[error("Notify: could not build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// SMTP transport error while sending.
    #[error("Notify: SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
