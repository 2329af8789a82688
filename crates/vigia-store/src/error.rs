/// Errors that can occur within the endpoint store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An underlying SQLite error. Covers both an unreachable database
    /// file and a failed query; the monitor treats either as the data
    /// source being unavailable for the cycle.
    #[error("Store: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A diagnostic script tried to do something other than read. The
    /// statement is rejected before execution.
    #[error("Store: statement is not read-only and was not executed: {statement}")]
    OperationNotPermitted { statement: String },

    /// The data source could not be reached at all.
    #[error("Store: data source unavailable: {0}")]
    Unavailable(String),
}

/// Convenience `Result` alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
