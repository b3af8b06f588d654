use thiserror::Error;

/// Failure taxonomy for the enforcement loop. Nothing here is fatal to the
/// process: configuration errors leave the scheduler idle, everything else
/// is caught, logged and retried on a later cycle.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    // Field is named source_id, not source: thiserror reserves `source`
    // for the error-cause chain and a String cannot fill that role.
    #[error("source '{source_id}': {message}")]
    SourceFetch { source_id: String, message: String },

    #[error("moderation action failed for '{content_id}': {message}")]
    Action { content_id: String, message: String },

    #[error("ledger persistence failed: {0}")]
    Persistence(String),
}
