use thiserror::Error;

/// Errors raised by request builder operations.
///
/// Enum-validated setters reject out-of-range input without touching
/// the document; slot reads on structures that were never created
/// surface as `SlotNotFound` / `UnresolvedSlot`.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("confirmation status must be 'NONE', 'CONFIRMED' or 'DENIED', got '{0}'")]
    InvalidConfirmationStatus(String),

    #[error("dialog state must be 'STARTED', 'IN_PROGRESS' or 'COMPLETED', got '{0}'")]
    InvalidDialogState(String),

    #[error("slot '{0}' doesn't exist")]
    SlotNotFound(String),

    #[error("slot '{0}' carries no resolution data")]
    MissingResolutions(String),

    #[error("cannot resolve slot '{name}'")]
    UnresolvedSlot {
        name: String,
        #[source]
        source: Box<RequestError>,
    },
}
