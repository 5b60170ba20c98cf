//! Adapter error taxonomy

use thiserror::Error;

/// Failures raised while talking to the player.
///
/// A transport command the player understood but did not apply is not an
/// error; it is reported as `Ok(false)` by the action operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// The player process or its control channel could not be reached
    #[error("Player unavailable: {0}")]
    Unavailable(String),

    /// A requested metadata field is not known to the player
    #[error("Unsupported metadata field: {0}")]
    FieldUnsupported(String),

    /// Local I/O failure, e.g. while reading album art from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdapterError {
    /// True when the failure means the player could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
