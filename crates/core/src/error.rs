use crate::EntryId;

/// Result alias that carries the custom [`MultiViewError`] type.
pub type Result<T> = std::result::Result<T, MultiViewError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum MultiViewError {
    /// Free-form failure, mostly used by media backends that have no richer
    /// error model of their own.
    #[error("{0}")]
    Message(String),
    /// A relative seek was requested with an amount that is not a finite,
    /// non-negative number of seconds.
    #[error("invalid seek amount: {0}")]
    InvalidSeek(f64),
    /// The media layer refused an operation for a specific entry.
    #[error("media failure on entry {entry}: {reason}")]
    Media { entry: EntryId, reason: String },
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration or session files.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl MultiViewError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn media<T: Into<String>>(entry: EntryId, reason: T) -> Self {
        Self::Media {
            entry,
            reason: reason.into(),
        }
    }
}

impl From<&str> for MultiViewError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MultiViewError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
