//! Error handling for the voting core

/// Result type alias for the voting core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the voting core
///
/// Duplicate votes and withheld results are NOT errors; they are modelled as
/// ordinary outcomes ([`crate::ballot::CastOutcome::AlreadyVoted`] and
/// [`crate::ballot::ElectionResults::Withheld`]). Only genuine request or
/// infrastructure failures land here.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The referenced election does not exist, is not open, or the candidate
    /// does not belong to it. Rejected before any write.
    #[error("Unknown election or candidate: {message}")]
    UnknownTarget { message: String },

    /// Input validation errors (rejected before any store access)
    #[error("Validation failed: {field}")]
    Validation { field: String },

    /// The store is unreachable or a write failed for a non-duplicate reason.
    /// The attempted transaction is fully rolled back; safe to retry.
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new unknown-target error
    pub fn unknown_target(message: impl Into<String>) -> Self {
        Self::UnknownTarget {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

/// Convenience macros for creating specific error types
#[macro_export]
macro_rules! persistence_error {
    ($msg:expr) => {
        $crate::Error::persistence($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::persistence(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! target_error {
    ($msg:expr) => {
        $crate::Error::unknown_target($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::unknown_target(format!($fmt, $($arg)*))
    };
}
