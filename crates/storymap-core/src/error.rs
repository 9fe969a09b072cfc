//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for story editing, import and playback.
///
/// None of these are fatal: every operation either succeeds or degrades to a
/// no-op the caller can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    /// Import text is not a valid interchange document.
    #[error("parse error: {0}")]
    Parse(String),

    /// An operation addressed a scene that is not in the current document.
    #[error("scene not found: {0}")]
    InvalidReference(Uuid),

    /// A field value was rejected at the edit boundary.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The field being edited.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The operation is not available in the current mode.
    #[error("{operation} is not available in {mode} mode")]
    ModeRestricted {
        /// The rejected operation.
        operation: &'static str,
        /// The mode that rejected it.
        mode: &'static str,
    },
}

impl StoryError {
    /// Builds a [`StoryError::Validation`] for `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}
