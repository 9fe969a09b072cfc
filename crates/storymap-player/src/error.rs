//! Story Map player — error types.

use storymap_core::error::StoryError;
use thiserror::Error;

/// Startup and runtime errors for the player.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// A configuration variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command line could not be understood.
    #[error("unrecognised command: {0}")]
    Command(String),

    /// Terminal or file I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The story rejected an operation.
    #[error(transparent)]
    Story(#[from] StoryError),
}
