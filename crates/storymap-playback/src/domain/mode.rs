//! Author and reader modes and what each one permits.

use storymap_core::error::StoryError;

/// Which of the two mutually exclusive modes the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Watching the story: timeline scrubbing on, map edits off.
    #[default]
    Reader,
    /// Editing a draft: map edits on, timeline scrubbing off.
    Author,
}

impl Mode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Author => "author",
        }
    }

    #[must_use]
    pub fn is_author(self) -> bool {
        self == Self::Author
    }

    /// Timeline seeking is a reader control.
    #[must_use]
    pub fn permits_seek(self) -> bool {
        self == Self::Reader
    }

    /// Map clicks, marker drags and form edits only reach the story while
    /// authoring.
    #[must_use]
    pub fn permits_edits(self) -> bool {
        self == Self::Author
    }

    /// Rejects `operation` unless `permitted`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` naming this mode.
    pub fn require(self, permitted: bool, operation: &'static str) -> Result<(), StoryError> {
        if permitted {
            Ok(())
        } else {
            tracing::debug!(operation, mode = self.name(), "operation rejected by mode");
            Err(StoryError::ModeRestricted {
                operation,
                mode: self.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_reader() {
        assert_eq!(Mode::default(), Mode::Reader);
    }

    #[test]
    fn test_modes_gate_opposite_controls() {
        assert!(Mode::Reader.permits_seek());
        assert!(!Mode::Reader.permits_edits());
        assert!(Mode::Author.permits_edits());
        assert!(!Mode::Author.permits_seek());
    }

    #[test]
    fn test_require_names_the_rejecting_mode() {
        let mode = Mode::Author;

        let err = mode.require(mode.permits_seek(), "seek").unwrap_err();

        assert_eq!(
            err,
            StoryError::ModeRestricted {
                operation: "seek",
                mode: "author",
            }
        );
    }
}
