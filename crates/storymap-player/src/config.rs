//! Player configuration, read from the environment.

use std::path::PathBuf;

use chrono::TimeDelta;
use storymap_playback::domain::playback::DEFAULT_DWELL_SECS;

use crate::error::PlayerError;

/// Seconds each scene stays up during autoplay.
pub const DWELL_SECS_VAR: &str = "STORYMAP_DWELL_SECS";
/// Longest accepted dwell: one day.
pub const MAX_DWELL_SECS: i64 = 86_400;
/// Story file opened at startup.
pub const STORY_VAR: &str = "STORYMAP_STORY";
/// Directory exports are written to.
pub const EXPORT_DIR_VAR: &str = "STORYMAP_EXPORT_DIR";

/// Resolved player settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub dwell: TimeDelta,
    /// `None` opens the built-in sample story.
    pub story_path: Option<PathBuf>,
    pub export_dir: PathBuf,
}

impl PlayerConfig {
    /// Reads the process environment, falling back to the first command-line
    /// argument for the story path.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, PlayerError> {
        Self::from_lookup(|key| std::env::var(key).ok(), std::env::args().nth(1))
    }

    /// Resolves settings from `lookup` and an optional positional argument.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Config` if a variable holds an invalid value.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        story_arg: Option<String>,
    ) -> Result<Self, PlayerError> {
        let dwell_secs = match lookup(DWELL_SECS_VAR) {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| {
                PlayerError::Config(format!("{DWELL_SECS_VAR} must be an integer: {e}"))
            })?,
            None => DEFAULT_DWELL_SECS,
        };
        let dwell = Some(dwell_secs)
            .filter(|secs| (1..=MAX_DWELL_SECS).contains(secs))
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                PlayerError::Config(format!(
                    "{DWELL_SECS_VAR} must be between 1 and {MAX_DWELL_SECS} seconds"
                ))
            })?;

        let story_path = lookup(STORY_VAR)
            .or(story_arg)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let export_dir = lookup(EXPORT_DIR_VAR).map_or_else(|| PathBuf::from("."), PathBuf::from);

        Ok(Self {
            dwell,
            story_path,
            export_dir,
        })
    }
}
