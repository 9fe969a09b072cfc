//! Geographic positions and the edit-boundary checks that guard them.

use serde::{Deserialize, Serialize};
use storymap_core::error::StoryError;

/// A validated (latitude, longitude) pair in degrees.
///
/// Both components are finite; latitude lies in `[-90, 90]` and longitude in
/// `[-180, 180]`. Serializes as a two-element `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

impl Position {
    /// Where the map is centred when there is no scene to show, and the
    /// anchor around which freshly added scenes are scattered.
    pub const DEFAULT_CENTER: Self = Self {
        lat: 51.505,
        lng: -0.09,
    };

    /// Builds a position after checking both components.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` if either component is non-finite or
    /// out of range.
    pub fn try_new(lat: f64, lng: f64) -> Result<Self, StoryError> {
        Ok(Self {
            lat: check_latitude(lat)?,
            lng: check_longitude(lng)?,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.lng
    }
}

impl TryFrom<[f64; 2]> for Position {
    type Error = StoryError;

    fn try_from([lat, lng]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::try_new(lat, lng)
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.lat, position.lng]
    }
}

fn check_latitude(lat: f64) -> Result<f64, StoryError> {
    check_axis("latitude", lat, 90.0)
}

fn check_longitude(lng: f64) -> Result<f64, StoryError> {
    check_axis("longitude", lng, 180.0)
}

fn check_axis(field: &'static str, value: f64, limit: f64) -> Result<f64, StoryError> {
    if !value.is_finite() {
        return Err(StoryError::validation(field, "must be a finite number"));
    }
    if !(-limit..=limit).contains(&value) {
        return Err(StoryError::validation(
            field,
            format!("{value} is outside [-{limit}, {limit}]"),
        ));
    }
    Ok(value)
}

/// Parses a latitude typed into an edit form.
///
/// # Errors
///
/// Returns `StoryError::Validation` for empty, non-numeric, non-finite or
/// out-of-range input.
pub fn parse_latitude(raw: &str) -> Result<f64, StoryError> {
    parse_axis("latitude", raw).and_then(check_latitude)
}

/// Parses a longitude typed into an edit form.
///
/// # Errors
///
/// Returns `StoryError::Validation` for empty, non-numeric, non-finite or
/// out-of-range input.
pub fn parse_longitude(raw: &str) -> Result<f64, StoryError> {
    parse_axis("longitude", raw).and_then(check_longitude)
}

fn parse_axis(field: &'static str, raw: &str) -> Result<f64, StoryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoryError::validation(field, "a value is required"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|e| StoryError::validation(field, format!("{trimmed:?} is not a number: {e}")))
}
