//! Gestures reported upward by the map surface.

use uuid::Uuid;

/// A gesture the map surface has already recognised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// The map background was clicked at (`lat`, `lng`).
    Click { lat: f64, lng: f64 },
    /// The marker for `scene_id` was dropped at (`lat`, `lng`).
    DragEnd { scene_id: Uuid, lat: f64, lng: f64 },
}
