//! Domain layer: scenes, positions, the story value and its events.

pub mod events;
pub mod position;
pub mod scene;
pub mod story;
