//! Domain layer: playback transitions, modes and map gestures.

pub mod map_event;
pub mod mode;
pub mod playback;
