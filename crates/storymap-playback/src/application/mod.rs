//! Application layer: the story session and the map view query.

pub mod map_view;
pub mod session;
