//! Story Map — playback and authoring session bounded context.
//!
//! Responsible for the playback cursor and its dwell timer, the author/reader
//! mode rules, routing map gestures to the scene store, and deriving what
//! the map surface should draw.

pub mod application;
pub mod domain;
