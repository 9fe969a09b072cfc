//! Story Map Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the story document and the
//! playback model both depend on. It contains no I/O.

pub mod clock;
pub mod error;
pub mod event;
pub mod rng;
