//! Story Map player — a terminal stand-in for the map surface and file
//! picker.
//!
//! Reads one command per line, drives the session's dwell timer with the
//! real clock, and prints the scene under the cursor.

pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod render;
