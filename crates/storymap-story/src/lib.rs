//! Story Map — story document bounded context.
//!
//! Responsible for the ordered scene collection, the edits an author can make
//! to it, and the text format used to export and import a story.

pub mod application;
pub mod domain;
