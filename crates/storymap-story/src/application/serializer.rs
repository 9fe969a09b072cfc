//! Interchange format: pretty-printed JSON of the story document.
//!
//! ```json
//! {
//!   "title": "The Journey of Aria",
//!   "scenes": [
//!     {
//!       "id": "…",
//!       "title": "The Village of Millbrook",
//!       "description": "…",
//!       "position": [51.505, -0.09],
//!       "timestamp": 0
//!     }
//!   ]
//! }
//! ```
//!
//! Import is lenient about ids and timestamps: ids that are not UUID strings
//! or that repeat are replaced, and timestamps are recomputed from order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use storymap_core::error::StoryError;
use uuid::Uuid;

use crate::domain::position::Position;
use crate::domain::scene::Scene;
use crate::domain::story::Story;

#[derive(Serialize)]
struct StoryDocument<'a> {
    title: &'a str,
    scenes: &'a [Scene],
}

#[derive(Deserialize)]
struct ImportedStory {
    title: String,
    scenes: Vec<ImportedScene>,
}

#[derive(Deserialize)]
struct ImportedScene {
    #[serde(default)]
    id: Option<serde_json::Value>,
    title: String,
    description: String,
    position: Position,
    #[serde(default)]
    timestamp: Option<u64>,
}

/// Serializes `story` to interchange text. Deterministic for a given document.
#[must_use]
pub fn export_story(story: &Story) -> String {
    let document = StoryDocument {
        title: story.title(),
        scenes: story.scenes(),
    };
    // Positions are always finite, so serialization cannot fail.
    serde_json::to_string_pretty(&document).expect("story serialization is infallible")
}

/// File name offered to the host when exporting `story`.
///
/// Every whitespace run, leading and trailing ones included, becomes a
/// single `_`. An empty title falls back to `story.json`.
#[must_use]
pub fn suggested_file_name(story: &Story) -> String {
    let title = story.title();
    if title.is_empty() {
        return "story.json".to_owned();
    }
    let mut stem = String::with_capacity(title.len());
    let mut in_run = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_run {
                stem.push('_');
            }
            in_run = true;
        } else {
            stem.push(ch);
            in_run = false;
        }
    }
    format!("{stem}.json")
}

/// Parses interchange text into a new story.
///
/// Never touches any existing document; the caller decides whether to swap
/// the result in.
///
/// # Errors
///
/// Returns `StoryError::Parse` if `text` is not valid JSON, lacks a required
/// field, or carries an invalid position.
pub fn import_story(text: &str) -> Result<Story, StoryError> {
    let imported: ImportedStory = serde_json::from_str(text)
        .map_err(|e| StoryError::Parse(format!("invalid story document: {e}")))?;

    let mut seen = HashSet::with_capacity(imported.scenes.len());
    let mut out_of_order = false;
    let scenes = (0u64..)
        .zip(imported.scenes)
        .map(|(rank, scene)| {
            out_of_order |= scene.timestamp.is_some_and(|ts| ts != rank);
            Scene {
                id: claim_id(scene.id.as_ref(), &mut seen),
                title: scene.title,
                description: scene.description,
                position: scene.position,
                timestamp: rank,
            }
        })
        .collect::<Vec<_>>();

    if out_of_order {
        tracing::warn!(
            title = %imported.title,
            "imported timestamps disagree with scene order; renumbering"
        );
    }

    Ok(Story::from_scenes(imported.title, scenes))
}

/// Keeps an imported id when it is an unused UUID, otherwise mints one.
fn claim_id(raw: Option<&serde_json::Value>, seen: &mut HashSet<Uuid>) -> Uuid {
    let kept = raw
        .and_then(serde_json::Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .filter(|id| seen.insert(*id));

    kept.unwrap_or_else(|| {
        let id = Uuid::new_v4();
        seen.insert(id);
        id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_same_content(left: &Story, right: &Story) {
        assert_eq!(left.title(), right.title());
        assert_eq!(left.len(), right.len());
        for (a, b) in left.scenes().iter().zip(right.scenes()) {
            assert_eq!(a.title(), b.title());
            assert_eq!(a.description(), b.description());
            assert_eq!(a.position(), b.position());
            assert_eq!(a.timestamp(), b.timestamp());
        }
    }

    #[test]
    fn test_export_then_import_reproduces_the_story() {
        // Arrange
        let story = Story::sample();

        // Act
        let text = export_story(&story);
        let imported = import_story(&text).unwrap();

        // Assert
        assert_same_content(&story, &imported);
        assert_eq!(story, imported);
    }

    #[test]
    fn test_export_is_deterministic_with_stable_field_order() {
        let story = Story::sample();

        let first = export_story(&story);
        let second = export_story(&story);

        assert_eq!(first, second);
        let title = first.find("\"title\"").unwrap();
        let scenes = first.find("\"scenes\"").unwrap();
        let position = first.find("\"position\"").unwrap();
        let timestamp = first.find("\"timestamp\"").unwrap();
        assert!(title < scenes && position < timestamp);
        assert!(first.contains("\n  \"scenes\": ["));
    }

    #[test]
    fn test_import_accepts_numeric_ids_from_older_exports() {
        // Arrange
        let text = r#"{
            "title": "Legacy",
            "scenes": [
                {"id": 1, "title": "One", "description": "", "position": [1.0, 2.0], "timestamp": 0},
                {"id": 1, "title": "Two", "description": "", "position": [3.0, 4.0], "timestamp": 1}
            ]
        }"#;

        // Act
        let story = import_story(text).unwrap();

        // Assert
        assert_eq!(story.len(), 2);
        assert_ne!(story.scenes()[0].id(), story.scenes()[1].id());
    }

    #[test]
    fn test_import_replaces_duplicate_uuid_ids() {
        let id = Uuid::new_v4();
        let text = format!(
            r#"{{"title": "Dup", "scenes": [
                {{"id": "{id}", "title": "A", "description": "", "position": [0, 0]}},
                {{"id": "{id}", "title": "B", "description": "", "position": [0, 0]}}
            ]}}"#
        );

        let story = import_story(&text).unwrap();

        assert_eq!(story.scenes()[0].id(), id);
        assert_ne!(story.scenes()[1].id(), id);
    }

    #[test]
    fn test_import_renumbers_timestamps_by_order() {
        let text = r#"{"title": "T", "scenes": [
            {"title": "A", "description": "", "position": [0, 0], "timestamp": 7},
            {"title": "B", "description": "", "position": [0, 0], "timestamp": 3}
        ]}"#;

        let story = import_story(text).unwrap();

        let ranks: Vec<u64> = story.scenes().iter().map(Scene::timestamp).collect();
        assert_eq!(ranks, [0, 1]);
        assert_eq!(story.scenes()[0].title(), "A");
    }

    #[test]
    fn test_import_rejects_truncated_text() {
        let text = export_story(&Story::sample());
        let truncated = &text[..text.len() / 2];

        let result = import_story(truncated);

        assert!(matches!(result, Err(StoryError::Parse(_))));
    }

    #[test]
    fn test_import_rejects_missing_required_fields() {
        let text = r#"{"title": "T", "scenes": [{"title": "A", "position": [0, 0]}]}"#;

        assert!(matches!(import_story(text), Err(StoryError::Parse(_))));
        assert!(matches!(
            import_story(r#"{"scenes": []}"#),
            Err(StoryError::Parse(_))
        ));
        assert!(matches!(
            import_story("not a story"),
            Err(StoryError::Parse(_))
        ));
    }

    #[test]
    fn test_import_rejects_out_of_range_position() {
        let text = r#"{"title": "T", "scenes": [
            {"title": "A", "description": "", "position": [95.0, 0]}
        ]}"#;

        let err = import_story(text).unwrap_err();

        assert!(matches!(err, StoryError::Parse(message) if message.contains("latitude")));
    }

    #[test]
    fn test_suggested_file_name_replaces_whitespace_runs() {
        assert_eq!(
            suggested_file_name(&Story::sample()),
            "The_Journey_of_Aria.json"
        );
        assert_eq!(
            suggested_file_name(&Story::new("  A \t  walk ")),
            "_A_walk_.json"
        );
        assert_eq!(suggested_file_name(&Story::new("   ")), "_.json");
        assert_eq!(suggested_file_name(&Story::new("")), "story.json");
    }
}
