//! Domain events for the story document.

use serde::{Deserialize, Serialize};
use storymap_core::event::{DomainEvent, EventMetadata};
use uuid::Uuid;

/// Event type for [`SceneAdded`].
pub const SCENE_ADDED_EVENT_TYPE: &str = "story.scene_added";
/// Event type for [`SceneDeleted`].
pub const SCENE_DELETED_EVENT_TYPE: &str = "story.scene_deleted";
/// Event type for [`SceneUpdated`].
pub const SCENE_UPDATED_EVENT_TYPE: &str = "story.scene_updated";
/// Event type for [`StoryRetitled`].
pub const STORY_RETITLED_EVENT_TYPE: &str = "story.retitled";
/// Event type for [`StoryReplaced`].
pub const STORY_REPLACED_EVENT_TYPE: &str = "story.replaced";

/// Emitted when a scene is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAdded {
    /// The new scene.
    pub scene_id: Uuid,
    /// Its rank in playback order.
    pub timestamp: u64,
}

/// Emitted when a scene is removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDeleted {
    /// The removed scene.
    pub scene_id: Uuid,
}

/// Emitted when one field of a scene changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneUpdated {
    /// The edited scene.
    pub scene_id: Uuid,
    /// Interchange name of the edited field.
    pub field: String,
}

/// Emitted when the story title changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRetitled {
    /// The new title.
    pub title: String,
}

/// Emitted when the whole document is swapped out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryReplaced {
    /// Scene count of the incoming document.
    pub scene_count: usize,
}

/// Event payload variants for the story document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoryEventKind {
    SceneAdded(SceneAdded),
    SceneDeleted(SceneDeleted),
    SceneUpdated(SceneUpdated),
    StoryRetitled(StoryRetitled),
    StoryReplaced(StoryReplaced),
}

impl StoryEventKind {
    pub(crate) fn event_type(&self) -> &'static str {
        match self {
            Self::SceneAdded(_) => SCENE_ADDED_EVENT_TYPE,
            Self::SceneDeleted(_) => SCENE_DELETED_EVENT_TYPE,
            Self::SceneUpdated(_) => SCENE_UPDATED_EVENT_TYPE,
            Self::StoryRetitled(_) => STORY_RETITLED_EVENT_TYPE,
            Self::StoryReplaced(_) => STORY_REPLACED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the story document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StoryEventKind,
}

impl DomainEvent for StoryEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StoryEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
