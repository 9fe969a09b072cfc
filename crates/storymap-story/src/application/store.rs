//! The scene store: single writer of the current story document.
//!
//! Every applied edit swaps in a fresh `Arc<Story>`, bumps the revision and
//! records a `StoryEvent`. Observers holding an earlier `Arc` can detect
//! change with [`Arc::ptr_eq`]. Edits that address a missing scene are
//! ignored: they leave the document, revision and event log alone.

use std::sync::Arc;

use storymap_core::clock::Clock;
use storymap_core::error::StoryError;
use storymap_core::event::EventMetadata;
use storymap_core::rng::DeterministicRng;
use uuid::Uuid;

use crate::domain::events::{
    SceneAdded, SceneDeleted, SceneUpdated, StoryEvent, StoryEventKind, StoryReplaced,
    StoryRetitled,
};
use crate::domain::position::Position;
use crate::domain::scene::SceneField;
use crate::domain::story::Story;

/// Spread, in degrees on each axis, of the jitter applied to scenes added
/// without a map position.
const ADD_SCENE_SPREAD: f64 = 0.1;

/// Owns the current story document.
#[derive(Debug)]
pub struct SceneStore {
    story: Arc<Story>,
    revision: u64,
    /// Events not yet drained by the host.
    uncommitted_events: Vec<StoryEvent>,
}

impl SceneStore {
    /// Creates a store holding `story` at revision 0.
    #[must_use]
    pub fn new(story: Story) -> Self {
        Self {
            story: Arc::new(story),
            revision: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// The current document.
    #[must_use]
    pub fn story(&self) -> &Arc<Story> {
        &self.story
    }

    /// Number of applied changes since the store was created.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.story.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.story.is_empty()
    }

    /// Events recorded since the last call to [`SceneStore::take_events`].
    #[must_use]
    pub fn uncommitted_events(&self) -> &[StoryEvent] {
        &self.uncommitted_events
    }

    /// Drains the recorded events.
    pub fn take_events(&mut self) -> Vec<StoryEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// Appends a scene at `position` and returns its id.
    pub fn add_scene(
        &mut self,
        position: Position,
        title: Option<String>,
        description: Option<String>,
        clock: &dyn Clock,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let next = self.story.with_scene_added(id, position, title, description);
        let timestamp = next.scene(id).map_or(0, |scene| scene.timestamp());
        self.commit(
            next,
            StoryEventKind::SceneAdded(SceneAdded {
                scene_id: id,
                timestamp,
            }),
            clock,
        );
        id
    }

    /// Appends a scene scattered around [`Position::DEFAULT_CENTER`] and
    /// returns its id.
    pub fn add_scene_near_default(
        &mut self,
        rng: &mut dyn DeterministicRng,
        clock: &dyn Clock,
    ) -> Uuid {
        let center = Position::DEFAULT_CENTER;
        let position = Position {
            lat: center.lat + rng.next_centered(ADD_SCENE_SPREAD),
            lng: center.lng + rng.next_centered(ADD_SCENE_SPREAD),
        };
        self.add_scene(position, None, None, clock)
    }

    /// Removes scene `id`. Returns whether anything changed.
    pub fn delete_scene(&mut self, id: Uuid, clock: &dyn Clock) -> bool {
        match self.story.without_scene(id) {
            Ok(next) => {
                self.commit(
                    next,
                    StoryEventKind::SceneDeleted(SceneDeleted { scene_id: id }),
                    clock,
                );
                true
            }
            Err(err) => ignore("delete_scene", &err),
        }
    }

    /// Replaces one field of scene `id`. Returns whether anything changed.
    pub fn update_scene_field(&mut self, id: Uuid, field: SceneField, clock: &dyn Clock) -> bool {
        let name = field.name();
        match self.story.with_scene_field(id, field) {
            Ok(next) => {
                self.commit(
                    next,
                    StoryEventKind::SceneUpdated(SceneUpdated {
                        scene_id: id,
                        field: name.to_owned(),
                    }),
                    clock,
                );
                true
            }
            Err(err) => ignore("update_scene_field", &err),
        }
    }

    /// Moves scene `id` to (`lat`, `lng`). Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` if the coordinates are not a valid
    /// position; the document is left as it was.
    pub fn update_position(
        &mut self,
        id: Uuid,
        lat: f64,
        lng: f64,
        clock: &dyn Clock,
    ) -> Result<bool, StoryError> {
        let position = Position::try_new(lat, lng)?;
        Ok(self.update_scene_field(id, SceneField::Position(position), clock))
    }

    /// Replaces the story title.
    pub fn set_title(&mut self, title: impl Into<String>, clock: &dyn Clock) {
        let title = title.into();
        let next = self.story.with_title(title.clone());
        self.commit(
            next,
            StoryEventKind::StoryRetitled(StoryRetitled { title }),
            clock,
        );
    }

    /// Swaps in a whole new document. This is the only bulk-replace path.
    pub fn replace(&mut self, story: Story, clock: &dyn Clock) {
        let scene_count = story.len();
        tracing::info!(title = story.title(), scene_count, "replacing story document");
        self.commit(
            story,
            StoryEventKind::StoryReplaced(StoryReplaced { scene_count }),
            clock,
        );
    }

    fn commit(&mut self, next: Story, kind: StoryEventKind, clock: &dyn Clock) {
        self.revision += 1;
        self.story = Arc::new(next);
        // TODO: event_id uses Uuid::new_v4(); thread the DeterministicRng
        // through here if event logs ever need to be replayed byte-for-byte.
        let event = StoryEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                sequence_number: self.revision,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}

fn ignore(operation: &'static str, err: &StoryError) -> bool {
    tracing::debug!(operation, %err, "ignoring edit against a missing scene");
    false
}
