//! The story session: one canonical story, its playback, and an optional
//! authoring draft.
//!
//! Entering author mode copies the canonical story into a draft store. Map
//! gestures and form edits only ever touch the draft. Saving swaps the draft
//! in as the canonical document and rewinds playback; leaving author mode
//! without saving throws the draft away.

use std::sync::Arc;

use chrono::TimeDelta;
use storymap_core::clock::Clock;
use storymap_core::error::StoryError;
use storymap_core::rng::DeterministicRng;
use storymap_story::application::serializer::{export_story, import_story, suggested_file_name};
use storymap_story::application::store::SceneStore;
use storymap_story::domain::events::StoryEvent;
use storymap_story::domain::position::Position;
use storymap_story::domain::scene::{Scene, SceneField};
use storymap_story::domain::story::Story;
use uuid::Uuid;

use super::map_view::{MapView, map_view};
use crate::domain::map_event::MapEvent;
use crate::domain::mode::Mode;
use crate::domain::playback::{DEFAULT_DWELL_SECS, PendingAdvance, Playback, TimerToken};

/// Text and file name handed to the host's download capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedStory {
    pub file_name: String,
    pub text: String,
}

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long each scene is shown during autoplay.
    pub dwell: TimeDelta,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dwell: TimeDelta::seconds(DEFAULT_DWELL_SECS),
        }
    }
}

/// One viewer/editor session over a single story.
pub struct StorySession {
    canonical: SceneStore,
    /// Present exactly while in author mode.
    draft: Option<SceneStore>,
    playback: Playback,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for StorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorySession")
            .field("canonical", &self.canonical)
            .field("draft", &self.draft)
            .field("playback", &self.playback)
            .finish_non_exhaustive()
    }
}

impl StorySession {
    /// Opens `story` in reader mode, paused on the first scene.
    #[must_use]
    pub fn new(story: Story, config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        let playback = Playback::new(story.len(), config.dwell);
        Self {
            canonical: SceneStore::new(story),
            draft: None,
            playback,
            clock,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.draft.is_some() {
            Mode::Author
        } else {
            Mode::Reader
        }
    }

    /// The canonical story being played.
    #[must_use]
    pub fn story(&self) -> &Arc<Story> {
        self.canonical.story()
    }

    /// The authoring draft, while in author mode.
    #[must_use]
    pub fn draft(&self) -> Option<&Arc<Story>> {
        self.draft.as_ref().map(SceneStore::story)
    }

    /// The story the user is looking at: the draft while authoring.
    #[must_use]
    pub fn visible_story(&self) -> &Arc<Story> {
        self.draft().unwrap_or_else(|| self.story())
    }

    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// The canonical scene under the playback cursor.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.story().scene_at(self.playback.current_index())
    }

    /// What the map surface should draw.
    #[must_use]
    pub fn map_view(&self) -> MapView {
        map_view(self.visible_story(), &self.playback, self.mode())
    }

    /// Drains story events from the canonical store, then the draft.
    pub fn take_events(&mut self) -> Vec<StoryEvent> {
        let mut events = self.canonical.take_events();
        if let Some(draft) = self.draft.as_mut() {
            events.extend(draft.take_events());
        }
        events
    }

    // Transport.

    /// The single scheduled auto-advance, for the host's timer.
    #[must_use]
    pub fn pending(&self) -> Option<PendingAdvance> {
        self.playback.pending()
    }

    pub fn play(&mut self) {
        self.playback = self.playback.play(self.clock.now());
    }

    pub fn pause(&mut self) {
        self.playback = self.playback.pause();
    }

    pub fn toggle_play(&mut self) {
        self.playback = self.playback.toggle(self.clock.now());
    }

    pub fn reset(&mut self) {
        self.playback = self.playback.reset();
    }

    pub fn step_forward(&mut self) {
        self.playback = self.playback.step_forward(self.clock.now());
    }

    /// Moves the timeline to `index`, clamped into the story.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in author mode.
    pub fn seek(&mut self, index: usize) -> Result<(), StoryError> {
        let mode = self.mode();
        mode.require(mode.permits_seek(), "seek")?;
        self.playback = self.playback.seek(index, self.clock.now());
        Ok(())
    }

    pub fn toggle_show_path(&mut self) {
        self.playback = self.playback.toggle_show_path();
    }

    /// Performs any auto-advance that has come due.
    pub fn tick(&mut self) {
        self.playback = self.playback.tick(self.clock.now());
    }

    /// Host timer callback; ignored unless `token` is still current.
    pub fn fire(&mut self, token: TimerToken) {
        self.playback = self.playback.fire(token, self.clock.now());
    }

    // Modes.

    /// Starts authoring on a copy of the canonical story. Already authoring
    /// keeps the current draft.
    pub fn enter_author_mode(&mut self) {
        if self.draft.is_none() {
            tracing::info!(title = self.story().title(), "entering author mode");
            self.draft = Some(SceneStore::new(Story::clone(self.story())));
        }
    }

    /// Leaves author mode, discarding unsaved draft edits.
    pub fn exit_author_mode(&mut self) {
        if let Some(draft) = self.draft.take() {
            tracing::info!(
                draft_revision = draft.revision(),
                "leaving author mode without saving"
            );
        }
    }

    /// Makes the draft canonical, rewinds playback and returns to reader
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode.
    pub fn save(&mut self) -> Result<(), StoryError> {
        let draft = self.draft.take().ok_or_else(|| StoryError::ModeRestricted {
            operation: "save",
            mode: Mode::Reader.name(),
        })?;
        let story = Story::clone(draft.story());
        tracing::info!(title = story.title(), scenes = story.len(), "saving story");
        self.install(story);
        Ok(())
    }

    fn install(&mut self, story: Story) {
        self.playback = self.playback.reload(story.len());
        self.canonical.replace(story, self.clock.as_ref());
    }

    // Map gestures.

    /// Routes a map surface gesture. Returns whether the story changed.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` for coordinates that are not a valid
    /// position.
    pub fn handle_map_event(&mut self, event: MapEvent) -> Result<bool, StoryError> {
        match event {
            MapEvent::Click { lat, lng } => Ok(self.on_map_click(lat, lng)?.is_some()),
            MapEvent::DragEnd { scene_id, lat, lng } => self.on_drag_end(scene_id, lat, lng),
        }
    }

    /// Adds a scene where the map was clicked, when authoring. Readers'
    /// clicks are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` for an invalid coordinate.
    pub fn on_map_click(&mut self, lat: f64, lng: f64) -> Result<Option<Uuid>, StoryError> {
        let clock = Arc::clone(&self.clock);
        let Some(draft) = self.draft.as_mut() else {
            tracing::debug!(lat, lng, "map click ignored in reader mode");
            return Ok(None);
        };
        let position = Position::try_new(lat, lng)?;
        Ok(Some(draft.add_scene(position, None, None, clock.as_ref())))
    }

    /// Moves a dragged marker's scene, when authoring.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` for an invalid coordinate.
    pub fn on_drag_end(&mut self, scene_id: Uuid, lat: f64, lng: f64) -> Result<bool, StoryError> {
        let clock = Arc::clone(&self.clock);
        let Some(draft) = self.draft.as_mut() else {
            tracing::debug!(%scene_id, "drag ignored in reader mode");
            return Ok(false);
        };
        draft.update_position(scene_id, lat, lng, clock.as_ref())
    }

    // Draft edits.

    fn draft_mut(&mut self, operation: &'static str) -> Result<&mut SceneStore, StoryError> {
        let mode = self.mode();
        mode.require(mode.permits_edits(), operation)?;
        self.draft.as_mut().ok_or(StoryError::ModeRestricted {
            operation,
            mode: mode.name(),
        })
    }

    /// Adds a scene scattered around the default map centre.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode.
    pub fn add_scene(&mut self, rng: &mut dyn DeterministicRng) -> Result<Uuid, StoryError> {
        let clock = Arc::clone(&self.clock);
        Ok(self
            .draft_mut("add_scene")?
            .add_scene_near_default(rng, clock.as_ref()))
    }

    /// Deletes a draft scene. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode.
    pub fn delete_scene(&mut self, scene_id: Uuid) -> Result<bool, StoryError> {
        let clock = Arc::clone(&self.clock);
        Ok(self
            .draft_mut("delete_scene")?
            .delete_scene(scene_id, clock.as_ref()))
    }

    /// Edits one field of a draft scene. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode.
    pub fn update_scene_field(
        &mut self,
        scene_id: Uuid,
        field: SceneField,
    ) -> Result<bool, StoryError> {
        let clock = Arc::clone(&self.clock);
        Ok(self
            .draft_mut("update_scene_field")?
            .update_scene_field(scene_id, field, clock.as_ref()))
    }

    /// Moves a draft scene to typed-in coordinates.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode and
    /// `StoryError::Validation` for an invalid coordinate.
    pub fn update_position(
        &mut self,
        scene_id: Uuid,
        lat: f64,
        lng: f64,
    ) -> Result<bool, StoryError> {
        let clock = Arc::clone(&self.clock);
        self.draft_mut("update_position")?
            .update_position(scene_id, lat, lng, clock.as_ref())
    }

    /// Renames the draft story.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::ModeRestricted` in reader mode.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), StoryError> {
        let clock = Arc::clone(&self.clock);
        self.draft_mut("set_title")?.set_title(title, clock.as_ref());
        Ok(())
    }

    // File exchange.

    /// Serializes the visible story for download.
    #[must_use]
    pub fn export(&self) -> ExportedStory {
        let story = self.visible_story();
        ExportedStory {
            file_name: suggested_file_name(story),
            text: export_story(story),
        }
    }

    /// Loads interchange text. While authoring it replaces the draft;
    /// otherwise it replaces the canonical story and rewinds playback.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Parse` for invalid text; nothing is replaced.
    pub fn import(&mut self, text: &str) -> Result<(), StoryError> {
        let story = import_story(text)?;
        tracing::info!(title = story.title(), scenes = story.len(), "imported story");
        let clock = Arc::clone(&self.clock);
        match self.draft.as_mut() {
            Some(draft) => draft.replace(story, clock.as_ref()),
            None => self.install(story),
        }
        Ok(())
    }
}
