//! The story document: a title and an ordered run of scenes.
//!
//! Every edit is a pure transform that returns a new `Story`; the scene
//! store decides which value is current.

use storymap_core::error::StoryError;
use uuid::Uuid;

use super::position::Position;
use super::scene::{Scene, SceneField};

/// Description given to scenes added without one.
pub const DEFAULT_SCENE_DESCRIPTION: &str = "Enter scene description...";

/// The authored document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Story {
    pub(crate) title: String,
    pub(crate) scenes: Vec<Scene>,
}

impl Story {
    /// Creates an empty story.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scenes: Vec::new(),
        }
    }

    /// Builds a story from scenes in playback order, re-ranking timestamps.
    pub(crate) fn from_scenes(title: String, mut scenes: Vec<Scene>) -> Self {
        renumber(&mut scenes);
        Self { title, scenes }
    }

    /// The built-in demonstration story.
    #[must_use]
    pub fn sample() -> Self {
        let waypoints = [
            (
                "The Village of Millbrook",
                "Aria begins her journey in the peaceful village of Millbrook, nestled in the valley.",
                Position { lat: 51.505, lng: -0.09 },
            ),
            (
                "The Ancient Forest",
                "Following the old path, Aria enters the mysterious Ancient Forest where shadows dance between towering trees.",
                Position { lat: 51.515, lng: -0.1 },
            ),
            (
                "The Mountain Pass",
                "After days of travel, Aria reaches the treacherous Mountain Pass, where the air grows thin and cold.",
                Position { lat: 51.525, lng: -0.11 },
            ),
            (
                "The Crystal Lake",
                "Beyond the mountains lies the legendary Crystal Lake, its waters reflecting the sky like a mirror.",
                Position { lat: 51.535, lng: -0.12 },
            ),
        ];

        let scenes = waypoints
            .into_iter()
            .map(|(title, description, position)| Scene {
                id: Uuid::new_v4(),
                title: title.to_owned(),
                description: description.to_owned(),
                position,
                timestamp: 0,
            })
            .collect();

        Self::from_scenes("The Journey of Aria".to_owned(), scenes)
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Scenes in playback order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// The scene at playback `index`, if any.
    #[must_use]
    pub fn scene_at(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    /// Looks up a scene by id.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidReference` if no scene has `id`.
    pub fn scene(&self, id: Uuid) -> Result<&Scene, StoryError> {
        self.index_of(id).map(|index| &self.scenes[index])
    }

    fn index_of(&self, id: Uuid) -> Result<usize, StoryError> {
        self.scenes
            .iter()
            .position(|scene| scene.id == id)
            .ok_or(StoryError::InvalidReference(id))
    }

    /// Returns a copy with a scene appended at the end of playback.
    ///
    /// Without a title the scene is called `New Scene {N+1}`.
    #[must_use]
    pub fn with_scene_added(
        &self,
        id: Uuid,
        position: Position,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        let rank = self.scenes.len();
        let scene = Scene {
            id,
            title: title.unwrap_or_else(|| format!("New Scene {}", rank + 1)),
            description: description.unwrap_or_else(|| DEFAULT_SCENE_DESCRIPTION.to_owned()),
            position,
            timestamp: rank as u64,
        };

        let mut scenes = self.scenes.clone();
        scenes.push(scene);
        Self {
            title: self.title.clone(),
            scenes,
        }
    }

    /// Returns a copy without the scene `id`, with later scenes moved up one
    /// rank.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidReference` if no scene has `id`.
    pub fn without_scene(&self, id: Uuid) -> Result<Self, StoryError> {
        let index = self.index_of(id)?;
        let mut scenes = self.scenes.clone();
        scenes.remove(index);
        Ok(Self::from_scenes(self.title.clone(), scenes))
    }

    /// Returns a copy with one field of scene `id` replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidReference` if no scene has `id`.
    pub fn with_scene_field(&self, id: Uuid, field: SceneField) -> Result<Self, StoryError> {
        let index = self.index_of(id)?;
        let mut scenes = self.scenes.clone();
        scenes[index] = scenes[index].with_field(field);
        Ok(Self {
            title: self.title.clone(),
            scenes,
        })
    }

    /// Returns a copy with the story title replaced.
    #[must_use]
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            scenes: self.scenes.clone(),
        }
    }
}

fn renumber(scenes: &mut [Scene]) {
    for (rank, scene) in (0u64..).zip(scenes.iter_mut()) {
        scene.timestamp = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_scene_story() -> Story {
        ["A", "B", "C"].into_iter().fold(Story::new("Walk"), |story, title| {
            story.with_scene_added(
                Uuid::new_v4(),
                Position::DEFAULT_CENTER,
                Some(title.to_owned()),
                None,
            )
        })
    }

    #[test]
    fn test_sample_story_has_four_ranked_scenes() {
        let story = Story::sample();

        assert_eq!(story.title(), "The Journey of Aria");
        assert_eq!(story.len(), 4);
        for (rank, scene) in story.scenes().iter().enumerate() {
            assert_eq!(scene.timestamp(), rank as u64);
        }
    }

    #[test]
    fn test_with_scene_added_uses_default_title_and_next_rank() {
        // Arrange
        let story = Story::new("Empty");
        let id = Uuid::new_v4();

        // Act
        let story = story.with_scene_added(id, Position::DEFAULT_CENTER, None, None);

        // Assert
        let scene = story.scene(id).unwrap();
        assert_eq!(scene.title(), "New Scene 1");
        assert_eq!(scene.description(), DEFAULT_SCENE_DESCRIPTION);
        assert_eq!(scene.timestamp(), 0);
    }

    #[test]
    fn test_with_scene_added_leaves_original_untouched() {
        let story = Story::new("Empty");

        let grown = story.with_scene_added(Uuid::new_v4(), Position::DEFAULT_CENTER, None, None);

        assert!(story.is_empty());
        assert_eq!(grown.len(), 1);
    }

    #[test]
    fn test_without_middle_scene_renumbers_and_keeps_order() {
        // Arrange
        let story = three_scene_story();
        let middle = story.scenes()[1].id();

        // Act
        let story = story.without_scene(middle).unwrap();

        // Assert
        let titles: Vec<&str> = story.scenes().iter().map(Scene::title).collect();
        assert_eq!(titles, ["A", "C"]);
        let ranks: Vec<u64> = story.scenes().iter().map(Scene::timestamp).collect();
        assert_eq!(ranks, [0, 1]);
    }

    #[test]
    fn test_timestamps_match_positions_after_any_deletion() {
        let story = three_scene_story();

        for scene in story.scenes() {
            let remaining = story.without_scene(scene.id()).unwrap();
            for (rank, scene) in remaining.scenes().iter().enumerate() {
                assert_eq!(scene.timestamp(), rank as u64);
            }
        }
    }

    #[test]
    fn test_unknown_id_is_an_invalid_reference() {
        let story = three_scene_story();
        let missing = Uuid::new_v4();

        assert_eq!(
            story.without_scene(missing).unwrap_err(),
            StoryError::InvalidReference(missing)
        );
        assert_eq!(
            story
                .with_scene_field(missing, SceneField::Title("x".into()))
                .unwrap_err(),
            StoryError::InvalidReference(missing)
        );
    }

    #[test]
    fn test_with_scene_field_replaces_only_that_field() {
        // Arrange
        let story = three_scene_story();
        let id = story.scenes()[2].id();
        let moved = Position::try_new(48.85, 2.35).unwrap();

        // Act
        let story = story
            .with_scene_field(id, SceneField::Position(moved))
            .unwrap();

        // Assert
        let scene = story.scene(id).unwrap();
        assert_eq!(scene.position(), moved);
        assert_eq!(scene.title(), "C");
        assert_eq!(scene.timestamp(), 2);
    }
}
