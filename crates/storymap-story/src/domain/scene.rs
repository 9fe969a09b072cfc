//! Scenes: one narrative waypoint each.

use serde::Serialize;
use uuid::Uuid;

use super::position::Position;

/// One narrative waypoint anchored to a map position.
///
/// Field order is the interchange field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) position: Position,
    pub(crate) timestamp: u64,
}

impl Scene {
    /// Stable identifier, never reused within a session.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Rank in playback order; always equal to the scene's index.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn apply(&mut self, field: SceneField) {
        match field {
            SceneField::Title(title) => self.title = title,
            SceneField::Description(description) => self.description = description,
            SceneField::Position(position) => self.position = position,
        }
    }

    pub(crate) fn with_field(&self, field: SceneField) -> Self {
        let mut scene = self.clone();
        scene.apply(field);
        scene
    }
}

/// A single editable field of a scene with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneField {
    Title(String),
    Description(String),
    Position(Position),
}

impl SceneField {
    /// The interchange name of the field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Description(_) => "description",
            Self::Position(_) => "position",
        }
    }
}
