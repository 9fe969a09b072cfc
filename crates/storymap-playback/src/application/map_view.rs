//! Map view query: what the map surface should draw right now.

use storymap_story::domain::position::Position;
use storymap_story::domain::story::Story;
use uuid::Uuid;

use crate::domain::mode::Mode;
use crate::domain::playback::Playback;

/// How the path line should be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Reader mode: the route travelled so far.
    Travelled,
    /// Author mode: a preview through every scene.
    Draft,
}

/// One marker to place on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub scene_id: Uuid,
    pub position: Position,
    /// Whether the surface should let the user drag it.
    pub draggable: bool,
    pub title: String,
    pub description: String,
}

/// The polyline joining scenes.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLine {
    pub points: Vec<Position>,
    pub style: PathStyle,
}

/// Everything the map surface needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Where to centre the map.
    pub center: Position,
    pub markers: Vec<Marker>,
    /// Absent when hidden or when it would have fewer than two points.
    pub path: Option<PathLine>,
}

/// Derives the map view of `story` for the given cursor and mode.
///
/// Authors see every scene as a draggable marker and a draft path through
/// all of them. Readers see only the current scene and the path up to it.
#[must_use]
pub fn map_view(story: &Story, playback: &Playback, mode: Mode) -> MapView {
    let current = story
        .scene_at(playback.current_index())
        .or_else(|| story.scenes().first());
    let center = current.map_or(Position::DEFAULT_CENTER, |scene| scene.position());

    let shown: Vec<_> = if mode.is_author() {
        story.scenes().iter().collect()
    } else {
        current.into_iter().collect()
    };
    let markers = shown
        .into_iter()
        .map(|scene| Marker {
            scene_id: scene.id(),
            position: scene.position(),
            draggable: mode.permits_edits(),
            title: scene.title().to_owned(),
            description: scene.description().to_owned(),
        })
        .collect();

    let (reach, style) = if mode.is_author() {
        (story.len(), PathStyle::Draft)
    } else {
        (playback.current_index() + 1, PathStyle::Travelled)
    };
    let points: Vec<Position> = story
        .scenes()
        .iter()
        .take(reach)
        .map(|scene| scene.position())
        .collect();
    let path = (playback.show_path() && points.len() > 1).then_some(PathLine { points, style });

    MapView {
        center,
        markers,
        path,
    }
}
