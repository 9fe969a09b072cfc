//! Plain-text rendering of the session for the terminal.

use std::io::{self, Write};

use storymap_playback::application::map_view::PathStyle;
use storymap_playback::application::session::StorySession;
use storymap_playback::domain::mode::Mode;

/// Prints what the user should see after a command or an auto-advance.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn session<W: Write>(out: &mut W, session: &StorySession) -> io::Result<()> {
    match session.mode() {
        Mode::Reader => reader(out, session),
        Mode::Author => author(out, session),
    }
}

fn reader<W: Write>(out: &mut W, session: &StorySession) -> io::Result<()> {
    let story = session.story();
    let playback = session.playback();
    let Some(scene) = session.current_scene() else {
        return writeln!(out, "{}: no scenes yet", story.title());
    };

    let state = if playback.is_playing() { "playing" } else { "paused" };
    writeln!(
        out,
        "[{}/{}] {} ({state})",
        playback.current_index() + 1,
        story.len(),
        scene.title()
    )?;
    writeln!(out, "    {}", scene.description())?;
    path_line(out, session)
}

fn author<W: Write>(out: &mut W, session: &StorySession) -> io::Result<()> {
    let view = session.map_view();
    let story = session.visible_story();
    writeln!(out, "Author tools: {} ({} scenes)", story.title(), story.len())?;
    for (number, marker) in (1..).zip(&view.markers) {
        writeln!(
            out,
            "  #{number} {} @ {:.6}, {:.6}",
            marker.title,
            marker.position.latitude(),
            marker.position.longitude()
        )?;
    }
    path_line(out, session)
}

fn path_line<W: Write>(out: &mut W, session: &StorySession) -> io::Result<()> {
    let Some(path) = session.map_view().path else {
        return Ok(());
    };
    let label = match path.style {
        PathStyle::Travelled => "travelled",
        PathStyle::Draft => "draft route",
    };
    writeln!(out, "    {label}: {} waypoints", path.points.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storymap_playback::application::session::SessionConfig;
    use storymap_story::domain::story::Story;
    use storymap_test_support::{FixedClock, fixed_now};

    use super::*;

    fn rendered(session: &StorySession) -> String {
        let mut out = Vec::new();
        super::session(&mut out, session).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_session() -> StorySession {
        StorySession::new(
            Story::sample(),
            SessionConfig::default(),
            Arc::new(FixedClock(fixed_now())),
        )
    }

    #[test]
    fn test_reader_shows_position_and_current_scene() {
        let mut session = sample_session();
        session.seek(1).unwrap();

        let text = rendered(&session);

        assert!(text.starts_with("[2/4] The Ancient Forest (paused)\n"));
        assert!(text.contains("travelled: 2 waypoints"));
    }

    #[test]
    fn test_author_lists_every_scene_with_coordinates() {
        let mut session = sample_session();
        session.enter_author_mode();

        let text = rendered(&session);

        assert!(text.starts_with("Author tools: The Journey of Aria (4 scenes)\n"));
        assert!(text.contains("  #1 The Village of Millbrook @ 51.505000, -0.090000\n"));
        assert!(text.contains("draft route: 4 waypoints"));
    }

    #[test]
    fn test_empty_story_says_so() {
        let session = StorySession::new(
            Story::new("Blank"),
            SessionConfig::default(),
            Arc::new(FixedClock(fixed_now())),
        );

        assert_eq!(rendered(&session), "Blank: no scenes yet\n");
    }
}
