//! The player loop: stdin commands, the dwell timer and file exchange.
//!
//! Each turn waits for whichever comes first, the next input line or the
//! session's pending advance. The timer future is rebuilt every turn from
//! `session.pending()`, so a cancelled or rescheduled advance never fires.
//! Once input is exhausted the loop keeps going until playback stops.

use std::io::Write;
use std::path::Path;

use storymap_core::clock::Clock;
use storymap_core::error::StoryError;
use storymap_core::event::DomainEvent;
use storymap_core::rng::DeterministicRng;
use storymap_playback::application::session::StorySession;
use storymap_playback::domain::map_event::MapEvent;
use storymap_playback::domain::playback::{PendingAdvance, TimerToken};
use storymap_story::domain::position::{parse_latitude, parse_longitude};
use storymap_story::domain::scene::SceneField;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use uuid::Uuid;

use crate::command::{Command, HELP};
use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::render;

/// Services the host lends to the session loop.
pub struct Host<'a> {
    pub clock: &'a dyn Clock,
    pub rng: &'a mut dyn DeterministicRng,
    pub config: &'a PlayerConfig,
}

enum Flow {
    Continue,
    Quit,
}

/// Runs the player until `quit`, or until input ends and playback stops.
///
/// Story-level failures (bad coordinates, malformed imports, mode
/// restrictions) are printed and the loop carries on.
///
/// # Errors
///
/// Returns `PlayerError::Io` if reading input or writing output fails.
pub async fn run<R, W>(
    session: &mut StorySession,
    input: R,
    out: &mut W,
    host: &mut Host<'_>,
) -> Result<(), PlayerError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut input_open = true;
    render::session(out, session)?;

    loop {
        if !input_open && session.pending().is_none() {
            break;
        }
        let timer = wait_for(session.pending(), host.clock);

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    tracing::debug!("input closed");
                    input_open = false;
                    continue;
                };
                let flow = match Command::parse(&line) {
                    Ok(command) => apply(session, command, out, host).await?,
                    Err(err) => {
                        writeln!(out, "{err} (try `help`)")?;
                        Flow::Continue
                    }
                };
                log_events(session);
                if matches!(flow, Flow::Quit) {
                    break;
                }
            }
            token = timer => {
                session.fire(token);
                render::session(out, session)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Sleeps until `pending` is due and yields its token; never resolves when
/// nothing is pending.
async fn wait_for(pending: Option<PendingAdvance>, clock: &dyn Clock) -> TimerToken {
    let Some(pending) = pending else {
        return std::future::pending().await;
    };
    let delay = (pending.due_at - clock.now()).to_std().unwrap_or_default();
    tokio::time::sleep(delay).await;
    pending.token
}

async fn apply<W: Write>(
    session: &mut StorySession,
    command: Command,
    out: &mut W,
    host: &mut Host<'_>,
) -> Result<Flow, PlayerError> {
    let outcome = match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(Flow::Continue);
        }
        Command::Export(path) => {
            export(session, path.as_deref(), out, host.config).await?;
            return Ok(Flow::Continue);
        }
        Command::Import(path) => match tokio::fs::read_to_string(&path).await {
            Ok(text) => session.import(&text),
            Err(err) => {
                writeln!(out, "could not read {}: {err}", path.display())?;
                return Ok(Flow::Continue);
            }
        },
        command => edit(session, command, host),
    };

    if let Err(err) = outcome {
        writeln!(out, "{err}")?;
    }
    render::session(out, session)?;
    Ok(Flow::Continue)
}

/// Applies a command that only touches in-memory state.
fn edit(
    session: &mut StorySession,
    command: Command,
    host: &mut Host<'_>,
) -> Result<(), StoryError> {
    match command {
        Command::Play => session.play(),
        Command::Pause => session.pause(),
        Command::Toggle => session.toggle_play(),
        Command::Next => session.step_forward(),
        Command::Reset => session.reset(),
        Command::Seek(index) => session.seek(index)?,
        Command::TogglePath => session.toggle_show_path(),
        Command::Author => session.enter_author_mode(),
        Command::Reader => session.exit_author_mode(),
        Command::Save => session.save()?,
        Command::Add => {
            session.add_scene(host.rng)?;
        }
        Command::Click { lat, lng } => {
            session.handle_map_event(MapEvent::Click { lat, lng })?;
        }
        Command::Drag { scene, lat, lng } => {
            let scene_id = scene_id(session, scene)?;
            session.handle_map_event(MapEvent::DragEnd { scene_id, lat, lng })?;
        }
        Command::Delete(scene) => {
            let scene_id = scene_id(session, scene)?;
            session.delete_scene(scene_id)?;
        }
        Command::Title(title) => session.set_title(title)?,
        Command::Rename { scene, title } => {
            let scene_id = scene_id(session, scene)?;
            session.update_scene_field(scene_id, SceneField::Title(title))?;
        }
        Command::Describe { scene, description } => {
            let scene_id = scene_id(session, scene)?;
            session.update_scene_field(scene_id, SceneField::Description(description))?;
        }
        Command::Move { scene, lat, lng } => {
            let scene_id = scene_id(session, scene)?;
            let lat = parse_latitude(&lat)?;
            let lng = parse_longitude(&lng)?;
            session.update_position(scene_id, lat, lng)?;
        }
        // File exchange, help and quit are handled by `apply`.
        Command::Show
        | Command::Export(_)
        | Command::Import(_)
        | Command::Help
        | Command::Quit => {}
    }
    Ok(())
}

/// Resolves an on-screen scene index to its id.
fn scene_id(session: &StorySession, index: usize) -> Result<Uuid, StoryError> {
    session
        .visible_story()
        .scene_at(index)
        .map(|scene| scene.id())
        .ok_or_else(|| {
            StoryError::validation("scene", format!("there is no scene #{}", index + 1))
        })
}

async fn export<W: Write>(
    session: &StorySession,
    path: Option<&Path>,
    out: &mut W,
    config: &PlayerConfig,
) -> Result<(), PlayerError> {
    let exported = session.export();
    let target = path.map_or_else(
        || config.export_dir.join(&exported.file_name),
        Path::to_path_buf,
    );
    match tokio::fs::write(&target, exported.text).await {
        Ok(()) => {
            tracing::info!(path = %target.display(), "exported story");
            writeln!(out, "exported to {}", target.display())?;
        }
        Err(err) => writeln!(out, "could not write {}: {err}", target.display())?,
    }
    Ok(())
}

fn log_events(session: &mut StorySession) {
    for event in session.take_events() {
        let meta = event.metadata();
        tracing::debug!(
            event_type = event.event_type(),
            sequence_number = meta.sequence_number,
            payload = %event.to_payload(),
            "story changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use storymap_playback::application::session::SessionConfig;
    use storymap_story::domain::story::Story;
    use storymap_test_support::{ManualClock, MockRng};

    use super::*;

    struct Harness {
        session: StorySession,
        clock: Arc<ManualClock>,
        config: PlayerConfig,
    }

    impl Harness {
        fn new() -> Self {
            let clock = Arc::new(ManualClock::default());
            let session =
                StorySession::new(Story::sample(), SessionConfig::default(), clock.clone());
            let config = PlayerConfig::from_lookup(|_| None, None).unwrap();
            Self {
                session,
                clock,
                config,
            }
        }

        async fn run(&mut self, script: &str) -> String {
            let mut out = Vec::new();
            let mut rng = MockRng;
            let mut host = Host {
                clock: self.clock.as_ref(),
                rng: &mut rng,
                config: &self.config,
            };
            run(&mut self.session, script.as_bytes(), &mut out, &mut host)
                .await
                .unwrap();
            String::from_utf8(out).unwrap()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_then_end_of_input_plays_to_the_last_scene() {
        let mut harness = Harness::new();

        let output = harness.run("play\n").await;

        assert!(output.contains("[2/4] The Ancient Forest (playing)"));
        assert!(output.contains("[4/4] The Crystal Lake (paused)"));
        assert_eq!(harness.session.playback().current_index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_before_any_advance() {
        let mut harness = Harness::new();

        harness.run("play\nquit\n").await;

        assert_eq!(harness.session.playback().current_index(), 0);
    }

    #[tokio::test]
    async fn test_authoring_script_edits_and_saves() {
        let mut harness = Harness::new();

        let output = harness
            .run("author\nclick 51.51 -0.08\nrename 5 The Harbour\ndelete 1\nsave\n")
            .await;

        let story = harness.session.story();
        assert_eq!(story.len(), 4);
        assert_eq!(story.scenes()[3].title(), "The Harbour");
        assert!(output.contains("#5 The Harbour @ 51.510000, -0.080000"));
        assert!(output.contains("[1/4] The Ancient Forest (paused)\n"));
    }

    #[tokio::test]
    async fn test_story_errors_are_reported_and_the_loop_continues() {
        let mut harness = Harness::new();

        let output = harness
            .run("author\nseek 2\nmove 1 95 0\nfly\nreader\nseek 2\n")
            .await;

        assert!(output.contains("seek is not available in author mode"));
        assert!(output.contains("invalid latitude"));
        assert!(output.contains("unrecognised command: fly"));
        assert_eq!(harness.session.playback().current_index(), 1);
    }

    #[tokio::test]
    async fn test_import_of_missing_file_is_reported() {
        let mut harness = Harness::new();

        let output = harness.run("import /nonexistent/story.json\n").await;

        assert!(output.contains("could not read /nonexistent/story.json"));
        assert_eq!(harness.session.story().len(), 4);
    }
}
