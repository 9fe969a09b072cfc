//! Story Map player entry point.

use std::error::Error;
use std::sync::Arc;

use storymap_core::clock::SystemClock;
use storymap_core::rng::ThreadRng;
use storymap_playback::application::session::{SessionConfig, StorySession};
use storymap_player::command::HELP;
use storymap_player::config::PlayerConfig;
use storymap_player::host::{self, Host};
use storymap_story::application::serializer::import_story;
use storymap_story::domain::story::Story;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the scene output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let config = PlayerConfig::from_env()?;

    let story = match &config.story_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "opening story file");
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| format!("could not read {}: {e}", path.display()))?;
            import_story(&text)?
        }
        None => Story::sample(),
    };

    let clock = Arc::new(SystemClock);
    let mut session = StorySession::new(
        story,
        SessionConfig {
            dwell: config.dwell,
        },
        clock.clone(),
    );

    println!("{HELP}\n");

    let mut rng = ThreadRng;
    let mut host = Host {
        clock: clock.as_ref(),
        rng: &mut rng,
        config: &config,
    };
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    host::run(&mut session, stdin, &mut stdout, &mut host).await?;

    Ok(())
}
