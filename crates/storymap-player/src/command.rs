//! One-line commands typed at the player prompt.
//!
//! Scenes are addressed by their 1-based number in the story on screen, the
//! same number the sidebar shows.

use std::path::PathBuf;

use crate::error::PlayerError;

/// Help text printed by `help`.
pub const HELP: &str = "\
reader:  play | pause | toggle | next | reset | seek <n> | path
author:  author | reader | save | add | click <lat> <lng> | drag <n> <lat> <lng>
         delete <n> | title <text> | rename <n> <text> | describe <n> <text>
         move <n> <lat> <lng>
files:   export [path] | import <path>
other:   show | help | quit";

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Toggle,
    Next,
    Reset,
    Seek(usize),
    TogglePath,
    Author,
    Reader,
    Save,
    Add,
    Click { lat: f64, lng: f64 },
    Drag { scene: usize, lat: f64, lng: f64 },
    Delete(usize),
    Title(String),
    Rename { scene: usize, title: String },
    Describe { scene: usize, description: String },
    /// Coordinates kept as typed; they are checked at the edit boundary.
    Move { scene: usize, lat: String, lng: String },
    Export(Option<PathBuf>),
    Import(PathBuf),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Command` for unknown verbs or missing/malformed
    /// arguments.
    pub fn parse(line: &str) -> Result<Self, PlayerError> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match verb.to_ascii_lowercase().as_str() {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "toggle" | "p" => Self::Toggle,
            "next" | "n" => Self::Next,
            "reset" | "r" => Self::Reset,
            "seek" => Self::Seek(scene_number(args.next(), line)?),
            "path" => Self::TogglePath,
            "author" => Self::Author,
            "reader" => Self::Reader,
            "save" => Self::Save,
            "add" => Self::Add,
            "click" => Self::Click {
                lat: number(args.next(), line)?,
                lng: number(args.next(), line)?,
            },
            "drag" => Self::Drag {
                scene: scene_number(args.next(), line)?,
                lat: number(args.next(), line)?,
                lng: number(args.next(), line)?,
            },
            "delete" => Self::Delete(scene_number(args.next(), line)?),
            "title" => Self::Title(rest.to_owned()),
            "rename" => {
                let (scene, text) = numbered_text(rest, line)?;
                Self::Rename { scene, title: text }
            }
            "describe" => {
                let (scene, text) = numbered_text(rest, line)?;
                Self::Describe {
                    scene,
                    description: text,
                }
            }
            "move" => Self::Move {
                scene: scene_number(args.next(), line)?,
                lat: args.next().unwrap_or_default().to_owned(),
                lng: args.next().unwrap_or_default().to_owned(),
            },
            "export" => Self::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "import" if !rest.is_empty() => Self::Import(PathBuf::from(rest)),
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(PlayerError::Command(line.to_owned())),
        };
        Ok(command)
    }
}

/// Parses a 1-based scene number into a 0-based index.
fn scene_number(arg: Option<&str>, line: &str) -> Result<usize, PlayerError> {
    arg.and_then(|raw| raw.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| PlayerError::Command(line.to_owned()))
}

fn number(arg: Option<&str>, line: &str) -> Result<f64, PlayerError> {
    arg.and_then(|raw| raw.parse::<f64>().ok())
        .ok_or_else(|| PlayerError::Command(line.to_owned()))
}

fn numbered_text(rest: &str, line: &str) -> Result<(usize, String), PlayerError> {
    let (number, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((scene_number(Some(number), line)?, text.trim().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_transport_shortcuts() {
        assert_eq!(Command::parse("p").unwrap(), Command::Toggle);
        assert_eq!(Command::parse(" NEXT ").unwrap(), Command::Next);
        assert_eq!(Command::parse("").unwrap(), Command::Show);
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
    }

    #[test]
    fn test_scene_numbers_are_one_based() {
        assert_eq!(Command::parse("seek 1").unwrap(), Command::Seek(0));
        assert_eq!(Command::parse("delete 3").unwrap(), Command::Delete(2));
        assert!(matches!(
            Command::parse("seek 0"),
            Err(PlayerError::Command(_))
        ));
    }

    #[test]
    fn test_parses_map_gestures() {
        assert_eq!(
            Command::parse("click 51.51 -0.08").unwrap(),
            Command::Click {
                lat: 51.51,
                lng: -0.08
            }
        );
        assert_eq!(
            Command::parse("drag 2 48.85 2.35").unwrap(),
            Command::Drag {
                scene: 1,
                lat: 48.85,
                lng: 2.35
            }
        );
        assert!(Command::parse("click 51.51").is_err());
    }

    #[test]
    fn test_text_arguments_keep_inner_spacing() {
        assert_eq!(
            Command::parse("rename 2 The  Old Mill").unwrap(),
            Command::Rename {
                scene: 1,
                title: "The  Old Mill".to_owned()
            }
        );
        assert_eq!(
            Command::parse("title A Long Walk").unwrap(),
            Command::Title("A Long Walk".to_owned())
        );
        assert_eq!(
            Command::parse("describe 1").unwrap(),
            Command::Describe {
                scene: 0,
                description: String::new()
            }
        );
    }

    #[test]
    fn test_move_keeps_raw_coordinates_for_validation() {
        assert_eq!(
            Command::parse("move 1 north 2").unwrap(),
            Command::Move {
                scene: 0,
                lat: "north".to_owned(),
                lng: "2".to_owned()
            }
        );
    }

    #[test]
    fn test_files_and_unknown_verbs() {
        assert_eq!(Command::parse("export").unwrap(), Command::Export(None));
        assert_eq!(
            Command::parse("import trip.json").unwrap(),
            Command::Import(PathBuf::from("trip.json"))
        );
        assert!(Command::parse("import").is_err());
        assert!(Command::parse("fly away").is_err());
    }
}
