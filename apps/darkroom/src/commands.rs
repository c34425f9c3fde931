use anyhow::{anyhow, bail};
use shared::{domain::BathType, protocol::Intent};

pub const HELP: &str = "\
commands:
  start                 open the shutter
  stop                  close the shutter and commit the exposure
  place <bath>          put the paper in a tray (developer, stop, fixer, wash)
  remove                lift the paper out of its tray
  next                  move on to the next stage
  light                 toggle the room light
  view                  flip between negative and positive view
  theme <description>   request a new scene before exposing
  reset                 start over with fresh paper
  status                print the current session
  help                  show this list
  quit                  leave the darkroom";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    Status,
    Help,
    Quit,
}

/// Parses one line of user input. Blank lines yield `None`.
pub fn parse_command(line: &str) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "start" | "expose" => Command::Intent(Intent::StartExposure),
        "stop" => Command::Intent(Intent::StopExposure),
        "place" | "dip" => {
            if rest.is_empty() {
                bail!("which tray? try `place developer`");
            }
            let bath = BathType::parse(rest).ok_or_else(|| anyhow!("unknown tray '{rest}'"))?;
            Command::Intent(Intent::PlaceInBath { bath })
        }
        "remove" | "lift" => Command::Intent(Intent::RemoveFromBath),
        "next" | "advance" => Command::Intent(Intent::ConfirmStageAdvance),
        "light" => Command::Intent(Intent::ToggleRoomLight),
        "view" | "flip" => Command::Intent(Intent::ToggleViewMode),
        "theme" => {
            if rest.is_empty() {
                bail!("describe the scene, e.g. `theme harbour at dawn`");
            }
            Command::Intent(Intent::RequestImage {
                theme: rest.to_string(),
            })
        }
        "reset" => Command::Intent(Intent::Reset),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command '{other}' (type `help`)"),
    };
    Ok(Some(command))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
