//! Line commands accepted by the headless front end

use std::str::FromStr;

use crate::error::ShellError;
use crate::shell::actions::{AppKind, ShellAction};
use crate::utils::Point;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Press(Point),
    Move(Point),
    Release(Point),
    /// Press and release at the same point
    Click(Point),
    /// Click followed by a double-activation
    DoubleClick(Point),
    Type(String),
    /// Toggle the start menu as if the start button was pressed
    Menu,
    /// Pick a start menu entry by its label path
    Select(Vec<String>),
    Open(AppKind),
    Action(ShellAction),
    Close(u64),
    Wait(u64),
    State,
    Quit,
    Help,
}

pub const HELP: &str = "\
commands:
  press X Y | move X Y | release X Y | click X Y | dclick X Y
  type TEXT            send text to the frontmost window
  menu                 toggle the start menu
  select PATH          pick a menu entry, e.g. Programs/Notepad
  open KIND            notepad | calculator | minesweeper
  action NAME          open-notepad | open-auxiliary-demo | shutdown-dialog | exit ...
  close ID             close a window by id
  wait MS              let timers run
  state                print the shell as JSON
  quit                 ask to exit";

impl FromStr for InputCommand {
    type Err = ShellError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "press" => InputCommand::Press(parse_point(rest)?),
            "move" => InputCommand::Move(parse_point(rest)?),
            "release" => InputCommand::Release(parse_point(rest)?),
            "click" => InputCommand::Click(parse_point(rest)?),
            "dclick" => InputCommand::DoubleClick(parse_point(rest)?),
            "type" => InputCommand::Type(rest.to_string()),
            "menu" => InputCommand::Menu,
            "select" => InputCommand::Select(parse_menu_path(rest)?),
            "open" => InputCommand::Open(rest.parse()?),
            "action" => InputCommand::Action(rest.parse()?),
            "close" => InputCommand::Close(parse_window_id(rest)?),
            "wait" => InputCommand::Wait(parse_number(rest)?),
            "state" => InputCommand::State,
            "quit" | "exit" => InputCommand::Quit,
            "help" | "?" => InputCommand::Help,
            "" => return Err(ShellError::Input("empty command".to_string())),
            other => return Err(ShellError::Input(format!("unknown command '{}'", other))),
        };
        Ok(command)
    }
}

fn parse_number<T: FromStr>(text: &str) -> Result<T, ShellError> {
    text.parse()
        .map_err(|_| ShellError::Input(format!("expected a number, got '{}'", text)))
}

fn parse_point(args: &str) -> Result<Point, ShellError> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok(Point::new(parse_number(x)?, parse_number(y)?)),
        _ => Err(ShellError::Input(format!("expected 'X Y', got '{}'", args))),
    }
}

/// Splits `Programs/Notepad` into its labels
fn parse_menu_path(text: &str) -> Result<Vec<String>, ShellError> {
    let labels: Vec<String> = text.split('/').map(|l| l.trim().to_string()).collect();
    if labels.iter().any(|l| l.is_empty()) {
        return Err(ShellError::Input(format!("expected 'Menu/Item', got '{}'", text)));
    }
    Ok(labels)
}

/// Accepts `3` as well as the displayed form `win-3`
fn parse_window_id(text: &str) -> Result<u64, ShellError> {
    parse_number(text.strip_prefix("win-").unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pointer_commands() {
        assert_eq!(
            "press 10 20".parse::<InputCommand>().unwrap(),
            InputCommand::Press(Point::new(10, 20))
        );
        assert_eq!(
            "  MOVE -5   300 ".parse::<InputCommand>().unwrap(),
            InputCommand::Move(Point::new(-5, 300))
        );
        assert_eq!(
            "dclick 20 20".parse::<InputCommand>().unwrap(),
            InputCommand::DoubleClick(Point::new(20, 20))
        );
    }

    #[test]
    fn type_keeps_inner_spaces() {
        assert_eq!(
            "type hello  kitty".parse::<InputCommand>().unwrap(),
            InputCommand::Type("hello  kitty".to_string())
        );
    }

    #[test]
    fn parses_targets() {
        assert_eq!(
            "open calc".parse::<InputCommand>().unwrap(),
            InputCommand::Open(AppKind::Calculator)
        );
        assert_eq!(
            "action open-auxiliary-demo".parse::<InputCommand>().unwrap(),
            InputCommand::Action(ShellAction::OpenAuxiliaryDemo)
        );
        assert_eq!("close win-7".parse::<InputCommand>().unwrap(), InputCommand::Close(7));
        assert_eq!("close 7".parse::<InputCommand>().unwrap(), InputCommand::Close(7));
        assert_eq!("wait 250".parse::<InputCommand>().unwrap(), InputCommand::Wait(250));
    }

    #[test]
    fn parses_menu_paths() {
        assert_eq!(
            "select Programs / Notepad".parse::<InputCommand>().unwrap(),
            InputCommand::Select(vec!["Programs".to_string(), "Notepad".to_string()])
        );
        assert_eq!(
            "select Shut Down...".parse::<InputCommand>().unwrap(),
            InputCommand::Select(vec!["Shut Down...".to_string()])
        );
    }

    #[test]
    fn rejects_bad_input() {
        for line in [
            "",
            "jump",
            "press 1",
            "press 1 2 3",
            "press a b",
            "open paint",
            "wait -1",
            "select",
            "select Programs//Notepad",
        ] {
            assert!(
                matches!(line.parse::<InputCommand>(), Err(ShellError::Input(_))),
                "accepted '{}'",
                line
            );
        }
    }
}
