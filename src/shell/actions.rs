//! Named shell actions and the deferred commands that carry them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ShellError;
use crate::window::WindowId;

/// Actions bound to desktop icons and start menu items.
///
/// Serialized through [`ShellAction::name`], so config files, driver
/// commands and JSON state all share one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum ShellAction {
    OpenNotepad,
    OpenCalculator,
    OpenMinesweeper,
    OpenAuxiliaryDemo,
    ShutdownDialog,
    Exit,
}

impl ShellAction {
    pub const ALL: [ShellAction; 6] = [
        ShellAction::OpenNotepad,
        ShellAction::OpenCalculator,
        ShellAction::OpenMinesweeper,
        ShellAction::OpenAuxiliaryDemo,
        ShellAction::ShutdownDialog,
        ShellAction::Exit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShellAction::OpenNotepad => "open-notepad",
            ShellAction::OpenCalculator => "open-calculator",
            ShellAction::OpenMinesweeper => "open-minesweeper",
            ShellAction::OpenAuxiliaryDemo => "open-auxiliary-demo",
            ShellAction::ShutdownDialog => "shutdown-dialog",
            ShellAction::Exit => "exit",
        }
    }

    /// The hosted app this action opens, if it is a plain window launch
    pub fn app_kind(&self) -> Option<AppKind> {
        match self {
            ShellAction::OpenNotepad => Some(AppKind::Notepad),
            ShellAction::OpenCalculator => Some(AppKind::Calculator),
            ShellAction::OpenMinesweeper => Some(AppKind::Minesweeper),
            _ => None,
        }
    }
}

impl fmt::Display for ShellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ShellAction> for &'static str {
    fn from(action: ShellAction) -> Self {
        action.name()
    }
}

impl TryFrom<String> for ShellAction {
    type Error = ShellError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl FromStr for ShellAction {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShellAction::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| ShellError::Input(format!("unknown action '{}'", s)))
    }
}

/// Hosted app kinds with a registered content factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppKind {
    Notepad,
    Calculator,
    Minesweeper,
}

impl FromStr for AppKind {
    type Err = ShellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "notepad" => Ok(AppKind::Notepad),
            "calculator" | "calc" => Ok(AppKind::Calculator),
            "minesweeper" | "mines" => Ok(AppKind::Minesweeper),
            other => Err(ShellError::Input(format!("unknown app '{}'", other))),
        }
    }
}

/// Work items executed by the shell's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    HideStartMenu,
    Invoke(ShellAction),
    CloseWindow(WindowId),
    TickClock,
}
