//! Hosted app components
//!
//! Apps render into the content area of a chrome window and may ask the
//! shell to close that window. The window manager knows nothing else
//! about them.

pub mod calculator;
pub mod dialog;
pub mod minesweeper;
pub mod notepad;

use std::collections::HashMap;

use crate::config::Config;
use crate::shell::actions::AppKind;
use crate::utils::{Point, Size};

pub use dialog::MessageDialog;

/// What an app wants the shell to do after an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppResponse {
    Ignored,
    Handled,
    CloseRequested,
}

/// Trait for all components hosted inside a chrome window
pub trait HostedApp {
    /// Title shown in the window's title bar
    fn title(&self) -> &str;

    /// Render the content area as text lines
    fn render(&self, area: Size) -> Vec<String>;

    /// Handle a press at a point relative to the content area
    fn on_press(&mut self, _local: Point, _area: Size) -> AppResponse {
        AppResponse::Ignored
    }

    /// Handle typed text while the window is frontmost
    fn on_text(&mut self, _text: &str) -> AppResponse {
        AppResponse::Ignored
    }

    /// Called once when the hosting window is being destroyed
    fn on_close_request(&mut self) {}
}

/// Factory producing a fresh app instance
pub type AppFactory = fn(&Config) -> Box<dyn HostedApp>;

/// Registered app: how to build it and how big its window starts
#[derive(Clone, Copy)]
pub struct AppEntry {
    pub factory: AppFactory,
    pub default_size: Size,
}

/// Registry mapping app kinds to content factories
pub struct AppRegistry {
    entries: HashMap<AppKind, AppEntry>,
}

impl AppRegistry {
    /// Create a registry with the bundled apps
    pub fn new(config: &Config) -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };

        registry.register(
            AppKind::Notepad,
            notepad::create,
            config.apps.notepad.size(),
        );
        registry.register(
            AppKind::Calculator,
            calculator::create,
            config.apps.calculator.size(),
        );
        registry.register(
            AppKind::Minesweeper,
            minesweeper::create,
            config.apps.minesweeper.size(),
        );

        registry
    }

    /// Register or replace an app factory
    pub fn register(&mut self, kind: AppKind, factory: AppFactory, default_size: Size) {
        self.entries.insert(kind, AppEntry { factory, default_size });
    }

    pub fn get(&self, kind: AppKind) -> Option<&AppEntry> {
        self.entries.get(&kind)
    }
}
