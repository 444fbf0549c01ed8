//! Notepad: a plain text buffer with a placeholder note

use super::{AppResponse, HostedApp};
use crate::config::Config;
use crate::utils::{Point, Size};

const PLACEHOLDER: &str = "Meow! Type your cute notes here...";

pub struct Notepad {
    text: String,
    placeholder_cleared: bool,
}

impl Notepad {
    pub fn new() -> Self {
        Self {
            text: PLACEHOLDER.to_string(),
            placeholder_cleared: false,
        }
    }

    /// Drop the placeholder the first time the buffer gets focus
    fn focus(&mut self) {
        if !self.placeholder_cleared {
            if self.text == PLACEHOLDER {
                self.text.clear();
            }
            self.placeholder_cleared = true;
        }
    }
}

impl Default for Notepad {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create(_config: &Config) -> Box<dyn HostedApp> {
    Box::new(Notepad::new())
}

impl HostedApp for Notepad {
    fn title(&self) -> &str {
        "Untitled - Notepad"
    }

    fn render(&self, area: Size) -> Vec<String> {
        let rows = (area.height / 16).max(1) as usize;
        self.text.lines().take(rows).map(str::to_string).collect()
    }

    fn on_press(&mut self, _local: Point, _area: Size) -> AppResponse {
        self.focus();
        AppResponse::Handled
    }

    fn on_text(&mut self, text: &str) -> AppResponse {
        self.focus();
        self.text.push_str(text);
        AppResponse::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_clears_on_first_focus_only() {
        let area = Size::new(400, 280);
        let mut pad = Notepad::new();
        assert_eq!(pad.render(area), vec![PLACEHOLDER]);
        pad.on_press(Point::new(5, 5), area);
        assert!(pad.render(area).is_empty());
        pad.on_text("purr");
        pad.on_press(Point::new(5, 5), area);
        assert_eq!(pad.render(area), vec!["purr"]);
    }

    #[test]
    fn typing_replaces_placeholder() {
        let mut pad = Notepad::new();
        pad.on_text("hello\nworld");
        assert_eq!(pad.render(Size::new(400, 280)), vec!["hello", "world"]);
    }
}
