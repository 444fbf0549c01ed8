//! Message dialogs hosted in ordinary chrome windows

use super::{AppResponse, HostedApp};
use crate::utils::{Point, Rect, Size};

const OK_WIDTH: i32 = 80;
const OK_HEIGHT: i32 = 24;
const OK_BOTTOM_GAP: i32 = 10;

/// A titled message with an optional OK button
pub struct MessageDialog {
    title: String,
    message: String,
    has_ok_button: bool,
}

impl MessageDialog {
    /// Informational notice without buttons, usually auto-closed
    pub fn notice(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
            has_ok_button: false,
        }
    }

    /// Message that is dismissed with its OK button
    pub fn with_ok(title: &str, message: &str) -> Self {
        Self {
            has_ok_button: true,
            ..Self::notice(title, message)
        }
    }

    /// OK button placement, centered along the bottom of the content area
    pub fn ok_button_rect(area: Size) -> Rect {
        Rect::new(
            (area.width - OK_WIDTH) / 2,
            area.height - OK_HEIGHT - OK_BOTTOM_GAP,
            OK_WIDTH,
            OK_HEIGHT,
        )
    }
}

impl HostedApp for MessageDialog {
    fn title(&self) -> &str {
        &self.title
    }

    fn render(&self, _area: Size) -> Vec<String> {
        let mut lines: Vec<String> = self.message.lines().map(str::to_string).collect();
        if self.has_ok_button {
            lines.push(String::new());
            lines.push("[   OK   ]".to_string());
        }
        lines
    }

    fn on_press(&mut self, local: Point, area: Size) -> AppResponse {
        if self.has_ok_button && Self::ok_button_rect(area).contains(local) {
            AppResponse::CloseRequested
        } else {
            AppResponse::Ignored
        }
    }
}
