//! Chrome windows: borderless surfaces with a custom title bar
//!
//! A chrome window owns its hosted app and knows its own geometry. Stacking
//! and identity are handed out by the [`WindowRegistry`](super::WindowRegistry).

use log::debug;
use serde::Serialize;
use std::fmt;

use crate::apps::{AppResponse, HostedApp};
use crate::config::WindowsConfig;
use crate::shell::actions::ShellCommand;
use crate::utils::{Point, Rect, Size};

/// Unique, never reused window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WindowId(pub(crate) u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win-{}", self.0)
    }
}

impl WindowId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Title bar metrics shared by every chrome window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeMetrics {
    pub title_bar_height: i32,
    pub close_button_width: i32,
}

impl From<&WindowsConfig> for ChromeMetrics {
    fn from(cfg: &WindowsConfig) -> Self {
        Self {
            title_bar_height: cfg.title_bar_height,
            close_button_width: cfg.close_button_width,
        }
    }
}

impl Default for ChromeMetrics {
    fn default() -> Self {
        Self::from(&WindowsConfig::default())
    }
}

/// Pointer offset inside the window captured when a drag starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    anchor: Point,
}

/// Which part of the chrome a point falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHit {
    CloseButton,
    TitleBar,
    /// Point relative to the content area's top-left
    Content(Point),
}

pub struct ChromeWindow {
    title: String,
    bounds: Rect,
    z_order: u64,
    metrics: ChromeMetrics,
    content: Box<dyn HostedApp>,
    on_close: Option<ShellCommand>,
    drag: Option<DragState>,
}

impl ChromeWindow {
    /// Build a window around `content`. The position is used as given.
    pub fn new(bounds: Rect, content: Box<dyn HostedApp>, metrics: ChromeMetrics) -> Self {
        Self {
            title: content.title().to_string(),
            bounds,
            z_order: 0,
            metrics,
            content,
            on_close: None,
            drag: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Command the shell runs when a close request removes this window
    pub fn with_close_callback(mut self, command: ShellCommand) -> Self {
        self.on_close = Some(command);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn position(&self) -> Point {
        self.bounds.origin()
    }

    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    pub fn z_order(&self) -> u64 {
        self.z_order
    }

    pub(crate) fn set_z_order(&mut self, z: u64) {
        self.z_order = z;
    }

    pub fn title_bar_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y,
            self.bounds.width,
            self.metrics.title_bar_height.min(self.bounds.height),
        )
    }

    pub fn close_button_rect(&self) -> Rect {
        let bar = self.title_bar_rect();
        let w = self.metrics.close_button_width.min(bar.width);
        Rect::new(bar.right() - w, bar.y, w, bar.height)
    }

    pub fn content_rect(&self) -> Rect {
        let bar = self.title_bar_rect();
        Rect::new(
            self.bounds.x,
            bar.bottom(),
            self.bounds.width,
            self.bounds.height - bar.height,
        )
    }

    pub fn hit_test(&self, p: Point) -> Option<ChromeHit> {
        if !self.bounds.contains(p) {
            return None;
        }
        if self.close_button_rect().contains(p) {
            Some(ChromeHit::CloseButton)
        } else if self.title_bar_rect().contains(p) {
            Some(ChromeHit::TitleBar)
        } else {
            Some(ChromeHit::Content(p.offset_from(self.content_rect().origin())))
        }
    }

    /// Record where inside the window the pointer grabbed it
    pub fn begin_drag(&mut self, pointer: Point) {
        let anchor = pointer.offset_from(self.position());
        debug!("Drag start on '{}' with anchor {:?}", self.title, anchor);
        self.drag = Some(DragState { anchor });
    }

    /// Move the window under the pointer, clamped to `desktop`.
    ///
    /// Clamping uses the window's size at this frame. Returns the applied
    /// position, or `None` when no drag is in progress.
    pub fn continue_drag(&mut self, pointer: Point, desktop: Rect) -> Option<Point> {
        let drag = self.drag?;
        let candidate = pointer.offset_from(drag.anchor);
        let clamped = desktop.clamp_origin(candidate, self.size());
        self.bounds.x = clamped.x;
        self.bounds.y = clamped.y;
        Some(clamped)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Forward a content-area press to the hosted app
    pub fn press_content(&mut self, local: Point) -> AppResponse {
        let area = self.content_rect().size();
        self.content.on_press(local, area)
    }

    pub fn type_text(&mut self, text: &str) -> AppResponse {
        self.content.on_text(text)
    }

    pub fn render(&self) -> Vec<String> {
        self.content.render(self.content_rect().size())
    }

    /// Hand the close callback to the shell; it runs at most once
    pub(crate) fn take_close_callback(&mut self) -> Option<ShellCommand> {
        self.on_close.take()
    }

    /// Tell the hosted app it is going away and release the window
    pub(crate) fn destroy(mut self) {
        debug!("Destroying '{}'", self.title);
        self.drag = None;
        self.content.on_close_request();
    }
}

impl fmt::Debug for ChromeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChromeWindow")
            .field("title", &self.title)
            .field("bounds", &self.bounds)
            .field("z_order", &self.z_order)
            .field("dragging", &self.drag.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::MessageDialog;

    fn window_at(x: i32, y: i32, w: i32, h: i32) -> ChromeWindow {
        ChromeWindow::new(
            Rect::new(x, y, w, h),
            Box::new(MessageDialog::notice("Test", "body")),
            ChromeMetrics::default(),
        )
    }

    #[test]
    fn hit_test_regions() {
        let win = window_at(50, 50, 200, 100);
        assert_eq!(win.hit_test(Point::new(60, 55)), Some(ChromeHit::TitleBar));
        assert_eq!(win.hit_test(Point::new(245, 55)), Some(ChromeHit::CloseButton));
        assert_eq!(
            win.hit_test(Point::new(60, 80)),
            Some(ChromeHit::Content(Point::new(10, 10)))
        );
        assert_eq!(win.hit_test(Point::new(10, 10)), None);
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let desktop = Rect::new(0, 0, 600, 370);
        let mut win = window_at(50, 50, 200, 100);
        win.begin_drag(Point::new(60, 60));
        assert_eq!(win.drag, Some(DragState { anchor: Point::new(10, 10) }));
        let pos = win.continue_drag(Point::new(250, 250), desktop);
        assert_eq!(pos, Some(Point::new(240, 240)));
        assert_eq!(win.position(), Point::new(240, 240));
    }

    #[test]
    fn every_drag_frame_stays_inside_desktop() {
        let desktop = Rect::new(0, 0, 600, 370);
        let mut win = window_at(100, 100, 300, 200);
        win.begin_drag(Point::new(110, 105));
        for step in -40..80 {
            let pointer = Point::new(step * 13, 400 - step * 11);
            let pos = win.continue_drag(pointer, desktop).unwrap();
            assert!(pos.x >= 0 && pos.x <= 600 - 300, "x out of range: {:?}", pos);
            assert!(pos.y >= 0 && pos.y <= 370 - 200, "y out of range: {:?}", pos);
        }
    }

    #[test]
    fn initial_position_is_not_clamped() {
        let win = window_at(-500, 900, 200, 100);
        assert_eq!(win.position(), Point::new(-500, 900));
    }

    #[test]
    fn dragging_corrects_offscreen_window() {
        let desktop = Rect::new(0, 0, 600, 370);
        let mut win = window_at(-500, 900, 200, 100);
        win.begin_drag(Point::new(-490, 905));
        let pos = win.continue_drag(Point::new(-489, 906), desktop).unwrap();
        assert_eq!(pos, Point::new(0, 270));
    }

    #[test]
    fn motion_without_drag_is_ignored() {
        let desktop = Rect::new(0, 0, 600, 370);
        let mut win = window_at(50, 50, 200, 100);
        assert_eq!(win.continue_drag(Point::new(300, 300), desktop), None);
        win.begin_drag(Point::new(55, 55));
        win.end_drag();
        assert_eq!(win.continue_drag(Point::new(300, 300), desktop), None);
        assert_eq!(win.position(), Point::new(50, 50));
    }
}
