//! Shell controller: owns the desktop, taskbar, start menu and open windows
//!
//! All state lives in one [`ShellController`] that every handler borrows
//! mutably. Deferred work (clock ticks, auto-closing dialogs, menu
//! actions) goes through the [`Scheduler`] so ordering is explicit.

pub mod actions;
pub mod auxiliary;
pub mod scheduler;

use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::apps::{AppRegistry, AppResponse, HostedApp, MessageDialog};
use crate::config::Config;
use crate::desktop::DesktopSurface;
use crate::menu::{MenuHit, StartMenu};
use crate::taskbar::{ButtonRelief, Taskbar};
use crate::utils::{Point, Rect, Size};
use crate::window::{ChromeHit, ChromeMetrics, ChromeWindow, WindowId, WindowRegistry};

use self::actions::{AppKind, ShellAction, ShellCommand};
use self::auxiliary::{AuxiliaryHandle, AuxiliaryLauncher, StopOutcome};
use self::scheduler::{Scheduler, TaskId};

const EXIT_TITLE: &str = "Quit CatShell";
const EXIT_MESSAGE: &str = "Are you sure you want to exit CatShell?";
const LAUNCHER_TITLE: &str = "Doom Launcher";
const LAUNCHER_MESSAGE: &str = "Attempting to launch the 3D demo\nin a new window...\n\nThis may take a moment.";
const SHUTDOWN_TITLE: &str = "Shut Down CatShell";
const SHUTDOWN_MESSAGE: &str = "Are you sure you want to 'shut down' CatShell, sweetie?\n\n\
(This will just be a cute message, teehee!\n\
You can close the main window to really exit.)";

/// Blocking yes/no question asked before the shell exits
pub trait ExitPrompt {
    fn confirm(&mut self, title: &str, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Non-blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Pointer input in shell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press(Point),
    Motion(Point),
    Release(Point),
    DoubleClick(Point),
}

/// Overrides for a new window
#[derive(Debug, Clone, Default)]
pub struct WindowOptions {
    pub title: Option<String>,
    pub size: Option<Size>,
    pub position: Option<Point>,
    /// Runs when a close request removes the window, before it is released
    pub on_close: Option<ShellCommand>,
    /// Close the window by itself after this many milliseconds
    pub auto_close_ms: Option<u64>,
}

pub struct ShellController {
    config: Arc<Config>,
    desktop: DesktopSurface,
    taskbar: Taskbar,
    start_menu: StartMenu,
    registry: WindowRegistry,
    scheduler: Scheduler,
    apps: AppRegistry,
    auxiliary: AuxiliaryHandle,
    prompt: Box<dyn ExitPrompt>,
    metrics: ChromeMetrics,
    notices: Vec<Notice>,
    clock_task: Option<TaskId>,
    /// Window being dragged; lives from a title bar press to the next
    /// release or press
    active_drag: Option<WindowId>,
    draining: bool,
    running: bool,
}

impl ShellController {
    pub fn new(
        config: Arc<Config>,
        launcher: Box<dyn AuxiliaryLauncher>,
        prompt: Box<dyn ExitPrompt>,
    ) -> Self {
        let desktop = DesktopSurface::new(config.desktop_rect(), &config.desktop);
        let taskbar = Taskbar::new(&config);
        let start_menu = StartMenu::new(config.menu.clone(), taskbar.start_button());
        let mut scheduler = Scheduler::new();
        let clock_task = scheduler.schedule_repeating(config.clock.tick_ms, ShellCommand::TickClock);

        info!(
            "Shell ready: desktop {:?}, {} icons",
            desktop.bounds(),
            desktop.icons().len()
        );

        Self {
            apps: AppRegistry::new(&config),
            auxiliary: AuxiliaryHandle::new(config.auxiliary.clone(), launcher),
            metrics: ChromeMetrics::from(&config.windows),
            config,
            desktop,
            taskbar,
            start_menu,
            registry: WindowRegistry::new(),
            scheduler,
            prompt,
            notices: Vec::new(),
            clock_task: Some(clock_task),
            active_drag: None,
            draining: false,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn taskbar(&self) -> &Taskbar {
        &self.taskbar
    }

    pub fn start_menu(&self) -> &StartMenu {
        &self.start_menu
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    /// Hand pending notices to the front end
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Milliseconds until the scheduler has work, for the event loop's wait
    pub fn next_timer_in(&self) -> Option<u64> {
        self.scheduler.next_due_in()
    }

    // ---- windows -------------------------------------------------------

    /// Open a new window for `kind` at the next cascade position
    pub fn open_window(&mut self, kind: AppKind) -> Option<WindowId> {
        self.open_window_with(kind, WindowOptions::default())
    }

    pub fn open_window_with(&mut self, kind: AppKind, options: WindowOptions) -> Option<WindowId> {
        let Some(entry) = self.apps.get(kind).copied() else {
            warn!("No app registered for {:?}", kind);
            self.notify(NoticeLevel::Error, "Open", &format!("No app registered for {:?}", kind));
            return None;
        };
        let content = (entry.factory)(&self.config);
        let size = options.size.unwrap_or(entry.default_size);
        let position = options.position.unwrap_or_else(|| self.cascade_position(size));
        Some(self.spawn_window(content, Rect::from_parts(position, size), options))
    }

    /// Wrap `content` in chrome, register it and bring it to the front.
    ///
    /// The initial position is used as given; only drags are clamped.
    pub fn spawn_window(
        &mut self,
        content: Box<dyn HostedApp>,
        bounds: Rect,
        options: WindowOptions,
    ) -> WindowId {
        let mut window = ChromeWindow::new(bounds, content, self.metrics);
        if let Some(title) = &options.title {
            window = window.with_title(title);
        }
        if let Some(command) = options.on_close {
            window = window.with_close_callback(command);
        }

        let id = self.registry.register(window);
        if let Some(delay) = options.auto_close_ms {
            self.scheduler.schedule(delay, ShellCommand::CloseWindow(id));
            debug!("{} closes itself in {}ms", id, delay);
        }
        id
    }

    /// Cascade slot for a new window, kept inside the desktop
    pub fn cascade_position(&self, size: Size) -> Point {
        let w = &self.config.windows;
        let desk = self.desktop.bounds();
        let offset = self
            .registry
            .cascade_offset(w.cascade_base, w.cascade_step, w.cascade_wrap);
        let x = offset.min(desk.width - size.width - w.edge_margin).max(0);
        let y = offset.min(desk.height - size.height - w.edge_margin).max(0);
        Point::new(desk.x + x, desk.y + y)
    }

    /// Close a window: unregister, run its close callback, release it.
    /// Closing a window that is already gone does nothing.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        let Some(mut window) = self.registry.unregister(id) else {
            debug!("Close of {} ignored, already gone", id);
            return false;
        };
        if self.active_drag == Some(id) {
            self.active_drag = None;
        }
        info!("Closed {} '{}'", id, window.title());
        if let Some(command) = window.take_close_callback() {
            self.execute(command);
        }
        window.destroy();
        self.run_due();
        true
    }

    pub fn raise(&mut self, id: WindowId) -> bool {
        self.registry.raise(id)
    }

    // ---- start menu ----------------------------------------------------

    pub fn toggle_start_menu(&mut self) {
        self.start_menu.toggle();
        self.sync_start_button();
    }

    pub fn show_start_menu(&mut self) {
        self.start_menu.show();
        self.sync_start_button();
    }

    pub fn hide_start_menu(&mut self) {
        self.start_menu.hide();
        self.sync_start_button();
    }

    /// Hide the popup now and run `action` on a later tick
    pub fn select_menu_action(&mut self, action: ShellAction) {
        for (delay, command) in self.start_menu.select(action) {
            self.scheduler.schedule(delay, command);
        }
        self.run_due();
    }

    /// Select a start menu entry by its label path
    pub fn select_menu_path(&mut self, path: &[&str]) -> bool {
        match self.start_menu.find_action(path) {
            Some(action) => {
                self.select_menu_action(action);
                true
            }
            None => false,
        }
    }

    fn sync_start_button(&mut self) {
        self.taskbar.set_start_pressed(self.start_menu.is_visible());
    }

    // ---- input ---------------------------------------------------------

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.running {
            return;
        }
        match event {
            PointerEvent::Press(p) => self.on_press(p),
            PointerEvent::Motion(p) => {
                if let Some(id) = self.active_drag.filter(|id| self.registry.contains(*id)) {
                    let desktop = self.desktop.bounds();
                    if let Some(window) = self.registry.get_mut(id) {
                        window.continue_drag(p, desktop);
                    }
                }
            }
            PointerEvent::Release(_) => self.end_active_drag(),
            PointerEvent::DoubleClick(p) => self.on_double_click(p),
        }
        self.run_due();
    }

    fn end_active_drag(&mut self) {
        if let Some(id) = self.active_drag.take() {
            if let Some(window) = self.registry.get_mut(id) {
                window.end_drag();
            }
        }
    }

    /// Stacking, top down: start menu popup, chrome windows, taskbar, desktop
    fn on_press(&mut self, p: Point) {
        // a press always ends the previous drag, released or not
        self.end_active_drag();

        // shell-wide listener, runs before the press reaches its target
        if self.start_menu.dismiss_if_outside(p) {
            self.sync_start_button();
        }

        if self.start_menu.contains(p) {
            match self.start_menu.hit_test(p) {
                Some(MenuHit::Submenu(index)) => self.start_menu.expand(index),
                Some(MenuHit::Action(action)) => self.select_menu_action(action),
                Some(MenuHit::Separator) | None => {}
            }
            return;
        }

        let Some(id) = self.registry.window_at(p) else {
            if self.taskbar.hits_start_button(p) {
                self.toggle_start_menu();
            }
            return;
        };
        self.raise(id);
        let Some(window) = self.registry.get_mut(id) else {
            return;
        };
        match window.hit_test(p) {
            Some(ChromeHit::CloseButton) => {
                self.close_window(id);
            }
            Some(ChromeHit::TitleBar) => {
                window.begin_drag(p);
                self.active_drag = Some(id);
            }
            Some(ChromeHit::Content(local)) => {
                if window.press_content(local) == AppResponse::CloseRequested {
                    self.close_window(id);
                }
            }
            None => {}
        }
    }

    fn on_double_click(&mut self, p: Point) {
        if self.start_menu.contains(p)
            || self.taskbar.contains(p)
            || self.registry.window_at(p).is_some()
        {
            return;
        }
        if let Some(action) = self.desktop.double_click(p) {
            self.dispatch(action);
        }
    }

    /// Forward typed text to the frontmost window
    pub fn type_text(&mut self, text: &str) {
        if !self.running {
            return;
        }
        let Some(id) = self.registry.frontmost() else {
            return;
        };
        let response = match self.registry.get_mut(id) {
            Some(window) => window.type_text(text),
            None => return,
        };
        if response == AppResponse::CloseRequested {
            self.close_window(id);
        }
    }

    // ---- actions -------------------------------------------------------

    pub fn dispatch(&mut self, action: ShellAction) {
        if !self.running {
            return;
        }
        info!("Action: {}", action);
        if let Some(kind) = action.app_kind() {
            self.open_window(kind);
            return;
        }
        match action {
            ShellAction::OpenAuxiliaryDemo => self.launch_auxiliary(),
            ShellAction::ShutdownDialog => {
                self.shutdown_dialog();
            }
            ShellAction::Exit => {
                self.confirm_exit();
            }
            _ => {}
        }
    }

    /// Start the 3D demo and show a self-closing notice.
    /// A running demo is never relaunched or disturbed.
    pub fn launch_auxiliary(&mut self) {
        self.hide_start_menu();

        if self.auxiliary.is_running() {
            info!("Auxiliary demo already running");
            self.notify(NoticeLevel::Info, LAUNCHER_TITLE, "The 3D demo is already running!");
            return;
        }

        match self.auxiliary.launch() {
            Ok(_) => {
                let size = self.config.auxiliary.notice_size.size();
                let position = self.config.shell_rect().centered(size);
                let options = WindowOptions {
                    auto_close_ms: Some(self.config.auxiliary.notice_close_ms),
                    ..WindowOptions::default()
                };
                self.spawn_window(
                    Box::new(MessageDialog::notice(LAUNCHER_TITLE, LAUNCHER_MESSAGE)),
                    Rect::from_parts(position, size),
                    options,
                );
            }
            Err(e) => {
                warn!("Could not launch auxiliary demo: {}", e);
                self.notify(
                    NoticeLevel::Error,
                    LAUNCHER_TITLE,
                    &format!("Could not launch the 3D demo: {}", e),
                );
            }
        }
    }

    /// Cosmetic shut-down message. It closes only itself.
    pub fn shutdown_dialog(&mut self) -> WindowId {
        self.hide_start_menu();
        let size = self.config.apps.shutdown_dialog.size();
        let position = self.config.shell_rect().centered(size);
        self.spawn_window(
            Box::new(MessageDialog::with_ok(SHUTDOWN_TITLE, SHUTDOWN_MESSAGE)),
            Rect::from_parts(position, size),
            WindowOptions::default(),
        )
    }

    /// Ask before exiting; on yes stop the demo, destroy every window and
    /// tear the shell down. Returns whether the shell exited.
    pub fn confirm_exit(&mut self) -> bool {
        if !self.running {
            return true;
        }
        if !self.prompt.confirm(EXIT_TITLE, EXIT_MESSAGE) {
            info!("Exit cancelled");
            return false;
        }

        if self.auxiliary.shutdown() != StopOutcome::NotRunning {
            info!("Auxiliary demo terminated");
        }

        let windows = self.registry.drain_all();
        info!("Destroying {} open windows", windows.len());
        for (_, window) in windows {
            // bulk teardown skips close callbacks
            window.destroy();
        }
        self.active_drag = None;

        self.start_menu.hide();
        self.sync_start_button();
        if let Some(task) = self.clock_task.take() {
            self.scheduler.cancel(task);
        }
        self.running = false;
        info!("Shell torn down");
        true
    }

    // ---- timers --------------------------------------------------------

    /// Feed elapsed wall time to the scheduler and run whatever is due
    pub fn advance(&mut self, elapsed_ms: u64) {
        let due = self.scheduler.advance(elapsed_ms);
        // commands queued while this batch runs wait for run_due below
        let nested = std::mem::replace(&mut self.draining, true);
        for command in due {
            self.execute(command);
        }
        self.draining = nested;
        self.run_due();
    }

    fn execute(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::HideStartMenu => self.hide_start_menu(),
            ShellCommand::Invoke(action) => self.dispatch(action),
            ShellCommand::CloseWindow(id) => {
                self.close_window(id);
            }
            ShellCommand::TickClock => {
                if self.taskbar.tick_clock() {
                    let clock = self.taskbar.clock();
                    debug!("Clock tick {}: {}", clock.ticks(), clock.text());
                }
            }
        }
    }

    /// Run commands due right now. Nested calls return at once; the
    /// outermost call keeps going until the queue is quiet.
    fn run_due(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        loop {
            let due = self.scheduler.take_due();
            if due.is_empty() {
                break;
            }
            for command in due {
                self.execute(command);
            }
        }
        self.draining = false;
    }

    fn notify(&mut self, level: NoticeLevel, title: &str, message: &str) {
        self.notices.push(Notice {
            level,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    // ---- rendering -----------------------------------------------------

    pub fn snapshot(&self) -> ShellSnapshot {
        let windows = self
            .registry
            .stacking_order()
            .into_iter()
            .filter_map(|id| {
                self.registry.get(id).map(|w| WindowSnapshot {
                    id: id.raw(),
                    title: w.title().to_string(),
                    bounds: w.bounds(),
                    z_order: w.z_order(),
                    dragging: w.is_dragging(),
                    content: w.render(),
                })
            })
            .collect();

        ShellSnapshot {
            running: self.running,
            taskbar: self.taskbar.rect(),
            start_button: self.taskbar.start_button(),
            start_button_pressed: self.taskbar.relief() == ButtonRelief::Sunken,
            clock_rect: self.taskbar.clock_rect(),
            clock: self.taskbar.clock().text().to_string(),
            start_menu_visible: self.start_menu.is_visible(),
            start_menu: self
                .start_menu
                .is_visible()
                .then(|| self.start_menu.popup_rect()),
            start_menu_expanded: self.start_menu.expanded(),
            windows,
        }
    }
}

/// Serializable view of the shell for the front end
#[derive(Debug, Clone, Serialize)]
pub struct ShellSnapshot {
    pub running: bool,
    pub taskbar: Rect,
    pub start_button: Rect,
    pub start_button_pressed: bool,
    pub clock_rect: Rect,
    pub clock: String,
    pub start_menu_visible: bool,
    /// Popup rectangle while the menu is visible
    pub start_menu: Option<Rect>,
    /// Index of the top-level entry whose submenu is open
    pub start_menu_expanded: Option<usize>,
    /// Front to back
    pub windows: Vec<WindowSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowSnapshot {
    pub id: u64,
    pub title: String,
    pub bounds: Rect,
    pub z_order: u64,
    pub dragging: bool,
    pub content: Vec<String>,
}
