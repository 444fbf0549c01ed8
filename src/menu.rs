//! Start menu popup
//!
//! The item tree is built on first use and kept for the life of the shell.
//! Visibility is a two-state machine (Hidden/Visible); every transition
//! here is safe to repeat.

use log::{debug, info};

use crate::config::MenuConfig;
use crate::shell::actions::{ShellAction, ShellCommand};
use crate::utils::{Point, Rect};

/// Menu item structure
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    Action { label: String, action: ShellAction },
    Submenu { label: String, items: Vec<MenuItem> },
    Separator,
}

impl MenuItem {
    pub fn action(label: &str, action: ShellAction) -> Self {
        MenuItem::Action {
            label: label.to_string(),
            action,
        }
    }

    pub fn submenu(label: &str, items: Vec<MenuItem>) -> Self {
        MenuItem::Submenu {
            label: label.to_string(),
            items,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MenuItem::Action { label, .. } | MenuItem::Submenu { label, .. } => label,
            MenuItem::Separator => "",
        }
    }
}

/// The start menu tree: Programs, Games, then Shut Down
pub fn default_items() -> Vec<MenuItem> {
    vec![
        MenuItem::submenu(
            "Programs",
            vec![
                MenuItem::action("Notepad", ShellAction::OpenNotepad),
                MenuItem::action("Calculator", ShellAction::OpenCalculator),
            ],
        ),
        MenuItem::submenu(
            "Games",
            vec![
                MenuItem::action("Mines", ShellAction::OpenMinesweeper),
                MenuItem::action("Doom", ShellAction::OpenAuxiliaryDemo),
            ],
        ),
        MenuItem::Separator,
        MenuItem::action("Shut Down...", ShellAction::ShutdownDialog),
    ]
}

/// Result of pressing somewhere on the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuHit {
    /// Top-level entry with a submenu, by index
    Submenu(usize),
    Action(ShellAction),
    Separator,
}

const PADDING: i32 = 2;

#[derive(Debug)]
pub struct StartMenu {
    config: MenuConfig,
    items: Option<Vec<MenuItem>>,
    visible: bool,
    expanded: Option<usize>,
    popup: Rect,
    anchor: Rect,
}

impl StartMenu {
    /// `anchor` is the start button rectangle the popup sits on top of
    pub fn new(config: MenuConfig, anchor: Rect) -> Self {
        Self {
            config,
            items: None,
            visible: false,
            expanded: None,
            popup: Rect::default(),
            anchor,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn items(&self) -> &[MenuItem] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Popup rectangle; only meaningful while visible
    pub fn popup_rect(&self) -> Rect {
        self.popup
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.hide();
        } else {
            self.show();
        }
    }

    pub fn show(&mut self) {
        self.ensure_built();
        let height = self.height_of(self.items());
        // bottom edge of the popup on the button's top edge
        self.popup = Rect::new(
            self.anchor.x,
            self.anchor.y - height,
            self.config.width,
            height,
        );
        self.expanded = None;
        if !self.visible {
            info!("Start menu shown at {:?}", self.popup);
        }
        self.visible = true;
    }

    pub fn hide(&mut self) {
        if self.visible {
            info!("Start menu hidden");
        }
        self.visible = false;
        self.expanded = None;
    }

    /// Hide when a press lands outside the popup and the start button.
    /// Returns whether the menu was hidden.
    pub fn dismiss_if_outside(&mut self, pointer: Point) -> bool {
        if !self.visible || self.contains(pointer) || self.anchor.contains(pointer) {
            return false;
        }
        debug!("Press at {:?} outside start menu", pointer);
        self.hide();
        true
    }

    /// Whether `pointer` is over the popup or its open submenu
    pub fn contains(&self, pointer: Point) -> bool {
        self.visible
            && (self.popup.contains(pointer)
                || self.submenu_rect().is_some_and(|r| r.contains(pointer)))
    }

    /// Open the submenu of the top-level entry at `index`
    pub fn expand(&mut self, index: usize) {
        if self.visible && matches!(self.items().get(index), Some(MenuItem::Submenu { .. })) {
            self.expanded = Some(index);
        }
    }

    /// Rectangle of the open submenu, to the right of its entry
    pub fn submenu_rect(&self) -> Option<Rect> {
        let index = self.expanded?;
        let MenuItem::Submenu { items, .. } = self.items().get(index)? else {
            return None;
        };
        let entry = self.entry_rect(index)?;
        Some(Rect::new(
            self.popup.right(),
            entry.y,
            self.config.submenu_width,
            self.height_of(items),
        ))
    }

    /// Resolve a press on the popup to the item under it
    pub fn hit_test(&self, pointer: Point) -> Option<MenuHit> {
        if !self.visible {
            return None;
        }
        if let (Some(index), Some(rect)) = (self.expanded, self.submenu_rect()) {
            if rect.contains(pointer) {
                if let Some(MenuItem::Submenu { items, .. }) = self.items().get(index) {
                    return self.row_at(items, rect, pointer).map(|i| Self::hit_for(items, i));
                }
            }
        }
        if self.popup.contains(pointer) {
            let items = self.items();
            return self.row_at(items, self.popup, pointer).map(|i| match &items[i] {
                MenuItem::Submenu { .. } => MenuHit::Submenu(i),
                _ => Self::hit_for(items, i),
            });
        }
        None
    }

    /// Select a leaf action: hide now, run the action after the configured delay.
    ///
    /// Returns the commands with their delays so the caller can queue them
    /// in order.
    pub fn select(&self, action: ShellAction) -> [(u64, ShellCommand); 2] {
        info!("Start menu item selected: {}", action);
        [
            (0, ShellCommand::HideStartMenu),
            (self.config.action_delay_ms, ShellCommand::Invoke(action)),
        ]
    }

    /// Find a leaf by its label path, e.g. `["Programs", "Notepad"]`
    pub fn find_action(&mut self, path: &[&str]) -> Option<ShellAction> {
        self.ensure_built();
        let mut level = self.items();
        let (last, parents) = path.split_last()?;
        for label in parents {
            level = match level.iter().find(|i| i.label().eq_ignore_ascii_case(label))? {
                MenuItem::Submenu { items, .. } => items.as_slice(),
                _ => return None,
            };
        }
        match level.iter().find(|i| i.label().eq_ignore_ascii_case(last))? {
            MenuItem::Action { action, .. } => Some(*action),
            _ => None,
        }
    }

    fn ensure_built(&mut self) {
        if self.items.is_none() {
            debug!("Building start menu");
            self.items = Some(default_items());
        }
    }

    fn item_height(&self, item: &MenuItem) -> i32 {
        match item {
            MenuItem::Separator => self.config.separator_height,
            _ => self.config.item_height,
        }
    }

    fn height_of(&self, items: &[MenuItem]) -> i32 {
        items.iter().map(|i| self.item_height(i)).sum::<i32>() + PADDING * 2
    }

    fn entry_rect(&self, index: usize) -> Option<Rect> {
        let items = self.items();
        let item = items.get(index)?;
        let y = self.popup.y
            + PADDING
            + items[..index].iter().map(|i| self.item_height(i)).sum::<i32>();
        Some(Rect::new(self.popup.x, y, self.popup.width, self.item_height(item)))
    }

    fn row_at(&self, items: &[MenuItem], frame: Rect, pointer: Point) -> Option<usize> {
        let mut y = frame.y + PADDING;
        for (i, item) in items.iter().enumerate() {
            let h = self.item_height(item);
            if pointer.y >= y && pointer.y < y + h {
                return Some(i);
            }
            y += h;
        }
        None
    }

    fn hit_for(items: &[MenuItem], index: usize) -> MenuHit {
        match &items[index] {
            MenuItem::Action { action, .. } => MenuHit::Action(*action),
            MenuItem::Submenu { .. } => MenuHit::Submenu(index),
            MenuItem::Separator => MenuHit::Separator,
        }
    }
}
