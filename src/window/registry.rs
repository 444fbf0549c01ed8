//! Table of open chrome windows
//!
//! Identifiers and z-orders come from counters that only ever grow, so a
//! closed window's id is never handed out again and a raise always lands
//! strictly above every other open window.

use log::{debug, info};
use std::collections::HashMap;

use super::chrome::{ChromeWindow, WindowId};
use crate::utils::Point;

#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<WindowId, ChromeWindow>,
    next_id: u64,
    next_z: u64,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a window under a fresh id and put it in front
    pub fn register(&mut self, window: ChromeWindow) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        info!("Registered {} '{}' at {:?}", id, window.title(), window.bounds());
        self.windows.insert(id, window);
        self.raise(id);
        id
    }

    /// Remove a window; `None` if it was already gone
    pub fn unregister(&mut self, id: WindowId) -> Option<ChromeWindow> {
        let removed = self.windows.remove(&id);
        if removed.is_some() {
            debug!("Unregistered {}", id);
        }
        removed
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    pub fn get(&self, id: WindowId) -> Option<&ChromeWindow> {
        self.windows.get(&id)
    }

    pub fn get_mut(&mut self, id: WindowId) -> Option<&mut ChromeWindow> {
        self.windows.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn all_open(&self) -> impl Iterator<Item = (WindowId, &ChromeWindow)> {
        self.windows.iter().map(|(id, w)| (*id, w))
    }

    /// Ids ordered front to back
    pub fn stacking_order(&self) -> Vec<WindowId> {
        let mut ids: Vec<(u64, WindowId)> =
            self.all_open().map(|(id, w)| (w.z_order(), id)).collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids.into_iter().map(|(_, id)| id).collect()
    }

    pub fn frontmost(&self) -> Option<WindowId> {
        self.windows
            .iter()
            .max_by_key(|(_, w)| w.z_order())
            .map(|(id, _)| *id)
    }

    /// Topmost window whose bounds contain `p`
    pub fn window_at(&self, p: Point) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|(_, w)| w.bounds().contains(p))
            .max_by_key(|(_, w)| w.z_order())
            .map(|(id, _)| *id)
    }

    /// Put a window above all others. No-op when it is already in front.
    pub fn raise(&mut self, id: WindowId) -> bool {
        if !self.windows.contains_key(&id) || self.frontmost_is(id) {
            return false;
        }
        self.next_z += 1;
        let z = self.next_z;
        if let Some(window) = self.windows.get_mut(&id) {
            window.set_z_order(z);
            debug!("Raised {} to z={}", id, z);
        }
        true
    }

    /// Staggered offset for the next new window: wraps every `wrap` windows
    pub fn cascade_offset(&self, base: i32, step: i32, wrap: usize) -> i32 {
        let slot = (self.all_open().count() % wrap.max(1)) as i32;
        base + slot * step
    }

    /// Remove every open window, front to back
    pub fn drain_all(&mut self) -> Vec<(WindowId, ChromeWindow)> {
        let order = self.stacking_order();
        order
            .into_iter()
            .filter_map(|id| self.windows.remove(&id).map(|w| (id, w)))
            .collect()
    }

    fn frontmost_is(&self, id: WindowId) -> bool {
        let Some(z) = self.windows.get(&id).map(|w| w.z_order()) else {
            return false;
        };
        z > 0
            && self
                .windows
                .iter()
                .all(|(other, w)| *other == id || w.z_order() < z)
    }
}
