//! Desktop surface: the area windows live in, plus launch icons

use log::debug;

use crate::config::DesktopConfig;
use crate::shell::actions::ShellAction;
use crate::utils::{Point, Rect};

const ICON_MARGIN: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopIcon {
    pub label: String,
    pub action: ShellAction,
    pub rect: Rect,
}

#[derive(Debug)]
pub struct DesktopSurface {
    bounds: Rect,
    icons: Vec<DesktopIcon>,
}

impl DesktopSurface {
    /// Lay icons out in columns from the top-left corner
    pub fn new(bounds: Rect, config: &DesktopConfig) -> Self {
        let mut icons = Vec::with_capacity(config.icons.len());
        let (w, h) = (config.icon_width, config.icon_height);
        let mut x = bounds.x + ICON_MARGIN;
        let mut y = bounds.y + ICON_MARGIN;

        for icon in &config.icons {
            if y + h > bounds.bottom() && y != bounds.y + ICON_MARGIN {
                y = bounds.y + ICON_MARGIN;
                x += w + config.icon_spacing;
            }
            icons.push(DesktopIcon {
                label: icon.label.clone(),
                action: icon.action,
                rect: Rect::new(x, y, w, h),
            });
            y += h + config.icon_spacing;
        }

        Self { bounds, icons }
    }

    /// Area windows are clamped to while dragging
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn icon_at(&self, p: Point) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.rect.contains(p))
    }

    /// Double activation launches; single presses never do
    pub fn double_click(&self, p: Point) -> Option<ShellAction> {
        let icon = self.icon_at(p)?;
        debug!("Desktop icon '{}' activated", icon.label);
        Some(icon.action)
    }
}
