//! Configuration management for CatShell
//!
//! Handles loading, saving, and managing shell geometry and behavior settings.

use anyhow::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::shell::actions::ShellAction;
use crate::utils::{Rect, Size};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Shell surface and taskbar geometry
    pub display: DisplayConfig,
    /// Chrome window metrics and placement cascade
    pub windows: WindowsConfig,
    /// Default sizes of the hosted apps
    pub apps: AppsConfig,
    /// Taskbar clock settings
    pub clock: ClockConfig,
    /// Start menu settings
    pub menu: MenuConfig,
    /// Auxiliary 3D demo process
    pub auxiliary: AuxiliaryConfig,
    /// Desktop icons
    pub desktop: DesktopConfig,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("catshell")
            .join("config.toml")
    }

    /// Load configuration from file or create default
    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, writing defaults if it is missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            info!("Loading configuration from: {:?}", config_path);
            let content = std::fs::read_to_string(config_path)?;
            match toml::from_str(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    warn!("Failed to parse config, using defaults: {}", e);
                    return Ok(Self::default());
                }
            }
        }

        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        info!("Configuration saved to: {:?}", config_path);
        Ok(())
    }

    /// The whole shell surface
    pub fn shell_rect(&self) -> Rect {
        Rect::new(0, 0, self.display.width, self.display.height)
    }

    /// Desktop area: the shell surface minus the taskbar strip
    pub fn desktop_rect(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.display.width,
            (self.display.height - self.display.taskbar_height).max(0),
        )
    }

    /// Taskbar strip along the bottom edge
    pub fn taskbar_rect(&self) -> Rect {
        let desktop = self.desktop_rect();
        Rect::new(0, desktop.bottom(), self.display.width, self.display.taskbar_height)
    }
}

/// Shell surface geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title of the host shell
    pub title: String,
    pub width: i32,
    pub height: i32,
    pub taskbar_height: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "CatShell".to_string(),
            width: 600,
            height: 400,
            taskbar_height: 30,
        }
    }
}

/// Chrome window metrics and cascade placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowsConfig {
    pub title_bar_height: i32,
    pub close_button_width: i32,
    /// First cascade offset from the desktop origin
    pub cascade_base: i32,
    /// Diagonal step between cascaded windows
    pub cascade_step: i32,
    /// Number of windows after which the cascade wraps
    pub cascade_wrap: usize,
    /// Distance kept from the right/bottom desktop edge on open
    pub edge_margin: i32,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            title_bar_height: 20,
            close_button_width: 18,
            cascade_base: 20,
            cascade_step: 30,
            cascade_wrap: 5,
            edge_margin: 10,
        }
    }
}

/// Size entry for a hosted app
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SizeConfig {
    pub width: i32,
    pub height: i32,
}

impl SizeConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Default window sizes per hosted app
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppsConfig {
    pub notepad: SizeConfig,
    pub calculator: SizeConfig,
    pub minesweeper: SizeConfig,
    pub shutdown_dialog: SizeConfig,
}

impl Default for AppsConfig {
    fn default() -> Self {
        Self {
            notepad: SizeConfig { width: 400, height: 300 },
            calculator: SizeConfig { width: 250, height: 320 },
            minesweeper: SizeConfig { width: 300, height: 280 },
            shutdown_dialog: SizeConfig { width: 350, height: 180 },
        }
    }
}

/// Clock module configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Time format (12h or 24h)
    pub format_24h: bool,
    /// Show seconds
    pub show_seconds: bool,
    /// Refresh cadence in milliseconds
    pub tick_ms: u64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            format_24h: false,
            show_seconds: false,
            tick_ms: 1000,
        }
    }
}

/// Start menu configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Delay between hiding the popup and running the selected action
    pub action_delay_ms: u64,
    pub width: i32,
    pub submenu_width: i32,
    pub item_height: i32,
    pub separator_height: i32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            action_delay_ms: 10,
            width: 140,
            submenu_width: 120,
            item_height: 22,
            separator_height: 8,
        }
    }
}

/// Auxiliary process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliaryConfig {
    /// Program to launch
    pub command: String,
    pub args: Vec<String>,
    /// Launcher notice dialog size
    pub notice_size: SizeConfig,
    /// Auto-close delay of the launcher notice
    pub notice_close_ms: u64,
    /// Time granted after the termination request before a forced kill
    pub grace_ms: u64,
    /// Time to wait for the process to disappear after the forced kill
    pub kill_wait_ms: u64,
    /// Liveness polling interval while waiting
    pub poll_ms: u64,
}

impl Default for AuxiliaryConfig {
    fn default() -> Self {
        Self {
            command: "catshell-doom".to_string(),
            args: Vec::new(),
            notice_size: SizeConfig { width: 300, height: 120 },
            notice_close_ms: 4000,
            grace_ms: 2000,
            kill_wait_ms: 1000,
            poll_ms: 50,
        }
    }
}

/// A desktop icon binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconConfig {
    pub label: String,
    pub action: ShellAction,
}

impl IconConfig {
    fn new(label: &str, action: ShellAction) -> Self {
        Self {
            label: label.to_string(),
            action,
        }
    }
}

/// Desktop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    pub icon_width: i32,
    pub icon_height: i32,
    pub icon_spacing: i32,
    /// Icons in layout order (top to bottom, then left to right)
    pub icons: Vec<IconConfig>,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            icon_width: 75,
            icon_height: 60,
            icon_spacing: 10,
            icons: vec![
                IconConfig::new("Notepad", ShellAction::OpenNotepad),
                IconConfig::new("Calculator", ShellAction::OpenCalculator),
                IconConfig::new("Mines", ShellAction::OpenMinesweeper),
                IconConfig::new("Doom", ShellAction::OpenAuxiliaryDemo),
            ],
        }
    }
}
