//! CatShell - A retro desktop shell with a cat-themed window manager
//!
//! Hosts a desktop with launch icons, a taskbar with a start menu and
//! clock, and movable chrome windows for a handful of small apps. The
//! 3D demo runs as a separate process the shell keeps track of.

mod app;
mod apps;
mod config;
mod desktop;
mod error;
mod input;
mod menu;
mod shell;
mod taskbar;
mod utils;
mod window;

use anyhow::Result;
use log::{info, LevelFilter};
use std::sync::Arc;

use crate::app::Application;
use crate::config::Config;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    info!("Starting CatShell v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Arc::new(Config::load_or_default()?);
    info!("Configuration loaded successfully");

    // Create and run the application
    let mut app = Application::new(config)?;
    app.run()?;

    info!("CatShell shutting down gracefully");
    Ok(())
}
