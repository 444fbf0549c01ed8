//! Window management for CatShell
//!
//! Chrome windows and the registry that tracks which ones are open.

pub mod chrome;
pub mod registry;

pub use chrome::{ChromeHit, ChromeMetrics, ChromeWindow, WindowId};
pub use registry::WindowRegistry;
