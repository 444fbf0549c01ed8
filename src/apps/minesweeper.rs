//! Minesweeper placeholder

use super::HostedApp;
use crate::config::Config;
use crate::utils::Size;

#[derive(Default)]
pub struct Minesweeper;

impl Minesweeper {
    pub fn new() -> Self {
        Self
    }
}

pub fn create(_config: &Config) -> Box<dyn HostedApp> {
    Box::new(Minesweeper::new())
}

impl HostedApp for Minesweeper {
    fn title(&self) -> &str {
        "Minesweeper"
    }

    fn render(&self, _area: Size) -> Vec<String> {
        vec![
            "Minesweeper - CatShell".to_string(),
            "Purrfectly under construction, nya~!".to_string(),
            "(Game Area)".to_string(),
        ]
    }
}
