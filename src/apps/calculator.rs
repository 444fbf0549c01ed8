//! Calculator face. Arithmetic lives outside the window manager.

use super::HostedApp;
use crate::config::Config;
use crate::utils::Size;

const KEYPAD: [&str; 5] = ["7 8 9 /", "4 5 6 *", "1 2 3 -", "0 . = +", "C"];

pub struct Calculator {
    display: String,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create(_config: &Config) -> Box<dyn HostedApp> {
    Box::new(Calculator::new())
}

impl HostedApp for Calculator {
    fn title(&self) -> &str {
        "Calculator"
    }

    fn render(&self, _area: Size) -> Vec<String> {
        let mut lines = vec![format!("[{:>12}]", self.display)];
        lines.extend(KEYPAD.iter().map(|row| row.to_string()));
        lines
    }
}
