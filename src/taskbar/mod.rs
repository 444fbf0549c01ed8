//! Taskbar: start button and clock along the bottom of the shell
//!
//! The taskbar never moves. It is drawn above the desktop and below every
//! chrome window.

pub mod clock;

use crate::config::Config;
use crate::utils::{Point, Rect};

pub use clock::Clock;

const BUTTON_INSET: i32 = 2;
const START_BUTTON_WIDTH: i32 = 50;
const CLOCK_WIDTH: i32 = 70;

/// Start button relief, mirrors the start menu's visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRelief {
    Raised,
    Sunken,
}

pub struct Taskbar {
    rect: Rect,
    start_button: Rect,
    clock_rect: Rect,
    relief: ButtonRelief,
    clock: Clock,
}

impl Taskbar {
    pub fn new(config: &Config) -> Self {
        let rect = config.taskbar_rect();
        let inner_height = (rect.height - BUTTON_INSET * 2).max(0);
        let start_button = Rect::new(
            rect.x + BUTTON_INSET,
            rect.y + BUTTON_INSET,
            START_BUTTON_WIDTH,
            inner_height,
        );
        let clock_rect = Rect::new(
            rect.right() - BUTTON_INSET - CLOCK_WIDTH,
            rect.y + BUTTON_INSET,
            CLOCK_WIDTH,
            inner_height,
        );

        Self {
            rect,
            start_button,
            clock_rect,
            relief: ButtonRelief::Raised,
            clock: Clock::new(&config.clock),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn start_button(&self) -> Rect {
        self.start_button
    }

    pub fn clock_rect(&self) -> Rect {
        self.clock_rect
    }

    pub fn contains(&self, p: Point) -> bool {
        self.rect.contains(p)
    }

    pub fn hits_start_button(&self, p: Point) -> bool {
        self.start_button.contains(p)
    }

    pub fn relief(&self) -> ButtonRelief {
        self.relief
    }

    /// Press the start button in or pop it out
    pub fn set_start_pressed(&mut self, pressed: bool) {
        self.relief = if pressed {
            ButtonRelief::Sunken
        } else {
            ButtonRelief::Raised
        };
    }

    pub fn tick_clock(&mut self) -> bool {
        self.clock.tick()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
