//! Taskbar clock

use chrono::{DateTime, Local, TimeZone};

use crate::config::ClockConfig;

/// Clock text refreshed on every scheduler tick
pub struct Clock {
    format_24h: bool,
    show_seconds: bool,
    cached_text: String,
    ticks: u64,
}

impl Clock {
    pub fn new(config: &ClockConfig) -> Self {
        let mut clock = Self {
            format_24h: config.format_24h,
            show_seconds: config.show_seconds,
            cached_text: String::new(),
            ticks: 0,
        };
        clock.cached_text = clock.format_time(&Local::now());
        clock
    }

    fn pattern(&self) -> &'static str {
        match (self.format_24h, self.show_seconds) {
            (true, true) => "%H:%M:%S",
            (true, false) => "%H:%M",
            (false, true) => "%I:%M:%S %p",
            (false, false) => "%I:%M %p",
        }
    }

    /// Format a timestamp the way the taskbar shows it
    pub fn format_time<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        now.format(self.pattern()).to_string()
    }

    /// Refresh the cached text; returns whether it changed
    pub fn tick(&mut self) -> bool {
        self.tick_at(&Local::now())
    }

    pub fn tick_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> bool
    where
        Tz::Offset: std::fmt::Display,
    {
        self.ticks += 1;
        let text = self.format_time(now);
        if text == self.cached_text {
            return false;
        }
        self.cached_text = text;
        true
    }

    pub fn text(&self) -> &str {
        &self.cached_text
    }

    /// Number of ticks seen since start
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 21, h, m, s).unwrap()
    }

    #[test]
    fn twelve_hour_default() {
        let clock = Clock::new(&ClockConfig::default());
        assert_eq!(clock.format_time(&at(14, 30, 5)), "02:30 PM");
    }

    #[test]
    fn twenty_four_hour_with_seconds() {
        let clock = Clock::new(&ClockConfig {
            format_24h: true,
            show_seconds: true,
            ..ClockConfig::default()
        });
        assert_eq!(clock.format_time(&at(14, 30, 5)), "14:30:05");
    }

    #[test]
    fn tick_reports_changes_only() {
        let mut clock = Clock::new(&ClockConfig::default());
        clock.tick_at(&at(9, 0, 0));
        assert_eq!(clock.text(), "09:00 AM");
        assert!(!clock.tick_at(&at(9, 0, 30)));
        assert!(clock.tick_at(&at(9, 1, 0)));
        assert_eq!(clock.text(), "09:01 AM");
        assert_eq!(clock.ticks(), 3);
    }
}
