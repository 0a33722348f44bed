//! In-game clock: hour counter with 24-hour wraparound and day bands.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Daylight band derived from the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dawn => "dawn",
            Self::Day => "day",
            Self::Dusk => "dusk",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day counter plus hour-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    pub day: u32,
    pub hour: u8,
}

impl Default for Clock {
    fn default() -> Self {
        Self { day: 1, hour: 8 }
    }
}

impl Clock {
    /// Advance by `hours`, wrapping the hour at 24. Returns days rolled over.
    pub fn advance_hours(&mut self, hours: u32) -> u32 {
        let total = u32::from(self.hour) + hours;
        let days = total / 24;
        #[allow(clippy::cast_possible_truncation)]
        {
            self.hour = (total % 24) as u8;
        }
        self.day = self.day.saturating_add(days);
        days
    }

    #[must_use]
    pub const fn time_of_day(&self) -> TimeOfDay {
        match self.hour {
            5..=7 => TimeOfDay::Dawn,
            8..=16 => TimeOfDay::Day,
            17..=19 => TimeOfDay::Dusk,
            _ => TimeOfDay::Night,
        }
    }

    #[must_use]
    pub const fn is_night(&self) -> bool {
        matches!(self.time_of_day(), TimeOfDay::Night)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_wraps_and_rolls_days() {
        let mut clock = Clock::default();
        assert_eq!(clock.advance_hours(10), 0);
        assert_eq!(clock.hour, 18);
        assert_eq!(clock.day, 1);

        assert_eq!(clock.advance_hours(6), 1);
        assert_eq!(clock.hour, 0);
        assert_eq!(clock.day, 2);

        assert_eq!(clock.advance_hours(49), 2);
        assert_eq!(clock.hour, 1);
        assert_eq!(clock.day, 4);
    }

    #[test]
    fn bands_cover_the_day() {
        let cases = [
            (5, TimeOfDay::Dawn),
            (7, TimeOfDay::Dawn),
            (8, TimeOfDay::Day),
            (16, TimeOfDay::Day),
            (17, TimeOfDay::Dusk),
            (19, TimeOfDay::Dusk),
            (20, TimeOfDay::Night),
            (0, TimeOfDay::Night),
            (4, TimeOfDay::Night),
        ];
        for (hour, expected) in cases {
            let clock = Clock { day: 1, hour };
            assert_eq!(clock.time_of_day(), expected, "hour {hour}");
        }
    }
}
