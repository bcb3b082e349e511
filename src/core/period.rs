//! Light/dark period selection from the hour window.
//!
//! The window is half-open and evaluated literally: `start <= hour < end` is
//! light, everything else is dark. `start == end` and `start > end` therefore
//! never produce a light hour; the window does not wrap past midnight.

use std::fmt;

use crate::settings::Schedule;

/// Which half of the day an hour falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Light,
    Dark,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Period {
    /// Select the period for `hour` given the `[start, end)` window.
    pub fn for_hour(hour: u8, start: u8, end: u8) -> Self {
        if hour >= start && hour < end {
            Period::Light
        } else {
            Period::Dark
        }
    }

    /// The profile the schedule assigns to this period.
    pub fn profile<'a>(&self, schedule: &'a Schedule) -> &'a str {
        match self {
            Period::Light => &schedule.light_profile,
            Period::Dark => &schedule.dark_profile,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Period::Light => "Light",
            Period::Dark => "Dark",
        }
    }

    /// Returns the icon/symbol for this period.
    pub fn symbol(&self) -> &'static str {
        match self {
            Period::Light => "󰖨 ",
            Period::Dark => " ",
        }
    }
}

/// The hour at which the period next changes after `hour`, if it ever does.
pub fn next_change(hour: u8, start: u8, end: u8) -> Option<u8> {
    let current = Period::for_hour(hour, start, end);
    (1..24u8)
        .map(|offset| (hour + offset) % 24)
        .find(|candidate| Period::for_hour(*candidate, start, end) != current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use proptest::prelude::*;

    fn solarized() -> Schedule {
        Schedule {
            light_profile: TEST_LIGHT_PROFILE.to_string(),
            dark_profile: TEST_DARK_PROFILE.to_string(),
            start_hour: TEST_START_HOUR,
            end_hour: TEST_END_HOUR,
        }
    }

    #[test]
    fn test_every_hour_and_window() {
        for start in 0..24u8 {
            for end in 0..24u8 {
                for hour in 0..24u8 {
                    let expected = if start < end && (start..end).contains(&hour) {
                        Period::Light
                    } else {
                        Period::Dark
                    };
                    assert_eq!(
                        Period::for_hour(hour, start, end),
                        expected,
                        "hour={hour} start={start} end={end}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_window_boundaries() {
        assert_eq!(Period::for_hour(8, 8, 20), Period::Light);
        assert_eq!(Period::for_hour(19, 8, 20), Period::Light);
        assert_eq!(Period::for_hour(20, 8, 20), Period::Dark);
        assert_eq!(Period::for_hour(7, 8, 20), Period::Dark);
    }

    #[test]
    fn test_inverted_window_does_not_wrap() {
        for hour in 0..24 {
            assert_eq!(Period::for_hour(hour, 20, 8), Period::Dark);
        }
    }

    #[test]
    fn test_profile_selection() {
        let schedule = solarized();
        assert_eq!(Period::Light.profile(&schedule), TEST_LIGHT_PROFILE);
        assert_eq!(Period::Dark.profile(&schedule), TEST_DARK_PROFILE);
    }

    #[test]
    fn test_next_change() {
        assert_eq!(next_change(14, 8, 20), Some(20));
        assert_eq!(next_change(21, 8, 20), Some(8));
        assert_eq!(next_change(7, 8, 20), Some(8));
        assert_eq!(next_change(12, 5, 5), None);
        assert_eq!(next_change(3, 0, 23), Some(23));
    }

    proptest! {
        #[test]
        fn prop_light_iff_inside_window(hour in 0u8..24, start in 0u8..24, end in 0u8..24) {
            let period = Period::for_hour(hour, start, end);
            prop_assert_eq!(period == Period::Light, start <= hour && hour < end);
        }

        #[test]
        fn prop_empty_window_is_always_dark(hour in 0u8..24, edge in 0u8..24) {
            prop_assert_eq!(Period::for_hour(hour, edge, edge), Period::Dark);
        }
    }
}
