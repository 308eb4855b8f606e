use std::str::FromStr;

use crate::error::{FixError, Result};

/// Daily local-time interval during which batch processing may make
/// progress. `start > end` wraps past midnight: `17-06` permits 17:00
/// through 05:59. Equal bounds permit the whole day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start_hour: u8,
    end_hour: u8,
}

impl TimeWindow {
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self> {
        if start_hour > 23 || end_hour > 23 {
            return Err(FixError::Config(format!(
                "time window hours must be 0-23, got {start_hour}-{end_hour}"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn permits(&self, hour: u8) -> bool {
        if self.start_hour < self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour < self.end_hour
        } else {
            true
        }
    }
}

impl FromStr for TimeWindow {
    type Err = FixError;

    /// Parse the CLI form `"17-06"`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || FixError::Config(format!("invalid time window {s:?}, expected e.g. 17-06"));
        let (start, end) = s.trim().split_once('-').ok_or_else(bad)?;
        let start_hour: u8 = start.trim().parse().map_err(|_| bad())?;
        let end_hour: u8 = end.trim().parse().map_err(|_| bad())?;
        Self::new(start_hour, end_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_window_spans_midnight() {
        let w: TimeWindow = "17-06".parse().unwrap();
        assert!(w.permits(17));
        assert!(w.permits(20));
        assert!(w.permits(0));
        assert!(w.permits(5));
        assert!(!w.permits(6));
        assert!(!w.permits(10));
        assert!(!w.permits(16));
    }

    #[test]
    fn daytime_window() {
        let w: TimeWindow = "9-17".parse().unwrap();
        assert!(w.permits(9));
        assert!(w.permits(16));
        assert!(!w.permits(17));
        assert!(!w.permits(8));
        assert!(!w.permits(23));
    }

    #[test]
    fn equal_bounds_permit_all_hours() {
        let w: TimeWindow = "6-6".parse().unwrap();
        for hour in 0u8..24 {
            assert!(w.permits(hour));
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["17", "25-06", "17-24", "a-b", "", "17-06-12"] {
            assert!(
                matches!(bad.parse::<TimeWindow>(), Err(FixError::Config(_))),
                "expected Config error for {bad:?}"
            );
        }
    }
}
