//! Candle period definitions and window-start truncation.

use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Candle aggregation period.
///
/// The three periods form a fixed roll-up chain: every 2-minute window
/// is covered by exactly two 1-minute windows, and every 10-minute
/// window by exactly five 2-minute windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 1-minute candles (aggregated directly from ticks).
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    /// 2-minute candles (rolled up from 1-minute candles).
    #[serde(rename = "2m")]
    Minute2,
    /// 10-minute candles (rolled up from 2-minute candles).
    #[serde(rename = "10m")]
    Minute10,
}

impl Period {
    /// Returns the period length in whole minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        match self {
            Self::Minute1 => 1,
            Self::Minute2 => 2,
            Self::Minute10 => 10,
        }
    }

    /// Returns the period length as a [`TimeDelta`].
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes()))
    }

    /// Returns the next finer candle period, or `None` for the base
    /// period whose children are raw ticks.
    #[must_use]
    pub const fn child(&self) -> Option<Self> {
        match self {
            Self::Minute1 => None,
            Self::Minute2 => Some(Self::Minute1),
            Self::Minute10 => Some(Self::Minute2),
        }
    }

    /// Returns how many child candles make up one window of this
    /// period, or `None` for the base period.
    #[must_use]
    pub const fn child_count(&self) -> Option<usize> {
        match self {
            Self::Minute1 => None,
            Self::Minute2 => Some(2),
            Self::Minute10 => Some(5),
        }
    }

    /// Floors a timestamp to the start of its period-aligned window.
    ///
    /// Window boundaries are aligned within the hour; all three period
    /// lengths divide 60 evenly, so coarser windows always cover an
    /// exact set of finer ones.
    #[must_use]
    pub fn window_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let interval = self.minutes();
        let minute = timestamp.minute() / interval * interval;
        Utc.with_ymd_and_hms(
            timestamp.year(),
            timestamp.month(),
            timestamp.day(),
            timestamp.hour(),
            minute,
            0,
        )
        .unwrap()
    }

    /// Returns the period as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute2 => "2m",
            Self::Minute10 => "10m",
        }
    }

    /// Returns all periods, finest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minute1, Self::Minute2, Self::Minute10]
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" | "m1" | "minute1" => Ok(Self::Minute1),
            "2m" | "m2" | "minute2" => Ok(Self::Minute2),
            "10m" | "m10" | "minute10" => Ok(Self::Minute10),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid period string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(String);

impl std::fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown period '{}', expected one of: 1m, 2m, 10m", self.0)
    }
}

impl std::error::Error for PeriodParseError {}
