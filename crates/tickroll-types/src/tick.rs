//! Tick data representation and the uniform price-sample view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tick: one timestamped price observation for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol (e.g. "AAPL").
    pub symbol: String,
    /// Observed price.
    pub value: f64,
    /// Timestamp of the observation (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Tick {
    /// Creates a new tick.
    #[must_use]
    pub fn new(symbol: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.into(),
            value,
            timestamp,
        }
    }
}

/// A single timestamped price value, the unit the OHLC reducer
/// consumes.
///
/// The timestamp decides open/close selection: the sample with the
/// earliest timestamp in a window becomes the open, the latest the
/// close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Price value.
    pub value: f64,
    /// Timestamp the value was observed at (or attributed to).
    pub timestamp: DateTime<Utc>,
}

impl PriceSample {
    /// Creates a new price sample.
    #[must_use]
    pub const fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// Types that can contribute price samples to a window accumulator.
///
/// Implemented by [`Tick`] (one sample) and
/// [`Candle`](crate::Candle) (four samples), so a reducer can roll up
/// either without branching on the record kind.
pub trait Sampled {
    /// The symbol this record belongs to.
    fn symbol(&self) -> &str;

    /// The price samples this record contributes.
    fn samples(&self) -> Vec<PriceSample>;
}

impl Sampled for Tick {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn samples(&self) -> Vec<PriceSample> {
        vec![PriceSample::new(self.value, self.timestamp)]
    }
}
