//! OHLC candle data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Period, PriceSample, Sampled};

/// OHLC summary of all observations within one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Instrument symbol.
    pub symbol: String,
    /// Aggregation period of this candle.
    pub period: Period,
    /// Value of the earliest-timestamped sample in the window.
    pub open: f64,
    /// Highest value observed in the window.
    pub high: f64,
    /// Lowest value observed in the window.
    pub low: f64,
    /// Value of the latest-timestamped sample in the window.
    pub close: f64,
    /// Start instant of the window this candle summarizes.
    pub window_start: DateTime<Utc>,
}

impl Candle {
    /// Creates a new candle.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        period: Period,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        window_start: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            open,
            high,
            low,
            close,
            window_start,
        }
    }

    /// Returns the price range (high - low).
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Returns the exclusive end instant of this candle's window.
    #[must_use]
    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_start + self.period.duration()
    }
}

impl Sampled for Candle {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Explodes the candle into its four constituent samples.
    ///
    /// Sample timestamps are strictly increasing within the candle's
    /// own window: open first, close last. A parent reducer therefore
    /// recovers the open of its earliest child and the close of its
    /// latest child purely from timestamp comparison, regardless of
    /// the order the children arrived in.
    fn samples(&self) -> Vec<PriceSample> {
        let quarter = self.period.duration() / 4;
        vec![
            PriceSample::new(self.open, self.window_start),
            PriceSample::new(self.high, self.window_start + quarter),
            PriceSample::new(self.low, self.window_start + quarter * 2),
            PriceSample::new(self.close, self.window_start + quarter * 3),
        ]
    }
}
