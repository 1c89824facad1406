//! Pure OHLC reduction of one window's samples.

use chrono::{DateTime, Utc};
use tickroll_types::{Candle, Period, PriceSample};

/// Reduces a non-empty collection of price samples into one candle.
///
/// Open and close are chosen by timestamp comparison, not arrival
/// order: the earliest-timestamped sample provides the open, the
/// latest the close. High and low are plain extrema over all values.
/// For samples with distinct timestamps the result is independent of
/// input ordering; ties keep the earlier-seen value.
///
/// # Panics
///
/// Panics (debug assertion) on an empty sample slice. The stages never
/// reduce an empty accumulator; an empty window here is an invariant
/// violation, not a runtime data error.
#[must_use]
pub fn reduce(
    symbol: &str,
    period: Period,
    window_start: DateTime<Utc>,
    samples: &[PriceSample],
) -> Candle {
    debug_assert!(!samples.is_empty(), "reduce called on empty window");

    let mut builder = CandleBuilder::new(&samples[0]);
    for sample in &samples[1..] {
        builder.update(sample);
    }
    builder.finish(symbol, period, window_start)
}

/// Incremental OHLC builder over the samples of one window.
///
/// Tracks the timestamps backing open and close independently of the
/// high/low extrema, so out-of-timestamp-order input still yields the
/// correct open and close.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CandleBuilder {
    open: f64,
    open_at: DateTime<Utc>,
    close: f64,
    close_at: DateTime<Utc>,
    high: f64,
    low: f64,
}

impl CandleBuilder {
    /// Creates a builder seeded from the first sample.
    #[must_use]
    pub(crate) const fn new(first: &PriceSample) -> Self {
        Self {
            open: first.value,
            open_at: first.timestamp,
            close: first.value,
            close_at: first.timestamp,
            high: first.value,
            low: first.value,
        }
    }

    /// Folds one more sample into the candle.
    pub(crate) fn update(&mut self, sample: &PriceSample) {
        if sample.timestamp < self.open_at {
            self.open = sample.value;
            self.open_at = sample.timestamp;
        }
        if sample.timestamp > self.close_at {
            self.close = sample.value;
            self.close_at = sample.timestamp;
        }
        self.high = self.high.max(sample.value);
        self.low = self.low.min(sample.value);
    }

    /// Finishes building, attaching symbol, period and window start.
    #[must_use]
    pub(crate) fn finish(self, symbol: &str, period: Period, window_start: DateTime<Utc>) -> Candle {
        Candle::new(
            symbol,
            period,
            self.open,
            self.high,
            self.low,
            self.close,
            window_start,
        )
    }
}
