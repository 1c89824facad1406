//! Streaming aggregation stages.
//!
//! Both stages are synchronous: `process` consumes one input record
//! and returns the candles that record completed. Each stage owns its
//! accumulator table exclusively; nothing here is shared or locked.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tickroll_types::{Candle, Period, Result, Tick, TickrollError};

use crate::reducer::reduce;
use crate::window::WindowAccumulator;

/// Tick-to-candle stage with per-symbol watermark completion.
///
/// Tick arrival count per window is not fixed, so completion is
/// inferred from a per-symbol monotonic watermark (the maximum tick
/// timestamp seen): once the watermark advances into a strictly later
/// window, every older window can no longer receive in-order data and
/// is flushed. A tick for an already-flushed window is dropped and
/// counted as a late-data event.
#[derive(Debug)]
pub struct WatermarkStage {
    period: Period,
    symbols: HashMap<String, SymbolWindows>,
    late_events: u64,
}

/// Per-symbol watermark plus open windows, ordered by window start.
#[derive(Debug)]
struct SymbolWindows {
    watermark: DateTime<Utc>,
    windows: BTreeMap<DateTime<Utc>, WindowAccumulator>,
}

impl WatermarkStage {
    /// Creates a stage aggregating ticks into candles of `period`.
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self {
            period,
            symbols: HashMap::new(),
            late_events: 0,
        }
    }

    /// Returns the period being aggregated to.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Processes one tick, returning the candles it completed in
    /// ascending window-start order.
    pub fn process(&mut self, tick: &Tick) -> Vec<Candle> {
        let window = self.period.window_start(tick.timestamp);

        let state = self
            .symbols
            .entry(tick.symbol.clone())
            .or_insert_with(|| SymbolWindows {
                watermark: tick.timestamp,
                windows: BTreeMap::new(),
            });

        // Windows strictly before the watermark's window were already
        // flushed; a flushed window is never resurrected.
        if window < self.period.window_start(state.watermark) {
            self.late_events += 1;
            tracing::debug!(
                symbol = %tick.symbol,
                window = %window,
                timestamp = %tick.timestamp,
                "dropping late tick for flushed window"
            );
            return Vec::new();
        }

        state.windows.entry(window).or_default().append(tick);

        if tick.timestamp > state.watermark {
            state.watermark = tick.timestamp;
        }

        // Flush every window the watermark has moved past, not just
        // the adjacent one, so bursty arrival cannot strand windows.
        let cutoff = self.period.window_start(state.watermark);
        let expired: Vec<DateTime<Utc>> =
            state.windows.range(..cutoff).map(|(start, _)| *start).collect();

        let mut completed = Vec::with_capacity(expired.len());
        for start in expired {
            if let Some(acc) = state.windows.remove(&start) {
                completed.push(reduce(&tick.symbol, self.period, start, acc.samples()));
            }
        }
        completed
    }

    /// Returns how many late ticks have been dropped so far.
    #[must_use]
    pub const fn late_events(&self) -> u64 {
        self.late_events
    }

    /// Returns the number of currently open windows across all
    /// symbols.
    #[must_use]
    pub fn open_windows(&self) -> usize {
        self.symbols.values().map(|s| s.windows.len()).sum()
    }
}

/// Candle-to-candle roll-up stage with count-based completion.
///
/// Child cardinality is fixed by the period ratio (two 1m candles per
/// 2m window, five 2m candles per 10m window), so a window flushes the
/// moment its exact expected child count has accumulated. Fewer
/// children never emit, even at shutdown.
#[derive(Debug)]
pub struct RollupStage {
    period: Period,
    expected: usize,
    windows: HashMap<(String, DateTime<Utc>), WindowAccumulator>,
}

impl RollupStage {
    /// Creates a stage rolling child candles up into `period`.
    ///
    /// # Errors
    ///
    /// Returns [`TickrollError::InvalidRollupPeriod`] for a period
    /// with no child candle period; that is a configuration defect
    /// and aborts pipeline wiring.
    pub fn new(period: Period) -> Result<Self> {
        let expected = period
            .child_count()
            .ok_or(TickrollError::InvalidRollupPeriod(period))?;
        Ok(Self {
            period,
            expected,
            windows: HashMap::new(),
        })
    }

    /// Returns the period being rolled up to.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Processes one child candle, returning the parent candle if the
    /// window is now complete.
    pub fn process(&mut self, candle: &Candle) -> Option<Candle> {
        let window = self.period.window_start(candle.window_start);

        match self.windows.entry((candle.symbol.clone(), window)) {
            Entry::Vacant(slot) => {
                // The ratio is always at least 2, so the first child
                // can never complete a window.
                slot.insert(WindowAccumulator::new()).append(candle);
                None
            }
            Entry::Occupied(mut slot) => {
                slot.get_mut().append(candle);
                if slot.get().record_count() < self.expected {
                    None
                } else {
                    let ((symbol, start), acc) = slot.remove_entry();
                    Some(reduce(&symbol, self.period, start, acc.samples()))
                }
            }
        }
    }

    /// Returns the number of currently open windows.
    #[must_use]
    pub fn open_windows(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeDelta, TimeZone};

    fn tick(symbol: &str, minute: u32, second: u32, value: f64) -> Tick {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, second).unwrap();
        Tick::new(symbol, value, ts)
    }

    fn minute(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap()
    }

    fn m1_candle(symbol: &str, start_minute: u32, open: f64, close: f64) -> Candle {
        let high = open.max(close) + 1.0;
        let low = open.min(close) - 1.0;
        Candle::new(
            symbol,
            Period::Minute1,
            open,
            high,
            low,
            close,
            minute(start_minute),
        )
    }

    fn m2_candle(symbol: &str, start_minute: u32, open: f64, close: f64) -> Candle {
        let high = open.max(close) + 1.0;
        let low = open.min(close) - 1.0;
        Candle::new(
            symbol,
            Period::Minute2,
            open,
            high,
            low,
            close,
            minute(start_minute),
        )
    }

    #[test]
    fn test_watermark_flush_on_next_minute() {
        let mut stage = WatermarkStage::new(Period::Minute1);

        assert!(stage.process(&tick("AAPL", 0, 10, 100.0)).is_empty());
        assert!(stage.process(&tick("AAPL", 0, 20, 105.0)).is_empty());
        assert!(stage.process(&tick("AAPL", 0, 40, 95.0)).is_empty());
        assert!(stage.process(&tick("AAPL", 0, 50, 102.0)).is_empty());

        // Watermark advances into minute 1, flushing minute 0.
        let completed = stage.process(&tick("AAPL", 1, 5, 101.0));
        assert_eq!(completed.len(), 1);

        let candle = &completed[0];
        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.close, 102.0);
        assert_eq!(candle.high, 105.0);
        assert_eq!(candle.low, 95.0);
        assert_eq!(candle.window_start, minute(0));
        assert_eq!(stage.open_windows(), 1);
    }

    #[test]
    fn test_flushed_span_matches_true_extrema() {
        let values = [100.0, 103.5, 97.25, 99.0, 104.75, 96.5];
        let mut stage = WatermarkStage::new(Period::Minute1);

        for (i, value) in values.iter().enumerate() {
            let second = u32::try_from(i).unwrap() * 9;
            assert!(stage.process(&tick("AAPL", 0, second, *value)).is_empty());
        }
        let completed = stage.process(&tick("AAPL", 1, 0, 100.0));

        assert_eq!(completed.len(), 1);
        let true_high = values.iter().copied().fold(f64::MIN, f64::max);
        let true_low = values.iter().copied().fold(f64::MAX, f64::min);
        assert_relative_eq!(completed[0].high - completed[0].low, true_high - true_low);
    }

    #[test]
    fn test_late_tick_is_dropped_and_counted() {
        let mut stage = WatermarkStage::new(Period::Minute1);

        stage.process(&tick("AAPL", 0, 30, 100.0));
        let completed = stage.process(&tick("AAPL", 1, 10, 101.0));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].close, 100.0);
        assert_eq!(stage.late_events(), 0);

        // A tick timestamped inside the already-flushed minute 0.
        let late = stage.process(&tick("AAPL", 0, 59, 999.0));
        assert!(late.is_empty());
        assert_eq!(stage.late_events(), 1);

        // The flushed window was not resurrected.
        let completed = stage.process(&tick("AAPL", 2, 0, 102.0));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].window_start, minute(1));
        assert_eq!(completed[0].open, 101.0);
    }

    #[test]
    fn test_out_of_order_within_open_window_is_kept() {
        let mut stage = WatermarkStage::new(Period::Minute1);

        stage.process(&tick("AAPL", 0, 40, 95.0));
        // Earlier timestamp, same window: still accepted, becomes open.
        stage.process(&tick("AAPL", 0, 10, 100.0));

        let completed = stage.process(&tick("AAPL", 1, 0, 101.0));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].open, 100.0);
        assert_eq!(completed[0].close, 95.0);
    }

    #[test]
    fn test_watermark_jump_flushes_all_stranded_windows() {
        let mut stage = WatermarkStage::new(Period::Minute1);

        stage.process(&tick("AAPL", 0, 10, 100.0));
        // Jump straight to minute 5: minute 0 flushes even though
        // minutes 1-4 never saw a tick.
        let completed = stage.process(&tick("AAPL", 5, 0, 105.0));

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].window_start, minute(0));
        assert_eq!(stage.open_windows(), 1);
    }

    #[test]
    fn test_multi_symbol_independence() {
        let mut stage = WatermarkStage::new(Period::Minute1);

        stage.process(&tick("AAPL", 0, 10, 100.0));
        stage.process(&tick("SBER", 0, 15, 250.0));
        stage.process(&tick("AAPL", 0, 50, 102.0));

        // Only AAPL's watermark advances; SBER's window stays open.
        let completed = stage.process(&tick("AAPL", 1, 0, 103.0));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].symbol, "AAPL");
        assert_eq!(completed[0].open, 100.0);
        assert_eq!(completed[0].close, 102.0);
        assert_eq!(stage.open_windows(), 2);

        let completed = stage.process(&tick("SBER", 1, 30, 251.0));
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].symbol, "SBER");
        assert_eq!(completed[0].open, 250.0);
        assert_eq!(completed[0].close, 250.0);
    }

    #[test]
    fn test_rollup_two_children_make_one_parent() {
        let mut stage = RollupStage::new(Period::Minute2).unwrap();

        assert!(stage.process(&m1_candle("AAPL", 0, 100.0, 101.0)).is_none());
        let parent = stage
            .process(&m1_candle("AAPL", 1, 101.0, 103.0))
            .expect("second child completes the window");

        assert_eq!(parent.period, Period::Minute2);
        assert_eq!(parent.window_start, minute(0));
        // Open of the earlier child, close of the later one.
        assert_eq!(parent.open, 100.0);
        assert_eq!(parent.close, 103.0);
        assert_eq!(parent.high, 104.0);
        assert_eq!(parent.low, 99.0);
        assert_eq!(stage.open_windows(), 0);
    }

    #[test]
    fn test_rollup_children_out_of_order() {
        let mut stage = RollupStage::new(Period::Minute2).unwrap();

        assert!(stage.process(&m1_candle("AAPL", 1, 101.0, 103.0)).is_none());
        let parent = stage
            .process(&m1_candle("AAPL", 0, 100.0, 101.0))
            .expect("both children arrived");

        // Open/close follow window order, not arrival order.
        assert_eq!(parent.open, 100.0);
        assert_eq!(parent.close, 103.0);
    }

    #[test]
    fn test_rollup_five_children_for_ten_minutes() {
        let mut stage = RollupStage::new(Period::Minute10).unwrap();

        for i in 0..4u32 {
            let child = m2_candle("AAPL", i * 2, 100.0 + f64::from(i), 101.0 + f64::from(i));
            assert!(stage.process(&child).is_none());
        }
        // Four children are not enough, even with time long past.
        assert_eq!(stage.open_windows(), 1);

        let parent = stage
            .process(&m2_candle("AAPL", 8, 104.0, 105.0))
            .expect("fifth child completes the window");

        assert_eq!(parent.period, Period::Minute10);
        assert_eq!(parent.window_start, minute(0));
        assert_eq!(parent.open, 100.0);
        assert_eq!(parent.close, 105.0);
        assert_eq!(stage.open_windows(), 0);
    }

    #[test]
    fn test_rollup_partial_window_never_emits() {
        let mut stage = RollupStage::new(Period::Minute10).unwrap();

        for i in 0..4u32 {
            assert!(stage.process(&m2_candle("AAPL", i * 2, 100.0, 101.0)).is_none());
        }
        // Dropping the stage abandons the partial window; nothing was
        // emitted for it.
        assert_eq!(stage.open_windows(), 1);
        drop(stage);
    }

    #[test]
    fn test_rollup_symbols_do_not_merge() {
        let mut stage = RollupStage::new(Period::Minute2).unwrap();

        assert!(stage.process(&m1_candle("AAPL", 0, 100.0, 101.0)).is_none());
        assert!(stage.process(&m1_candle("SBER", 0, 250.0, 251.0)).is_none());
        assert_eq!(stage.open_windows(), 2);

        let aapl = stage.process(&m1_candle("AAPL", 1, 101.0, 102.0)).unwrap();
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.open, 100.0);

        let sber = stage.process(&m1_candle("SBER", 1, 251.0, 252.0)).unwrap();
        assert_eq!(sber.symbol, "SBER");
        assert_eq!(sber.open, 250.0);
        assert_eq!(sber.close, 252.0);
    }

    #[test]
    fn test_rollup_rejects_base_period() {
        assert!(matches!(
            RollupStage::new(Period::Minute1),
            Err(TickrollError::InvalidRollupPeriod(Period::Minute1))
        ));
    }

    #[test]
    fn test_chained_rollup_preserves_extrema() {
        // Feed one symbol's ticks through 1m -> 2m by hand.
        let mut base = WatermarkStage::new(Period::Minute1);
        let mut rollup = RollupStage::new(Period::Minute2).unwrap();

        let mut parents = Vec::new();
        for m in 0..3u32 {
            for (s, v) in [(10, 100.0), (30, 110.0), (50, 90.0)] {
                let t = Tick::new(
                    "AAPL",
                    v + f64::from(m),
                    minute(m) + TimeDelta::seconds(s),
                );
                for candle in base.process(&t) {
                    if let Some(parent) = rollup.process(&candle) {
                        parents.push(parent);
                    }
                }
            }
        }

        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].window_start, minute(0));
        assert_eq!(parents[0].open, 100.0);
        assert_eq!(parents[0].close, 91.0);
        assert_eq!(parents[0].high, 111.0);
        assert_eq!(parents[0].low, 90.0);
    }
}
