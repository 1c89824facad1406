//! Per-window sample accumulator.

use tickroll_types::{PriceSample, Sampled};

/// Buffer for the samples observed so far in one (symbol, window
/// start) bucket.
///
/// Created on the first record for an unseen window key, owned
/// exclusively by its stage, and destroyed when the window flushes.
/// The record count is tracked separately from the sample count: a
/// candle contributes one record but four samples.
#[derive(Debug, Clone, Default)]
pub struct WindowAccumulator {
    samples: Vec<PriceSample>,
    records: usize,
}

impl WindowAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
            records: 0,
        }
    }

    /// Appends one record's samples.
    pub fn append(&mut self, record: &impl Sampled) {
        self.samples.extend(record.samples());
        self.records += 1;
    }

    /// Returns how many records have been appended.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.records
    }

    /// Returns the accumulated samples.
    #[must_use]
    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    /// Returns true if no record has been appended yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records == 0
    }
}
