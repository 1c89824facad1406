//! Append-only CSV candle log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tickroll_types::{Candle, Period};

/// Errors that can occur while persisting a candle.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Failed to open or append to a candle log file.
    #[error("failed to write candle log {path}: {source}")]
    Write {
        /// The log file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Persistence seam for emitted candles.
///
/// Stages call [`append`](Self::append) synchronously once per emitted
/// candle. A failed append is reported to the caller but must not stop
/// aggregation; the candle is still forwarded downstream.
pub trait CandleSink: Send + Sync {
    /// Appends one candle to the period-specific log.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the log cannot be opened or written.
    fn append(&self, candle: &Candle) -> Result<(), SinkError>;
}

/// Per-period append-only CSV files in one directory.
///
/// Each period gets its own `candles_{period}.csv`, created on first
/// append and never truncated. Row columns: symbol, window start
/// (RFC 3339 UTC), open, close, high, low, with prices at two decimal
/// places.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    /// Creates a sink writing into the given directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the log file path for a period.
    #[must_use]
    pub fn log_path(&self, period: Period) -> PathBuf {
        self.dir.join(format!("candles_{period}.csv"))
    }
}

impl CandleSink for CsvSink {
    fn append(&self, candle: &Candle) -> Result<(), SinkError> {
        let path = self.log_path(candle.period);
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| SinkError::Write {
                path: path.clone(),
                source,
            })?;

        writeln!(file, "{}", format_row(candle)).map_err(|source| SinkError::Write {
            path,
            source,
        })
    }
}

/// Formats one candle as a CSV row.
fn format_row(candle: &Candle) -> String {
    format!(
        "{},{},{:.2},{:.2},{:.2},{:.2}",
        candle.symbol,
        candle.window_start.format("%Y-%m-%dT%H:%M:%SZ"),
        candle.open,
        candle.close,
        candle.high,
        candle.low
    )
}

/// Sink that discards every candle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CandleSink for NullSink {
    fn append(&self, _candle: &Candle) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Lets tests and embedders share a sink across stage tasks.
impl<S: CandleSink + ?Sized> CandleSink for std::sync::Arc<S> {
    fn append(&self, candle: &Candle) -> Result<(), SinkError> {
        (**self).append(candle)
    }
}
