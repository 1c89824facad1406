//! Candle persistence for the tickroll pipeline.
//!
//! Every aggregation stage appends each candle it emits to a
//! period-specific log:
//!
//! - [`CandleSink`] - the persistence seam the pipeline writes through
//! - [`CsvSink`] - per-period append-only CSV files
//! - [`NullSink`] - discards candles (tests, ad-hoc runs)

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;

pub use crate::csv::{CandleSink, CsvSink, NullSink, SinkError};
