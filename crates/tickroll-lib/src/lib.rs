//! Streaming tick-to-OHLC candle aggregation pipeline.
//!
//! This is a facade crate that re-exports functionality from the
//! tickroll workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use tickroll_lib::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cancel = CancellationToken::new();
//!     let ticks = PriceGenerator::new(GeneratorConfig::default()).spawn(cancel.clone());
//!     let sink = CsvSink::new(".");
//!
//!     let mut pipeline = Pipeline::spawn(ticks, sink, &cancel, DEFAULT_CHANNEL_CAPACITY)?;
//!     while let Some(candle) = pipeline.recv().await {
//!         println!("{} {} close {:.2}", candle.symbol, candle.period, candle.close);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tickroll_types::*;

// Re-export aggregation
pub use tickroll_aggregate::{RollupStage, WatermarkStage, WindowAccumulator, reduce};

// Re-export the synthetic tick source
pub use tickroll_source::{GeneratorConfig, PriceGenerator};

// Re-export persistence
pub use tickroll_sink::{CandleSink, CsvSink, NullSink, SinkError};

// Re-export pipeline composition
pub use tickroll_pipeline::{DEFAULT_CHANNEL_CAPACITY, Pipeline};

/// Prelude module for convenient imports.
///
/// ```
/// use tickroll_lib::prelude::*;
/// ```
pub mod prelude {
    pub use tickroll_types::{Candle, Period, PriceSample, Result, Sampled, Tick, TickrollError};

    pub use tickroll_aggregate::{RollupStage, WatermarkStage, reduce};

    pub use tickroll_source::{GeneratorConfig, PriceGenerator};

    pub use tickroll_sink::{CandleSink, CsvSink, NullSink};

    pub use tickroll_pipeline::{DEFAULT_CHANNEL_CAPACITY, Pipeline};
}
