//! Windowed OHLC aggregation for the tickroll pipeline.
//!
//! This crate provides the streaming aggregation core:
//!
//! - [`reduce`] - pure OHLC reduction of a window's samples
//! - [`WindowAccumulator`] - per-window sample buffer
//! - [`WatermarkStage`] - tick-to-candle stage with per-symbol
//!   watermark completion
//! - [`RollupStage`] - candle-to-candle stage with count-based
//!   completion
//!
//! Stages are synchronous state machines: they consume one input
//! record at a time and return any candles completed by it. Channel
//! plumbing lives in `tickroll-pipeline`.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod reducer;
mod stage;
mod window;

pub use reducer::reduce;
pub use stage::{RollupStage, WatermarkStage};
pub use window::WindowAccumulator;
