//! Core types for the tickroll candle aggregation pipeline.
//!
//! This crate provides the fundamental data structures shared by the
//! aggregation stages:
//!
//! - [`Tick`] - A single timestamped price observation for a symbol
//! - [`Candle`] - The OHLC summary of one completed window
//! - [`Period`] - Candle period (1m, 2m, 10m) with window truncation
//! - [`PriceSample`] / [`Sampled`] - The uniform sub-record the
//!   reducer consumes, produced by ticks and candles alike

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod candle;
mod error;
mod period;
mod tick;

pub use candle::Candle;
pub use error::{Result, TickrollError};
pub use period::{Period, PeriodParseError};
pub use tick::{PriceSample, Sampled, Tick};
