//! Synthetic tick source for the tickroll pipeline.
//!
//! Provides [`PriceGenerator`], a Gaussian random-walk price simulator
//! that feeds the pipeline an unbounded tick sequence until cancelled.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod generator;

pub use generator::{GeneratorConfig, PriceGenerator};
