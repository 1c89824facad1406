//! Stage wiring and pipeline composition for tickroll.
//!
//! The aggregation stages in `tickroll-aggregate` are synchronous
//! state machines; this crate runs each one as its own tokio task and
//! chains them with bounded channels:
//!
//! ```text
//! ticks -> [1m stage] -> [2m stage] -> [10m stage] -> terminal output
//!              |              |             |
//!              +--- sink -----+---- sink ---+
//! ```
//!
//! See [`Pipeline::spawn`].

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod pipeline;

pub use pipeline::{DEFAULT_CHANNEL_CAPACITY, Pipeline};
