//! # Signal Decoding
//!
//! Bit-level field extraction for Intel and Motorola layouts, physical
//! scaling, multiplex-aware extraction driven by the LDF/DBC descriptions,
//! and numerically stable per-signal statistics.

pub mod extract;
pub mod extractor;
pub mod stats;

pub use extract::{encode_physical, extract_physical, extract_raw, insert_raw, sign_extend};
pub use extractor::{SignalExtractor, SignalSample};
pub use stats::{RunningStats, StatisticsSummary};
