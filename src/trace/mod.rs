//! # Trace Input
//!
//! Normalized log entries, the monotonic-timestamp normalizer, and the text
//! trace reader. The analytic core only ever sees [`LogEntry`] values; the
//! reader is the reference implementation of the textual log grammar and
//! lives at the edge of the crate.

pub mod entry;
pub mod normalize;
pub mod reader;

pub use entry::{
    CanFrame, Direction, IdWidth, LinFrame, LinHeaderTiming, LogEntry, Timestamp,
};
pub use normalize::{normalize_stream, Normalizer};
pub use reader::{parse_line, TraceReader};
