//! Timestamp normalization for the incoming event stream.
//!
//! Loggers occasionally emit regressing timestamps around buffer flushes.
//! The normalizer clamps a regressing timestamp to the previous one plus one
//! quantum so downstream interval math stays sane, and reports the incident
//! so the defect stays visible.

use crate::constants::TIMESTAMP_QUANTUM;
use crate::trace::{LogEntry, Timestamp};

/// A regression the normalizer repaired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    /// Timestamp of the preceding entry.
    pub previous: Timestamp,
    /// Timestamp the logger actually wrote.
    pub observed: Timestamp,
}

/// Stateful clamp over arrival order.
#[derive(Debug, Default)]
pub struct Normalizer {
    last_ts: Option<Timestamp>,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer::default()
    }

    /// Clamps the entry's timestamp if it regresses. Returns the repaired
    /// regression, if any.
    pub fn normalize(&mut self, entry: &mut LogEntry) -> Option<Regression> {
        let ts = entry.ts();
        match self.last_ts {
            Some(last) if ts < last => {
                let clamped = last + TIMESTAMP_QUANTUM;
                entry.set_ts(clamped);
                self.last_ts = Some(clamped);
                Some(Regression {
                    previous: last,
                    observed: ts,
                })
            }
            _ => {
                self.last_ts = Some(ts);
                None
            }
        }
    }

    /// Timestamp of the last normalized entry.
    pub fn last_ts(&self) -> Option<Timestamp> {
        self.last_ts
    }
}

/// Normalizes a whole stream, discarding the regression reports.
pub fn normalize_stream(entries: impl IntoIterator<Item = LogEntry>) -> Vec<LogEntry> {
    let mut normalizer = Normalizer::new();
    entries
        .into_iter()
        .map(|mut entry| {
            normalizer.normalize(&mut entry);
            entry
        })
        .collect()
}
