//! Finding kinds and their report routing.
//!
//! A finding is a recoverable observation, never an error: per-frame
//! defects are appended to the report and analysis continues.

use serde::Serialize;

/// Everything the analyzer can flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum FindingKind {
    PidParityError { expected: u8, observed: u8 },
    ChecksumError { expected: u8, observed: u8 },
    LengthMismatch { expected: u8, observed: u8 },
    UnknownFrameId,
    BreakTooShort { observed_bits: f64 },
    SyncByteWrong { observed: u8 },
    BreakDelimiterShort { observed_bits: f64 },
    BitRateOutOfTolerance { observed_hz: f64, nominal_hz: f64 },
    IllegalDlc { dlc: u8, is_fd: bool },
    NonMonotonicTimestamp { previous: f64, observed: f64 },
    ScheduleDrift { deviation_s: f64 },
    JitterExceeded { jitter_s: f64 },
    MissedSlot { expected_ts: f64, gap_s: f64 },
    UnexpectedFrame,
    SignalFieldOutOfPayload { signal: String },
    SignalOutOfRange { signal: String, value: f64, min: f64, max: f64 },
    NoLinSourceInWindow { rule: String },
    GatewayValueMismatch { rule: String, expected: f64, observed: f64, latency_s: f64 },
    TruncatedInput,
}

/// Report vector a finding lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FindingCategory {
    Frame,
    Timing,
    Physical,
    Schedule,
    Gateway,
}

impl FindingKind {
    /// Stable name used in counters and serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            FindingKind::PidParityError { .. } => "PidParityError",
            FindingKind::ChecksumError { .. } => "ChecksumError",
            FindingKind::LengthMismatch { .. } => "LengthMismatch",
            FindingKind::UnknownFrameId => "UnknownFrameId",
            FindingKind::BreakTooShort { .. } => "BreakTooShort",
            FindingKind::SyncByteWrong { .. } => "SyncByteWrong",
            FindingKind::BreakDelimiterShort { .. } => "BreakDelimiterShort",
            FindingKind::BitRateOutOfTolerance { .. } => "BitRateOutOfTolerance",
            FindingKind::IllegalDlc { .. } => "IllegalDlc",
            FindingKind::NonMonotonicTimestamp { .. } => "NonMonotonicTimestamp",
            FindingKind::ScheduleDrift { .. } => "ScheduleDrift",
            FindingKind::JitterExceeded { .. } => "JitterExceeded",
            FindingKind::MissedSlot { .. } => "MissedSlot",
            FindingKind::UnexpectedFrame => "UnexpectedFrame",
            FindingKind::SignalFieldOutOfPayload { .. } => "SignalFieldOutOfPayload",
            FindingKind::SignalOutOfRange { .. } => "SignalOutOfRange",
            FindingKind::NoLinSourceInWindow { .. } => "NoLinSourceInWindow",
            FindingKind::GatewayValueMismatch { .. } => "GatewayValueMismatch",
            FindingKind::TruncatedInput => "TruncatedInput",
        }
    }

    /// Total order over kinds for deterministic sorting.
    pub(crate) fn code(&self) -> u8 {
        match self {
            FindingKind::PidParityError { .. } => 0,
            FindingKind::ChecksumError { .. } => 1,
            FindingKind::LengthMismatch { .. } => 2,
            FindingKind::UnknownFrameId => 3,
            FindingKind::BreakTooShort { .. } => 4,
            FindingKind::SyncByteWrong { .. } => 5,
            FindingKind::BreakDelimiterShort { .. } => 6,
            FindingKind::BitRateOutOfTolerance { .. } => 7,
            FindingKind::IllegalDlc { .. } => 8,
            FindingKind::NonMonotonicTimestamp { .. } => 9,
            FindingKind::ScheduleDrift { .. } => 10,
            FindingKind::JitterExceeded { .. } => 11,
            FindingKind::MissedSlot { .. } => 12,
            FindingKind::UnexpectedFrame => 13,
            FindingKind::SignalFieldOutOfPayload { .. } => 14,
            FindingKind::SignalOutOfRange { .. } => 15,
            FindingKind::NoLinSourceInWindow { .. } => 16,
            FindingKind::GatewayValueMismatch { .. } => 17,
            FindingKind::TruncatedInput => 18,
        }
    }

    pub(crate) fn category(&self) -> FindingCategory {
        match self {
            FindingKind::PidParityError { .. }
            | FindingKind::ChecksumError { .. }
            | FindingKind::LengthMismatch { .. }
            | FindingKind::UnknownFrameId
            | FindingKind::IllegalDlc { .. }
            | FindingKind::SignalFieldOutOfPayload { .. }
            | FindingKind::SignalOutOfRange { .. } => FindingCategory::Frame,
            FindingKind::NonMonotonicTimestamp { .. } | FindingKind::TruncatedInput => {
                FindingCategory::Timing
            }
            FindingKind::BreakTooShort { .. }
            | FindingKind::SyncByteWrong { .. }
            | FindingKind::BreakDelimiterShort { .. }
            | FindingKind::BitRateOutOfTolerance { .. } => FindingCategory::Physical,
            FindingKind::ScheduleDrift { .. }
            | FindingKind::JitterExceeded { .. }
            | FindingKind::MissedSlot { .. }
            | FindingKind::UnexpectedFrame => FindingCategory::Schedule,
            FindingKind::NoLinSourceInWindow { .. }
            | FindingKind::GatewayValueMismatch { .. } => FindingCategory::Gateway,
        }
    }
}

/// One finding with its trace context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub ts: f64,
    pub channel: u8,
    /// Frame identifier involved, when one applies.
    pub frame_id: Option<u32>,
    /// Insertion sequence number; stable tie-breaker for sorting.
    pub seq: u64,
    #[serde(flatten)]
    pub kind: FindingKind,
}
