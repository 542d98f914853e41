//! Typed log entries emitted by the trace reader.

use crate::constants::LIN_ID_MAX;
use serde::{Deserialize, Serialize};

/// Seconds since trace start. Monotonically non-decreasing after
/// normalization; all timing math uses explicit tolerances, never equality.
pub type Timestamp = f64;

/// Direction of a captured frame relative to the logging node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Rx,
    Tx,
}

/// CAN identifier width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdWidth {
    Standard11,
    Extended29,
}

/// Sub-frame timing of a LIN header, present when the logger captures it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinHeaderTiming {
    /// Measured break duration in seconds.
    pub break_len_s: f64,
    /// Measured break delimiter duration in seconds.
    pub delimiter_len_s: f64,
    /// Observed sync field byte.
    pub sync_byte: u8,
    /// Measured sync field duration (10 bits including start/stop) in seconds.
    pub sync_len_s: f64,
}

/// One captured LIN frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinFrame {
    pub ts: Timestamp,
    pub channel: u8,
    /// Protected identifier byte as seen on the wire.
    pub pid_byte: u8,
    /// Data bytes (0..=8); the observed DLC is the length.
    pub payload: Vec<u8>,
    pub checksum_byte: u8,
    pub direction: Direction,
    #[serde(default)]
    pub header: Option<LinHeaderTiming>,
}

impl LinFrame {
    /// Unprotected identifier, the low six bits of the PID.
    pub fn unprotected_id(&self) -> u8 {
        self.pid_byte & LIN_ID_MAX
    }
}

/// One captured CAN or CAN FD frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanFrame {
    pub ts: Timestamp,
    pub channel: u8,
    pub id: u32,
    pub id_width: IdWidth,
    pub is_fd: bool,
    /// Bit-rate switch active in the data phase.
    #[serde(default)]
    pub brs: bool,
    /// Data bytes (0..=64).
    pub payload: Vec<u8>,
    pub direction: Direction,
}

/// A normalized trace event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogEntry {
    Lin(LinFrame),
    Can(CanFrame),
}

impl LogEntry {
    /// Timestamp of the entry.
    pub fn ts(&self) -> Timestamp {
        match self {
            LogEntry::Lin(frame) => frame.ts,
            LogEntry::Can(frame) => frame.ts,
        }
    }

    /// Channel the entry was captured on.
    pub fn channel(&self) -> u8 {
        match self {
            LogEntry::Lin(frame) => frame.channel,
            LogEntry::Can(frame) => frame.channel,
        }
    }

    pub(crate) fn set_ts(&mut self, ts: Timestamp) {
        match self {
            LogEntry::Lin(frame) => frame.ts = ts,
            LogEntry::Can(frame) => frame.ts = ts,
        }
    }
}
