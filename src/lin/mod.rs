//! # LIN Analysis
//!
//! Frame-level validation (checksum, PID parity, length), physical-layer
//! header checks, and schedule adherence for the LIN side of the trace.

pub mod checksum;
pub mod physical;
pub mod schedule;
pub mod validator;

pub use checksum::{check_pid, checksum_classic, checksum_enhanced, pid_for_id};
pub use physical::{HeaderMonitor, HeaderPhase};
pub use schedule::{ScheduleAnalyzer, ScheduleStatistics};
pub use validator::{LinValidator, LinVerdict};
