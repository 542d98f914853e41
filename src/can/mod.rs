//! # CAN Analysis
//!
//! Payload-length legality for CAN 2.0 and CAN FD frames, plus windowed
//! bus-load estimation with worst-case stuffing accounting.

pub mod busload;
pub mod validator;

pub use busload::{wire_bits, BusLoadAccumulator, BusLoadSample};
pub use validator::{is_legal_payload_len, validate_frame};
