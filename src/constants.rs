//! Protocol Constants
//!
//! This module defines constants used across the LIN and CAN validators,
//! based on the LIN 2.1 specification and ISO 11898-1 (CAN / CAN FD).

/// Highest unprotected LIN frame identifier.
pub const LIN_ID_MAX: u8 = 0x3F;

/// Diagnostic master-request frame identifier.
pub const LIN_ID_MASTER_REQUEST: u8 = 60;

/// Diagnostic slave-response frame identifier.
pub const LIN_ID_SLAVE_RESPONSE: u8 = 61;

/// LIN sync field byte.
pub const LIN_SYNC_BYTE: u8 = 0x55;

/// Number of bits in the sync field including start and stop bits.
pub const LIN_SYNC_FIELD_BITS: f64 = 10.0;

/// Minimum break duration in nominal bit times.
pub const LIN_BREAK_MIN_BITS: f64 = 13.0;

/// Minimum break delimiter duration in nominal bit times.
pub const LIN_BREAK_DELIMITER_MIN_BITS: f64 = 1.0;

/// Maximum LIN payload length in bytes.
pub const LIN_MAX_PAYLOAD: usize = 8;

/// Maximum classic CAN payload length in bytes.
pub const CAN_MAX_PAYLOAD: usize = 8;

/// Maximum CAN FD payload length in bytes.
pub const CANFD_MAX_PAYLOAD: usize = 64;

/// Legal CAN FD payload lengths above the classic 0..=8 range.
pub const CANFD_EXTENDED_LENGTHS: [usize; 7] = [12, 16, 20, 24, 32, 48, 64];

/// Quantum added when clamping a regressing timestamp (1 microsecond).
pub const TIMESTAMP_QUANTUM: f64 = 1e-6;

// ----------------------------------------------------------------------------
// On-wire bit accounting (worst-case stuffing estimator per frame kind)
// ----------------------------------------------------------------------------

/// Stuff-susceptible header+CRC bits of a classic 11-bit frame
/// (SOF + ID + RTR + IDE + r0 + DLC + CRC15).
pub const CAN_STUFFABLE_BASE_11: usize = 34;

/// Stuff-susceptible header+CRC bits of a classic 29-bit frame
/// (adds SRR + IDE + 18 ID bits + r1).
pub const CAN_STUFFABLE_BASE_29: usize = 54;

/// Unstuffed tail of a classic frame: CRC delimiter + ACK slot + ACK
/// delimiter + EOF(7) + inter-frame space(3).
pub const CAN_FIXED_TAIL: usize = 13;

/// Arbitration-phase bits of an FD frame with an 11-bit identifier
/// (SOF + ID + RRS + IDE + FDF + res + BRS).
pub const CANFD_ARBITRATION_11: usize = 17;

/// Arbitration-phase bits of an FD frame with a 29-bit identifier.
pub const CANFD_ARBITRATION_29: usize = 36;

/// Data-phase framing bits of an FD frame before CRC: ESI + DLC.
pub const CANFD_DATA_PHASE_HEADER: usize = 5;

/// FD stuff-count field bits.
pub const CANFD_STUFF_COUNT_BITS: usize = 4;

/// FD CRC length for payloads up to 16 bytes.
pub const CANFD_CRC_SHORT: usize = 17;

/// FD CRC length for payloads above 16 bytes.
pub const CANFD_CRC_LONG: usize = 21;

/// Unstuffed FD tail: CRC delimiter + ACK slot + ACK delimiter + EOF(7) +
/// inter-frame space(3).
pub const CANFD_FIXED_TAIL: usize = 13;

// ----------------------------------------------------------------------------
// Configuration defaults
// ----------------------------------------------------------------------------

/// Nominal LIN bit rate in Hz.
pub const DEFAULT_LIN_BIT_RATE: f64 = 19_200.0;

/// Fractional tolerance on the measured LIN bit rate.
pub const DEFAULT_BIT_RATE_TOLERANCE: f64 = 0.005;

/// Default gateway correlation window in seconds.
pub const DEFAULT_GATEWAY_TIME_WINDOW: f64 = 0.010;

/// Allowed drift from the schedule in seconds.
pub const DEFAULT_SCHEDULE_TOLERANCE: f64 = 0.0005;

/// Allowed inter-arrival jitter in seconds.
pub const DEFAULT_MAX_JITTER: f64 = 0.001;

/// Bus-load estimation window in seconds.
pub const DEFAULT_BUS_LOAD_WINDOW: f64 = 0.100;

/// Nominal CAN arbitration-phase bit rate in Hz.
pub const DEFAULT_CAN_BIT_RATE: f64 = 500_000.0;

/// Nominal CAN FD data-phase bit rate in Hz (applies under BRS).
pub const DEFAULT_CAN_DATA_BIT_RATE: f64 = 2_000_000.0;
