//! CAN frame validation.

use crate::constants::{CANFD_EXTENDED_LENGTHS, CAN_MAX_PAYLOAD};
use crate::report::{FindingKind, ReportBuilder};
use crate::trace::CanFrame;

/// Whether a payload length is legal for the frame kind. CAN 2.0 allows
/// 0..=8; FD additionally allows the discrete set {12,16,20,24,32,48,64}.
pub fn is_legal_payload_len(is_fd: bool, len: usize) -> bool {
    if len <= CAN_MAX_PAYLOAD {
        return true;
    }
    is_fd && CANFD_EXTENDED_LENGTHS.contains(&len)
}

/// Validates one CAN frame. Returns whether signal extraction may run.
pub fn validate_frame(frame: &CanFrame, report: &mut ReportBuilder) -> bool {
    if !is_legal_payload_len(frame.is_fd, frame.payload.len()) {
        report.record(
            frame.ts,
            frame.channel,
            Some(frame.id),
            FindingKind::IllegalDlc {
                dlc: frame.payload.len() as u8,
                is_fd: frame.is_fd,
            },
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_lengths() {
        for len in 0..=8 {
            assert!(is_legal_payload_len(false, len));
        }
        assert!(!is_legal_payload_len(false, 9));
        assert!(!is_legal_payload_len(false, 12));
    }

    #[test]
    fn fd_lengths() {
        for len in 0..=8 {
            assert!(is_legal_payload_len(true, len));
        }
        for len in [12, 16, 20, 24, 32, 48, 64] {
            assert!(is_legal_payload_len(true, len));
        }
        for len in [9, 10, 11, 13, 15, 33, 63, 65] {
            assert!(!is_legal_payload_len(true, len));
        }
    }
}
