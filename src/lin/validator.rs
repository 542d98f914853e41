//! # LIN Frame Validator
//!
//! Per-frame checks against the LDF: PID parity, declared length, checksum,
//! and (when the log carries sub-frame timing) the physical-layer header
//! checks. Every defect is a finding; validation never fails hard.

use crate::config::AnalysisConfig;
use crate::describe::ldf::{ChecksumKind, LdfDescription};
use crate::lin::checksum::{check_pid, checksum_classic, checksum_enhanced};
use crate::lin::physical::HeaderMonitor;
use crate::logging::log_debug;
use crate::constants::{LIN_ID_MASTER_REQUEST, LIN_ID_SLAVE_RESPONSE};
use crate::report::{FindingKind, ReportBuilder};
use crate::trace::LinFrame;

/// Outcome of validating one LIN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinVerdict {
    /// Unprotected identifier, usable even when the parity bits were wrong.
    pub unprotected_id: u8,
    /// Whether signal extraction may run (spec known, length matched).
    pub extract_signals: bool,
}

/// Stateful LIN validator; the state is the physical-layer monitor.
#[derive(Debug, Default)]
pub struct LinValidator {
    monitor: HeaderMonitor,
}

impl LinValidator {
    pub fn new() -> Self {
        LinValidator::default()
    }

    pub fn validate(
        &mut self,
        frame: &LinFrame,
        ldf: &LdfDescription,
        config: &AnalysisConfig,
        report: &mut ReportBuilder,
    ) -> LinVerdict {
        // Parity failure is reported but analysis proceeds on the
        // unprotected identifier.
        let unprotected_id = match check_pid(frame.pid_byte) {
            Ok(id) => id,
            Err(mismatch) => {
                report.record(
                    frame.ts,
                    frame.channel,
                    Some(u32::from(frame.unprotected_id())),
                    FindingKind::PidParityError {
                        expected: mismatch.expected,
                        observed: mismatch.observed,
                    },
                );
                frame.unprotected_id()
            }
        };

        if let Some(timing) = &frame.header {
            self.monitor.inspect(
                frame.channel,
                frame.ts,
                unprotected_id,
                timing,
                config,
                report,
            );
        }

        let spec = match ldf.frame(unprotected_id) {
            Some(spec) => spec,
            None => {
                report.record(
                    frame.ts,
                    frame.channel,
                    Some(u32::from(unprotected_id)),
                    FindingKind::UnknownFrameId,
                );
                return LinVerdict {
                    unprotected_id,
                    extract_signals: false,
                };
            }
        };

        if usize::from(spec.length) != frame.payload.len() {
            report.record(
                frame.ts,
                frame.channel,
                Some(u32::from(unprotected_id)),
                FindingKind::LengthMismatch {
                    expected: spec.length,
                    observed: frame.payload.len() as u8,
                },
            );
            // No checksum over a payload of the wrong shape.
            return LinVerdict {
                unprotected_id,
                extract_signals: false,
            };
        }

        // Diagnostic frames use the classic checksum regardless of the LDF.
        let diagnostic = unprotected_id == LIN_ID_MASTER_REQUEST
            || unprotected_id == LIN_ID_SLAVE_RESPONSE;
        let kind = if diagnostic {
            ChecksumKind::Classic
        } else {
            spec.checksum_kind
        };
        let expected = match kind {
            ChecksumKind::Classic => checksum_classic(&frame.payload),
            ChecksumKind::Enhanced => checksum_enhanced(frame.pid_byte, &frame.payload),
        };
        if expected != frame.checksum_byte {
            log_debug(&format!(
                "checksum mismatch on frame {:#04x}: payload {}",
                unprotected_id,
                hex::encode(&frame.payload)
            ));
            report.record(
                frame.ts,
                frame.channel,
                Some(u32::from(unprotected_id)),
                FindingKind::ChecksumError {
                    expected,
                    observed: frame.checksum_byte,
                },
            );
        }

        LinVerdict {
            unprotected_id,
            extract_signals: true,
        }
    }
}
