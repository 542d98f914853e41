//! Physical-layer checks over the LIN header interval.
//!
//! The only state-bearing check in the analyzer: per channel, the monitor
//! walks `LookingForBreak -> LookingForSync -> LookingForPid -> Payload`
//! through each captured header. The first violation emits its finding and
//! resets the channel to `LookingForBreak`; the remaining phases of that
//! header are not judged.

use crate::config::AnalysisConfig;
use crate::constants::{
    LIN_BREAK_DELIMITER_MIN_BITS, LIN_BREAK_MIN_BITS, LIN_SYNC_BYTE, LIN_SYNC_FIELD_BITS,
};
use crate::report::{FindingKind, ReportBuilder};
use crate::trace::LinHeaderTiming;
use std::collections::BTreeMap;

/// Phase of the header walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPhase {
    LookingForBreak,
    LookingForSync,
    LookingForPid,
    Payload,
}

/// Per-channel physical-layer monitor.
#[derive(Debug, Default)]
pub struct HeaderMonitor {
    phases: BTreeMap<u8, HeaderPhase>,
}

impl HeaderMonitor {
    pub fn new() -> Self {
        HeaderMonitor::default()
    }

    /// Walks one captured header through the phase machine.
    pub fn inspect(
        &mut self,
        channel: u8,
        ts: f64,
        frame_id: u8,
        timing: &LinHeaderTiming,
        config: &AnalysisConfig,
        report: &mut ReportBuilder,
    ) {
        let bit_time = 1.0 / config.bit_rate;
        let frame_id = Some(u32::from(frame_id));
        self.set_phase(channel, HeaderPhase::LookingForBreak);

        let observed_break_bits = timing.break_len_s / bit_time;
        if observed_break_bits < LIN_BREAK_MIN_BITS {
            report.record(
                ts,
                channel,
                frame_id,
                FindingKind::BreakTooShort {
                    observed_bits: observed_break_bits,
                },
            );
            return;
        }
        let observed_delimiter_bits = timing.delimiter_len_s / bit_time;
        if observed_delimiter_bits < LIN_BREAK_DELIMITER_MIN_BITS {
            report.record(
                ts,
                channel,
                frame_id,
                FindingKind::BreakDelimiterShort {
                    observed_bits: observed_delimiter_bits,
                },
            );
            return;
        }

        self.set_phase(channel, HeaderPhase::LookingForSync);
        if timing.sync_byte != LIN_SYNC_BYTE {
            report.record(
                ts,
                channel,
                frame_id,
                FindingKind::SyncByteWrong {
                    observed: timing.sync_byte,
                },
            );
            self.set_phase(channel, HeaderPhase::LookingForBreak);
            return;
        }
        let observed_hz = LIN_SYNC_FIELD_BITS / timing.sync_len_s;
        if ((observed_hz - config.bit_rate) / config.bit_rate).abs() > config.bit_rate_tolerance {
            report.record(
                ts,
                channel,
                frame_id,
                FindingKind::BitRateOutOfTolerance {
                    observed_hz,
                    nominal_hz: config.bit_rate,
                },
            );
            self.set_phase(channel, HeaderPhase::LookingForBreak);
            return;
        }

        // The PID and payload intervals carry no timing of their own in the
        // log; the walk completes and rearms for the next header.
        self.set_phase(channel, HeaderPhase::LookingForPid);
        self.set_phase(channel, HeaderPhase::Payload);
        self.set_phase(channel, HeaderPhase::LookingForBreak);
    }

    /// Current phase of a channel, for tests and diagnostics.
    pub fn phase(&self, channel: u8) -> HeaderPhase {
        self.phases
            .get(&channel)
            .copied()
            .unwrap_or(HeaderPhase::LookingForBreak)
    }

    fn set_phase(&mut self, channel: u8, phase: HeaderPhase) {
        self.phases.insert(channel, phase);
    }
}
