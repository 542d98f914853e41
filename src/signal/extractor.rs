//! # Description-Driven Signal Extractor
//!
//! Decodes physical signal values from validated frames using the LDF/DBC
//! layouts. Multiplexed messages are resolved by first extracting the
//! multiplexor field; only signals of the selected group (plus the
//! always-present ones) are emitted. Every emitted value feeds the
//! per-signal running statistics.

use crate::describe::dbc::CanMessage;
use crate::describe::ldf::LinFrameSpec;
use crate::describe::{MuxRole, Signal};
use crate::report::{FindingKind, ReportBuilder};
use crate::signal::extract::{extract_physical, extract_raw};
use crate::signal::stats::{RunningStats, StatisticsSummary};
use crate::trace::{CanFrame, LinFrame};
use std::collections::BTreeMap;

/// One decoded physical value.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSample {
    pub ts: f64,
    pub channel: u8,
    pub name: String,
    pub value: f64,
}

/// Streaming extractor with per-signal statistics.
#[derive(Debug, Default)]
pub struct SignalExtractor {
    stats: BTreeMap<String, RunningStats>,
}

impl SignalExtractor {
    pub fn new() -> Self {
        SignalExtractor::default()
    }

    /// Decodes the signals of a validated LIN frame.
    pub fn extract_lin(
        &mut self,
        frame: &LinFrame,
        spec: &LinFrameSpec,
        report: &mut ReportBuilder,
    ) -> Vec<SignalSample> {
        self.extract_set(
            frame.ts,
            frame.channel,
            Some(u32::from(frame.unprotected_id())),
            &frame.payload,
            &spec.signals,
            report,
        )
    }

    /// Decodes the signals of a validated CAN frame.
    pub fn extract_can(
        &mut self,
        frame: &CanFrame,
        message: &CanMessage,
        report: &mut ReportBuilder,
    ) -> Vec<SignalSample> {
        self.extract_set(
            frame.ts,
            frame.channel,
            Some(frame.id),
            &frame.payload,
            &message.signals,
            report,
        )
    }

    fn extract_set(
        &mut self,
        ts: f64,
        channel: u8,
        frame_id: Option<u32>,
        payload: &[u8],
        signals: &[Signal],
        report: &mut ReportBuilder,
    ) -> Vec<SignalSample> {
        let multiplexor_value = signals
            .iter()
            .find(|s| s.mux_role == MuxRole::Multiplexor)
            .and_then(|m| extract_raw(payload, m.start_bit, m.length_bits, m.byte_order));

        let mut samples = Vec::new();
        for signal in signals {
            match signal.mux_role {
                MuxRole::None | MuxRole::Multiplexor => {}
                MuxRole::Multiplexed(group) => {
                    if multiplexor_value != Some(group) {
                        continue;
                    }
                }
            }
            let value = match extract_physical(payload, signal) {
                Some(value) => value,
                None => {
                    report.record(
                        ts,
                        channel,
                        frame_id,
                        FindingKind::SignalFieldOutOfPayload {
                            signal: signal.name.clone(),
                        },
                    );
                    continue;
                }
            };
            if value < signal.min || value > signal.max {
                report.record(
                    ts,
                    channel,
                    frame_id,
                    FindingKind::SignalOutOfRange {
                        signal: signal.name.clone(),
                        value,
                        min: signal.min,
                        max: signal.max,
                    },
                );
            }
            self.stats
                .entry(signal.name.clone())
                .or_default()
                .push(value);
            samples.push(SignalSample {
                ts,
                channel,
                name: signal.name.clone(),
                value,
            });
        }
        samples
    }

    /// Consumes the extractor into the per-signal statistics map.
    pub fn finalize(self) -> BTreeMap<String, StatisticsSummary> {
        self.stats
            .into_iter()
            .map(|(name, stats)| (name, stats.summary()))
            .collect()
    }
}
