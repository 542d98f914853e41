//! # Schedule Adherence Analyzer
//!
//! Matches observed LIN arrivals against the active schedule table. The
//! expected arrival sequence of a frame is anchored at its first observed
//! arrival, not at a wall clock: slot k is expected at `t0 + k * period`.

use crate::config::AnalysisConfig;
use crate::constants::{LIN_ID_MASTER_REQUEST, LIN_ID_SLAVE_RESPONSE};
use crate::describe::ldf::ScheduleTable;
use crate::report::{FindingKind, ReportBuilder};
use crate::signal::stats::RunningStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-frame arrival statistics reported at finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleStatistics {
    pub arrivals: u64,
    pub mean_period_s: f64,
    pub stddev_period_s: f64,
    pub min_jitter_s: f64,
    pub max_jitter_s: f64,
}

#[derive(Debug)]
struct SlotState {
    t0: f64,
    prev: f64,
    arrivals: u64,
    period_stats: RunningStats,
    min_jitter: f64,
    max_jitter: f64,
}

/// Streaming schedule analyzer.
#[derive(Debug)]
pub struct ScheduleAnalyzer {
    periods: BTreeMap<u8, f64>,
    schedule_tolerance: f64,
    max_jitter: f64,
    states: BTreeMap<u8, SlotState>,
}

impl ScheduleAnalyzer {
    /// A frame listed in several slots takes its period from the first one.
    pub fn new(schedule: &ScheduleTable, config: &AnalysisConfig) -> Self {
        let mut periods = BTreeMap::new();
        for slot in &schedule.slots {
            periods.entry(slot.frame_id).or_insert(slot.period_s);
        }
        ScheduleAnalyzer {
            periods,
            schedule_tolerance: config.schedule_tolerance,
            max_jitter: config.max_jitter,
            states: BTreeMap::new(),
        }
    }

    /// Feeds one observed LIN arrival.
    pub fn observe(&mut self, ts: f64, channel: u8, frame_id: u8, report: &mut ReportBuilder) {
        // Diagnostic frames are event-driven and bypass schedule checks.
        if frame_id == LIN_ID_MASTER_REQUEST || frame_id == LIN_ID_SLAVE_RESPONSE {
            return;
        }
        let period = match self.periods.get(&frame_id) {
            Some(period) => *period,
            None => {
                report.record(
                    ts,
                    channel,
                    Some(u32::from(frame_id)),
                    FindingKind::UnexpectedFrame,
                );
                return;
            }
        };

        let state = self.states.entry(frame_id).or_insert_with(|| SlotState {
            t0: ts,
            prev: ts,
            arrivals: 0,
            period_stats: RunningStats::new(),
            min_jitter: f64::INFINITY,
            max_jitter: f64::NEG_INFINITY,
        });
        state.arrivals += 1;
        if state.arrivals == 1 {
            // The anchor arrival defines slot zero.
            return;
        }

        let gap = ts - state.prev;
        if gap >= 1.5 * period {
            report.record(
                ts,
                channel,
                Some(u32::from(frame_id)),
                FindingKind::MissedSlot {
                    expected_ts: state.prev + period,
                    gap_s: gap,
                },
            );
        }

        let expected_k = ((ts - state.t0) / period).round();
        let deviation = ts - (state.t0 + expected_k * period);
        if deviation.abs() > self.schedule_tolerance {
            report.record(
                ts,
                channel,
                Some(u32::from(frame_id)),
                FindingKind::ScheduleDrift {
                    deviation_s: deviation,
                },
            );
        }

        let jitter = gap - period;
        if jitter.abs() > self.max_jitter {
            report.record(
                ts,
                channel,
                Some(u32::from(frame_id)),
                FindingKind::JitterExceeded { jitter_s: jitter },
            );
        }

        state.period_stats.push(gap);
        state.min_jitter = state.min_jitter.min(jitter);
        state.max_jitter = state.max_jitter.max(jitter);
        state.prev = ts;
    }

    /// Consumes the analyzer into the per-frame statistics map.
    pub fn finalize(self) -> BTreeMap<u8, ScheduleStatistics> {
        self.states
            .into_iter()
            .map(|(frame_id, state)| {
                let observed_jitter = state.arrivals > 1;
                (
                    frame_id,
                    ScheduleStatistics {
                        arrivals: state.arrivals,
                        mean_period_s: state.period_stats.mean(),
                        stddev_period_s: state.period_stats.stddev(),
                        min_jitter_s: if observed_jitter { state.min_jitter } else { 0.0 },
                        max_jitter_s: if observed_jitter { state.max_jitter } else { 0.0 },
                    },
                )
            })
            .collect()
    }
}
