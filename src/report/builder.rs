//! # Report Aggregation
//!
//! The builder collects findings incrementally during the single pass over
//! the trace and is finalized exactly once. Finalization sorts every finding
//! vector by `(timestamp, kind, sequence)` and derives the global counters,
//! so identical inputs serialize to byte-identical reports.

use crate::can::busload::BusLoadSample;
use crate::error::LinspectorError;
use crate::lin::schedule::ScheduleStatistics;
use crate::report::finding::{Finding, FindingCategory, FindingKind};
use crate::signal::stats::StatisticsSummary;
use serde::Serialize;
use std::collections::BTreeMap;

/// Scalar counters derived at finalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_frames_lin: u64,
    pub total_frames_can: u64,
    pub finding_count: u64,
    pub truncated_input: bool,
    pub error_count_by_kind: BTreeMap<String, u64>,
}

/// The finalized, deterministic analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub frame_findings: Vec<Finding>,
    pub timing_findings: Vec<Finding>,
    pub physical_findings: Vec<Finding>,
    pub schedule_findings: Vec<Finding>,
    pub gateway_findings: Vec<Finding>,
    pub signal_statistics: BTreeMap<String, StatisticsSummary>,
    pub schedule_statistics: BTreeMap<u8, ScheduleStatistics>,
    pub gateway_latency: BTreeMap<String, StatisticsSummary>,
    pub bus_load_series: Vec<BusLoadSample>,
    pub summary: ReportSummary,
}

impl AnalysisReport {
    pub fn has_findings(&self) -> bool {
        self.summary.finding_count > 0
    }

    /// Compact JSON rendering.
    pub fn to_json(&self) -> Result<String, LinspectorError> {
        serde_json::to_string(self)
            .map_err(|err| LinspectorError::InternalInvariantViolated(err.to_string()))
    }

    /// Pretty JSON rendering for human consumption.
    pub fn to_json_pretty(&self) -> Result<String, LinspectorError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| LinspectorError::InternalInvariantViolated(err.to_string()))
    }
}

/// Incremental report state.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    frame: Vec<Finding>,
    timing: Vec<Finding>,
    physical: Vec<Finding>,
    schedule: Vec<Finding>,
    gateway: Vec<Finding>,
    seq: u64,
    total_frames_lin: u64,
    total_frames_can: u64,
    truncated: bool,
}

impl ReportBuilder {
    pub fn new() -> Self {
        ReportBuilder::default()
    }

    /// Appends one finding, routing it to its report vector.
    pub fn record(&mut self, ts: f64, channel: u8, frame_id: Option<u32>, kind: FindingKind) {
        let category = kind.category();
        let finding = Finding {
            ts,
            channel,
            frame_id,
            seq: self.seq,
            kind,
        };
        self.seq += 1;
        match category {
            FindingCategory::Frame => self.frame.push(finding),
            FindingCategory::Timing => self.timing.push(finding),
            FindingCategory::Physical => self.physical.push(finding),
            FindingCategory::Schedule => self.schedule.push(finding),
            FindingCategory::Gateway => self.gateway.push(finding),
        }
    }

    pub fn count_lin_frame(&mut self) {
        self.total_frames_lin += 1;
    }

    pub fn count_can_frame(&mut self) {
        self.total_frames_can += 1;
    }

    /// Flags the report as built from a truncated stream. Idempotent.
    pub fn mark_truncated(&mut self, ts: f64, channel: u8) {
        if !self.truncated {
            self.truncated = true;
            self.record(ts, channel, None, FindingKind::TruncatedInput);
        }
    }

    /// Findings recorded so far.
    pub fn finding_count(&self) -> u64 {
        self.seq
    }

    /// Consumes the builder into the final report.
    pub fn finalize(
        self,
        signal_statistics: BTreeMap<String, StatisticsSummary>,
        schedule_statistics: BTreeMap<u8, ScheduleStatistics>,
        gateway_latency: BTreeMap<String, StatisticsSummary>,
        bus_load_series: Vec<BusLoadSample>,
    ) -> AnalysisReport {
        let mut frame = self.frame;
        let mut timing = self.timing;
        let mut physical = self.physical;
        let mut schedule = self.schedule;
        let mut gateway = self.gateway;
        for findings in [
            &mut frame,
            &mut timing,
            &mut physical,
            &mut schedule,
            &mut gateway,
        ] {
            findings.sort_by(|a, b| {
                a.ts.total_cmp(&b.ts)
                    .then_with(|| a.kind.code().cmp(&b.kind.code()))
                    .then_with(|| a.seq.cmp(&b.seq))
            });
        }

        let mut error_count_by_kind: BTreeMap<String, u64> = BTreeMap::new();
        for finding in frame
            .iter()
            .chain(&timing)
            .chain(&physical)
            .chain(&schedule)
            .chain(&gateway)
        {
            *error_count_by_kind
                .entry(finding.kind.name().to_string())
                .or_insert(0) += 1;
        }

        AnalysisReport {
            frame_findings: frame,
            timing_findings: timing,
            physical_findings: physical,
            schedule_findings: schedule,
            gateway_findings: gateway,
            signal_statistics,
            schedule_statistics,
            gateway_latency,
            bus_load_series,
            summary: ReportSummary {
                total_frames_lin: self.total_frames_lin,
                total_frames_can: self.total_frames_can,
                finding_count: self.seq,
                truncated_input: self.truncated,
                error_count_by_kind,
            },
        }
    }
}
