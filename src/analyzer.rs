//! # Trace Analyzer
//!
//! Wires the subsystems into a single pass over the event stream: the
//! normalizer feeds the LIN and CAN validators, validated payloads feed the
//! signal extractor, and the decoded samples feed the schedule analyzer
//! (LIN side) and the gateway correlator (cross-bus). Findings merge in the
//! report builder.
//!
//! The analyzer is single-threaded and deterministic: identical inputs
//! yield byte-identical serialized reports.

use crate::can;
use crate::can::busload::BusLoadAccumulator;
use crate::config::AnalysisConfig;
use crate::describe::dbc::DbcDatabase;
use crate::describe::gateway::GatewayMap;
use crate::describe::ldf::LdfDescription;
use crate::error::LinspectorError;
use crate::gateway::GatewayCorrelator;
use crate::lin::{LinValidator, ScheduleAnalyzer};
use crate::logging::log_info;
use crate::report::{AnalysisReport, FindingKind, ReportBuilder};
use crate::signal::SignalExtractor;
use crate::trace::{LogEntry, Normalizer};

/// One analysis run. Construct with the parsed descriptions, feed entries
/// through [`Analyzer::observe`] (or [`Analyzer::run`]), finalize once.
pub struct Analyzer {
    config: AnalysisConfig,
    ldf: LdfDescription,
    dbc: DbcDatabase,
    normalizer: Normalizer,
    lin_validator: LinValidator,
    schedule: ScheduleAnalyzer,
    extractor: SignalExtractor,
    correlator: GatewayCorrelator,
    bus_load: BusLoadAccumulator,
    report: ReportBuilder,
}

impl Analyzer {
    /// Validates the configuration and every description before any frame
    /// is looked at; structural defects abort with no partial report.
    pub fn new(
        config: AnalysisConfig,
        ldf: LdfDescription,
        dbc: DbcDatabase,
        gateway: GatewayMap,
    ) -> Result<Self, LinspectorError> {
        config.validate()?;
        ldf.validate()?;
        dbc.validate()?;
        gateway.validate(&ldf, &dbc)?;
        let schedule = ScheduleAnalyzer::new(&ldf.schedule, &config);
        let correlator = GatewayCorrelator::new(&gateway, &config);
        let bus_load = BusLoadAccumulator::new(&config);
        Ok(Analyzer {
            config,
            ldf,
            dbc,
            normalizer: Normalizer::new(),
            lin_validator: LinValidator::new(),
            schedule,
            extractor: SignalExtractor::new(),
            correlator,
            bus_load,
            report: ReportBuilder::new(),
        })
    }

    /// Feeds one entry through the pipeline.
    pub fn observe(&mut self, mut entry: LogEntry) {
        if let Some(regression) = self.normalizer.normalize(&mut entry) {
            self.report.record(
                entry.ts(),
                entry.channel(),
                None,
                FindingKind::NonMonotonicTimestamp {
                    previous: regression.previous,
                    observed: regression.observed,
                },
            );
        }

        match entry {
            LogEntry::Lin(frame) => {
                self.report.count_lin_frame();
                let verdict =
                    self.lin_validator
                        .validate(&frame, &self.ldf, &self.config, &mut self.report);
                self.schedule.observe(
                    frame.ts,
                    frame.channel,
                    verdict.unprotected_id,
                    &mut self.report,
                );
                if verdict.extract_signals {
                    if let Some(spec) = self.ldf.frame(verdict.unprotected_id) {
                        let samples =
                            self.extractor.extract_lin(&frame, spec, &mut self.report);
                        for sample in &samples {
                            self.correlator.observe_lin(sample, &mut self.report);
                        }
                    }
                }
            }
            LogEntry::Can(frame) => {
                self.report.count_can_frame();
                let length_ok = can::validator::validate_frame(&frame, &mut self.report);
                self.bus_load.observe(&frame);
                if length_ok {
                    // A partial DBC is normal; unknown identifiers pass silently.
                    if let Some(message) = self.dbc.message(frame.id, frame.id_width) {
                        let samples =
                            self.extractor.extract_can(&frame, message, &mut self.report);
                        for sample in &samples {
                            self.correlator.observe_can(sample, &mut self.report);
                        }
                    }
                }
            }
        }
    }

    /// Flags the run as fed from a truncated stream. Call before
    /// [`Analyzer::finalize`] when the input ended unexpectedly; partial
    /// statistics are still reported.
    pub fn mark_truncated(&mut self) {
        let ts = self.normalizer.last_ts().unwrap_or(0.0);
        self.report.mark_truncated(ts, 0);
    }

    /// Finalizes the report. Aggregate statistics are computed here only.
    pub fn finalize(self) -> AnalysisReport {
        let report = self.report.finalize(
            self.extractor.finalize(),
            self.schedule.finalize(),
            self.correlator.finalize(),
            self.bus_load.finalize(),
        );
        log_info(&format!(
            "analysis finalized: {} LIN frames, {} CAN frames, {} findings",
            report.summary.total_frames_lin,
            report.summary.total_frames_can,
            report.summary.finding_count
        ));
        report
    }

    /// Consumes a whole entry stream and finalizes.
    pub fn run(mut self, entries: impl IntoIterator<Item = LogEntry>) -> AnalysisReport {
        for entry in entries {
            self.observe(entry);
        }
        self.finalize()
    }
}
