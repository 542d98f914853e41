//! Windowed stream join for gateway rules.
//!
//! Each rule keeps a bounded queue of source samples no older than its
//! window. A target sample joins against the closest-in-time source sample;
//! ties prefer the earlier source, modelling gateway propagation delay. The
//! queue bound also bounds memory: nothing outside the window is retained.

use crate::config::AnalysisConfig;
use crate::describe::gateway::{GatewayMap, MapDirection, MapRule};
use crate::report::{FindingKind, ReportBuilder};
use crate::signal::extractor::SignalSample;
use crate::signal::stats::{RunningStats, StatisticsSummary};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug)]
struct RuleState {
    rule: MapRule,
    label: String,
    window_s: f64,
    /// Recent source samples as `(ts, value)`, oldest first.
    queue: VecDeque<(f64, f64)>,
    latency: RunningStats,
}

impl RuleState {
    fn trim(&mut self, now: f64) {
        while let Some(&(ts, _)) = self.queue.front() {
            // Strictly older than the window edge; the edge itself stays.
            if ts < now - self.window_s {
                self.queue.pop_front();
            } else {
                break;
            }
        }
    }

    fn push_source(&mut self, sample: &SignalSample) {
        self.queue.push_back((sample.ts, sample.value));
        self.trim(sample.ts);
    }

    fn join_target(&mut self, sample: &SignalSample, report: &mut ReportBuilder) {
        self.trim(sample.ts);
        let mut best: Option<(f64, f64)> = None;
        let mut best_distance = f64::INFINITY;
        for &(ts, value) in &self.queue {
            let distance = (sample.ts - ts).abs();
            // Strict improvement only, so the earlier sample wins ties.
            if distance < best_distance {
                best_distance = distance;
                best = Some((ts, value));
            }
        }
        let (source_ts, source_value) = match best {
            Some(found) => found,
            None => {
                report.record(
                    sample.ts,
                    sample.channel,
                    None,
                    FindingKind::NoLinSourceInWindow {
                        rule: self.label.clone(),
                    },
                );
                return;
            }
        };

        let latency = sample.ts - source_ts;
        self.latency.push(latency);

        let expected = match self.rule.transform.apply(source_value) {
            Some(expected) => expected,
            None => {
                // No mapping for the source value; report it untransformed.
                report.record(
                    sample.ts,
                    sample.channel,
                    None,
                    FindingKind::GatewayValueMismatch {
                        rule: self.label.clone(),
                        expected: source_value,
                        observed: sample.value,
                        latency_s: latency,
                    },
                );
                return;
            }
        };
        let tolerance = self
            .rule
            .tolerance
            .unwrap_or_else(|| (1e-3 * expected.abs()).max(1e-6));
        if (expected - sample.value).abs() > tolerance {
            report.record(
                sample.ts,
                sample.channel,
                None,
                FindingKind::GatewayValueMismatch {
                    rule: self.label.clone(),
                    expected,
                    observed: sample.value,
                    latency_s: latency,
                },
            );
        }
    }
}

/// Correlates the two signal streams under every gateway rule.
#[derive(Debug)]
pub struct GatewayCorrelator {
    rules: Vec<RuleState>,
}

impl GatewayCorrelator {
    pub fn new(map: &GatewayMap, config: &AnalysisConfig) -> Self {
        let rules = map
            .rules
            .iter()
            .map(|rule| RuleState {
                label: rule.label(),
                window_s: rule.max_latency_s.unwrap_or(config.gateway_time_window),
                rule: rule.clone(),
                queue: VecDeque::new(),
                latency: RunningStats::new(),
            })
            .collect();
        GatewayCorrelator { rules }
    }

    /// Feeds one LIN-side sample to every rule that involves it.
    pub fn observe_lin(&mut self, sample: &SignalSample, report: &mut ReportBuilder) {
        for state in &mut self.rules {
            if sample.name != state.rule.lin_signal {
                continue;
            }
            match state.rule.direction {
                MapDirection::LinToCan => state.push_source(sample),
                MapDirection::CanToLin => state.join_target(sample, report),
            }
        }
    }

    /// Feeds one CAN-side sample to every rule that involves it.
    pub fn observe_can(&mut self, sample: &SignalSample, report: &mut ReportBuilder) {
        for state in &mut self.rules {
            if sample.name != state.rule.can_signal {
                continue;
            }
            match state.rule.direction {
                MapDirection::LinToCan => state.join_target(sample, report),
                MapDirection::CanToLin => state.push_source(sample),
            }
        }
    }

    /// Consumes the correlator into the per-rule latency statistics.
    pub fn finalize(self) -> BTreeMap<String, StatisticsSummary> {
        self.rules
            .into_iter()
            .map(|state| (state.label, state.latency.summary()))
            .collect()
    }
}
