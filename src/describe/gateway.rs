//! Gateway mapping between LIN signals and CAN signals.

use crate::describe::dbc::DbcDatabase;
use crate::describe::ldf::LdfDescription;
use crate::error::LinspectorError;
use crate::trace::IdWidth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which bus publishes and which republishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapDirection {
    LinToCan,
    CanToLin,
}

/// Value transformation the gateway applies when republishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transform {
    Identity,
    /// `a * value + b`.
    Linear { a: f64, b: f64 },
    /// Discrete remapping keyed by the source value rounded to an integer.
    Enum(BTreeMap<i64, f64>),
}

impl Transform {
    /// Expected target value for a source value, or None when an `Enum`
    /// table has no entry for it.
    pub fn apply(&self, value: f64) -> Option<f64> {
        match self {
            Transform::Identity => Some(value),
            Transform::Linear { a, b } => Some(a * value + b),
            Transform::Enum(table) => table.get(&(value.round() as i64)).copied(),
        }
    }
}

/// One signal mapping the gateway is expected to honor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapRule {
    pub direction: MapDirection,
    pub lin_frame_id: u8,
    pub lin_signal: String,
    pub can_id: u32,
    pub can_id_width: IdWidth,
    pub can_signal: String,
    pub transform: Transform,
    /// Correlation window; the configured default applies when absent.
    #[serde(default)]
    pub max_latency_s: Option<f64>,
    /// Value-equivalence tolerance; `max(1e-6, 1e-3 * |expected|)` when absent.
    #[serde(default)]
    pub tolerance: Option<f64>,
}

impl MapRule {
    /// Stable source→target label used in findings and statistics.
    pub fn label(&self) -> String {
        match self.direction {
            MapDirection::LinToCan => format!("{}->{}", self.lin_signal, self.can_signal),
            MapDirection::CanToLin => format!("{}->{}", self.can_signal, self.lin_signal),
        }
    }
}

/// Ordered list of gateway rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayMap {
    pub rules: Vec<MapRule>,
}

impl GatewayMap {
    /// Checks that every rule resolves against the descriptions it joins.
    pub fn validate(
        &self,
        ldf: &LdfDescription,
        dbc: &DbcDatabase,
    ) -> Result<(), LinspectorError> {
        for rule in &self.rules {
            let frame = ldf.frame(rule.lin_frame_id).ok_or_else(|| {
                LinspectorError::MalformedDescription(format!(
                    "gateway rule {} references unknown LIN frame {}",
                    rule.label(),
                    rule.lin_frame_id
                ))
            })?;
            if !frame.signals.iter().any(|s| s.name == rule.lin_signal) {
                return Err(LinspectorError::MalformedDescription(format!(
                    "gateway rule {} references unknown LIN signal {}",
                    rule.label(),
                    rule.lin_signal
                )));
            }
            let message = dbc.message(rule.can_id, rule.can_id_width).ok_or_else(|| {
                LinspectorError::MalformedDescription(format!(
                    "gateway rule {} references unknown CAN message 0x{:X}",
                    rule.label(),
                    rule.can_id
                ))
            })?;
            if !message.signals.iter().any(|s| s.name == rule.can_signal) {
                return Err(LinspectorError::MalformedDescription(format!(
                    "gateway rule {} references unknown CAN signal {}",
                    rule.label(),
                    rule.can_signal
                )));
            }
            if let Some(latency) = rule.max_latency_s {
                if !latency.is_finite() || latency <= 0.0 {
                    return Err(LinspectorError::MalformedDescription(format!(
                        "gateway rule {} has illegal max latency {latency}",
                        rule.label()
                    )));
                }
            }
            if let Some(tolerance) = rule.tolerance {
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err(LinspectorError::MalformedDescription(format!(
                        "gateway rule {} has illegal tolerance {tolerance}",
                        rule.label()
                    )));
                }
            }
            if let Transform::Enum(table) = &rule.transform {
                if table.is_empty() {
                    return Err(LinspectorError::MalformedDescription(format!(
                        "gateway rule {} has an empty enum table",
                        rule.label()
                    )));
                }
            }
        }
        Ok(())
    }
}
