//! # Analysis Configuration
//!
//! An explicit immutable configuration value threaded through the analyzer's
//! constructor. There is no process-wide state; two analyzers with different
//! configurations can run concurrently in the same process.

use crate::constants::*;
use crate::error::LinspectorError;
use serde::{Deserialize, Serialize};

/// Tolerances and nominal rates for a single analysis run.
///
/// All fields have defaults; construction through [`AnalysisConfig::default`]
/// followed by field overrides is the expected pattern. The analyzer rejects
/// non-finite or non-positive values at construction with
/// [`LinspectorError::ConfigError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Nominal LIN bit rate in Hz.
    pub bit_rate: f64,
    /// Fractional tolerance on the measured LIN bit rate.
    pub bit_rate_tolerance: f64,
    /// Default gateway correlation window when a rule omits `max_latency_s`.
    pub gateway_time_window: f64,
    /// Allowed drift from the schedule in seconds.
    pub schedule_tolerance: f64,
    /// Allowed inter-arrival jitter in seconds.
    pub max_jitter: f64,
    /// Bus-load estimation window in seconds.
    pub bus_load_window: f64,
    /// Nominal CAN arbitration-phase bit rate in Hz.
    pub can_bit_rate: f64,
    /// Nominal CAN FD data-phase bit rate in Hz, used when BRS is set.
    pub can_data_bit_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            bit_rate: DEFAULT_LIN_BIT_RATE,
            bit_rate_tolerance: DEFAULT_BIT_RATE_TOLERANCE,
            gateway_time_window: DEFAULT_GATEWAY_TIME_WINDOW,
            schedule_tolerance: DEFAULT_SCHEDULE_TOLERANCE,
            max_jitter: DEFAULT_MAX_JITTER,
            bus_load_window: DEFAULT_BUS_LOAD_WINDOW,
            can_bit_rate: DEFAULT_CAN_BIT_RATE,
            can_data_bit_rate: DEFAULT_CAN_DATA_BIT_RATE,
        }
    }
}

impl AnalysisConfig {
    /// Checks every field for finiteness and positivity.
    pub fn validate(&self) -> Result<(), LinspectorError> {
        let fields = [
            ("bit_rate", self.bit_rate),
            ("bit_rate_tolerance", self.bit_rate_tolerance),
            ("gateway_time_window", self.gateway_time_window),
            ("schedule_tolerance", self.schedule_tolerance),
            ("max_jitter", self.max_jitter),
            ("bus_load_window", self.bus_load_window),
            ("can_bit_rate", self.can_bit_rate),
            ("can_data_bit_rate", self.can_data_bit_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(LinspectorError::ConfigError(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}
