//! LIN cluster description, the analyzer-facing shape of a parsed LDF.

use crate::constants::{LIN_ID_MASTER_REQUEST, LIN_ID_MAX, LIN_ID_SLAVE_RESPONSE, LIN_MAX_PAYLOAD};
use crate::describe::{validate_signal_set, Signal};
use crate::error::LinspectorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Checksum model of a LIN frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecksumKind {
    /// LIN 1.3: sum over the data bytes only.
    Classic,
    /// LIN 2.x: sum over the protected identifier and the data bytes.
    Enhanced,
}

/// One unconditional frame of the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinFrameSpec {
    /// Unprotected frame identifier (0..=63).
    pub frame_id: u8,
    pub name: String,
    /// Declared payload length in bytes (1..=8).
    pub length: u8,
    pub checksum_kind: ChecksumKind,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub subscribers: Vec<String>,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// One slot of the master's schedule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub frame_id: u8,
    /// Repetition period of the slot in seconds.
    pub period_s: f64,
    /// Offset of the slot within the table cycle in seconds.
    #[serde(default)]
    pub delay_s: f64,
}

/// Ordered schedule of the LIN master.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTable {
    pub slots: Vec<ScheduleSlot>,
}

/// The parsed LIN description the analyzer runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdfDescription {
    /// Nominal bit rate of the cluster in Hz.
    pub bit_rate_hz: f64,
    pub frames: Vec<LinFrameSpec>,
    #[serde(default)]
    pub schedule: ScheduleTable,
}

impl LdfDescription {
    /// Looks up a frame by its unprotected identifier.
    pub fn frame(&self, frame_id: u8) -> Option<&LinFrameSpec> {
        self.frames.iter().find(|f| f.frame_id == frame_id)
    }

    /// Checks the structural invariants the analyzer relies on.
    pub fn validate(&self) -> Result<(), LinspectorError> {
        if !self.bit_rate_hz.is_finite() || self.bit_rate_hz <= 0.0 {
            return Err(LinspectorError::MalformedDescription(format!(
                "LDF bit rate must be finite and positive, got {}",
                self.bit_rate_hz
            )));
        }
        let mut seen = BTreeSet::new();
        for frame in &self.frames {
            if frame.frame_id > LIN_ID_MAX {
                return Err(LinspectorError::MalformedDescription(format!(
                    "frame {} has identifier {} above {LIN_ID_MAX}",
                    frame.name, frame.frame_id
                )));
            }
            if !seen.insert(frame.frame_id) {
                return Err(LinspectorError::MalformedDescription(format!(
                    "duplicate frame identifier {}",
                    frame.frame_id
                )));
            }
            if frame.length == 0 || frame.length as usize > LIN_MAX_PAYLOAD {
                return Err(LinspectorError::MalformedDescription(format!(
                    "frame {} declares illegal length {}",
                    frame.name, frame.length
                )));
            }
            validate_signal_set(
                &frame.signals,
                u16::from(frame.length) * 8,
                &format!("LIN frame {}", frame.name),
            )?;
        }
        for slot in &self.schedule.slots {
            if !slot.period_s.is_finite() || slot.period_s <= 0.0 {
                return Err(LinspectorError::MalformedDescription(format!(
                    "schedule slot for frame {} has illegal period {}",
                    slot.frame_id, slot.period_s
                )));
            }
            if !slot.delay_s.is_finite() || slot.delay_s < 0.0 {
                return Err(LinspectorError::MalformedDescription(format!(
                    "schedule slot for frame {} has illegal delay {}",
                    slot.frame_id, slot.delay_s
                )));
            }
            let diagnostic =
                slot.frame_id == LIN_ID_MASTER_REQUEST || slot.frame_id == LIN_ID_SLAVE_RESPONSE;
            if !diagnostic && self.frame(slot.frame_id).is_none() {
                return Err(LinspectorError::MalformedDescription(format!(
                    "schedule references unknown frame identifier {}",
                    slot.frame_id
                )));
            }
        }
        Ok(())
    }
}
