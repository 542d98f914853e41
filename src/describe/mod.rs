//! # Network Descriptions
//!
//! Parsed, immutable descriptions of the networks under analysis: the LIN
//! cluster (LDF), the CAN database (DBC), and the gateway mapping between
//! them. The textual grammars live outside the crate; these types are what
//! the external parsers hand over.
//!
//! Every description is validated once at analyzer construction. Structural
//! defects (overlapping signals, dangling references, illegal lengths) are
//! [`LinspectorError::MalformedDescription`] and abort the run before any
//! frame is looked at.

pub mod dbc;
pub mod gateway;
pub mod ldf;

use crate::error::LinspectorError;
use crate::signal::extract::field_bit_positions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Byte order of a signal's bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Little endian; `start_bit` names the LSB of the field.
    Intel,
    /// Big endian, DBC convention; `start_bit` names the MSB of the field.
    Motorola,
}

/// Multiplexing role of a signal within its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MuxRole {
    /// Present in every frame of the message.
    None,
    /// Selects which multiplexed group the rest of the payload carries.
    Multiplexor,
    /// Present only when the multiplexor equals the group id.
    Multiplexed(u64),
}

impl Default for MuxRole {
    fn default() -> Self {
        MuxRole::None
    }
}

/// Layout and scaling of one signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub start_bit: u16,
    pub length_bits: u16,
    pub byte_order: ByteOrder,
    #[serde(default)]
    pub signed: bool,
    pub factor: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub mux_role: MuxRole,
}

/// Validates the signals of one message: field sanity, payload fit,
/// multiplexing consistency, and bit-range overlaps within each group.
pub(crate) fn validate_signal_set(
    signals: &[Signal],
    payload_bits: u16,
    context: &str,
) -> Result<(), LinspectorError> {
    let mut names = BTreeSet::new();
    for signal in signals {
        if signal.name.is_empty() {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal with empty name"
            )));
        }
        if !names.insert(signal.name.as_str()) {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: duplicate signal name {}",
                signal.name
            )));
        }
        if signal.length_bits == 0 || signal.length_bits > 64 {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal {} has illegal length {}",
                signal.name, signal.length_bits
            )));
        }
        if !signal.factor.is_finite() || signal.factor == 0.0 {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal {} has illegal factor {}",
                signal.name, signal.factor
            )));
        }
        if !signal.offset.is_finite() || !signal.min.is_finite() || !signal.max.is_finite() {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal {} has a non-finite offset or range",
                signal.name
            )));
        }
        if signal.min > signal.max {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal {} has min {} above max {}",
                signal.name, signal.min, signal.max
            )));
        }
        let positions = field_bit_positions(signal.start_bit, signal.length_bits, signal.byte_order);
        if positions.iter().any(|&pos| pos >= u32::from(payload_bits)) {
            return Err(LinspectorError::MalformedDescription(format!(
                "{context}: signal {} exceeds the declared payload of {} bits",
                signal.name, payload_bits
            )));
        }
    }

    let multiplexors: Vec<&Signal> = signals
        .iter()
        .filter(|s| s.mux_role == MuxRole::Multiplexor)
        .collect();
    if multiplexors.len() > 1 {
        return Err(LinspectorError::MalformedDescription(format!(
            "{context}: more than one multiplexor signal"
        )));
    }
    let groups: BTreeSet<u64> = signals
        .iter()
        .filter_map(|s| match s.mux_role {
            MuxRole::Multiplexed(group) => Some(group),
            _ => None,
        })
        .collect();
    if !groups.is_empty() && multiplexors.is_empty() {
        return Err(LinspectorError::MalformedDescription(format!(
            "{context}: multiplexed signals without a multiplexor"
        )));
    }

    // Signals of the same group (plus the always-present ones) must not share bits.
    let always: Vec<&Signal> = signals
        .iter()
        .filter(|s| matches!(s.mux_role, MuxRole::None | MuxRole::Multiplexor))
        .collect();
    if groups.is_empty() {
        check_overlap(&always, payload_bits, context)?;
    }
    for group in &groups {
        let mut members = always.clone();
        members.extend(
            signals
                .iter()
                .filter(|s| s.mux_role == MuxRole::Multiplexed(*group)),
        );
        check_overlap(&members, payload_bits, context)?;
    }
    Ok(())
}

fn check_overlap(
    signals: &[&Signal],
    payload_bits: u16,
    context: &str,
) -> Result<(), LinspectorError> {
    let words = (payload_bits as usize + 63) / 64;
    let mut occupied = vec![0u64; words];
    for signal in signals {
        for pos in field_bit_positions(signal.start_bit, signal.length_bits, signal.byte_order) {
            let word = pos as usize / 64;
            let bit = 1u64 << (pos % 64);
            if occupied[word] & bit != 0 {
                return Err(LinspectorError::MalformedDescription(format!(
                    "{context}: signal {} overlaps another signal at bit {pos}",
                    signal.name
                )));
            }
            occupied[word] |= bit;
        }
    }
    Ok(())
}
