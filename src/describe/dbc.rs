//! CAN database description, the analyzer-facing shape of a parsed DBC.

use crate::can::validator::is_legal_payload_len;
use crate::describe::{validate_signal_set, Signal};
use crate::error::LinspectorError;
use crate::trace::IdWidth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One message of the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanMessage {
    pub id: u32,
    pub id_width: IdWidth,
    pub name: String,
    /// Declared payload length in bytes.
    pub length: u8,
    #[serde(default)]
    pub is_fd: bool,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// The parsed CAN database the analyzer runs against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DbcDatabase {
    pub messages: Vec<CanMessage>,
}

impl DbcDatabase {
    /// Looks up a message by identifier and identifier width.
    pub fn message(&self, id: u32, id_width: IdWidth) -> Option<&CanMessage> {
        self.messages
            .iter()
            .find(|m| m.id == id && m.id_width == id_width)
    }

    /// Checks the structural invariants the analyzer relies on.
    pub fn validate(&self) -> Result<(), LinspectorError> {
        let mut seen = BTreeSet::new();
        for message in &self.messages {
            let id_max = match message.id_width {
                IdWidth::Standard11 => 0x7FF,
                IdWidth::Extended29 => 0x1FFF_FFFF,
            };
            if message.id > id_max {
                return Err(LinspectorError::MalformedDescription(format!(
                    "message {} has identifier 0x{:X} above the {:?} range",
                    message.name, message.id, message.id_width
                )));
            }
            if !seen.insert((message.id, message.id_width)) {
                return Err(LinspectorError::MalformedDescription(format!(
                    "duplicate message identifier 0x{:X}",
                    message.id
                )));
            }
            if !is_legal_payload_len(message.is_fd, message.length as usize) {
                return Err(LinspectorError::MalformedDescription(format!(
                    "message {} declares illegal length {} (fd={})",
                    message.name, message.length, message.is_fd
                )));
            }
            validate_signal_set(
                &message.signals,
                u16::from(message.length) * 8,
                &format!("CAN message {}", message.name),
            )?;
        }
        Ok(())
    }
}
