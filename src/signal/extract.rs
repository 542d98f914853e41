//! # Bit-Field Extraction
//!
//! Raw field extraction from payloads at arbitrary bit offsets in either
//! byte order, plus the inverse (encoding). Bits are numbered LSB=0 within
//! each byte (the DBC sawtooth). Intel fields occupy consecutive positions
//! upward from `start_bit`; Motorola fields name their MSB with `start_bit`
//! and walk downward within a byte, crossing to the next byte's bit 7 on
//! underflow.
//!
//! Extraction is total: a field that leaves the payload yields `None`,
//! never a panic.

use crate::describe::{ByteOrder, Signal};

/// Absolute bit positions of a field, most significant first. Positions are
/// widened to u32 so pathological offsets cannot wrap.
pub(crate) fn field_bit_positions(start_bit: u16, length: u16, byte_order: ByteOrder) -> Vec<u32> {
    let mut positions = Vec::with_capacity(length as usize);
    match byte_order {
        ByteOrder::Intel => {
            for i in (0..u32::from(length)).rev() {
                positions.push(u32::from(start_bit) + i);
            }
        }
        ByteOrder::Motorola => {
            let mut bit = u32::from(start_bit);
            for _ in 0..length {
                positions.push(bit);
                bit = if bit % 8 == 0 { bit + 15 } else { bit - 1 };
            }
        }
    }
    positions
}

/// Extracts the raw unsigned field value, or `None` when any bit of the
/// field lies outside the payload.
pub fn extract_raw(
    payload: &[u8],
    start_bit: u16,
    length: u16,
    byte_order: ByteOrder,
) -> Option<u64> {
    if length == 0 || length > 64 {
        return None;
    }
    let payload_bits = payload.len() * 8;
    let mut raw: u64 = 0;
    for pos in field_bit_positions(start_bit, length, byte_order) {
        if pos as usize >= payload_bits {
            return None;
        }
        let bit = (payload[pos as usize / 8] >> (pos % 8)) & 1;
        raw = (raw << 1) | u64::from(bit);
    }
    Some(raw)
}

/// Writes a raw field value into a payload; the inverse of [`extract_raw`].
pub fn insert_raw(
    payload: &mut [u8],
    start_bit: u16,
    length: u16,
    byte_order: ByteOrder,
    raw: u64,
) -> Option<()> {
    if length == 0 || length > 64 {
        return None;
    }
    let payload_bits = payload.len() * 8;
    let positions = field_bit_positions(start_bit, length, byte_order);
    if positions.iter().any(|&pos| pos as usize >= payload_bits) {
        return None;
    }
    for (i, pos) in positions.iter().enumerate() {
        let bit = (raw >> (length as usize - 1 - i)) & 1;
        let byte = &mut payload[*pos as usize / 8];
        if bit != 0 {
            *byte |= 1 << (pos % 8);
        } else {
            *byte &= !(1 << (pos % 8));
        }
    }
    Some(())
}

/// Two's-complement interpretation of a raw field value of `length` bits.
pub fn sign_extend(raw: u64, length: u16) -> i64 {
    if length == 0 || length >= 64 {
        return raw as i64;
    }
    let sign = 1u64 << (length - 1);
    if raw & sign != 0 {
        (raw | !((1u64 << length) - 1)) as i64
    } else {
        raw as i64
    }
}

/// Physical value of a signal within a payload: `raw * factor + offset`.
/// `None` when the field leaves the payload. No clamping to min/max.
pub fn extract_physical(payload: &[u8], signal: &Signal) -> Option<f64> {
    let raw = extract_raw(payload, signal.start_bit, signal.length_bits, signal.byte_order)?;
    let base = if signal.signed {
        sign_extend(raw, signal.length_bits) as f64
    } else {
        raw as f64
    };
    Some(base * signal.factor + signal.offset)
}

/// Encodes a physical value into a payload, rounding to the nearest raw
/// step; the inverse of [`extract_physical`].
pub fn encode_physical(payload: &mut [u8], signal: &Signal, value: f64) -> Option<()> {
    let raw_steps = ((value - signal.offset) / signal.factor).round();
    let mask = if signal.length_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << signal.length_bits) - 1
    };
    let raw = if signal.signed {
        (raw_steps as i64 as u64) & mask
    } else {
        (raw_steps as u64) & mask
    };
    insert_raw(
        payload,
        signal.start_bit,
        signal.length_bits,
        signal.byte_order,
        raw,
    )
}
