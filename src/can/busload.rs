//! # Bus-Load Estimation
//!
//! Sliding-window bus-load accounting per CAN channel. The on-wire length of
//! a frame is estimated with worst-case bit stuffing: the stuff-susceptible
//! region grows by one bit per four (`ceil(bits * 5/4)`), the fixed tail
//! (delimiters, ACK, EOF, inter-frame space) does not stuff. Under BRS the
//! arbitration and data phases run at different bit rates, so the window
//! accumulates seconds-on-wire per phase rather than a single bit count.

use crate::config::AnalysisConfig;
use crate::constants::*;
use crate::trace::{CanFrame, IdWidth};
use serde::Serialize;
use std::collections::BTreeMap;

/// One point of the bus-load series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusLoadSample {
    pub channel: u8,
    pub window_start: f64,
    pub load_ratio: f64,
}

/// Worst-case stuffed wire bits of a frame, split into
/// `(arbitration-phase bits, data-phase bits)`. The data-phase count is zero
/// unless the frame switches bit rate.
pub fn wire_bits(frame: &CanFrame) -> (usize, usize) {
    let len = frame.payload.len();
    if frame.is_fd {
        let arbitration = match frame.id_width {
            IdWidth::Standard11 => CANFD_ARBITRATION_11,
            IdWidth::Extended29 => CANFD_ARBITRATION_29,
        };
        let crc = if len <= 16 {
            CANFD_CRC_SHORT
        } else {
            CANFD_CRC_LONG
        };
        let data_raw = CANFD_DATA_PHASE_HEADER + 8 * len + CANFD_STUFF_COUNT_BITS + crc;
        let arbitration_stuffed = stuffed(arbitration) + CANFD_FIXED_TAIL;
        let data_stuffed = stuffed(data_raw);
        if frame.brs {
            (arbitration_stuffed, data_stuffed)
        } else {
            (arbitration_stuffed + data_stuffed, 0)
        }
    } else {
        let base = match frame.id_width {
            IdWidth::Standard11 => CAN_STUFFABLE_BASE_11,
            IdWidth::Extended29 => CAN_STUFFABLE_BASE_29,
        };
        (stuffed(base + 8 * len) + CAN_FIXED_TAIL, 0)
    }
}

/// `ceil(bits * 5 / 4)`.
fn stuffed(bits: usize) -> usize {
    (bits * 5 + 3) / 4
}

#[derive(Debug)]
struct ChannelBuckets {
    origin: f64,
    /// Seconds of bus time per quarter-window bucket.
    busy_s: Vec<f64>,
}

/// Streaming bus-load accumulator over quarter-window buckets.
#[derive(Debug)]
pub struct BusLoadAccumulator {
    window_s: f64,
    step_s: f64,
    bit_rate: f64,
    data_bit_rate: f64,
    channels: BTreeMap<u8, ChannelBuckets>,
}

impl BusLoadAccumulator {
    pub fn new(config: &AnalysisConfig) -> Self {
        BusLoadAccumulator {
            window_s: config.bus_load_window,
            step_s: config.bus_load_window / 4.0,
            bit_rate: config.can_bit_rate,
            data_bit_rate: config.can_data_bit_rate,
            channels: BTreeMap::new(),
        }
    }

    /// Adds one frame's estimated bus time to its channel.
    pub fn observe(&mut self, frame: &CanFrame) {
        let (arbitration_bits, data_bits) = wire_bits(frame);
        let busy =
            arbitration_bits as f64 / self.bit_rate + data_bits as f64 / self.data_bit_rate;
        let channel = self
            .channels
            .entry(frame.channel)
            .or_insert_with(|| ChannelBuckets {
                origin: frame.ts,
                busy_s: Vec::new(),
            });
        let offset = (frame.ts - channel.origin).max(0.0);
        let bucket = (offset / self.step_s).floor() as usize;
        if bucket >= channel.busy_s.len() {
            channel.busy_s.resize(bucket + 1, 0.0);
        }
        channel.busy_s[bucket] += busy;
    }

    /// Produces the `(window_start, load_ratio)` series, windows stepped by a
    /// quarter window so overlapping windows share frames.
    pub fn finalize(self) -> Vec<BusLoadSample> {
        let mut series = Vec::new();
        for (channel, buckets) in self.channels {
            let n = buckets.busy_s.len();
            for k in 0..n {
                let end = (k + 4).min(n);
                let busy: f64 = buckets.busy_s[k..end].iter().sum();
                series.push(BusLoadSample {
                    channel,
                    window_start: buckets.origin + k as f64 * self.step_s,
                    load_ratio: busy / self.window_s,
                });
            }
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Direction;

    fn classic_frame(ts: f64, len: usize) -> CanFrame {
        CanFrame {
            ts,
            channel: 1,
            id: 0x1A0,
            id_width: IdWidth::Standard11,
            is_fd: false,
            brs: false,
            payload: vec![0u8; len],
            direction: Direction::Rx,
        }
    }

    #[test]
    fn classic_frame_wire_bits() {
        // 34 + 64 stuffable bits -> ceil(98 * 5/4) = 123, plus the 13-bit tail.
        let (arbitration, data) = wire_bits(&classic_frame(0.0, 8));
        assert_eq!(arbitration, 136);
        assert_eq!(data, 0);
    }

    #[test]
    fn extended_id_costs_more() {
        let mut frame = classic_frame(0.0, 8);
        frame.id_width = IdWidth::Extended29;
        let (arbitration, _) = wire_bits(&frame);
        assert!(arbitration > 136);
    }

    #[test]
    fn brs_splits_phases() {
        let frame = CanFrame {
            is_fd: true,
            brs: true,
            payload: vec![0u8; 64],
            ..classic_frame(0.0, 0)
        };
        let (arbitration, data) = wire_bits(&frame);
        assert!(arbitration > 0);
        assert!(data > 8 * 64);

        let mut slow = frame.clone();
        slow.brs = false;
        let (all_nominal, none) = wire_bits(&slow);
        assert_eq!(none, 0);
        assert_eq!(all_nominal, arbitration + data);
    }

    #[test]
    fn single_frame_load() {
        let config = AnalysisConfig::default();
        let mut accumulator = BusLoadAccumulator::new(&config);
        accumulator.observe(&classic_frame(0.0, 8));
        let series = accumulator.finalize();
        assert_eq!(series.len(), 1);
        let sample = &series[0];
        assert_eq!(sample.channel, 1);
        assert_eq!(sample.window_start, 0.0);
        // 136 bits at 500 kbit/s inside a 100 ms window.
        let expected = (136.0 / 500_000.0) / 0.1;
        assert!((sample.load_ratio - expected).abs() < 1e-12);
    }

    #[test]
    fn overlapping_windows_share_frames() {
        let config = AnalysisConfig::default();
        let mut accumulator = BusLoadAccumulator::new(&config);
        // Two frames a quarter window apart: the first window sees both.
        accumulator.observe(&classic_frame(0.0, 8));
        accumulator.observe(&classic_frame(0.025, 8));
        let series = accumulator.finalize();
        assert_eq!(series.len(), 2);
        let per_frame = (136.0 / 500_000.0) / 0.1;
        assert!((series[0].load_ratio - 2.0 * per_frame).abs() < 1e-12);
        assert!((series[1].load_ratio - per_frame).abs() < 1e-12);
    }
}
