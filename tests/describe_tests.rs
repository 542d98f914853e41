//! Structural validation of the LDF/DBC/gateway descriptions: defects are
//! hard errors before any frame is analyzed.

use linspector::{
    AnalysisConfig, Analyzer, ByteOrder, CanMessage, ChecksumKind, DbcDatabase, GatewayMap,
    IdWidth, LdfDescription, LinFrameSpec, LinspectorError, MapDirection, MapRule, MuxRole,
    ScheduleSlot, ScheduleTable, Signal, Transform,
};

fn signal(name: &str, start_bit: u16, length_bits: u16, mux_role: MuxRole) -> Signal {
    Signal {
        name: name.into(),
        start_bit,
        length_bits,
        byte_order: ByteOrder::Intel,
        signed: false,
        factor: 1.0,
        offset: 0.0,
        min: 0.0,
        max: 255.0,
        unit: String::new(),
        mux_role,
    }
}

fn frame(frame_id: u8, length: u8, signals: Vec<Signal>) -> LinFrameSpec {
    LinFrameSpec {
        frame_id,
        name: format!("Frame{frame_id:02X}"),
        length,
        checksum_kind: ChecksumKind::Enhanced,
        publisher: "node".into(),
        subscribers: Vec::new(),
        signals,
    }
}

fn ldf_with(frames: Vec<LinFrameSpec>) -> LdfDescription {
    LdfDescription {
        bit_rate_hz: 19_200.0,
        frames,
        schedule: ScheduleTable::default(),
    }
}

fn expect_malformed(result: Result<(), LinspectorError>) {
    match result {
        Err(LinspectorError::MalformedDescription(_)) => {}
        other => panic!("expected MalformedDescription, got {other:?}"),
    }
}

#[test]
fn overlapping_signals_are_rejected() {
    let ldf = ldf_with(vec![frame(
        0x01,
        2,
        vec![
            signal("a", 0, 12, MuxRole::None),
            signal("b", 8, 8, MuxRole::None),
        ],
    )]);
    expect_malformed(ldf.validate());
}

#[test]
fn overlap_across_mux_groups_is_fine() {
    let ldf = ldf_with(vec![frame(
        0x01,
        2,
        vec![
            signal("selector", 0, 2, MuxRole::Multiplexor),
            signal("a", 8, 8, MuxRole::Multiplexed(0)),
            signal("b", 8, 8, MuxRole::Multiplexed(1)),
        ],
    )]);
    assert!(ldf.validate().is_ok());
}

#[test]
fn signal_exceeding_the_declared_payload_is_rejected() {
    let ldf = ldf_with(vec![frame(0x01, 1, vec![signal("wide", 0, 16, MuxRole::None)])]);
    expect_malformed(ldf.validate());
}

#[test]
fn two_multiplexors_are_rejected() {
    let ldf = ldf_with(vec![frame(
        0x01,
        2,
        vec![
            signal("m1", 0, 2, MuxRole::Multiplexor),
            signal("m2", 2, 2, MuxRole::Multiplexor),
        ],
    )]);
    expect_malformed(ldf.validate());
}

#[test]
fn multiplexed_without_multiplexor_is_rejected() {
    let ldf = ldf_with(vec![frame(
        0x01,
        2,
        vec![signal("orphan", 0, 8, MuxRole::Multiplexed(1))],
    )]);
    expect_malformed(ldf.validate());
}

#[test]
fn frame_identifier_range_is_enforced() {
    let ldf = ldf_with(vec![frame(64, 1, Vec::new())]);
    expect_malformed(ldf.validate());
}

#[test]
fn duplicate_frame_identifiers_are_rejected() {
    let ldf = ldf_with(vec![frame(5, 1, Vec::new()), frame(5, 2, Vec::new())]);
    expect_malformed(ldf.validate());
}

#[test]
fn schedule_must_reference_known_frames() {
    let mut ldf = ldf_with(vec![frame(5, 1, Vec::new())]);
    ldf.schedule = ScheduleTable {
        slots: vec![ScheduleSlot {
            frame_id: 6,
            period_s: 0.01,
            delay_s: 0.0,
        }],
    };
    expect_malformed(ldf.validate());

    // Diagnostic identifiers are schedulable without a frame entry.
    ldf.schedule.slots[0].frame_id = 60;
    assert!(ldf.validate().is_ok());
}

#[test]
fn schedule_periods_must_be_positive() {
    let mut ldf = ldf_with(vec![frame(5, 1, Vec::new())]);
    ldf.schedule = ScheduleTable {
        slots: vec![ScheduleSlot {
            frame_id: 5,
            period_s: 0.0,
            delay_s: 0.0,
        }],
    };
    expect_malformed(ldf.validate());
}

#[test]
fn dbc_identifier_must_fit_its_width() {
    let dbc = DbcDatabase {
        messages: vec![CanMessage {
            id: 0x800,
            id_width: IdWidth::Standard11,
            name: "TooWide".into(),
            length: 8,
            is_fd: false,
            signals: Vec::new(),
        }],
    };
    expect_malformed(dbc.validate());
}

#[test]
fn dbc_length_must_be_legal_for_kind() {
    let dbc = DbcDatabase {
        messages: vec![CanMessage {
            id: 0x100,
            id_width: IdWidth::Standard11,
            name: "OddFd".into(),
            length: 9,
            is_fd: true,
            signals: Vec::new(),
        }],
    };
    expect_malformed(dbc.validate());
}

#[test]
fn gateway_rules_must_resolve() {
    let ldf = ldf_with(vec![frame(0x10, 2, vec![signal("speed", 0, 16, MuxRole::None)])]);
    let dbc = DbcDatabase {
        messages: vec![CanMessage {
            id: 0x1A0,
            id_width: IdWidth::Standard11,
            name: "VehicleSpeed".into(),
            length: 2,
            is_fd: false,
            signals: vec![signal("veh_speed", 0, 16, MuxRole::None)],
        }],
    };
    let mut map = GatewayMap {
        rules: vec![MapRule {
            direction: MapDirection::LinToCan,
            lin_frame_id: 0x10,
            lin_signal: "speed".into(),
            can_id: 0x1A0,
            can_id_width: IdWidth::Standard11,
            can_signal: "veh_speed".into(),
            transform: Transform::Identity,
            max_latency_s: Some(0.02),
            tolerance: None,
        }],
    };
    assert!(map.validate(&ldf, &dbc).is_ok());

    map.rules[0].can_signal = "missing".into();
    expect_malformed(map.validate(&ldf, &dbc));
}

#[test]
fn analyzer_construction_rejects_bad_config() {
    let result = Analyzer::new(
        AnalysisConfig {
            max_jitter: f64::INFINITY,
            ..Default::default()
        },
        ldf_with(Vec::new()),
        DbcDatabase::default(),
        GatewayMap::default(),
    );
    match result {
        Err(LinspectorError::ConfigError(_)) => {}
        other => panic!("expected ConfigError, got {:?}", other.err()),
    }
}
