//! End-to-end scenarios: textual trace through the reader into the analyzer,
//! mirroring how the CLI drives the crate.

use linspector::{
    AnalysisConfig, Analyzer, ByteOrder, CanMessage, ChecksumKind, DbcDatabase, GatewayMap,
    IdWidth, LdfDescription, LinFrameSpec, MapDirection, MapRule, MuxRole, ScheduleSlot,
    ScheduleTable, Signal, TraceReader, Transform,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn speed_signal(name: &str) -> Signal {
    Signal {
        name: name.into(),
        start_bit: 0,
        length_bits: 16,
        byte_order: ByteOrder::Intel,
        signed: false,
        factor: 0.5,
        offset: 0.0,
        min: 0.0,
        max: 500.0,
        unit: "km/h".into(),
        mux_role: MuxRole::None,
    }
}

fn descriptions() -> (LdfDescription, DbcDatabase, GatewayMap) {
    let ldf = LdfDescription {
        bit_rate_hz: 19_200.0,
        frames: vec![LinFrameSpec {
            frame_id: 0x10,
            name: "MotorStatus".into(),
            length: 2,
            checksum_kind: ChecksumKind::Enhanced,
            publisher: "motor".into(),
            subscribers: vec!["gateway".into()],
            signals: vec![speed_signal("speed")],
        }],
        schedule: ScheduleTable {
            slots: vec![ScheduleSlot {
                frame_id: 0x10,
                period_s: 0.010,
                delay_s: 0.0,
            }],
        },
    };
    let dbc = DbcDatabase {
        messages: vec![CanMessage {
            id: 0x1A0,
            id_width: IdWidth::Standard11,
            name: "VehicleSpeed".into(),
            length: 2,
            is_fd: false,
            signals: vec![speed_signal("veh_speed")],
        }],
    };
    let gateway = GatewayMap {
        rules: vec![MapRule {
            direction: MapDirection::LinToCan,
            lin_frame_id: 0x10,
            lin_signal: "speed".into(),
            can_id: 0x1A0,
            can_id_width: IdWidth::Standard11,
            can_signal: "veh_speed".into(),
            transform: Transform::Identity,
            max_latency_s: None,
            tolerance: None,
        }],
    };
    (ldf, dbc, gateway)
}

fn analyze_text(text: &str) -> Result<linspector::AnalysisReport, linspector::LinspectorError> {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    let (ldf, dbc, gateway) = descriptions();
    let mut analyzer = Analyzer::new(AnalysisConfig::default(), ldf, dbc, gateway)?;
    for entry in TraceReader::open(file.path())? {
        analyzer.observe(entry?);
    }
    Ok(analyzer.finalize())
}

#[test]
fn clean_trace_round_trip() {
    // LIN 0x10 (PID 0x50) speed=60.0 -> raw 120 -> payload 78 00,
    // enhanced checksum over 50 78 00 = !(0xC8) = 0x37.
    // Matching CAN frame 4 ms later.
    let text = "\
# motor speed republished by the gateway
0.000 Rx 1 0x50 2 78 00 37
0.004 2 0x1A0 Rx d 2 78 00
0.010 Rx 1 0x50 2 78 00 37
0.014 2 0x1A0 Rx d 2 78 00
";
    let report = analyze_text(text).unwrap();
    assert_eq!(report.summary.finding_count, 0);
    assert_eq!(report.summary.total_frames_lin, 2);
    assert_eq!(report.summary.total_frames_can, 2);
    assert_eq!(report.signal_statistics["speed"].mean, 60.0);
    assert_eq!(report.signal_statistics["veh_speed"].mean, 60.0);
    assert_eq!(report.gateway_latency["speed->veh_speed"].samples, 2);
}

#[test]
fn defective_trace_is_fully_attributed() {
    let text = "\
0.000 Rx 1 0x50 2 78 00 37
0.004 2 0x1A0 Rx d 2 7C 00
0.010 Rx 1 0x50 2 78 00 36
0.020 1 0x1B0 Rx f 9 00 11 22 33 44 55 66 77 88
";
    let report = analyze_text(text).unwrap();
    // 62.0 against the expected 60.0 on the gateway, one bad LIN checksum,
    // one illegal FD length.
    assert_eq!(report.summary.error_count_by_kind["GatewayValueMismatch"], 1);
    assert_eq!(report.summary.error_count_by_kind["ChecksumError"], 1);
    assert_eq!(report.summary.error_count_by_kind["IllegalDlc"], 1);
    assert!(report.has_findings());
}

#[test]
fn malformed_line_surfaces_as_input_error() {
    let result = analyze_text("0.000 Rx 1 0x50 2 78 00 37\nnot a frame\n");
    match result {
        Err(linspector::LinspectorError::InputError(message)) => {
            assert!(message.contains("line 2"), "got: {message}");
        }
        other => panic!("expected InputError, got {other:?}"),
    }
}

#[test]
fn report_json_is_deterministic_end_to_end() {
    let text = "\
0.000 Rx 1 0x50 2 78 00 37
0.004 2 0x1A0 Rx d 2 78 00
";
    let first = analyze_text(text).unwrap().to_json().unwrap();
    let second = analyze_text(text).unwrap().to_json().unwrap();
    assert_eq!(first, second);
    // The serialized report names its sections.
    assert!(first.contains("\"frame_findings\""));
    assert!(first.contains("\"bus_load_series\""));
    assert!(first.contains("\"signal_statistics\""));
}
