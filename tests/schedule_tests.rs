//! Integration tests for the schedule adherence analyzer.

use linspector::lin::checksum::{checksum_classic, pid_for_id};
use linspector::{
    AnalysisConfig, Analyzer, ChecksumKind, DbcDatabase, Direction, GatewayMap, LdfDescription,
    LinFrame, LinFrameSpec, LogEntry, ScheduleSlot, ScheduleTable,
};

fn cluster(period_s: f64) -> LdfDescription {
    LdfDescription {
        bit_rate_hz: 19_200.0,
        frames: vec![
            frame_spec(0x10, "Cyclic"),
            frame_spec(0x11, "Sporadic"),
        ],
        schedule: ScheduleTable {
            slots: vec![ScheduleSlot {
                frame_id: 0x10,
                period_s,
                delay_s: 0.0,
            }],
        },
    }
}

fn frame_spec(frame_id: u8, name: &str) -> LinFrameSpec {
    LinFrameSpec {
        frame_id,
        name: name.into(),
        length: 1,
        checksum_kind: ChecksumKind::Classic,
        publisher: "node".into(),
        subscribers: Vec::new(),
        signals: Vec::new(),
    }
}

fn arrival(ts: f64, frame_id: u8) -> LogEntry {
    LogEntry::Lin(LinFrame {
        ts,
        channel: 1,
        pid_byte: pid_for_id(frame_id),
        payload: vec![0x00],
        checksum_byte: checksum_classic(&[0x00]),
        direction: Direction::Rx,
        header: None,
    })
}

fn run(ldf: LdfDescription, config: AnalysisConfig, entries: Vec<LogEntry>) -> linspector::AnalysisReport {
    Analyzer::new(config, ldf, DbcDatabase::default(), GatewayMap::default())
        .unwrap()
        .run(entries)
}

#[test]
fn drift_beyond_tolerance_is_flagged_once() {
    // Period 10 ms, default tolerance 500 us. The second arrival is 400 us
    // late (in bounds), the fourth is 600 us late.
    let entries = vec![
        arrival(0.0000, 0x10),
        arrival(0.0104, 0x10),
        arrival(0.0200, 0x10),
        arrival(0.0306, 0x10),
    ];
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    assert_eq!(report.schedule_findings.len(), 1);
    match &report.schedule_findings[0].kind {
        linspector::FindingKind::ScheduleDrift { deviation_s } => {
            assert!((deviation_s - 0.0006).abs() < 1e-9);
        }
        other => panic!("expected ScheduleDrift, got {other:?}"),
    }
}

#[test]
fn deviation_exactly_at_tolerance_is_in_bounds() {
    // Exactly representable numbers: period 1 s, tolerance 0.25 s, arrival
    // a quarter period late sits on the boundary and passes.
    let config = AnalysisConfig {
        schedule_tolerance: 0.25,
        max_jitter: 0.25,
        ..Default::default()
    };
    let entries = vec![arrival(0.0, 0x10), arrival(1.25, 0x10)];
    let report = run(cluster(1.0), config.clone(), entries);
    assert!(report.schedule_findings.is_empty());

    // One step further out is a drift.
    let entries = vec![arrival(0.0, 0x10), arrival(1.25, 0x10), arrival(2.3, 0x10)];
    let report = run(cluster(1.0), config, entries);
    assert_eq!(report.schedule_findings.len(), 1);
    assert_eq!(report.schedule_findings[0].kind.name(), "ScheduleDrift");
}

#[test]
fn silent_gap_reports_missed_slot_and_jitter() {
    let entries = vec![
        arrival(0.0000, 0x10),
        arrival(0.0100, 0x10),
        arrival(0.0303, 0x10),
    ];
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    let mut kinds: Vec<&str> = report
        .schedule_findings
        .iter()
        .map(|f| f.kind.name())
        .collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["JitterExceeded", "MissedSlot"]);
}

#[test]
fn unscheduled_frame_is_unexpected() {
    let entries = vec![arrival(0.0, 0x11)];
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    assert_eq!(report.schedule_findings.len(), 1);
    assert_eq!(report.schedule_findings[0].kind.name(), "UnexpectedFrame");
}

#[test]
fn diagnostic_frames_bypass_schedule_checks() {
    // ID 60 is neither described nor scheduled; it raises UnknownFrameId at
    // the frame level but never UnexpectedFrame.
    let entries = vec![arrival(0.0, 60), arrival(0.1, 61)];
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    assert!(report.schedule_findings.is_empty());
    assert_eq!(report.frame_findings.len(), 2);
}

#[test]
fn long_clean_run_stays_silent() {
    // A single slot repeated 10,000 times on its exact period.
    let entries: Vec<LogEntry> = (0..10_000)
        .map(|i| arrival(i as f64 * 0.01, 0x10))
        .collect();
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    assert!(report.schedule_findings.is_empty());
    assert_eq!(report.summary.total_frames_lin, 10_000);
    let stats = &report.schedule_statistics[&0x10];
    assert_eq!(stats.arrivals, 10_000);
    assert!((stats.mean_period_s - 0.01).abs() < 1e-9);
    assert!(stats.stddev_period_s < 1e-9);
}

#[test]
fn per_frame_statistics_cover_jitter_extremes() {
    let entries = vec![
        arrival(0.000, 0x10),
        arrival(0.010, 0x10),
        arrival(0.0204, 0x10),
        arrival(0.0300, 0x10),
    ];
    let report = run(cluster(0.010), AnalysisConfig::default(), entries);
    let stats = &report.schedule_statistics[&0x10];
    assert_eq!(stats.arrivals, 4);
    // Gaps: 10 ms, 10.4 ms, 9.6 ms -> jitter extremes +-0.4 ms.
    assert!((stats.max_jitter_s - 0.0004).abs() < 1e-9);
    assert!((stats.min_jitter_s + 0.0004).abs() < 1e-9);
}
