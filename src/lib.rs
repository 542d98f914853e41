//! # linspector - Offline LIN/CAN Trace Validation
//!
//! The linspector crate validates captured automotive-bus traces against two
//! declarative network descriptions: a LIN cluster description (LDF) and a
//! CAN database (DBC). It answers three questions: were the frames on the
//! wire well-formed at the protocol level; did the LIN master obey its
//! schedule; and did a gateway republishing signals between the buses
//! preserve signal semantics and timing.
//!
//! ## Features
//!
//! - Per-frame LIN validation: checksum (classic and enhanced), PID parity,
//!   declared length, and physical-layer header timing
//! - CAN 2.0 / CAN FD payload legality and windowed bus-load estimation
//! - Schedule adherence with drift, jitter, and missed-slot detection
//! - Multiplex-aware signal extraction with streaming statistics
//! - Windowed LIN/CAN gateway correlation with latency accounting
//! - A deterministic, JSON-serializable report: identical inputs yield
//!   byte-identical output
//!
//! ## Usage
//!
//! ```rust
//! use linspector::{AnalysisConfig, Analyzer};
//! use linspector::describe::dbc::DbcDatabase;
//! use linspector::describe::gateway::GatewayMap;
//! use linspector::describe::ldf::{LdfDescription, ScheduleTable};
//!
//! let ldf = LdfDescription {
//!     bit_rate_hz: 19_200.0,
//!     frames: Vec::new(),
//!     schedule: ScheduleTable::default(),
//! };
//! let analyzer = Analyzer::new(
//!     AnalysisConfig::default(),
//!     ldf,
//!     DbcDatabase::default(),
//!     GatewayMap::default(),
//! )
//! .expect("valid descriptions");
//! let report = analyzer.run(Vec::new());
//! assert!(!report.has_findings());
//! ```
//!
//! The textual LDF/DBC grammars are out of scope; descriptions enter as
//! already-parsed values (JSON through the CLI). The trace text reader in
//! [`trace::reader`] is the reference implementation of the log grammar.

pub mod analyzer;
pub mod can;
pub mod config;
pub mod constants;
pub mod describe;
pub mod error;
pub mod gateway;
pub mod lin;
pub mod logging;
pub mod report;
pub mod signal;
pub mod trace;

pub use crate::analyzer::Analyzer;
pub use crate::config::AnalysisConfig;
pub use crate::error::LinspectorError;
pub use crate::logging::{init_logger, log_info};

// Core description types
pub use crate::describe::dbc::{CanMessage, DbcDatabase};
pub use crate::describe::gateway::{GatewayMap, MapDirection, MapRule, Transform};
pub use crate::describe::ldf::{ChecksumKind, LdfDescription, LinFrameSpec, ScheduleSlot, ScheduleTable};
pub use crate::describe::{ByteOrder, MuxRole, Signal};

// Trace input
pub use crate::trace::{CanFrame, Direction, IdWidth, LinFrame, LinHeaderTiming, LogEntry, TraceReader};

// Report output
pub use crate::report::{AnalysisReport, Finding, FindingKind};
