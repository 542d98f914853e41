//! # Analysis Report
//!
//! Findings as recoverable data, the incremental report builder, and the
//! finalized deterministic report structure.

pub mod builder;
pub mod finding;

pub use builder::{AnalysisReport, ReportBuilder, ReportSummary};
pub use finding::{Finding, FindingKind};
