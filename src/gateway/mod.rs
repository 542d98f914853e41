//! # Gateway Correlation
//!
//! Windowed join between the LIN-side and CAN-side signal streams, checking
//! that a gateway republishing signals between the buses preserved value
//! semantics and stayed within its latency budget.

pub mod correlator;

pub use correlator::GatewayCorrelator;
