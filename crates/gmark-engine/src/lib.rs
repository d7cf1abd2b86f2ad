//! gmark engine - boundary layer over the marking kernel
//!
//! `MarkingEngine` binds one selector validator and one versioner and exposes
//! the six marking operations.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for every operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The kernel below it only emits `tracing::debug!` details.

pub mod engine;

pub use engine::MarkingEngine;
