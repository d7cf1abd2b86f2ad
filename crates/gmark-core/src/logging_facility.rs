//! Structured logging facility for gmark
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) owned by
//!   the engine boundary; the kernel itself only emits `tracing::debug!`
//! - Test capture mode for deterministic assertions on emitted events
//!
//! ```rust
//! use gmark_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
