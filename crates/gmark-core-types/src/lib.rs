//! Leaf types shared by the gmark crates
//!
//! - **Correlation**: `RequestId`, `TraceId` and the `RequestContext` that the
//!   engine threads through its lifecycle log events
//! - **Schema constants**: canonical structured-logging field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
