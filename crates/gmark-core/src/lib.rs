//! gmark core - granular data markings kernel
//!
//! Maintains the association between marking identifiers and the selectors
//! (paths into an object) they apply to:
//! - Model types: `Selector`, `MarkingRef`, `GranularMarking`, `MarkedObject`
//! - Selector validation against an object's structure
//! - Expanded / compressed normal forms of a marking set
//! - Selector matching with inherited and descendant modes
//! - The marking operations (get, is_marked, add, remove, clear, set)
//!
//! Every operation is a pure function of its inputs: a mutation returns a new
//! snapshot produced by a `Versioner` and leaves the input object untouched.
//!
//! ```rust
//! use gmark_core::ops::{add_markings, get_markings, MatchOptions, SnapshotVersioner};
//! use gmark_core::rules::StructuralValidator;
//! use gmark_core::MarkedObject;
//! use serde_json::json;
//!
//! let obj = MarkedObject::from_value(json!({"description": "text"})).unwrap();
//! let marked = add_markings(&StructuralValidator, &SnapshotVersioner, &obj, "marking-x", "description").unwrap();
//! let refs = get_markings(&StructuralValidator, &marked, "description", MatchOptions::explicit()).unwrap();
//! assert_eq!(refs, vec!["marking-x"]);
//! ```

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod rules;

// Used by the exported logging macros
#[doc(hidden)]
pub use gmark_core_types;
#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MarkingError, Result};
pub use model::{GranularMarking, MarkedObject, MarkingList, MarkingRef, Selector, SelectorList};
pub use ops::{MatchOptions, SnapshotVersioner, TimestampVersioner, Versioner};
pub use rules::{PermissiveValidator, SelectorValidator, StructuralValidator};
