//! Rules applied to caller input before any marking data is touched

pub mod validation;

pub use validation::{PermissiveValidator, SelectorValidator, StructuralValidator};
