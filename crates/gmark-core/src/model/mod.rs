pub mod marking;
pub mod object;
pub mod selector;

pub use marking::{normalize_markings, GranularMarking, MarkingList, MarkingRef};
pub use object::{MarkedObject, GRANULAR_MARKINGS_FIELD};
pub use selector::{normalize_selectors, Selector, SelectorList};
