//! Selector matching policy
//!
//! The one place that decides whether a query selector picks up a marking
//! stored on another selector. Both prefix tests are raw character prefixes:
//! `desc` counts as an ancestor of `description`.

use crate::model::Selector;

/// Relationship modes applied on top of exact matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOptions {
    /// Query picks up markings declared on an ancestor (shorter) selector
    pub inherited: bool,
    /// Query picks up markings declared on a descendant (longer) selector
    pub descendants: bool,
}

impl MatchOptions {
    /// Exact matches only
    pub fn explicit() -> Self {
        Self::default()
    }

    pub fn with_inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }

    pub fn with_descendants(mut self, descendants: bool) -> Self {
        self.descendants = descendants;
        self
    }

    pub fn matches(&self, query: &Selector, stored: &Selector) -> bool {
        matches(query, stored, self.inherited, self.descendants)
    }
}

/// Does `query` pick up a marking stored on `stored`?
pub fn matches(query: &Selector, stored: &Selector, inherited: bool, descendants: bool) -> bool {
    query == stored
        || (inherited && query.starts_with(stored))
        || (descendants && stored.starts_with(query))
}
