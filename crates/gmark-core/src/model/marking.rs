use serde::{Deserialize, Serialize};

use super::selector::Selector;

/// Opaque identifier of a marking definition
///
/// Never interpreted by this crate. The empty string means "no marking" and is
/// how `clear_markings` flags an entry for removal before recompression.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkingRef(String);

impl MarkingRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The blanked ref used to flag an entry for removal
    pub fn blank() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for MarkingRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkingRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MarkingRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for MarkingRef {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl PartialEq<str> for MarkingRef {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MarkingRef {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// "No marking, one marking, or a list of markings", normalized into a list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkingList(Vec<MarkingRef>);

impl MarkingList {
    /// No markings requested
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[MarkingRef] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<MarkingRef> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<MarkingRef> for MarkingList {
    fn from(m: MarkingRef) -> Self {
        Self(vec![m])
    }
}

impl From<&str> for MarkingList {
    fn from(s: &str) -> Self {
        Self(vec![MarkingRef::from(s)])
    }
}

impl From<String> for MarkingList {
    fn from(s: String) -> Self {
        Self(vec![MarkingRef::from(s)])
    }
}

impl<T: Into<MarkingRef>> From<Option<T>> for MarkingList {
    fn from(m: Option<T>) -> Self {
        Self(m.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<MarkingRef>> From<Vec<T>> for MarkingList {
    fn from(items: Vec<T>) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<MarkingRef>, const N: usize> From<[T; N]> for MarkingList {
    fn from(items: [T; N]) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<MarkingRef>> From<&[T]> for MarkingList {
    fn from(items: &[T]) -> Self {
        Self(items.iter().cloned().map(Into::into).collect())
    }
}

impl FromIterator<MarkingRef> for MarkingList {
    fn from_iter<I: IntoIterator<Item = MarkingRef>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize none / one / many marking identifiers into a list (none => empty)
pub fn normalize_markings(input: impl Into<MarkingList>) -> Vec<MarkingRef> {
    input.into().into_vec()
}

/// Association of one marking with the selectors it applies to
///
/// Compared structurally: two entries are the same entry when both the ref and
/// the selector list are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GranularMarking {
    #[serde(default)]
    pub marking_ref: MarkingRef,
    #[serde(default)]
    pub selectors: Vec<Selector>,
}

impl GranularMarking {
    pub fn new(marking_ref: impl Into<MarkingRef>, selectors: Vec<Selector>) -> Self {
        Self {
            marking_ref: marking_ref.into(),
            selectors,
        }
    }

    /// Atomic entry: one ref, one selector
    pub fn atomic(marking_ref: impl Into<MarkingRef>, selector: impl Into<Selector>) -> Self {
        Self {
            marking_ref: marking_ref.into(),
            selectors: vec![selector.into()],
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.selectors.len() == 1
    }

    /// Render as `ref@selector[,selector..]` for error reporting
    pub fn describe(&self) -> String {
        let selectors: Vec<&str> = self.selectors.iter().map(Selector::as_str).collect();
        format!("{}@{}", self.marking_ref, selectors.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_normalizes_to_empty() {
        assert!(normalize_markings(MarkingList::none()).is_empty());
        assert!(normalize_markings(None::<&str>).is_empty());
    }

    #[test]
    fn test_single_and_many() {
        assert_eq!(normalize_markings("marking-x"), vec![MarkingRef::new("marking-x")]);
        assert_eq!(normalize_markings(vec!["m1", "m2"]).len(), 2);
        assert_eq!(normalize_markings(Some("m1")), vec![MarkingRef::new("m1")]);
    }

    #[test]
    fn test_serde_layout() {
        let entry = GranularMarking::new("marking-x", vec![Selector::new("a"), Selector::new("b")]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"marking_ref": "marking-x", "selectors": ["a", "b"]})
        );
    }

    #[test]
    fn test_missing_ref_deserializes_as_blank() {
        let entry: GranularMarking =
            serde_json::from_value(serde_json::json!({"selectors": ["a"]})).unwrap();
        assert!(entry.marking_ref.is_blank());
    }

    #[test]
    fn test_structural_equality() {
        let a = GranularMarking::atomic("m1", "a");
        let b = GranularMarking::atomic("m1", "a");
        assert_eq!(a, b);
        assert_ne!(a, GranularMarking::atomic("m1", "b"));
        assert_eq!(a.describe(), "m1@a");
    }
}
