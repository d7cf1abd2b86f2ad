use serde::{Deserialize, Serialize};

/// Path into an object's structure, e.g. `description` or `external_references.[1].url`
///
/// Selectors are compared as opaque strings. Matching in
/// [`crate::ops::matcher`] is character-prefix based, not segment aware.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw character-prefix test against another selector
    pub fn starts_with(&self, prefix: &Selector) -> bool {
        self.0.starts_with(prefix.as_str())
    }

    /// Path segments as split on `.`
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&String> for Selector {
    fn from(s: &String) -> Self {
        Self(s.clone())
    }
}

impl AsRef<str> for Selector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// "One selector or a list of selectors", normalized into an ordered list
///
/// Order is preserved and duplicates are kept; the operations decide whether to
/// sort or deduplicate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList(Vec<Selector>);

impl SelectorList {
    pub fn as_slice(&self) -> &[Selector] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Selector> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Selector> for SelectorList {
    fn from(s: Selector) -> Self {
        Self(vec![s])
    }
}

impl From<&str> for SelectorList {
    fn from(s: &str) -> Self {
        Self(vec![Selector::from(s)])
    }
}

impl From<String> for SelectorList {
    fn from(s: String) -> Self {
        Self(vec![Selector::from(s)])
    }
}

impl<T: Into<Selector>> From<Vec<T>> for SelectorList {
    fn from(items: Vec<T>) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Selector>, const N: usize> From<[T; N]> for SelectorList {
    fn from(items: [T; N]) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Selector>> From<&[T]> for SelectorList {
    fn from(items: &[T]) -> Self {
        Self(items.iter().cloned().map(Into::into).collect())
    }
}

impl FromIterator<Selector> for SelectorList {
    fn from_iter<I: IntoIterator<Item = Selector>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize a single selector or a sequence of selectors into an ordered list
pub fn normalize_selectors(input: impl Into<SelectorList>) -> Vec<Selector> {
    input.into().into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_selector_becomes_one_element_list() {
        assert_eq!(normalize_selectors("description"), vec![Selector::new("description")]);
    }

    #[test]
    fn test_list_order_and_duplicates_preserved() {
        let selectors = normalize_selectors(vec!["b", "a", "b"]);
        let raw: Vec<&str> = selectors.iter().map(Selector::as_str).collect();
        assert_eq!(raw, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_prefix_is_character_based() {
        let desc = Selector::new("desc");
        let description = Selector::new("description");
        assert!(description.starts_with(&desc));
        assert!(!desc.starts_with(&description));
    }

    #[test]
    fn test_segments_split_on_dots() {
        let s = Selector::new("external_references.[1].url");
        let segments: Vec<&str> = s.segments().collect();
        assert_eq!(segments, vec!["external_references", "[1]", "url"]);
    }
}
