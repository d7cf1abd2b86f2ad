use serde_json::Value;

use crate::errors::{MarkingError, Result};
use crate::model::{MarkedObject, Selector};

/// Checks that selectors address something on the object
///
/// Every marking operation calls this before reading or rewriting the marking
/// set, so a bad selector fails the whole call with nothing changed.
pub trait SelectorValidator: Send + Sync {
    /// # Errors
    /// * `InvalidSelector` - the list is empty or a selector does not resolve
    fn validate(&self, object: &MarkedObject, selectors: &[Selector]) -> Result<()>;
}

/// Resolves each selector against the object's properties
///
/// A selector is split on `.`; `[N]` segments index into lists, every other
/// segment is an object key. The addressed value must be present and non-empty:
/// `null`, `false`, `0`, `""`, `[]` and `{}` do not count. The
/// `granular_markings` field is not part of the addressable structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl SelectorValidator for StructuralValidator {
    fn validate(&self, object: &MarkedObject, selectors: &[Selector]) -> Result<()> {
        ensure_non_empty(object, selectors)?;

        for selector in selectors {
            match resolve(object, selector) {
                Some(value) if is_present(value) => {}
                Some(_) => {
                    return Err(invalid(object, selector, "selector addresses an empty value"));
                }
                None => {
                    return Err(invalid(object, selector, "selector does not resolve"));
                }
            }
        }

        Ok(())
    }
}

/// Accepts any non-empty list of non-empty selectors
///
/// For hosts that check selectors against a schema elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveValidator;

impl SelectorValidator for PermissiveValidator {
    fn validate(&self, object: &MarkedObject, selectors: &[Selector]) -> Result<()> {
        ensure_non_empty(object, selectors)?;
        match selectors.iter().find(|s| s.is_empty()) {
            Some(selector) => Err(invalid(object, selector, "selector is empty")),
            None => Ok(()),
        }
    }
}

fn ensure_non_empty(object: &MarkedObject, selectors: &[Selector]) -> Result<()> {
    if selectors.is_empty() {
        return Err(MarkingError::InvalidSelector {
            object_id: object.id().map(str::to_string),
            selector: String::new(),
            reason: "no selectors supplied".to_string(),
        });
    }
    Ok(())
}

fn invalid(object: &MarkedObject, selector: &Selector, reason: &str) -> MarkingError {
    MarkingError::InvalidSelector {
        object_id: object.id().map(str::to_string),
        selector: selector.as_str().to_string(),
        reason: reason.to_string(),
    }
}

/// Walk the selector's segments down from the object's top-level properties
fn resolve<'a>(object: &'a MarkedObject, selector: &Selector) -> Option<&'a Value> {
    let mut segments = selector.segments();
    let first = segments.next()?;
    let mut current = object.properties().get(first)?;

    for segment in segments {
        current = match list_index(segment) {
            Some(index) => current.as_array()?.get(index)?,
            None => current.as_object()?.get(segment)?,
        };
    }

    Some(current)
}

/// `[3]` => Some(3)
///
/// Only the canonical spelling is an index: `[03]` or `[+3]` would be stored
/// verbatim and never equal the `[3]` a later query uses.
fn list_index(segment: &str) -> Option<usize> {
    let digits = segment.strip_prefix('[')?.strip_suffix(']')?;
    let canonical = match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical {
        digits.parse().ok()
    } else {
        None
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
