use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::marking::GranularMarking;
use crate::errors::{MarkingError, Result};

/// Name of the persisted marking field
pub const GRANULAR_MARKINGS_FIELD: &str = "granular_markings";

/// Immutable snapshot of a markable object
///
/// The object is a JSON property map plus an optional, typed marking set.
/// Absence of `granular_markings` is the only persisted form of "no markings":
/// the field is omitted on serialization and an empty list is read as absent.
/// Snapshots with different markings are produced by a
/// [`Versioner`](crate::ops::versioning::Versioner), never by mutating this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkedObject {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty_markings"
    )]
    granular_markings: Option<Vec<GranularMarking>>,

    #[serde(flatten)]
    properties: Map<String, Value>,
}

fn non_empty_markings<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<GranularMarking>>, D::Error>
where
    D: Deserializer<'de>,
{
    let markings: Option<Vec<GranularMarking>> = Option::deserialize(deserializer)?;
    Ok(markings.filter(|m| !m.is_empty()))
}

impl MarkedObject {
    /// Object with the given properties and no markings
    pub fn new(properties: Map<String, Value>) -> Self {
        let mut properties = properties;
        properties.remove(GRANULAR_MARKINGS_FIELD);
        Self {
            granular_markings: None,
            properties,
        }
    }

    /// Interpret a JSON value as a markable object
    ///
    /// # Errors
    /// * `InvalidObject` - the value is not a JSON object
    /// * `Serialization` - `granular_markings` is present but malformed
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(MarkingError::InvalidObject {
                reason: "expected a JSON object".to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// # Errors
    /// * `Serialization` - the snapshot cannot be encoded
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The `id` property, when the object has one
    pub fn id(&self) -> Option<&str> {
        self.properties.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Stored marking entries; empty when the field is absent
    pub fn granular_markings(&self) -> &[GranularMarking] {
        self.granular_markings.as_deref().unwrap_or(&[])
    }

    pub fn has_granular_markings(&self) -> bool {
        self.granular_markings.is_some()
    }

    /// Copy of this snapshot with the marking field replaced
    ///
    /// Crate-private: outside callers go through a `Versioner`.
    pub(crate) fn replace_markings(&self, markings: Option<Vec<GranularMarking>>) -> Self {
        Self {
            granular_markings: markings.filter(|m| !m.is_empty()),
            properties: self.properties.clone(),
        }
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }
}

impl TryFrom<Value> for MarkedObject {
    type Error = MarkingError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
