//! Versioning collaborator
//!
//! Marking operations never touch their input object. They hand the new,
//! compressed marking set to a `Versioner`, which produces the next snapshot.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::Value;

use crate::errors::{MarkingError, Result};
use crate::model::{GranularMarking, MarkedObject};

/// Produces a new object snapshot carrying the given marking set
pub trait Versioner: Send + Sync {
    /// `None` and an empty set both yield a snapshot without the marking field.
    ///
    /// # Errors
    /// Implementation specific; the input object is never modified.
    fn with_markings(
        &self,
        object: &MarkedObject,
        markings: Option<Vec<GranularMarking>>,
    ) -> Result<MarkedObject>;
}

/// Replaces the marking set and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotVersioner;

impl Versioner for SnapshotVersioner {
    fn with_markings(
        &self,
        object: &MarkedObject,
        markings: Option<Vec<GranularMarking>>,
    ) -> Result<MarkedObject> {
        Ok(object.replace_markings(markings))
    }
}

/// Replaces the marking set and bumps the `modified` timestamp
///
/// Revoked objects (`"revoked": true`) cannot be versioned. When the object
/// carries an RFC 3339 `modified` property the new value is
/// `max(now, previous + 1ms)`, so successive versions always order strictly.
/// Objects without `modified` are versioned without timestamp changes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampVersioner;

pub const MODIFIED_FIELD: &str = "modified";
pub const REVOKED_FIELD: &str = "revoked";

impl TimestampVersioner {
    fn next_modified(previous: &str, now: DateTime<Utc>) -> Result<String> {
        let previous = DateTime::parse_from_rfc3339(previous)
            .map_err(|e| MarkingError::InvalidObject {
                reason: format!("'{}' is not an RFC 3339 timestamp: {}", MODIFIED_FIELD, e),
            })?
            .with_timezone(&Utc);

        let next = std::cmp::max(now, previous + Duration::milliseconds(1));
        Ok(next.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Versioner for TimestampVersioner {
    fn with_markings(
        &self,
        object: &MarkedObject,
        markings: Option<Vec<GranularMarking>>,
    ) -> Result<MarkedObject> {
        if object.get(REVOKED_FIELD).and_then(Value::as_bool) == Some(true) {
            return Err(MarkingError::ObjectRevoked {
                object_id: object.id().unwrap_or_default().to_string(),
            });
        }

        let mut next = object.replace_markings(markings);

        if let Some(previous) = object.get(MODIFIED_FIELD) {
            let previous = previous.as_str().ok_or_else(|| MarkingError::InvalidObject {
                reason: format!("'{}' must be a string", MODIFIED_FIELD),
            })?;
            let modified = Self::next_modified(previous, Utc::now())?;
            tracing::debug!(object_id = ?object.id(), %modified, "bumped modified timestamp");
            next.properties_mut()
                .insert(MODIFIED_FIELD.to_string(), Value::String(modified));
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marking() -> Option<Vec<GranularMarking>> {
        Some(vec![GranularMarking::atomic("m1", "name")])
    }

    #[test]
    fn test_snapshot_versioner_only_touches_markings() {
        let obj = MarkedObject::from_value(json!({"name": "x", "modified": "2020-01-01T00:00:00.000Z"})).unwrap();
        let next = SnapshotVersioner.with_markings(&obj, marking()).unwrap();

        assert_eq!(next.properties(), obj.properties());
        assert_eq!(next.granular_markings().len(), 1);
        assert!(!obj.has_granular_markings());
    }

    #[test]
    fn test_timestamp_versioner_bumps_modified() {
        let obj = MarkedObject::from_value(json!({"name": "x", "modified": "2020-01-01T00:00:00.000Z"})).unwrap();
        let next = TimestampVersioner.with_markings(&obj, marking()).unwrap();

        let modified = next.get(MODIFIED_FIELD).and_then(Value::as_str).unwrap();
        assert!(modified > "2020-01-01T00:00:00.000Z");
        assert!(modified.ends_with('Z'));
    }

    #[test]
    fn test_future_modified_advances_by_one_millisecond() {
        let now = Utc::now();
        let next = TimestampVersioner::next_modified("2999-01-01T00:00:00.000Z", now).unwrap();
        assert_eq!(next, "2999-01-01T00:00:00.001Z");
    }

    #[test]
    fn test_without_modified_no_timestamp_added() {
        let obj = MarkedObject::from_value(json!({"name": "x"})).unwrap();
        let next = TimestampVersioner.with_markings(&obj, None).unwrap();
        assert!(next.get(MODIFIED_FIELD).is_none());
    }

    #[test]
    fn test_revoked_object_refused() {
        let obj = MarkedObject::from_value(json!({"id": "x--1", "revoked": true})).unwrap();
        let err = TimestampVersioner.with_markings(&obj, marking()).unwrap_err();
        assert_eq!(
            err,
            MarkingError::ObjectRevoked {
                object_id: "x--1".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_modified_rejected() {
        let obj = MarkedObject::from_value(json!({"modified": "yesterday"})).unwrap();
        let err = TimestampVersioner.with_markings(&obj, None).unwrap_err();
        assert!(matches!(err, MarkingError::InvalidObject { .. }));
    }
}
