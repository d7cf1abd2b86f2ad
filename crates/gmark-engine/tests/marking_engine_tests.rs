//! Engine integration tests
//!
//! Each test attaches its own request id so that lifecycle events can be
//! picked out of the process-wide capture buffer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use gmark_core::logging_facility::test_capture::{init_test_capture, CapturedEvent, TestCapture};
use gmark_core::ops::{MatchOptions, SnapshotVersioner};
use gmark_core::{
    ExErrorKind, MarkedObject, MarkingError, MarkingList, PermissiveValidator, SelectorList,
};
use gmark_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use gmark_core_types::{RequestContext, RequestId, TraceId};
use gmark_engine::MarkingEngine;
use serde_json::json;

fn campaign() -> MarkedObject {
    MarkedObject::from_value(json!({
        "type": "campaign",
        "id": "campaign--8e2e2d2b-17d4-4cbf-938f-98ee46b3cd3f",
        "modified": "2016-04-06T20:03:00.000Z",
        "name": "Green Group Attacks Against Finance",
        "description": "Campaign by Green Group against a series of targets in the financial services sector.",
        "aliases": ["Green", "GG"],
        "revoked": false
    }))
    .unwrap()
}

fn engine(request: &str) -> MarkingEngine {
    MarkingEngine::default()
        .with_request_context(RequestContext::with_request_id(RequestId::from_string(request)))
}

fn events_for(capture: &TestCapture, request: &str) -> Vec<CapturedEvent> {
    capture
        .events()
        .into_iter()
        .filter(|e| e.request_id.as_deref() == Some(request))
        .collect()
}

#[test]
fn test_full_lifecycle_through_engine() {
    let engine = engine("engine-lifecycle-1");
    let obj = campaign();

    let marked = engine
        .add_markings(&obj, vec!["tlp-amber", "tlp-red"], vec!["description", "aliases"])
        .unwrap();
    assert_eq!(
        engine
            .get_markings(&marked, "aliases.[0]", MatchOptions::explicit().with_inherited(true))
            .unwrap(),
        vec!["tlp-amber", "tlp-red"]
    );

    let set = engine.set_markings(&marked, "tlp-green", "aliases").unwrap();
    assert!(engine
        .is_marked(&set, "tlp-green", Some("aliases".into()), MatchOptions::explicit())
        .unwrap());
    assert!(!engine
        .is_marked(&set, "tlp-red", Some("aliases".into()), MatchOptions::explicit())
        .unwrap());

    let removed = engine
        .remove_markings(&set, vec!["tlp-amber", "tlp-red"], "description")
        .unwrap();
    let cleared = engine.clear_markings(&removed, "aliases").unwrap();
    assert!(!cleared.has_granular_markings());
}

#[test]
fn test_default_engine_versions_modified() {
    let engine = engine("engine-versioning-2");
    let obj = campaign();

    let marked = engine.add_markings(&obj, "tlp-white", "name").unwrap();
    let before = obj.get("modified").and_then(|v| v.as_str()).unwrap();
    let after = marked.get("modified").and_then(|v| v.as_str()).unwrap();
    assert!(after > before);
    assert!(!obj.has_granular_markings());
}

#[test]
fn test_revoked_object_cannot_be_marked() {
    let engine = engine("engine-revoked-3");
    let mut value = campaign().to_value().unwrap();
    value["revoked"] = json!(true);
    let obj = MarkedObject::from_value(value).unwrap();

    let err = engine.add_markings(&obj, "tlp-white", "name").unwrap_err();
    assert!(matches!(err, MarkingError::ObjectRevoked { .. }));
}

#[test]
fn test_custom_collaborators() {
    let engine = MarkingEngine::new(PermissiveValidator, SnapshotVersioner);
    let obj = campaign();

    // Permissive validation accepts paths the object does not have
    let marked = engine.add_markings(&obj, "m1", "not.a.field").unwrap();
    assert_eq!(marked.properties(), obj.properties());
    assert_eq!(
        engine
            .get_markings(&marked, "not", MatchOptions::explicit().with_descendants(true))
            .unwrap(),
        vec!["m1"]
    );
}

#[test]
fn test_success_emits_single_start_and_end() {
    let capture = init_test_capture();
    let request = "engine-logging-4";
    let engine = engine(request);

    engine.add_markings(&campaign(), "tlp-amber", "name").unwrap();

    let events = events_for(&capture, request);
    let starts: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("add_markings") && e.event.as_deref() == Some(EVENT_START))
        .collect();
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some("add_markings") && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(starts.len(), 1);
    assert_eq!(ends.len(), 1);
    assert_eq!(starts[0].field("selector_count"), Some("1"));
    assert_eq!(ends[0].field("entry_count"), Some("1"));
    assert!(ends[0].duration_ms.is_some());
}

#[test]
fn test_failure_emits_error_event_with_code() {
    let capture = init_test_capture();
    let request = "engine-logging-5";
    let engine = engine(request);

    let marked = engine.add_markings(&campaign(), "tlp-amber", "name").unwrap();
    let err = engine.remove_markings(&marked, "tlp-red", "name").unwrap_err();
    assert!(matches!(err, MarkingError::MarkingNotFound { .. }));

    let events = events_for(&capture, request);
    let error = events
        .iter()
        .find(|e| e.op.as_deref() == Some("remove_markings") && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.err_code.as_deref(), Some("ERR_MARKING_NOT_FOUND"));
    assert!(error.trace_id.is_none());

    assert!(!events
        .iter()
        .any(|e| e.op.as_deref() == Some("remove_markings") && e.event.as_deref() == Some(EVENT_END)));
}

#[test]
fn test_is_marked_without_selectors_is_logged_as_missing_argument() {
    let capture = init_test_capture();
    let request = "engine-logging-6";
    let engine = engine(request);

    let err = engine
        .is_marked(&campaign(), MarkingList::none(), None::<SelectorList>, MatchOptions::explicit())
        .unwrap_err();
    assert!(matches!(err, MarkingError::MissingArgument { .. }));

    let events = events_for(&capture, request);
    assert!(events.iter().any(|e| e.op.as_deref() == Some("is_marked")
        && e.field("err.code") == Some("ERR_MISSING_ARGUMENT")));
}

#[test]
fn test_trace_id_is_carried_on_every_event() {
    let capture = init_test_capture();
    let request = "engine-trace-8";
    let engine = MarkingEngine::default().with_request_context(
        RequestContext::with_request_id(RequestId::from_string(request))
            .with_trace_id(TraceId::from_string("trace-8")),
    );

    let marked = engine.add_markings(&campaign(), "tlp-amber", "name").unwrap();
    let _ = engine.clear_markings(&marked, "description").unwrap_err();

    let events = events_for(&capture, request);
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.trace_id.as_deref() == Some("trace-8")));

    let error = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("error event");
    assert_eq!(error.op.as_deref(), Some("clear_markings"));
    assert_eq!(error.err_code.as_deref(), Some("ERR_MARKING_NOT_FOUND"));
}

#[test]
fn test_error_report_carries_correlation() {
    let engine = MarkingEngine::default().with_request_context(
        RequestContext::with_request_id(RequestId::from_string("engine-report-9"))
            .with_trace_id(TraceId::from_string("trace-9")),
    );
    let obj = campaign();

    let err = engine.add_markings(&obj, "m1", "objective").unwrap_err();
    let report = engine.error_report("add_markings", &err);

    assert_eq!(report.kind(), ExErrorKind::InvalidSelector);
    assert_eq!(report.op(), Some("add_markings"));
    assert_eq!(report.selector(), Some("objective"));
    assert_eq!(report.request_id().map(RequestId::as_str), Some("engine-report-9"));
    assert_eq!(report.trace_id().map(TraceId::as_str), Some("trace-9"));
    assert!(report.to_string().starts_with("[ERR_INVALID_SELECTOR] in operation 'add_markings'"));

    let untraced = MarkingEngine::default().error_report("add_markings", &err);
    assert!(untraced.trace_id().is_none());
    assert!(untraced.request_id().is_some());
}

#[test]
fn test_set_on_unmarked_object_adds() {
    let engine = engine("engine-set-10");
    let obj = campaign();

    let next = engine.set_markings(&obj, "tlp-green", "aliases").unwrap();
    assert!(engine
        .is_marked(&next, "tlp-green", Some("aliases".into()), MatchOptions::explicit())
        .unwrap());
}

#[test]
fn test_invalid_selector_fails_fast() {
    let engine = engine("engine-invalid-7");
    let obj = campaign();

    let err = engine.add_markings(&obj, "m1", vec!["name", "objective"]).unwrap_err();
    assert!(matches!(err, MarkingError::InvalidSelector { ref selector, .. } if selector == "objective"));
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let engine = std::sync::Arc::new(MarkingEngine::new(PermissiveValidator, SnapshotVersioner));
    let obj = campaign();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = std::sync::Arc::clone(&engine);
            let obj = obj.clone();
            std::thread::spawn(move || engine.add_markings(&obj, format!("m{i}"), "name").unwrap())
        })
        .collect();

    for handle in handles {
        let snapshot = handle.join().unwrap();
        assert_eq!(snapshot.granular_markings().len(), 1);
    }
    assert!(!obj.has_granular_markings());
}
