use gmark_core::MarkedObject;
use serde_json::{json, Value};

/// STIX-like indicator with a few addressable properties and no markings
#[allow(dead_code)]
pub fn indicator() -> MarkedObject {
    MarkedObject::from_value(indicator_value()).unwrap()
}

/// Same indicator carrying the given `granular_markings` value
#[allow(dead_code)]
pub fn indicator_with(markings: Value) -> MarkedObject {
    let mut value = indicator_value();
    value["granular_markings"] = markings;
    MarkedObject::from_value(value).unwrap()
}

fn indicator_value() -> Value {
    json!({
        "type": "indicator",
        "id": "indicator--a740531e-63ff-4e49-a9e1-a0a3eed0e3e7",
        "created": "2017-01-20T00:00:00.000Z",
        "modified": "2017-01-20T00:00:00.000Z",
        "name": "Malicious site hosting downloader",
        "description": "Test description",
        "labels": ["malicious-activity", "compromised"],
        "pattern": "[url:value = 'http://x4z9arb.cn/4712']",
        "a": {"b": "nested"},
        "external_references": [
            {"source_name": "capec", "external_id": "CAPEC-163"},
            {"source_name": "mitre", "url": "https://example.com"}
        ]
    })
}

/// Marking refs and selectors of every stored entry, as plain strings
#[allow(dead_code)]
pub fn entries(obj: &MarkedObject) -> Vec<(String, Vec<String>)> {
    obj.granular_markings()
        .iter()
        .map(|m| {
            (
                m.marking_ref.to_string(),
                m.selectors.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}
