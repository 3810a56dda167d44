//! Property tests: serializing a document and parsing it back.

use indexmap::IndexMap;
use proptest::prelude::*;
use req::models::{Body, HttpMethod, HttpVersion, RequestDocument};
use req::parse_document;
use serde_json::Value;

fn method() -> impl Strategy<Value = HttpMethod> {
    proptest::sample::select(HttpMethod::ALL.to_vec())
}

fn version() -> impl Strategy<Value = HttpVersion> {
    proptest::sample::select(vec![
        HttpVersion::Http09,
        HttpVersion::Http10,
        HttpVersion::Http11,
        HttpVersion::Http20,
    ])
}

fn headers() -> impl Strategy<Value = IndexMap<String, String>> {
    proptest::collection::vec(("X-[A-Za-z]{1,8}", "[A-Za-z0-9;=,.]{0,12}"), 0..5)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn json_body() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map("[a-z]{1,6}", any::<i32>(), 0..4).prop_map(|map| {
        Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    })
}

fn document() -> impl Strategy<Value = RequestDocument> {
    (
        method(),
        "https://[a-z]{1,10}\\.test/[a-z0-9]{0,10}",
        version(),
        headers(),
    )
        .prop_map(|(method, url, version, headers)| {
            let mut doc = RequestDocument::new(method, url, version);
            doc.headers = headers;
            doc
        })
}

proptest! {
    #[test]
    fn round_trip_without_body(doc in document()) {
        let parsed = parse_document(&doc.to_http_string()).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn round_trip_with_raw_body(
        doc in document(),
        text in "[a-z]{1,8}=[a-z0-9]{1,8}(&[a-z]{1,8}=[a-z0-9]{1,8}){0,3}",
    ) {
        let mut doc = doc;
        doc.body = Some(Body::Raw(text));
        let parsed = parse_document(&doc.to_http_string()).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn round_trip_with_json_body(doc in document(), value in json_body()) {
        let mut doc = doc;
        doc.set_header("Content-Type", "application/json");
        doc.body = Some(Body::Json(value));
        let parsed = parse_document(&doc.to_http_string()).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,200}") {
        let _ = parse_document(&text);
    }
}

#[test]
fn round_trip_keeps_header_order() {
    let mut doc = RequestDocument::new(HttpMethod::PATCH, "https://api.test/users/1", HttpVersion::Http11);
    doc.set_header("X-Zeta", "1");
    doc.set_header("X-Alpha", "2");
    doc.set_header("Content-Type", "application/json");
    doc.body = Some(Body::Json(serde_json::json!({"b": [1, 2], "a": {"c": null}})));

    let parsed = parse_document(&doc.to_string()).unwrap();
    let names: Vec<&str> = parsed.headers.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["X-Zeta", "X-Alpha", "Content-Type"]);
    assert_eq!(parsed, doc);
}
