//! Uniform document shape and projection from raw search hits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Field projection requested from the index, in document order.
pub const DOCUMENT_FIELDS: [&str; 4] = ["id", "content", "filepath", "page_number"];

/// Raw search hit as returned by the index (`value[]` item).
pub type RawSearchHit = Map<String, Value>;

/// Grounding document handed to the answer prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub filepath: String,
    pub page_number: i64,
}

impl Document {
    /// Projects a raw hit onto the four document fields.
    ///
    /// Every other key (scores, highlights, vectors) is dropped. Missing or
    /// null fields become empty strings / `0`; numeric ids are stringified.
    /// A page number that is fractional or unparsable is coerced (truncated,
    /// or `0`) and logged at `warn`.
    pub fn from_raw(hit: &RawSearchHit) -> Self {
        Self {
            id: text_field(hit, "id"),
            content: text_field(hit, "content"),
            filepath: text_field(hit, "filepath"),
            page_number: number_field(hit, "page_number"),
        }
    }
}

/// Projects hits in order; output length always equals input length.
pub fn project_documents(hits: &[RawSearchHit]) -> Vec<Document> {
    hits.iter().map(Document::from_raw).collect()
}

fn text_field(hit: &RawSearchHit, key: &str) -> String {
    match hit.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn number_field(hit: &RawSearchHit, key: &str) -> i64 {
    let raw = match hit.get(key) {
        Some(Value::Null) | None => return 0,
        Some(v) => v,
    };
    let exact = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if let Some(n) = exact {
        return n;
    }

    let coerced = match raw {
        Value::Number(n) => n.as_f64().map(|f| f as i64).unwrap_or_default(),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or_default(),
        _ => 0,
    };
    warn!(field = key, value = %raw, coerced, "non-integer field value coerced");
    coerced
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(v: Value) -> RawSearchHit {
        match v {
            Value::Object(m) => m,
            _ => panic!("object expected"),
        }
    }

    #[test]
    fn projection_keeps_order_and_drops_extra_fields() {
        let hits = vec![
            raw(json!({
                "@search.score": 0.91,
                "id": "b",
                "content": "TrailBook 14",
                "filepath": "catalog/laptops.pdf",
                "page_number": 3,
                "contentVector": [0.1, 0.2]
            })),
            raw(json!({
                "@search.score": 0.42,
                "id": "a",
                "content": "ZenBook",
                "filepath": "catalog/laptops.pdf",
                "page_number": 7
            })),
        ];

        let docs = project_documents(&hits);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "b");
        assert_eq!(docs[1].id, "a");
        assert_eq!(
            serde_json::to_value(&docs[0]).unwrap(),
            json!({
                "id": "b",
                "content": "TrailBook 14",
                "filepath": "catalog/laptops.pdf",
                "page_number": 3
            })
        );
    }

    #[test]
    fn projection_is_total() {
        let hits = vec![
            raw(json!({})),
            raw(json!({ "id": 42, "page_number": "12", "filepath": null })),
        ];
        let docs = project_documents(&hits);
        assert_eq!(docs.len(), hits.len());
        assert_eq!(docs[0], Document {
            id: String::new(),
            content: String::new(),
            filepath: String::new(),
            page_number: 0,
        });
        assert_eq!(docs[1].id, "42");
        assert_eq!(docs[1].page_number, 12);
        assert!(project_documents(&[]).is_empty());
    }

    #[test]
    fn inexact_page_numbers_are_coerced() {
        let hits = vec![
            raw(json!({ "page_number": 12.7 })),
            raw(json!({ "page_number": "3.9" })),
            raw(json!({ "page_number": "twelve" })),
            raw(json!({ "page_number": [4] })),
            raw(json!({ "page_number": u64::MAX })),
        ];
        let pages: Vec<_> = project_documents(&hits).iter().map(|d| d.page_number).collect();
        assert_eq!(pages, [12, 3, 0, 0, i64::MAX]);
    }
}
