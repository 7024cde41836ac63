//! Request model for a hybrid (vector + text) search call.

use serde::{Serialize, Serializer};

/// How non-vector filters interact with nearest-neighbour ranking.
///
/// Only pre-filtering is issued: the candidate set is narrowed before
/// vector ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VectorFilterMode {
    PreFilter,
}

/// One nearest-neighbour query over a vector field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorQuery {
    /// Always `"vector"` for precomputed query vectors.
    pub kind: &'static str,
    pub vector: Vec<f32>,
    /// Nearest neighbours to return.
    pub k: usize,
    /// Comma-separated vector field names.
    pub fields: String,
}

impl VectorQuery {
    pub fn new(vector: Vec<f32>, k: usize, field: impl Into<String>) -> Self {
        Self {
            kind: "vector",
            vector,
            k,
            fields: field.into(),
        }
    }
}

/// Body of `POST /indexes/{index}/docs/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridQuery {
    /// Full-text component; `None` means vector-only.
    #[serde(rename = "search", skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    pub vector_queries: Vec<VectorQuery>,
    /// Projected fields.
    #[serde(serialize_with = "comma_list")]
    pub select: Vec<String>,
    pub vector_filter_mode: VectorFilterMode,
    /// Number of results to return.
    pub top: usize,
}

impl HybridQuery {
    /// Vector + text query with pre-filtering, returning `top` results.
    pub fn new(search_text: impl Into<String>, vector: VectorQuery, top: usize) -> Self {
        Self {
            search_text: Some(search_text.into()),
            vector_queries: vec![vector],
            select: Vec::new(),
            vector_filter_mode: VectorFilterMode::PreFilter,
            top,
        }
    }

    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = fields.into_iter().map(Into::into).collect();
        self
    }
}

fn comma_list<S: Serializer>(fields: &[String], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&fields.join(","))
}
