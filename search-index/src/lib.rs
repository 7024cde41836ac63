//! Public API:
//! - [`AzureSearchClient`]: hybrid (vector + text) queries against one index.
//! - [`DocumentSearch`]: the seam callers depend on, so tests can substitute the index.
//! - [`Document`] / [`project_documents`]: uniform projection of raw hits.

mod client;
pub mod errors;
pub mod structs;

use std::{future::Future, pin::Pin};

pub use client::AzureSearchClient;
pub use errors::SearchIndexError;
pub use structs::document::{DOCUMENT_FIELDS, Document, RawSearchHit, project_documents};
pub use structs::hybrid_query::{HybridQuery, VectorFilterMode, VectorQuery};
pub use structs::search_index_config::SearchIndexConfig;

/// Boxed, sendable future returned by [`DocumentSearch`].
pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<RawSearchHit>, SearchIndexError>> + Send + 'a>>;

/// Document search provider.
///
/// Returns raw hits in the provider's ranking order (relevance-descending).
pub trait DocumentSearch: Send + Sync {
    /// Name of the vector field nearest-neighbour queries should target.
    fn vector_field(&self) -> &str;

    fn search<'a>(&'a self, query: &'a HybridQuery) -> SearchFuture<'a>;
}
