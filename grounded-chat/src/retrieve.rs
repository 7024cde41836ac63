//! Grounded retrieval: embed the query, run a hybrid search, project hits.

use search_index::{DOCUMENT_FIELDS, Document, HybridQuery, VectorQuery, project_documents};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{GroundedChat, context::ConversationContext, error::Result};

/// Title of the audit entry recorded for every retrieval.
pub const SEARCH_QUERY_THOUGHT: &str = "Generated search query";

impl GroundedChat {
    /// Retrieves up to `top` documents for `query`.
    ///
    /// On success appends one thought and the documents to `context`. On
    /// failure the context is left as it was.
    #[instrument(skip_all, fields(top = top))]
    pub async fn retrieve(
        &self,
        query: &str,
        top: usize,
        context: &mut ConversationContext,
    ) -> Result<Vec<Document>> {
        // 1) Embed the rewritten query
        let vector = self.embeddings.embed(query).await?;

        // 2) Hybrid query: k nearest on the vector field + the same text
        let vq = VectorQuery::new(vector, top, self.search.vector_field());
        let hq = HybridQuery::new(query, vq, top).select(DOCUMENT_FIELDS);

        // 3) Search and project onto the uniform document shape
        let hits = self.search.search(&hq).await?;
        let documents = project_documents(&hits);

        info!(
            embedding_model = self.embeddings.model(),
            retrieved = documents.len(),
            "documents retrieved"
        );

        context.push_thought(SEARCH_QUERY_THOUGHT, Value::String(query.to_string()));
        context.extend_grounding(documents.iter().cloned());

        Ok(documents)
    }
}
