pub mod document;
pub mod hybrid_query;
pub mod search_index_config;
