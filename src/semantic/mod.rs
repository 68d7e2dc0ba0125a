//! Semantic layer of the classification pipeline.
//!
//! # Architecture
//!
//! - `context`: Authored keyword dictionary
//! - `problems`: Authored problem dictionary
//! - `fallback`: Generated context for unauthored labels
//! - `enrich`: Enriched embedding text and query expansion
//! - `embeddings`: Embedding provider trait and local fastembed provider
//! - `openai`: Remote embedding provider
//! - `index`: In-memory vector index with cosine similarity search

pub mod context;
pub mod embeddings;
mod enrich;
pub mod fallback;
mod index;
pub mod openai;
pub mod problems;

#[cfg(feature = "local-embeddings")]
pub use embeddings::LocalEmbeddingModel;
pub use embeddings::{EmbeddingError, EmbeddingProvider};
pub use enrich::{
    enrich_for_embedding, enrich_problem_for_embedding, expand_query, lookup_context,
    strip_accents, ContextRecord, GeneratedContext, ENRICHMENT_DELIMITER,
};
pub use index::{cosine_similarity, IndexError, SearchResult, VectorIndex};
pub use openai::OpenAiEmbeddings;

/// Default remote embedding model
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Default local embedding model
pub const DEFAULT_LOCAL_MODEL: &str = "multilingual-e5-small";
