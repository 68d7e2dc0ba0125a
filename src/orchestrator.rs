//! Batch embedding generation.
//!
//! Reads the raw taxonomy lists from the document store, enriches every
//! keyword and problem with its semantic context, embeds the enriched texts
//! in sequential batches and writes the resulting records back in fixed-size
//! chunk documents:
//! - `embeddings/keywords_chunk_<i>` and `embeddings/problems_chunk_<i>`
//! - generation metadata merged into `taxonomy/global-lists`
//! - taxonomy version baseline plus the version the embeddings describe
//!
//! Each batch completes before the next one starts. Nothing is retried: a
//! failure aborts the run and is reported once, with a user-facing message.
//! A partial write is recovered by running again with `force`.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::semantic::{
    enrich_for_embedding, enrich_problem_for_embedding, EmbeddingError, EmbeddingProvider,
};
use crate::storage::{
    DocumentStore, StoreError, EMBEDDINGS_COLLECTION, GLOBAL_LISTS, TAXONOMY_COLLECTION,
};
use crate::taxonomy::{
    split_label, KeywordRecord, ProblemRecord, RawTaxonomy, FALLBACK_DEPARTMENT, LABEL_SEPARATOR,
};
use crate::validation::TaxonomyValidator;
use crate::version::{
    calculate_taxonomy_version, embeddings_exist, mark_embeddings_updated, update_taxonomy_version,
};

/// Texts per provider request.
pub const BATCH_SIZE: usize = 20;
/// Records per stored chunk document.
pub const CHUNK_SIZE: usize = 50;
/// `created_by` of generated records.
pub const CREATED_BY: &str = "batch_generation";

const KEYWORDS_KIND: &str = "keywords";
const PROBLEMS_KIND: &str = "problems";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Taxonomy document taxonomy/global-lists not found")]
    TaxonomyNotFound,

    #[error("Taxonomy has no keywords and no problems")]
    EmptyTaxonomy,

    #[error("Invalid generation options: {0}")]
    InvalidOptions(String),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl GenerationError {
    /// Message suitable for showing to the person who started the run.
    pub fn user_message(&self) -> String {
        let message = match self {
            GenerationError::Embedding(EmbeddingError::InvalidApiKey(_)) => {
                "Chave de API inválida ou sem permissões. Verifique sua chave OpenAI."
            }
            GenerationError::Embedding(EmbeddingError::QuotaExceeded(_)) => {
                "Cota da API OpenAI excedida. Tente novamente mais tarde ou verifique seu plano."
            }
            GenerationError::Embedding(EmbeddingError::RateLimited(_)) => {
                "Muitas requisições. Aguarde alguns minutos e tente novamente."
            }
            GenerationError::Embedding(EmbeddingError::Network(_))
            | GenerationError::Embedding(EmbeddingError::Timeout(_)) => {
                "Erro de conexão. Verifique sua internet e tente novamente."
            }
            GenerationError::Embedding(EmbeddingError::Permission(_)) => {
                "Sem permissão para usar o modelo de embeddings. Verifique as permissões da sua chave."
            }
            GenerationError::Store(StoreError::Io(e))
                if e.kind() == std::io::ErrorKind::PermissionDenied =>
            {
                "Erro de permissão no armazenamento. Contate o administrador."
            }
            GenerationError::TaxonomyNotFound => "Documento da taxonomia não encontrado.",
            GenerationError::EmptyTaxonomy => "A taxonomia não possui keywords nem problems.",
            _ => "Erro interno na geração de embeddings",
        };
        message.to_string()
    }
}

/// Batch and chunk sizes for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub batch_size: usize,
    pub chunk_size: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            chunk_size: CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub keywords_processed: usize,
    pub problems_processed: usize,
    pub keyword_chunks: usize,
    pub problem_chunks: usize,
    pub processing_time_ms: u64,
    pub processing_time_human: String,
    pub batch_size: usize,
    pub total_api_calls: usize,
    pub taxonomy_version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingEmbeddings {
    pub keywords: usize,
    pub problems: usize,
    pub generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<GenerationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<ExistingEmbeddings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(GenerationStats),
    AlreadyGenerated(ExistingEmbeddings),
}

impl From<Result<GenerationOutcome, GenerationError>> for GenerationResponse {
    fn from(result: Result<GenerationOutcome, GenerationError>) -> Self {
        let timestamp = Utc::now();
        match result {
            Ok(GenerationOutcome::Generated(stats)) => GenerationResponse {
                success: true,
                message: Some("Embeddings gerados com sucesso!".to_string()),
                stats: Some(stats),
                existing: None,
                error: None,
                technical_error: None,
                timestamp,
            },
            Ok(GenerationOutcome::AlreadyGenerated(existing)) => GenerationResponse {
                success: true,
                message: Some(
                    "Embeddings já foram gerados. Use force para regenerar.".to_string(),
                ),
                stats: None,
                existing: Some(existing),
                error: None,
                technical_error: None,
                timestamp,
            },
            Err(e) => GenerationResponse {
                success: false,
                message: None,
                stats: None,
                existing: None,
                error: Some(e.user_message()),
                technical_error: Some(e.to_string()),
                timestamp,
            },
        }
    }
}

/// Stored chunk document. The record list sits under `keywords` or
/// `problems` depending on the chunk kind.
#[derive(Debug, Deserialize)]
struct ChunkHeader {
    #[serde(default)]
    total_chunks: usize,
}

/// Generates and stores embeddings for the whole taxonomy.
pub struct Orchestrator<'a> {
    store: &'a dyn DocumentStore,
    provider: &'a dyn EmbeddingProvider,
    validator: &'a TaxonomyValidator,
    options: GenerationOptions,
    progress: Option<&'a dyn Fn(&str, u8)>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        store: &'a dyn DocumentStore,
        provider: &'a dyn EmbeddingProvider,
        validator: &'a TaxonomyValidator,
    ) -> Self {
        Self {
            store,
            provider,
            validator,
            options: GenerationOptions::default(),
            progress: None,
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Called with a step description and a completion percentage.
    pub fn with_progress(mut self, progress: &'a dyn Fn(&str, u8)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn report(&self, step: &str, percent: u8) {
        log::info!("{}: {}%", step, percent);
        if let Some(progress) = self.progress {
            progress(step, percent);
        }
    }

    /// Run generation and fold any failure into a structured response.
    pub fn generate_all_embeddings(&self, force: bool) -> GenerationResponse {
        let result = self.run(force);
        if let Err(e) = &result {
            log::error!("Embedding generation failed: {}", e);
        }
        result.into()
    }

    /// Run generation.
    ///
    /// Without `force`, an existing chunked generation short-circuits with
    /// the stored counts.
    pub fn run(&self, force: bool) -> Result<GenerationOutcome, GenerationError> {
        if self.options.batch_size == 0 || self.options.chunk_size == 0 {
            return Err(GenerationError::InvalidOptions(format!(
                "batch_size and chunk_size must be positive (got {} and {})",
                self.options.batch_size, self.options.chunk_size
            )));
        }

        let document = self
            .store
            .get_document(TAXONOMY_COLLECTION, GLOBAL_LISTS)?
            .ok_or(GenerationError::TaxonomyNotFound)?;

        if !force && embeddings_exist(&document) {
            let existing = ExistingEmbeddings {
                keywords: load_keyword_records(self.store)?.len(),
                problems: load_problem_records(self.store)?.len(),
                generated_at: document
                    .get("embeddings_generated_at")
                    .cloned()
                    .and_then(|v| serde_json::from_value(v).ok()),
            };
            log::info!(
                "Embeddings already generated ({} keywords, {} problems); skipping",
                existing.keywords,
                existing.problems
            );
            return Ok(GenerationOutcome::AlreadyGenerated(existing));
        }

        let taxonomy: RawTaxonomy =
            serde_json::from_value(document).map_err(|source| StoreError::Malformed {
                collection: TAXONOMY_COLLECTION.to_string(),
                id: GLOBAL_LISTS.to_string(),
                source,
            })?;
        let keywords = taxonomy.keywords.labels();
        let problems = taxonomy.problems.clone();
        if keywords.is_empty() && problems.is_empty() {
            return Err(GenerationError::EmptyTaxonomy);
        }

        log::info!(
            "Generating embeddings for {} keywords and {} problems with {}",
            keywords.len(),
            problems.len(),
            self.provider.model_name()
        );
        self.report("Iniciando processamento", 5);

        let version = calculate_taxonomy_version(&taxonomy);
        let start = Instant::now();

        self.report("Gerando embeddings para keywords", 10);
        let keyword_texts: Vec<String> = keywords.iter().map(|k| enrich_for_embedding(k)).collect();
        let keyword_embeddings = self.embed_in_batches(&keyword_texts)?;
        self.report("Keywords processadas", 40);

        let keyword_records: Vec<KeywordRecord> = keywords
            .iter()
            .zip(keyword_embeddings)
            .map(|(label, embedding)| {
                KeywordRecord::new(label, &self.record_department(label), embedding, CREATED_BY)
            })
            .collect();

        self.report("Gerando embeddings para problems", 50);
        let problem_texts: Vec<String> =
            problems.iter().map(|p| enrich_problem_for_embedding(p)).collect();
        let problem_embeddings = self.embed_in_batches(&problem_texts)?;
        self.report("Problems processados", 70);

        let problem_records: Vec<ProblemRecord> = problems
            .iter()
            .zip(problem_embeddings)
            .map(|(label, embedding)| ProblemRecord::new(label, embedding, CREATED_BY))
            .collect();

        self.report("Salvando embeddings", 80);
        let keyword_chunks = self.write_chunks(KEYWORDS_KIND, &keyword_records)?;
        let problem_chunks = self.write_chunks(PROBLEMS_KIND, &problem_records)?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.store.update_document(
            TAXONOMY_COLLECTION,
            GLOBAL_LISTS,
            &json!({
                "embeddings_generated_at": Utc::now(),
                "embedding_model": self.provider.model_name(),
                "embeddings_structure": "chunked",
                "semantic_enrichment": true,
                "batch_generation_stats": {
                    "total_keywords": keyword_records.len(),
                    "total_problems": problem_records.len(),
                    "keyword_chunks": keyword_chunks,
                    "problem_chunks": problem_chunks,
                    "processing_time_ms": elapsed_ms,
                    "batch_size_used": self.options.batch_size,
                    "enriched_with_semantic_context": true,
                },
            }),
        )?;

        update_taxonomy_version(self.store, &taxonomy)?;
        mark_embeddings_updated(self.store, version.version)?;
        self.report("Versões atualizadas", 95);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        self.report("Concluído", 100);

        let stats = GenerationStats {
            keywords_processed: keyword_records.len(),
            problems_processed: problem_records.len(),
            keyword_chunks,
            problem_chunks,
            processing_time_ms,
            processing_time_human: format!("{}s", (processing_time_ms as f64 / 1000.0).round()),
            batch_size: self.options.batch_size,
            total_api_calls: keywords.len().div_ceil(self.options.batch_size)
                + problems.len().div_ceil(self.options.batch_size),
            taxonomy_version: version.version,
        };
        log::info!(
            "Generated {} keyword and {} problem embeddings in {} ms",
            stats.keywords_processed,
            stats.problems_processed,
            stats.processing_time_ms
        );
        Ok(GenerationOutcome::Generated(stats))
    }

    /// Department the validator resolves (runtime, static map, inference),
    /// else the label prefix, else the fallback.
    fn record_department(&self, label: &str) -> String {
        if let Some((department, _)) = self.validator.resolve_department(label) {
            return department;
        }
        if label.contains(LABEL_SEPARATOR) {
            return split_label(label).prefix.to_string();
        }
        FALLBACK_DEPARTMENT.to_string()
    }

    /// Embed texts one batch at a time, preserving order.
    fn embed_in_batches(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, GenerationError> {
        let total_batches = texts.len().div_ceil(self.options.batch_size);
        let mut embeddings = Vec::with_capacity(texts.len());

        for (i, batch) in texts.chunks(self.options.batch_size).enumerate() {
            log::info!("Embedding batch {}/{} ({} texts)", i + 1, total_batches, batch.len());
            let vectors = self.provider.embed_batch(batch)?;
            if vectors.len() != batch.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "batch {} returned {} embeddings for {} texts",
                    i + 1,
                    vectors.len(),
                    batch.len()
                ))
                .into());
            }
            embeddings.extend(vectors);
        }

        Ok(embeddings)
    }

    /// Write records in chunk documents and drop stale chunks left by a
    /// larger previous run. Returns the number of chunks written.
    fn write_chunks<T: Serialize>(&self, kind: &str, records: &[T]) -> Result<usize, GenerationError> {
        let total_chunks = records.len().div_ceil(self.options.chunk_size);

        for (i, chunk) in records.chunks(self.options.chunk_size).enumerate() {
            let records = serde_json::to_value(chunk).map_err(|source| StoreError::Malformed {
                collection: EMBEDDINGS_COLLECTION.to_string(),
                id: chunk_id(kind, i),
                source,
            })?;

            let mut document = Map::new();
            document.insert("chunk_index".to_string(), json!(i));
            document.insert("total_chunks".to_string(), json!(total_chunks));
            document.insert(kind.to_string(), records);
            document.insert("updated_at".to_string(), json!(Utc::now()));

            self.store
                .put_document(EMBEDDINGS_COLLECTION, &chunk_id(kind, i), &Value::Object(document))?;
            log::debug!("Stored {} chunk {}/{}", kind, i + 1, total_chunks);
        }

        let prefix = format!("{kind}_chunk_");
        for id in self.store.list_documents(EMBEDDINGS_COLLECTION)? {
            let stale = id
                .strip_prefix(&prefix)
                .and_then(|index| index.parse::<usize>().ok())
                .is_some_and(|index| index >= total_chunks);
            if stale {
                log::debug!("Removing stale chunk {}", id);
                self.store.delete_document(EMBEDDINGS_COLLECTION, &id)?;
            }
        }

        Ok(total_chunks)
    }
}

/// Store taxonomy lists, keeping the generation and version metadata
/// already in the document.
pub fn import_taxonomy(store: &dyn DocumentStore, taxonomy: &RawTaxonomy) -> Result<(), StoreError> {
    let fields = serde_json::to_value(taxonomy).map_err(|source| StoreError::Malformed {
        collection: TAXONOMY_COLLECTION.to_string(),
        id: GLOBAL_LISTS.to_string(),
        source,
    })?;
    store.update_document(TAXONOMY_COLLECTION, GLOBAL_LISTS, &fields)?;
    log::info!(
        "Imported taxonomy: {} keywords, {} problems, {} departments",
        taxonomy.keywords.labels().len(),
        taxonomy.problems.len(),
        taxonomy.departments.len()
    );
    Ok(())
}

fn chunk_id(kind: &str, index: usize) -> String {
    format!("{kind}_chunk_{index}")
}

fn load_chunked<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    kind: &str,
) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();
    let mut index = 0;

    while let Some(mut document) = store.get_document(EMBEDDINGS_COLLECTION, &chunk_id(kind, index))? {
        let malformed = |source| StoreError::Malformed {
            collection: EMBEDDINGS_COLLECTION.to_string(),
            id: chunk_id(kind, index),
            source,
        };

        let chunk_records = document
            .get_mut(kind)
            .map(Value::take)
            .unwrap_or_else(|| Value::Array(vec![]));
        let header: ChunkHeader = serde_json::from_value(document).map_err(malformed)?;
        let chunk: Vec<T> = serde_json::from_value(chunk_records).map_err(malformed)?;
        records.extend(chunk);

        index += 1;
        if header.total_chunks > 0 && index >= header.total_chunks {
            break;
        }
    }

    Ok(records)
}

/// All stored keyword records, in chunk order.
pub fn load_keyword_records(store: &dyn DocumentStore) -> Result<Vec<KeywordRecord>, StoreError> {
    load_chunked(store, KEYWORDS_KIND)
}

/// All stored problem records, in chunk order.
pub fn load_problem_records(store: &dyn DocumentStore) -> Result<Vec<ProblemRecord>, StoreError> {
    load_chunked(store, PROBLEMS_KIND)
}
