use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use super::ConceptProvider;
use crate::classifier::{Classifier, RecallSettings};
use crate::frequency::FrequencyTable;
use crate::orchestrator::{
    import_taxonomy, load_keyword_records, load_problem_records, GenerationError,
    GenerationOptions, GenerationOutcome, Orchestrator,
};
use crate::rerank::RerankWeights;
use crate::storage::{DocumentStore, MemoryDocumentStore, StoreError, EMBEDDINGS_COLLECTION};
use crate::taxonomy::{RawKeywords, RawTaxonomy};
use crate::validation::TaxonomyValidator;
use crate::version::check_embeddings_status;

fn generated_store() -> MemoryDocumentStore {
    let store = MemoryDocumentStore::new();
    import_taxonomy(&store, &RawTaxonomy::builtin()).unwrap();

    let validator = TaxonomyValidator::new();
    let outcome = Orchestrator::new(&store, &ConceptProvider, &validator)
        .run(false)
        .unwrap();
    assert!(matches!(outcome, GenerationOutcome::Generated(_)));
    store
}

/// Memory store whose writes to one chunk document fail while armed.
struct FailingChunkStore {
    inner: MemoryDocumentStore,
    failing_chunk: &'static str,
    armed: AtomicBool,
}

impl DocumentStore for FailingChunkStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get_document(collection, id)
    }

    fn put_document(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        let failing = collection == EMBEDDINGS_COLLECTION && id == self.failing_chunk;
        if failing && self.armed.load(Ordering::SeqCst) {
            return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into());
        }
        self.inner.put_document(collection, id, document)
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete_document(collection, id)
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list_documents(collection)
    }
}

fn classifier(store: &dyn DocumentStore, frequencies: Arc<FrequencyTable>) -> Classifier {
    Classifier::load(
        store,
        Box::new(ConceptProvider),
        frequencies,
        RerankWeights::default(),
        RecallSettings::default(),
    )
    .unwrap()
}

#[test]
fn test_generated_records_use_authoritative_departments() {
    let store = generated_store();
    let keywords = load_keyword_records(&store).unwrap();
    let problems = load_problem_records(&store).unwrap();

    assert_eq!(keywords.len(), RawTaxonomy::builtin().keywords.labels().len());
    assert_eq!(problems.len(), 8);

    let wifi = keywords.iter().find(|k| k.label == "Tecnologia - Wi-fi").unwrap();
    assert_eq!(wifi.department_id, "TI");
    assert_eq!(wifi.embedding.len(), 6);
    assert!(wifi.id.starts_with("kw_"));

    let cleaning = keywords.iter().find(|k| k.label == "Limpeza - Quarto").unwrap();
    assert_eq!(cleaning.department_id, "Governança");
}

#[test]
fn test_status_tracks_taxonomy_changes() {
    let store = generated_store();
    assert!(!check_embeddings_status(&store).unwrap().needs_update);

    let mut taxonomy = RawTaxonomy::builtin();
    let mut keywords = taxonomy.keywords.labels();
    keywords.push("Lazer - Kids Club".to_string());
    taxonomy.keywords = RawKeywords::Flat(keywords);
    import_taxonomy(&store, &taxonomy).unwrap();

    let status = check_embeddings_status(&store).unwrap();
    assert!(status.needs_update);
    let changes = status.changes.unwrap();
    assert_eq!(changes.changes_detected.keywords.added, 1);
}

#[test]
fn test_classify_wifi_comment() {
    let store = generated_store();
    let classifier = classifier(&store, Arc::new(FrequencyTable::seeded()));

    let result = classifier.classify("o wifi do quarto não funciona", None).unwrap();

    assert!(result.expanded_query.contains("internet"));
    assert_eq!(result.keywords[0].label, "Tecnologia - Wi-fi");
    assert_eq!(result.keywords[0].department, "TI");
    assert!(result.keywords[0].final_score > 0.5);
    assert_eq!(result.problems[0].label, "Wi-Fi Instável");
}

#[test]
fn test_classify_with_required_department() {
    let store = generated_store();
    let classifier = classifier(&store, Arc::new(FrequencyTable::seeded()));

    let in_ti = classifier.classify("o wifi do quarto não funciona", Some("TI")).unwrap();
    assert_eq!(in_ti.keywords[0].label, "Tecnologia - Wi-fi");
    assert!(in_ti.keywords.iter().all(|k| !k.hard_zeroed));

    let in_ab = classifier.classify("o wifi do quarto não funciona", Some("A&B")).unwrap();
    assert!(in_ab.keywords.iter().all(|k| k.label != "Tecnologia - Wi-fi"));
    assert_eq!(in_ab.required_department.as_deref(), Some("A&B"));
}

#[test]
fn test_confirm_updates_persisted_frequency() {
    let store = generated_store();
    let frequencies = Arc::new(FrequencyTable::load(&store).unwrap());
    let classifier = classifier(&store, frequencies.clone());

    assert_eq!(classifier.confirm("Tecnologia - Wi-fi"), 86);
    frequencies.save(&store).unwrap();

    let restored = FrequencyTable::load(&store).unwrap();
    assert_eq!(restored.count("Tecnologia - Wi-fi"), Some(86));
    assert_eq!(classifier.reranker().stats().total_keywords_tracked, 9);
}

#[test]
fn test_classify_rejects_empty_text() {
    let store = generated_store();
    let classifier = classifier(&store, Arc::new(FrequencyTable::new()));
    assert!(matches!(
        classifier.classify("   ", None),
        Err(crate::classifier::ClassifyError::EmptyText)
    ));
}

#[test]
fn test_classify_before_generation_finds_nothing() {
    let store = MemoryDocumentStore::new();
    let classifier = classifier(&store, Arc::new(FrequencyTable::new()));
    let result = classifier.classify("o café estava frio", None).unwrap();
    assert!(result.keywords.is_empty());
    assert!(result.problems.is_empty());
}

#[test]
fn test_classify_keeps_inferred_keyword_in_its_department() {
    let store = MemoryDocumentStore::new();
    let mut taxonomy = RawTaxonomy::builtin();
    let mut keywords = taxonomy.keywords.labels();
    keywords.push("Limpeza - Corredor".to_string());
    taxonomy.keywords = RawKeywords::Flat(keywords);
    import_taxonomy(&store, &taxonomy).unwrap();

    let validator = TaxonomyValidator::new();
    Orchestrator::new(&store, &ConceptProvider, &validator).run(false).unwrap();

    let record = load_keyword_records(&store)
        .unwrap()
        .into_iter()
        .find(|k| k.label == "Limpeza - Corredor")
        .unwrap();
    assert_eq!(record.department_id, "Governança");

    let settings = RecallSettings {
        top_n: 100,
        ..RecallSettings::default()
    };
    let classifier = Classifier::load(
        &store,
        Box::new(ConceptProvider),
        Arc::new(FrequencyTable::seeded()),
        RerankWeights::default(),
        settings,
    )
    .unwrap();

    let result = classifier
        .classify("o corredor estava sujo, limpeza ruim", Some("Governança"))
        .unwrap();
    let corridor = result
        .keywords
        .iter()
        .find(|k| k.label == "Limpeza - Corredor")
        .unwrap();
    assert_eq!(corridor.department, "Governança");
    assert!(!corridor.hard_zeroed);
    assert_eq!(corridor.signals.structural_score, 1.0);
    assert!(corridor.final_score > 0.0);
    assert!(result.keywords.iter().all(|k| !k.hard_zeroed));
}

#[test]
fn test_forced_rerun_recovers_from_failed_chunk_write() {
    let store = FailingChunkStore {
        inner: MemoryDocumentStore::new(),
        failing_chunk: "keywords_chunk_2",
        armed: AtomicBool::new(true),
    };
    let taxonomy = RawTaxonomy::builtin();
    import_taxonomy(&store, &taxonomy).unwrap();

    let validator = TaxonomyValidator::new();
    let options = GenerationOptions {
        batch_size: 20,
        chunk_size: 10,
    };
    let orchestrator = Orchestrator::new(&store, &ConceptProvider, &validator).with_options(options);

    let failed = orchestrator.run(false);
    assert!(matches!(failed, Err(GenerationError::Store(StoreError::Io(_)))));
    assert!(store.get_document(EMBEDDINGS_COLLECTION, "keywords_chunk_0").unwrap().is_some());
    assert!(check_embeddings_status(&store).unwrap().needs_update);

    store.armed.store(false, Ordering::SeqCst);
    let outcome = orchestrator.run(true).unwrap();
    assert!(matches!(outcome, GenerationOutcome::Generated(_)));

    let keywords = load_keyword_records(&store).unwrap();
    assert_eq!(keywords.len(), taxonomy.keywords.labels().len());
    assert_eq!(load_problem_records(&store).unwrap().len(), taxonomy.problems.len());
    assert!(!check_embeddings_status(&store).unwrap().needs_update);
}
