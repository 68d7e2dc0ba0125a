//! Taxonomy versioning.
//!
//! A taxonomy version is derived from its content: each list (keywords,
//! problems, departments) is hashed over its sorted `id:label:status` lines,
//! and the three list hashes are combined into a numeric version. Comparing
//! the stored version with the current one tells whether the stored
//! embeddings still describe the taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::storage::{DocumentStore, StoreError, GLOBAL_LISTS, TAXONOMY_COLLECTION};
use crate::taxonomy::{RawTaxonomy, RecordStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyVersion {
    pub version: u64,
    pub last_updated: DateTime<Utc>,
    pub keywords_count: usize,
    pub problems_count: usize,
    pub departments_count: usize,
    pub keywords_hash: String,
    pub problems_hash: String,
    pub departments_hash: String,
    #[serde(default)]
    pub embeddings_version: Option<u64>,
    #[serde(default)]
    pub embeddings_outdated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListChanges {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl ListChanges {
    fn between(current: usize, previous: usize, hash_changed: bool) -> Self {
        Self {
            added: current.saturating_sub(previous),
            removed: previous.saturating_sub(current),
            modified: usize::from(hash_changed),
        }
    }

    fn total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangesDetected {
    pub keywords: ListChanges,
    pub problems: ListChanges,
    pub departments: ListChanges,
}

impl ChangesDetected {
    pub fn total(&self) -> usize {
        self.keywords.total() + self.problems.total() + self.departments.total()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyChanges {
    pub has_changes: bool,
    pub changes_detected: ChangesDetected,
    pub embeddings_outdated: bool,
    pub recommend_regeneration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_embeddings_version: Option<u64>,
    pub current_taxonomy_version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingsStatus {
    pub needs_update: bool,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<TaxonomyChanges>,
}

/// Stable short hash of a list: CRC32 over its sorted lines, base-16.
fn list_hash(mut lines: Vec<String>) -> String {
    lines.sort();
    format!("{:08x}", crc32fast::hash(lines.join("|").as_bytes()))
}

/// Labels are their own ids in the raw lists.
fn label_lines<'a, I>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .map(|label| format!("{label}:{label}:{}", RecordStatus::Active.as_str()))
        .collect()
}

/// Compute the content version of a taxonomy.
pub fn calculate_taxonomy_version(taxonomy: &RawTaxonomy) -> TaxonomyVersion {
    let keywords = taxonomy.keywords.labels();

    let keywords_hash = list_hash(label_lines(keywords.iter().map(String::as_str)));
    let problems_hash = list_hash(label_lines(taxonomy.problems.iter().map(String::as_str)));
    let departments_hash = list_hash(
        taxonomy
            .departments
            .iter()
            .map(|d| format!("{}:{}:{}", d.id(), d.label(), RecordStatus::Active.as_str()))
            .collect(),
    );

    let combined = format!("{keywords_hash}-{problems_hash}-{departments_hash}");
    let digest = Sha256::digest(combined.as_bytes());
    let mut bytes = [0u8; 8];
    // 48 bits keeps the version an exact JSON number
    bytes[2..].copy_from_slice(&digest[..6]);

    TaxonomyVersion {
        version: u64::from_be_bytes(bytes),
        last_updated: Utc::now(),
        keywords_count: keywords.len(),
        problems_count: taxonomy.problems.len(),
        departments_count: taxonomy.departments.len(),
        keywords_hash,
        problems_hash,
        departments_hash,
        embeddings_version: None,
        embeddings_outdated: false,
    }
}

/// Persist the current version as the baseline for change detection.
pub fn update_taxonomy_version(
    store: &dyn DocumentStore,
    taxonomy: &RawTaxonomy,
) -> Result<TaxonomyVersion, StoreError> {
    let version = calculate_taxonomy_version(taxonomy);
    store.update_document(
        TAXONOMY_COLLECTION,
        GLOBAL_LISTS,
        &json!({
            "taxonomy_version_info": version,
            "taxonomy_version": version.version,
            "last_taxonomy_update": Utc::now(),
        }),
    )?;
    log::info!("Taxonomy version updated: {}", version.version);
    Ok(version)
}

/// Record that stored embeddings match `taxonomy_version`.
pub fn mark_embeddings_updated(
    store: &dyn DocumentStore,
    taxonomy_version: u64,
) -> Result<(), StoreError> {
    store.update_document(
        TAXONOMY_COLLECTION,
        GLOBAL_LISTS,
        &json!({
            "embeddings_taxonomy_version": taxonomy_version,
            "embeddings_updated_at": Utc::now(),
        }),
    )?;
    log::info!("Embeddings marked current for taxonomy version {}", taxonomy_version);
    Ok(())
}

/// Whether the taxonomy document records a completed chunked generation.
pub(crate) fn embeddings_exist(document: &Value) -> bool {
    document.get("embeddings_generated_at").is_some_and(|v| !v.is_null())
        || document.get("embeddings_structure").and_then(Value::as_str) == Some("chunked")
}

/// Compare the current taxonomy with the stored baseline.
///
/// With no baseline stored yet, the current version becomes the baseline and
/// changes are reported only if no embeddings exist.
pub fn detect_changes(
    store: &dyn DocumentStore,
    current: &RawTaxonomy,
) -> Result<TaxonomyChanges, StoreError> {
    let current_version = calculate_taxonomy_version(current);

    let Some(document) = store.get_document(TAXONOMY_COLLECTION, GLOBAL_LISTS)? else {
        return Ok(TaxonomyChanges {
            has_changes: true,
            changes_detected: ChangesDetected {
                keywords: ListChanges::between(current_version.keywords_count, 0, false),
                problems: ListChanges::between(current_version.problems_count, 0, false),
                departments: ListChanges::between(current_version.departments_count, 0, false),
            },
            embeddings_outdated: true,
            recommend_regeneration: true,
            last_embeddings_version: None,
            current_taxonomy_version: current_version.version,
        });
    };

    let embeddings_version = document
        .get("embeddings_taxonomy_version")
        .and_then(Value::as_u64);
    let have_embeddings = embeddings_exist(&document);
    let previous: Option<TaxonomyVersion> = document
        .get("taxonomy_version_info")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok());

    let Some(previous) = previous else {
        log::info!("No taxonomy baseline stored; saving current version");
        update_taxonomy_version(store, current)?;

        let added = |count: usize| if have_embeddings { 0 } else { count };
        return Ok(TaxonomyChanges {
            has_changes: !have_embeddings,
            changes_detected: ChangesDetected {
                keywords: ListChanges::between(added(current_version.keywords_count), 0, false),
                problems: ListChanges::between(added(current_version.problems_count), 0, false),
                departments: ListChanges::between(
                    added(current_version.departments_count),
                    0,
                    false,
                ),
            },
            embeddings_outdated: !have_embeddings,
            recommend_regeneration: !have_embeddings,
            last_embeddings_version: embeddings_version,
            current_taxonomy_version: current_version.version,
        });
    };

    let keywords_changed = current_version.keywords_hash != previous.keywords_hash;
    let problems_changed = current_version.problems_hash != previous.problems_hash;
    let departments_changed = current_version.departments_hash != previous.departments_hash;
    let has_changes = keywords_changed || problems_changed || departments_changed;

    let changes_detected = ChangesDetected {
        keywords: ListChanges::between(
            current_version.keywords_count,
            previous.keywords_count,
            keywords_changed,
        ),
        problems: ListChanges::between(
            current_version.problems_count,
            previous.problems_count,
            problems_changed,
        ),
        departments: ListChanges::between(
            current_version.departments_count,
            previous.departments_count,
            departments_changed,
        ),
    };

    let embeddings_outdated = has_changes
        || embeddings_version.is_some_and(|v| v != current_version.version);
    let recommend_regeneration = embeddings_outdated || changes_detected.total() > 0;

    log::debug!(
        "Taxonomy changes: has_changes={} outdated={} current={} embeddings={:?}",
        has_changes,
        embeddings_outdated,
        current_version.version,
        embeddings_version
    );

    Ok(TaxonomyChanges {
        has_changes,
        changes_detected,
        embeddings_outdated,
        recommend_regeneration,
        last_embeddings_version: embeddings_version,
        current_taxonomy_version: current_version.version,
    })
}

/// Whether stored embeddings need regenerating for the stored taxonomy.
pub fn check_embeddings_status(store: &dyn DocumentStore) -> Result<EmbeddingsStatus, StoreError> {
    let Some(document) = store.get_document(TAXONOMY_COLLECTION, GLOBAL_LISTS)? else {
        return Ok(EmbeddingsStatus {
            needs_update: true,
            reason: "Taxonomy not found".to_string(),
            changes: None,
        });
    };

    let taxonomy: RawTaxonomy =
        serde_json::from_value(document).map_err(|source| StoreError::Malformed {
            collection: TAXONOMY_COLLECTION.to_string(),
            id: GLOBAL_LISTS.to_string(),
            source,
        })?;

    let changes = detect_changes(store, &taxonomy)?;
    let status = if changes.recommend_regeneration {
        EmbeddingsStatus {
            needs_update: true,
            reason: format!("Detected {} taxonomy changes", changes.changes_detected.total()),
            changes: Some(changes),
        }
    } else {
        EmbeddingsStatus {
            needs_update: false,
            reason: "Embeddings are up to date".to_string(),
            changes: Some(changes),
        }
    };
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryDocumentStore;
    use crate::taxonomy::RawKeywords;

    fn taxonomy(keywords: &[&str]) -> RawTaxonomy {
        RawTaxonomy {
            keywords: RawKeywords::Flat(keywords.iter().map(|s| s.to_string()).collect()),
            problems: vec!["Preço Alto".to_string()],
            departments: vec![],
        }
    }

    #[test]
    fn test_version_is_content_derived() {
        let a = calculate_taxonomy_version(&taxonomy(&["A&B - Jantar", "Lazer - Spa"]));
        let b = calculate_taxonomy_version(&taxonomy(&["Lazer - Spa", "A&B - Jantar"]));
        let c = calculate_taxonomy_version(&taxonomy(&["A&B - Jantar", "Lazer - Academia"]));

        assert_eq!(a.version, b.version);
        assert_eq!(a.keywords_hash, b.keywords_hash);
        assert_ne!(a.keywords_hash, c.keywords_hash);
        assert_ne!(a.version, c.version);
        assert_eq!(a.problems_hash, c.problems_hash);
        assert!(a.version < (1 << 48));
        assert_eq!(a.keywords_count, 2);
    }

    #[test]
    fn test_detect_changes_without_document() {
        let store = MemoryDocumentStore::new();
        let changes = detect_changes(&store, &taxonomy(&["A&B - Jantar"])).unwrap();
        assert!(changes.has_changes);
        assert!(changes.recommend_regeneration);
        assert_eq!(changes.changes_detected.keywords.added, 1);
    }

    #[test]
    fn test_detect_changes_saves_baseline() {
        let store = MemoryDocumentStore::new();
        let current = taxonomy(&["A&B - Jantar"]);
        store
            .put_document(
                TAXONOMY_COLLECTION,
                GLOBAL_LISTS,
                &json!({"keywords": ["A&B - Jantar"], "embeddings_structure": "chunked"}),
            )
            .unwrap();

        let first = detect_changes(&store, &current).unwrap();
        assert!(!first.has_changes);
        assert!(!first.recommend_regeneration);

        let doc = store.get_document(TAXONOMY_COLLECTION, GLOBAL_LISTS).unwrap().unwrap();
        assert!(doc.get("taxonomy_version_info").is_some());

        let second = detect_changes(&store, &current).unwrap();
        assert!(!second.has_changes);
        assert_eq!(second.changes_detected, ChangesDetected::default());
    }

    #[test]
    fn test_detect_added_keyword() {
        let store = MemoryDocumentStore::new();
        let before = taxonomy(&["A&B - Jantar"]);
        store
            .put_document(TAXONOMY_COLLECTION, GLOBAL_LISTS, &json!({}))
            .unwrap();
        let version = update_taxonomy_version(&store, &before).unwrap();
        mark_embeddings_updated(&store, version.version).unwrap();

        let after = taxonomy(&["A&B - Jantar", "Lazer - Spa"]);
        let changes = detect_changes(&store, &after).unwrap();
        assert!(changes.has_changes);
        assert!(changes.embeddings_outdated);
        assert_eq!(changes.changes_detected.keywords, ListChanges { added: 1, removed: 0, modified: 1 });
        assert_eq!(changes.last_embeddings_version, Some(version.version));
    }

    #[test]
    fn test_check_embeddings_status() {
        let store = MemoryDocumentStore::new();
        let status = check_embeddings_status(&store).unwrap();
        assert!(status.needs_update);
        assert!(status.changes.is_none());

        store
            .put_document(
                TAXONOMY_COLLECTION,
                GLOBAL_LISTS,
                &json!({"keywords": ["A&B - Jantar"], "problems": ["Preço Alto"]}),
            )
            .unwrap();
        let version = update_taxonomy_version(&store, &taxonomy(&["A&B - Jantar"])).unwrap();
        mark_embeddings_updated(&store, version.version).unwrap();

        let status = check_embeddings_status(&store).unwrap();
        assert!(!status.needs_update, "{}", status.reason);
    }
}
