//! JSON document storage.
//!
//! Documents are addressed by `(collection, id)`. The local backend keeps one
//! pretty-printed file per document and replaces it through a temp file and
//! rename, so a reader sees either the old or the new document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::eid::Eid;

/// Collection holding the taxonomy lists document.
pub const TAXONOMY_COLLECTION: &str = "taxonomy";
/// Document with the raw lists plus generation and version metadata.
pub const GLOBAL_LISTS: &str = "global-lists";
/// Collection holding chunked embedding records.
pub const EMBEDDINGS_COLLECTION: &str = "embeddings";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed document {collection}/{id}: {source}")]
    Malformed {
        collection: String,
        id: String,
        source: serde_json::Error,
    },

    #[error("Invalid document key: {0}")]
    InvalidKey(String),

    #[error("Document store lock poisoned")]
    Poisoned,
}

/// JSON documents addressed by collection and id.
pub trait DocumentStore: Send + Sync {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;
    fn put_document(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError>;
    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError>;
    fn list_documents(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Merge the top-level fields of `fields` into the document, creating it
    /// when absent.
    fn update_document(&self, collection: &str, id: &str, fields: &Value) -> Result<(), StoreError> {
        let merged = match (self.get_document(collection, id)?, fields) {
            (Some(Value::Object(mut existing)), Value::Object(update)) => {
                for (key, value) in update {
                    existing.insert(key.clone(), value.clone());
                }
                Value::Object(existing)
            }
            _ => fields.clone(),
        };
        self.put_document(collection, id, &merged)
    }
}

/// Read a document and deserialize it.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError> {
    match store.get_document(collection, id)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                collection: collection.to_string(),
                id: id.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Serialize a value and store it as a document.
pub fn write_json<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), StoreError> {
    let document = serde_json::to_value(value).map_err(|source| StoreError::Malformed {
        collection: collection.to_string(),
        id: id.to_string(),
        source,
    })?;
    store.put_document(collection, id, &document)
}

fn check_key(part: &str) -> Result<(), StoreError> {
    if part.is_empty() || part.contains(['/', '\\']) || part.starts_with('.') {
        return Err(StoreError::InvalidKey(part.to_string()));
    }
    Ok(())
}

/// One JSON file per document under `<base_dir>/<collection>/<id>.json`.
#[derive(Clone)]
pub struct LocalDocumentStore {
    pub base_dir: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(base_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(base_dir)?;
        Ok(LocalDocumentStore {
            base_dir: base_dir.to_path_buf(),
        })
    }

    fn path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        check_key(collection)?;
        check_key(id)?;
        Ok(self.base_dir.join(collection).join(format!("{id}.json")))
    }
}

impl DocumentStore for LocalDocumentStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(collection, id)?;
        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                collection: collection.to_string(),
                id: id.to_string(),
                source,
            })
    }

    fn put_document(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        let path = self.path(collection, id)?;
        let dir = self.base_dir.join(collection);
        std::fs::create_dir_all(&dir)?;

        let data = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Malformed {
            collection: collection.to_string(),
            id: id.to_string(),
            source,
        })?;

        let temp_path = dir.join(format!(".{}-{id}.json", Eid::new()));
        std::fs::write(&temp_path, data)?;
        if let Err(e) = std::fs::rename(&temp_path, &path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let path = self.path(collection, id)?;
        match std::fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        check_key(collection)?;
        let entries = match std::fs::read_dir(self.base_dir.join(collection)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if let Some(id) = name.strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Process-local store, used by tests and dry runs.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<(String, String), Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(documents.get(&(collection.to_string(), id.to_string())).cloned())
    }

    fn put_document(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        check_key(collection)?;
        check_key(id)?;
        let mut documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        documents.insert((collection.to_string(), id.to_string()), document.clone());
        Ok(())
    }

    fn delete_document(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        documents.remove(&(collection.to_string(), id.to_string()));
        Ok(())
    }

    fn list_documents(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let documents = self.documents.lock().map_err(|_| StoreError::Poisoned)?;
        let mut ids: Vec<String> = documents
            .keys()
            .filter(|(c, _)| c == collection)
            .map(|(_, id)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(store: &dyn DocumentStore) {
        assert!(store.get_document("taxonomy", "keywords").unwrap().is_none());

        store
            .put_document("taxonomy", "keywords", &json!({"a": 1, "b": 2}))
            .unwrap();
        store
            .update_document("taxonomy", "keywords", &json!({"b": 3, "c": 4}))
            .unwrap();

        let doc = store.get_document("taxonomy", "keywords").unwrap().unwrap();
        assert_eq!(doc, json!({"a": 1, "b": 3, "c": 4}));

        store.put_document("taxonomy", "problems", &json!([])).unwrap();
        assert_eq!(
            store.list_documents("taxonomy").unwrap(),
            vec!["keywords", "problems"]
        );

        store.delete_document("taxonomy", "problems").unwrap();
        store.delete_document("taxonomy", "problems").unwrap();
        assert_eq!(store.list_documents("taxonomy").unwrap(), vec!["keywords"]);
        assert!(store.list_documents("missing").unwrap().is_empty());
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryDocumentStore::new());
    }

    #[test]
    fn test_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path()).unwrap();
        exercise(&store);
        assert!(dir.path().join("taxonomy").join("keywords.json").is_file());
    }

    #[test]
    fn test_update_creates_missing_document() {
        let store = MemoryDocumentStore::new();
        store
            .update_document("metadata", "taxonomy_version_info", &json!({"version": 2}))
            .unwrap();
        let doc = store.get_document("metadata", "taxonomy_version_info").unwrap();
        assert_eq!(doc, Some(json!({"version": 2})));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.put_document("..", "x", &json!({})),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get_document("taxonomy", "a/b"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_typed_roundtrip_and_malformed() {
        let store = MemoryDocumentStore::new();
        write_json(&store, "frequency", "keywords", &vec![("a", 1u64)]).unwrap();
        let back: Option<Vec<(String, u64)>> = read_json(&store, "frequency", "keywords").unwrap();
        assert_eq!(back, Some(vec![("a".to_string(), 1)]));

        let bad: Result<Option<u64>, _> = read_json(&store, "frequency", "keywords");
        assert!(matches!(bad, Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_local_list_reports_unreadable_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path()).unwrap();
        std::fs::write(dir.path().join("embeddings"), b"not a directory").unwrap();

        assert!(matches!(
            store.list_documents("embeddings"),
            Err(StoreError::Io(_))
        ));
    }

    #[test]
    fn test_failed_replace_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path()).unwrap();
        let blocked = dir.path().join("taxonomy").join("keywords.json");
        std::fs::create_dir_all(&blocked).unwrap();
        std::fs::write(blocked.join("occupied"), b"x").unwrap();

        assert!(store.put_document("taxonomy", "keywords", &json!({"a": 1})).is_err());

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("taxonomy"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with('.'))
            .collect();
        assert!(leftovers.is_empty());
    }
}
