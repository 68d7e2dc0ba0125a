//! Keyword usage counters used as the reranking frequency prior.
//!
//! Counters only ever grow. Each confirmed classification increments the
//! confirmed label once. The table is an explicit object handed to the
//! reranker, so tests and concurrent pipelines keep separate state.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::storage::{read_json, write_json, DocumentStore, StoreError};

pub const FREQUENCY_COLLECTION: &str = "frequency";
pub const FREQUENCY_DOCUMENT: &str = "keywords";

/// Prior counts from historical classification volume.
pub static SEED_FREQUENCIES: &[(&str, u64)] = &[
    ("A&B - Serviço", 150),
    ("A&B - Gastronomia", 120),
    ("A&B - Café da manhã", 100),
    ("Limpeza - Quarto", 90),
    ("Tecnologia - Wi-fi", 85),
    ("Atendimento", 80),
    ("Recepção - Atendimento", 75),
    ("Localização", 70),
    ("Experiência", 65),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFrequency {
    pub label: String,
    pub frequency: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FrequencySnapshot {
    counts: BTreeMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: Mutex<HashMap<String, u64>>,
}

impl FrequencyTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-loaded with [`SEED_FREQUENCIES`].
    pub fn seeded() -> Self {
        Self::from_counts(SEED_FREQUENCIES.iter().map(|(l, c)| (l.to_string(), *c)))
    }

    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        Self {
            counts: Mutex::new(counts.into_iter().collect()),
        }
    }

    /// Record one confirmed use of `label`. Returns the new count.
    pub fn update_frequency(&self, label: &str) -> u64 {
        match self.counts.lock() {
            Ok(mut counts) => {
                let count = counts.entry(label.to_string()).or_insert(0);
                *count = count.saturating_add(1);
                *count
            }
            Err(_) => {
                log::warn!("Frequency table lock poisoned; dropping update for '{}'", label);
                0
            }
        }
    }

    /// Tracked count, if the label has been seen.
    pub fn count(&self, label: &str) -> Option<u64> {
        self.counts.lock().ok().and_then(|c| c.get(label).copied())
    }

    /// Largest tracked count, never below 1.
    pub fn max_count(&self) -> u64 {
        self.counts
            .lock()
            .ok()
            .and_then(|c| c.values().copied().max())
            .unwrap_or(1)
            .max(1)
    }

    /// Count divided by the current maximum. Unseen labels count as 1.
    pub fn score(&self, label: &str) -> f64 {
        let count = self.count(label).unwrap_or(1).max(1);
        (count as f64 / self.max_count() as f64).min(1.0)
    }

    pub fn len(&self) -> usize {
        self.counts.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most frequent labels, highest first, ties by label.
    pub fn top(&self, n: usize) -> Vec<LabelFrequency> {
        let mut entries: Vec<LabelFrequency> = self
            .counts
            .lock()
            .map(|c| {
                c.iter()
                    .map(|(label, frequency)| LabelFrequency {
                        label: label.clone(),
                        frequency: *frequency,
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.label.cmp(&b.label)));
        entries.truncate(n);
        entries
    }

    /// Load the persisted table, or the seeded one when nothing is stored.
    pub fn load(store: &dyn DocumentStore) -> Result<Self, StoreError> {
        let snapshot: Option<FrequencySnapshot> =
            read_json(store, FREQUENCY_COLLECTION, FREQUENCY_DOCUMENT)?;
        Ok(match snapshot {
            Some(snapshot) => Self::from_counts(snapshot.counts),
            None => Self::seeded(),
        })
    }

    pub fn save(&self, store: &dyn DocumentStore) -> Result<(), StoreError> {
        let counts = self
            .counts
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        write_json(
            store,
            FREQUENCY_COLLECTION,
            FREQUENCY_DOCUMENT,
            &FrequencySnapshot { counts },
        )
    }
}
