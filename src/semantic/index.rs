//! In-memory vector index with cosine similarity search.
//!
//! Holds the stored keyword or problem embeddings, keyed by label, and
//! answers threshold and band queries for candidate recall.

use std::collections::HashMap;

/// An entry in the vector index.
#[derive(Debug, Clone)]
pub struct VectorEntry {
    /// Department the label is filed under (empty for problems)
    pub department_id: String,
    pub embedding: Vec<f32>,
}

/// In-memory vector index for candidate recall.
///
/// Supports:
/// - Insert/remove by label
/// - Cosine similarity search above a threshold
/// - Band search `(lower, upper]` for the fallback recall pass
pub struct VectorIndex {
    /// Label -> (department, embedding)
    entries: HashMap<String, VectorEntry>,
    /// Expected embedding dimensions
    dimensions: usize,
}

/// Search result from the vector index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub label: String,
    pub department_id: String,
    /// Cosine similarity score
    pub score: f32,
}

impl VectorIndex {
    /// Create a new empty vector index with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            entries: HashMap::new(),
            dimensions,
        }
    }

    /// Build an index from `(label, department, embedding)` triples.
    ///
    /// Dimensions come from the first non-empty embedding. Entries with an
    /// empty embedding are skipped with a warning.
    pub fn from_entries<I>(entries: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = (String, String, Vec<f32>)>,
    {
        let mut index: Option<VectorIndex> = None;
        for (label, department_id, embedding) in entries {
            if embedding.is_empty() {
                log::warn!("Skipping '{}': no embedding stored", label);
                continue;
            }
            index
                .get_or_insert_with(|| VectorIndex::new(embedding.len()))
                .insert(&label, &department_id, embedding)?;
        }
        Ok(index.unwrap_or_else(|| VectorIndex::new(0)))
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or update an entry in the index.
    ///
    /// Returns an error if the embedding has zero norm (cannot be normalized).
    pub fn insert(
        &mut self,
        label: &str,
        department_id: &str,
        embedding: Vec<f32>,
    ) -> Result<(), IndexError> {
        if embedding.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: embedding.len(),
            });
        }

        if l2_norm(&embedding) < f32::EPSILON {
            return Err(IndexError::ZeroNormVector);
        }

        self.entries.insert(
            label.to_string(),
            VectorEntry {
                department_id: department_id.to_string(),
                embedding,
            },
        );

        Ok(())
    }

    pub fn remove(&mut self, label: &str) -> Option<VectorEntry> {
        self.entries.remove(label)
    }

    pub fn get(&self, label: &str) -> Option<&VectorEntry> {
        self.entries.get(label)
    }

    /// Entries scoring at or above `threshold`, best first, at most `limit`.
    pub fn search(
        &self,
        query: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        self.scored(query, |score| score >= threshold, limit)
    }

    /// Entries scoring in `(lower, upper]`, best first, at most `limit`.
    pub fn search_band(
        &self,
        query: &[f32],
        lower: f32,
        upper: f32,
        limit: usize,
    ) -> Result<Vec<SearchResult>, IndexError> {
        self.scored(query, |score| score > lower && score <= upper, limit)
    }

    fn scored<F>(&self, query: &[f32], keep: F, limit: usize) -> Result<Vec<SearchResult>, IndexError>
    where
        F: Fn(f32) -> bool,
    {
        if self.entries.is_empty() {
            return Ok(vec![]);
        }

        if query.len() != self.dimensions {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimensions,
                got: query.len(),
            });
        }

        let query_norm = l2_norm(query);
        if query_norm < f32::EPSILON {
            return Err(IndexError::ZeroNormVector);
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .filter_map(|(label, entry)| {
                let score = cosine_with_norm(query, &entry.embedding, query_norm);
                keep(score).then(|| SearchResult {
                    label: label.clone(),
                    department_id: entry.department_id.clone(),
                    score,
                })
            })
            .collect();

        // Score descending, label ascending for stable output
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        results.truncate(limit);

        Ok(results)
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine_with_norm(query: &[f32], target: &[f32], query_norm: f32) -> f32 {
    let target_norm = l2_norm(target);
    if target_norm < f32::EPSILON {
        return 0.0;
    }

    let dot_product: f32 = query.iter().zip(target.iter()).map(|(a, b)| a * b).sum();
    dot_product / (query_norm * target_norm)
}

/// Cosine similarity of two vectors. Zero for mismatched lengths or zero
/// vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm = l2_norm(a);
    if norm < f32::EPSILON {
        return 0.0;
    }
    cosine_with_norm(a, b, norm)
}

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Cannot store or search with zero-norm vector")]
    ZeroNormVector,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VectorIndex {
        let mut index = VectorIndex::new(3);
        index.insert("A&B - Serviço", "A&B", vec![1.0, 0.0, 0.0]).unwrap();
        index.insert("Operações - Atendimento", "Operações", vec![0.8, 0.6, 0.0]).unwrap();
        index.insert("Tecnologia - Wi-fi", "TI", vec![0.0, 0.0, 1.0]).unwrap();
        index
    }

    #[test]
    fn test_insert_and_get() {
        let index = sample_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("Tecnologia - Wi-fi").unwrap().department_id, "TI");
    }

    #[test]
    fn test_insert_dimension_mismatch() {
        let mut index = VectorIndex::new(3);
        let result = index.insert("x", "A&B", vec![1.0, 0.0]);
        assert!(matches!(result, Err(IndexError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_insert_zero_norm_rejected() {
        let mut index = VectorIndex::new(3);
        let result = index.insert("x", "A&B", vec![0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(IndexError::ZeroNormVector)));
    }

    #[test]
    fn test_search_orders_by_score() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.1, 0.0], 0.0, 10).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].label, "A&B - Serviço");
        assert_eq!(results[1].label, "Operações - Atendimento");
    }

    #[test]
    fn test_search_threshold_and_limit() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0, 0.0], 0.5, 10).unwrap();
        assert_eq!(results.len(), 2);

        let results = index.search(&[1.0, 0.0, 0.0], 0.0, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_band_excludes_upper_hits() {
        let index = sample_index();
        // A&B - Serviço scores 1.0, Operações - Atendimento 0.8
        let results = index.search_band(&[1.0, 0.0, 0.0], 0.5, 0.9, 10).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].label, "Operações - Atendimento");
    }

    #[test]
    fn test_from_entries_skips_missing_embeddings() {
        let index = VectorIndex::from_entries(vec![
            ("a".to_string(), "A&B".to_string(), vec![]),
            ("b".to_string(), "A&B".to_string(), vec![0.5, 0.5]),
        ])
        .unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.dimensions(), 2);
    }

    #[test]
    fn test_empty_index_search() {
        let index = VectorIndex::new(0);
        assert!(index.search(&[1.0], 0.0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
