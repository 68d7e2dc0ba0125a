//! Guest feedback classification.
//!
//! The pipeline for one comment:
//! 1. Expand the text with domain vocabulary ([`expand_query`])
//! 2. Embed the expanded text
//! 3. Recall keywords and problems by cosine similarity, with a lower-band
//!    fallback pass when too few candidates clear the threshold
//! 4. Keep only keywords of the required department, when one is given
//! 5. Rerank the keywords
//!
//! Confirming a classification feeds the reranker's frequency prior.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::frequency::FrequencyTable;
use crate::orchestrator::{load_keyword_records, load_problem_records};
use crate::rerank::{RerankWeights, Reranker, RerankingSignals};
use crate::semantic::{
    expand_query, EmbeddingError, EmbeddingProvider, IndexError, SearchResult, VectorIndex,
};
use crate::storage::{DocumentStore, StoreError};
use crate::taxonomy::{Candidate, KeywordRecord, ProblemRecord, RecordStatus};
use crate::validation::TaxonomyValidator;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Nothing to classify: text is empty")]
    EmptyText,

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Similarity thresholds for candidate recall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecallSettings {
    pub keyword_threshold: f32,
    pub keyword_fallback_threshold: f32,
    pub problem_threshold: f32,
    pub problem_fallback_threshold: f32,
    /// Below this many candidates the fallback band is searched too.
    pub min_candidates: usize,
    pub top_n: usize,
}

impl Default for RecallSettings {
    fn default() -> Self {
        Self {
            keyword_threshold: 0.30,
            keyword_fallback_threshold: 0.20,
            problem_threshold: 0.40,
            problem_fallback_threshold: 0.25,
            min_candidates: 3,
            top_n: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecallMethod {
    /// Every candidate cleared the main threshold.
    Embedding,
    /// The fallback band contributed candidates.
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub label: String,
    pub department: String,
    pub final_score: f64,
    pub signals: RerankingSignals,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hard_zeroed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemMatch {
    pub label: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub text: String,
    pub expanded_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_department: Option<String>,
    pub keywords: Vec<KeywordMatch>,
    pub problems: Vec<ProblemMatch>,
    pub recall_method: RecallMethod,
}

pub struct Classifier {
    provider: Box<dyn EmbeddingProvider>,
    keywords: VectorIndex,
    problems: VectorIndex,
    validator: Arc<TaxonomyValidator>,
    reranker: Reranker,
    settings: RecallSettings,
}

impl Classifier {
    pub fn new(
        provider: Box<dyn EmbeddingProvider>,
        keywords: VectorIndex,
        problems: VectorIndex,
        validator: Arc<TaxonomyValidator>,
        reranker: Reranker,
        settings: RecallSettings,
    ) -> Self {
        Self {
            provider,
            keywords,
            problems,
            validator,
            reranker,
            settings,
        }
    }

    /// Build both indexes from stored records. Archived records are left out.
    pub fn from_records(
        provider: Box<dyn EmbeddingProvider>,
        keyword_records: Vec<KeywordRecord>,
        problem_records: Vec<ProblemRecord>,
        validator: Arc<TaxonomyValidator>,
        reranker: Reranker,
        settings: RecallSettings,
    ) -> Result<Self, ClassifyError> {
        let keywords = VectorIndex::from_entries(
            keyword_records
                .into_iter()
                .filter(|r| r.status != RecordStatus::Archived)
                .map(|r| (r.label, r.department_id, r.embedding)),
        )?;
        let problems = VectorIndex::from_entries(
            problem_records
                .into_iter()
                .filter(|r| r.status != RecordStatus::Archived)
                .map(|r| (r.label, String::new(), r.embedding)),
        )?;

        log::info!(
            "Classifier ready: {} keywords, {} problems indexed",
            keywords.len(),
            problems.len()
        );

        Ok(Self::new(provider, keywords, problems, validator, reranker, settings))
    }

    /// Build from the records the orchestrator stored.
    pub fn load(
        store: &dyn DocumentStore,
        provider: Box<dyn EmbeddingProvider>,
        frequencies: Arc<FrequencyTable>,
        weights: RerankWeights,
        settings: RecallSettings,
    ) -> Result<Self, ClassifyError> {
        let validator = Arc::new(TaxonomyValidator::new());
        let reranker = Reranker::new(validator.clone(), frequencies, weights);
        Self::from_records(
            provider,
            load_keyword_records(store)?,
            load_problem_records(store)?,
            validator,
            reranker,
            settings,
        )
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }

    pub fn validator(&self) -> &TaxonomyValidator {
        &self.validator
    }

    pub fn classify(
        &self,
        text: &str,
        required_department: Option<&str>,
    ) -> Result<Classification, ClassifyError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClassifyError::EmptyText);
        }

        let expanded_query = expand_query(text);
        log::debug!("Expanded query: {}", expanded_query);
        let query = self.provider.embed(&expanded_query)?;

        let s = &self.settings;
        let (keyword_hits, keyword_fallback) = recall(
            &self.keywords,
            &query,
            s.keyword_threshold,
            s.keyword_fallback_threshold,
            s.min_candidates,
            s.top_n,
        )?;
        let (problem_hits, problem_fallback) = recall(
            &self.problems,
            &query,
            s.problem_threshold,
            s.problem_fallback_threshold,
            s.min_candidates,
            s.top_n,
        )?;

        let candidates: Vec<Candidate> = keyword_hits
            .into_iter()
            .map(|hit| Candidate::new(&hit.label, &hit.department_id, f64::from(hit.score)))
            .collect();
        let recalled = candidates.len();
        let candidates = self.validator.filter_by_department(candidates, required_department);
        if let Some(department) = required_department {
            log::debug!(
                "Department filter '{}' kept {}/{} candidates",
                department,
                candidates.len(),
                recalled
            );
        }

        let keywords = self
            .reranker
            .rerank(candidates, text, required_department)
            .into_iter()
            .map(|ranked| KeywordMatch {
                label: ranked.candidate.label,
                department: ranked.candidate.department_id,
                final_score: ranked.reranking_signals.final_score,
                signals: ranked.reranking_signals,
                hard_zeroed: ranked.hard_zeroed,
            })
            .collect();

        let problems = problem_hits
            .into_iter()
            .map(|hit| ProblemMatch {
                label: hit.label,
                similarity: f64::from(hit.score),
            })
            .collect();

        let recall_method = if keyword_fallback || problem_fallback {
            RecallMethod::Hybrid
        } else {
            RecallMethod::Embedding
        };

        Ok(Classification {
            text: text.to_string(),
            expanded_query,
            required_department: required_department.map(str::to_string),
            keywords,
            problems,
            recall_method,
        })
    }

    /// Record that `label` was the accepted keyword for a comment.
    pub fn confirm(&self, label: &str) -> u64 {
        let count = self.reranker.update_frequency(label);
        log::info!("Confirmed '{}' (frequency {})", label, count);
        count
    }
}

/// Threshold search, topped up from `(fallback, threshold]` when fewer than
/// `min_candidates` clear the threshold. Returns whether the band was used.
fn recall(
    index: &VectorIndex,
    query: &[f32],
    threshold: f32,
    fallback: f32,
    min_candidates: usize,
    top_n: usize,
) -> Result<(Vec<SearchResult>, bool), IndexError> {
    let mut hits = index.search(query, threshold, top_n)?;
    if hits.len() >= min_candidates || hits.len() >= top_n {
        return Ok((hits, false));
    }

    let band = index.search_band(query, fallback, threshold, top_n - hits.len())?;
    let before = hits.len();
    for hit in band {
        if !hits.iter().any(|h| h.label == hit.label) {
            hits.push(hit);
        }
    }
    let used_band = hits.len() > before;
    Ok((hits, used_band))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, &str, [f32; 2])]) -> VectorIndex {
        VectorIndex::from_entries(
            entries
                .iter()
                .map(|(l, d, e)| (l.to_string(), d.to_string(), e.to_vec())),
        )
        .unwrap()
    }

    #[test]
    fn test_recall_without_fallback() {
        let idx = index(&[
            ("a", "A&B", [1.0, 0.0]),
            ("b", "A&B", [0.9, 0.1]),
            ("c", "A&B", [0.8, 0.2]),
            ("d", "A&B", [0.0, 1.0]),
        ]);
        let (hits, used_band) = recall(&idx, &[1.0, 0.0], 0.5, 0.2, 3, 10).unwrap();
        assert_eq!(hits.len(), 3);
        assert!(!used_band);
        assert_eq!(hits[0].label, "a");
    }

    #[test]
    fn test_recall_tops_up_from_band() {
        // cos ~0.98, ~0.45, 0.0
        let idx = index(&[
            ("near", "A&B", [1.0, 0.2]),
            ("band", "A&B", [0.5, 1.0]),
            ("far", "A&B", [0.0, 1.0]),
        ]);
        let (hits, used_band) = recall(&idx, &[1.0, 0.0], 0.5, 0.2, 3, 10).unwrap();
        let labels: Vec<_> = hits.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["near", "band"]);
        assert!(used_band);
    }

    #[test]
    fn test_recall_on_empty_index() {
        let idx = VectorIndex::new(0);
        let (hits, used_band) = recall(&idx, &[1.0, 0.0], 0.3, 0.2, 3, 10).unwrap();
        assert!(hits.is_empty());
        assert!(!used_band);
    }
}
