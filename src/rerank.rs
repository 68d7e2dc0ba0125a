//! Reranking of embedding-similarity candidates.
//!
//! Each candidate gets four signals in `[0, 1]`:
//! - `embedding`: the raw similarity, unchanged
//! - `structural`: department coherence from the validator
//! - `frequency`: usage count over the live maximum
//! - `context`: literal word overlap plus a small table of disambiguation rules
//!
//! The final score is their weighted sum, except that a structurally wrong
//! candidate is forced to zero whenever a department is required.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::frequency::{FrequencyTable, LabelFrequency};
use crate::taxonomy::Candidate;
use crate::validation::{TaxonomyValidator, ValidationBasis};

const CONTEXT_BASE: f64 = 0.5;
const WORD_MATCH_WEIGHT: f64 = 0.3;
const SENTIMENT_ADJUSTMENT: f64 = 0.2;
const STATS_TOP_N: usize = 10;

static FOOD_TOKENS: &[&str] = &[
    "restaurante", "café", "cafe", "café da manhã", "almoço", "jantar", "cardápio", "menu",
    "pedido", "comanda", "garçom", "garçonete", "maître", "bar", "comida", "prato", "bebida",
    "lanche", "room service",
];

static ATTENTION_TOKENS: &[&str] = &[
    "atendimento", "atencioso", "educado", "cordial", "equipe", "staff", "serviço",
    "tempo de resposta", "demora", "rápido", "lento",
];

static HOUSEKEEPING_SERVICE_TOKENS: &[&str] = &[
    "camareira", "camareiras", "arrumadeira", "pessoal da limpeza", "equipe de limpeza",
    "housekeeping", "serviço de governança", "serviço das camareiras", "serviço de arrumação",
    "camareiras atenciosas", "camareiras educadas", "camareiras simpáticas",
    "camareiras mal educadas", "camareiras grossas",
];

static NEGATIVE_SENTIMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"não|nunca|péssimo|ruim|horrível|terrível")
        .expect("Failed to compile negative sentiment regex")
});

static POSITIVE_SENTIMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ótimo|excelente|maravilhoso|perfeito|adorei")
        .expect("Failed to compile positive sentiment regex")
});

/// Missing fields take their default weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankWeights {
    pub embedding: f64,
    pub structural: f64,
    pub frequency: f64,
    pub context: f64,
}

impl Default for RerankWeights {
    fn default() -> Self {
        Self {
            embedding: 0.40,
            structural: 0.30,
            frequency: 0.15,
            context: 0.15,
        }
    }
}

impl RerankWeights {
    pub fn sum(&self) -> f64 {
        self.embedding + self.structural + self.frequency + self.context
    }

    pub fn is_valid(&self) -> bool {
        let parts = [self.embedding, self.structural, self.frequency, self.context];
        parts.iter().all(|w| w.is_finite() && *w >= 0.0) && (self.sum() - 1.0).abs() < 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RerankingSignals {
    pub embedding_score: f64,
    pub structural_score: f64,
    pub frequency_score: f64,
    pub context_score: f64,
    pub final_score: f64,
}

impl RerankingSignals {
    pub fn weighted_sum(&self, weights: &RerankWeights) -> f64 {
        self.embedding_score * weights.embedding
            + self.structural_score * weights.structural
            + self.frequency_score * weights.frequency
            + self.context_score * weights.context
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub reranking_signals: RerankingSignals,
    /// The final score was forced to zero by the required department.
    #[serde(default)]
    pub hard_zeroed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankingStats {
    pub total_keywords_tracked: usize,
    pub most_frequent: Vec<LabelFrequency>,
    pub weights: RerankWeights,
}

/// Cues detected in the guest text, shared by the context rules.
#[derive(Debug, Clone, Copy, Default)]
struct TextCues {
    food: bool,
    attention: bool,
    housekeeping_service: bool,
    negative: bool,
    positive: bool,
}

impl TextCues {
    fn detect(lowercase_text: &str) -> Self {
        let any = |tokens: &[&str]| tokens.iter().any(|t| lowercase_text.contains(t));
        Self {
            food: any(FOOD_TOKENS),
            attention: any(ATTENTION_TOKENS),
            housekeeping_service: any(HOUSEKEEPING_SERVICE_TOKENS),
            negative: NEGATIVE_SENTIMENT.is_match(lowercase_text),
            positive: POSITIVE_SENTIMENT.is_match(lowercase_text),
        }
    }
}

/// Department disambiguation rules, keyed by lowercased label. Labels not
/// listed get no adjustment.
fn disambiguation_adjustment(lowercase_label: &str, cues: &TextCues) -> f64 {
    let mut adjustment = 0.0;
    match lowercase_label {
        "a&b - serviço" => {
            if cues.food {
                adjustment += 0.25;
            }
            if !cues.food && cues.attention {
                adjustment -= 0.25;
            }
        }
        "operações - atendimento" => {
            if cues.attention && !cues.food {
                adjustment += 0.25;
            }
            if cues.food {
                adjustment -= 0.15;
            }
        }
        "governança - serviço" => {
            if cues.housekeeping_service {
                adjustment += 0.30;
            }
        }
        _ => {}
    }
    adjustment
}

/// Literal overlap and rule-based context score for a label against the
/// guest text, clamped to `[0, 1]`.
pub fn context_score(label: &str, text: &str) -> f64 {
    let text = text.to_lowercase();
    let label = label.to_lowercase();

    let words: Vec<&str> = label
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();
    let matched = words
        .iter()
        .filter(|w| w.chars().count() > 2 && text.contains(*w))
        .count();

    let mut score = CONTEXT_BASE;
    if matched > 0 {
        score += WORD_MATCH_WEIGHT * (matched as f64 / words.len() as f64);
    }

    let cues = TextCues::detect(&text);
    score += disambiguation_adjustment(&label, &cues);

    if label.contains("problema") || label.contains("falha") {
        if cues.negative {
            score += SENTIMENT_ADJUSTMENT;
        }
        if cues.positive {
            score -= SENTIMENT_ADJUSTMENT;
        }
    }

    score.clamp(0.0, 1.0)
}

pub struct Reranker {
    validator: Arc<TaxonomyValidator>,
    frequencies: Arc<FrequencyTable>,
    weights: RerankWeights,
}

impl Reranker {
    pub fn new(
        validator: Arc<TaxonomyValidator>,
        frequencies: Arc<FrequencyTable>,
        weights: RerankWeights,
    ) -> Self {
        Self {
            validator,
            frequencies,
            weights,
        }
    }

    pub fn weights(&self) -> RerankWeights {
        self.weights
    }

    pub fn frequencies(&self) -> &FrequencyTable {
        &self.frequencies
    }

    /// `1.0` when coherent, `0.0` when the keyword is known to belong
    /// elsewhere, `0.5` when nothing recognises it.
    pub fn structural_score(&self, label: &str, department: &str) -> f64 {
        let validation = self.validator.validate(label, department);
        if validation.valid {
            if validation.basis == ValidationBasis::Unknown {
                0.5
            } else {
                1.0
            }
        } else if validation.correct_department.is_some() {
            0.0
        } else {
            0.5
        }
    }

    pub fn signals(&self, candidate: &Candidate, text: &str) -> RerankingSignals {
        let mut signals = RerankingSignals {
            embedding_score: candidate.similarity_score,
            structural_score: self.structural_score(&candidate.label, &candidate.department_id),
            frequency_score: self.frequencies.score(&candidate.label),
            context_score: context_score(&candidate.label, text),
            final_score: 0.0,
        };
        signals.final_score = signals.weighted_sum(&self.weights);
        signals
    }

    /// Score and sort candidates, best first. Never drops a candidate.
    pub fn rerank(
        &self,
        candidates: Vec<Candidate>,
        text: &str,
        required_department: Option<&str>,
    ) -> Vec<RankedCandidate> {
        log::debug!("Reranking {} candidates", candidates.len());

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let mut signals = self.signals(&candidate, text);
                let hard_zeroed = required_department.is_some() && signals.structural_score == 0.0;
                if hard_zeroed {
                    log::warn!(
                        "Zeroing '{}': filed under '{}' but belongs to another department",
                        candidate.label,
                        candidate.department_id
                    );
                    signals.final_score = 0.0;
                }
                RankedCandidate {
                    candidate,
                    reranking_signals: signals,
                    hard_zeroed,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.reranking_signals
                .final_score
                .partial_cmp(&a.reranking_signals.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for (i, c) in ranked.iter().take(3).enumerate() {
            let s = &c.reranking_signals;
            log::debug!(
                "{}. '{}' score={:.3} (emb {:.2}, struct {:.2}, freq {:.2}, ctx {:.2})",
                i + 1,
                c.candidate.label,
                s.final_score,
                s.embedding_score,
                s.structural_score,
                s.frequency_score,
                s.context_score
            );
        }

        ranked
    }

    /// Record a confirmed classification.
    pub fn update_frequency(&self, label: &str) -> u64 {
        self.frequencies.update_frequency(label)
    }

    pub fn stats(&self) -> RerankingStats {
        RerankingStats {
            total_keywords_tracked: self.frequencies.len(),
            most_frequent: self.frequencies.top(STATS_TOP_N),
            weights: self.weights,
        }
    }
}
