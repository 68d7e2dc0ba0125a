//! Cross-module tests: the documented end-to-end scenarios and the
//! generate → classify → confirm flow over an in-memory store.

mod pipeline;

use crate::semantic::{EmbeddingError, EmbeddingProvider};

/// Deterministic provider: one dimension per concept, counting how often
/// the concept's words occur in the text, plus a constant dimension so no
/// vector is zero.
pub(crate) struct ConceptProvider;

const CONCEPTS: &[&[&str]] = &[
    &["wifi", "wi-fi", "internet"],
    &["café", "breakfast", "comida", "refeição"],
    &["limpeza", "sujo", "limpo"],
    &["garçom", "atendimento", "serviço"],
    &["preço", "caro"],
];

impl EmbeddingProvider for ConceptProvider {
    fn model_name(&self) -> &str {
        "concepts"
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| concept_vector(text)).collect())
    }
}

fn concept_vector(text: &str) -> Vec<f32> {
    let text = text.to_lowercase();
    let mut vector: Vec<f32> = CONCEPTS
        .iter()
        .map(|words| words.iter().map(|w| text.matches(w).count()).sum::<usize>() as f32)
        .collect();
    vector.push(0.1);
    vector
}
