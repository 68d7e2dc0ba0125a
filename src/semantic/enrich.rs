//! Text enrichment for embedding generation and query expansion.
//!
//! Labels are never embedded bare. Each keyword or problem is expanded into a
//! ` | `-delimited blob of the label plus synonyms, related terms and example
//! phrasing, so its vector lands closer to how guests actually write. On the
//! query side, free text is expanded with literal synonyms before embedding.
//!
//! Resolution order for keywords:
//! 1. Authored dictionary entry
//! 2. Generated synonyms for the aspect
//! 3. Generated department related terms
//! 4. Generated orthographic variations

use unicode_normalization::UnicodeNormalization;

use crate::semantic::context::{keyword_context, KeywordContext};
use crate::semantic::fallback::{
    auto_related_terms, auto_synonyms, auto_variations, dedup_in_order, negative_indicators,
    negative_patterns, problem_synonyms,
};
use crate::semantic::problems::problem_context;
use crate::taxonomy::split_label;

/// Delimiter between parts of an enriched text.
pub const ENRICHMENT_DELIMITER: &str = " | ";

/// How many related terms an authored keyword contributes.
const AUTHORED_RELATED_TERMS: usize = 12;

/// How many indicators an authored problem contributes.
const AUTHORED_PROBLEM_INDICATORS: usize = 10;

/// How many examples an authored entry contributes.
const AUTHORED_EXAMPLES: usize = 3;

/// Trigger fragment -> literal expansions appended to a matching query.
static QUERY_EXPANSIONS: &[(&str, &[&str])] = &[
    // A&B
    ("comida", &["refeição", "prato", "alimento", "gastronomia", "food"]),
    ("café da manhã", &["breakfast", "café", "manhã", "desjejum"]),
    ("almoço", &["lunch", "meio-dia", "refeição"]),
    ("jantar", &["janta", "dinner", "refeição noturna"]),
    ("garçom", &["garçonete", "atendente", "funcionário do restaurante", "staff"]),
    ("restaurante", &["comida", "gastronomia", "refeição", "A&B"]),
    ("room service", &["serviço de quarto", "comida no quarto"]),
    // Governança
    ("limpeza", &["higiene", "arrumação", "cleaning", "housekeeping"]),
    ("sujo", &["sujeira", "falta de limpeza", "não limpo", "imundo"]),
    ("limpo", &["limpeza", "higiene", "arrumado", "impecável"]),
    ("camareira", &["governança", "arrumação", "limpeza do quarto", "housekeeping"]),
    ("quarto", &["acomodação", "suite", "apartamento", "room"]),
    ("banheiro", &["sanitário", "toalete", "lavabo", "bathroom", "box", "chuveiro"]),
    ("toalha", &["enxoval", "roupa de cama", "lençol"]),
    ("amenities", &["produtos de banho", "shampoo", "sabonete"]),
    // Manutenção
    ("ar condicionado", &["ar", "climatização", "ac", "refrigeração"]),
    ("quebrado", &["não funciona", "defeito", "problema", "estragado"]),
    ("conserto", &["reparo", "manutenção", "arrumação"]),
    ("elevador", &["lift", "ascensor"]),
    // Recepção
    ("recepção", &["recepcionista", "front desk", "lobby", "atendimento"]),
    ("check-in", &["entrada", "chegada", "registro"]),
    ("check-out", &["saída", "partida", "checkout"]),
    ("estacionamento", &["garagem", "parking", "vaga", "carro"]),
    // TI
    ("wifi", &["wi-fi", "internet", "conexão", "wireless", "rede"]),
    ("internet", &["wifi", "wi-fi", "conexão", "rede"]),
    ("tv", &["televisão", "televisor", "smart tv", "canais"]),
    // Lazer
    ("piscina", &["pool", "natação", "área aquática"]),
    ("academia", &["gym", "fitness", "musculação", "treino"]),
    ("spa", &["massagem", "tratamento", "relaxamento"]),
    // Produto
    ("transfer", &["transporte", "traslado", "shuttle", "aeroporto"]),
    ("localização", &["localizado", "location", "perto", "próximo", "situado"]),
    ("custo benefício", &["preço", "valor", "cost", "barato", "caro"]),
    ("vista", &["view", "panorama", "paisagem", "visual"]),
    ("experiência", &["estadia", "hospedagem", "stay", "vivência"]),
    ("all inclusive", &["tudo incluído", "pensão completa", "incluso"]),
    ("barulho", &["ruído", "isolamento acústico", "som", "barulhento"]),
    // Operações
    ("atendimento", &["serviço", "service", "staff", "equipe", "funcionários"]),
    ("funcionário", &["staff", "equipe", "atendente", "colaborador"]),
    ("cartão", &["chave", "acesso", "keycard"]),
    // sentiment
    ("muito bom", &["excelente", "ótimo", "maravilhoso", "perfeito"]),
    ("excelente", &["ótimo", "maravilhoso", "perfeito", "incrível"]),
    ("adorei", &["amei", "gostei muito", "excelente", "maravilhoso"]),
    ("ruim", &["péssimo", "horrível", "terrível", "muito ruim"]),
    ("péssimo", &["horrível", "ruim", "terrível", "muito ruim"]),
    ("deixa a desejar", &["ruim", "insatisfatório", "poderia melhorar"]),
];

/// Remove combining diacritics (NFD, then drop U+0300..=U+036F).
pub fn strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Context generated for a label with no authored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContext {
    pub department: String,
    pub aspect: String,
    pub synonyms: Vec<String>,
    pub related_terms: Vec<String>,
    pub variations: Vec<String>,
}

impl GeneratedContext {
    /// Run the three generators in order for a label.
    pub fn for_label(label: &str) -> Self {
        let parts = split_label(label);
        Self {
            department: parts.prefix.to_string(),
            aspect: parts.aspect.to_string(),
            synonyms: auto_synonyms(parts.aspect),
            related_terms: auto_related_terms(parts.prefix, parts.aspect),
            variations: auto_variations(parts.aspect),
        }
    }
}

/// Semantic context resolved for a keyword label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextRecord {
    Authored(&'static KeywordContext),
    Generated(GeneratedContext),
}

impl ContextRecord {
    pub fn is_authored(&self) -> bool {
        matches!(self, ContextRecord::Authored(_))
    }
}

/// Resolve the semantic context for a keyword label.
///
/// Returns `None` only for a blank label. Unauthored labels get a generated
/// context.
pub fn lookup_context(label: &str) -> Option<ContextRecord> {
    if label.trim().is_empty() {
        return None;
    }

    match keyword_context(label) {
        Some(context) => Some(ContextRecord::Authored(context)),
        None => Some(ContextRecord::Generated(GeneratedContext::for_label(label))),
    }
}

/// Build the text that gets embedded for a keyword label.
pub fn enrich_for_embedding(label: &str) -> String {
    let parts: Vec<&str> = match lookup_context(label) {
        Some(ContextRecord::Authored(context)) => std::iter::once(label)
            .chain(context.synonyms.iter().copied())
            .chain(context.related_terms.iter().take(AUTHORED_RELATED_TERMS).copied())
            .chain(context.colloquial_variations.iter().copied())
            .chain(context.examples.iter().take(AUTHORED_EXAMPLES).copied())
            .collect(),
        Some(ContextRecord::Generated(generated)) => {
            log::warn!("No authored context for keyword '{}', using generated enrichment", label);
            let parts: Vec<String> = [
                label.to_string(),
                generated.department,
                generated.aspect,
            ]
            .into_iter()
            .chain(generated.synonyms)
            .chain(generated.related_terms)
            .chain(generated.variations)
            .collect();
            return parts.join(ENRICHMENT_DELIMITER);
        }
        None => return String::new(),
    };

    parts.join(ENRICHMENT_DELIMITER)
}

/// Build the text that gets embedded for a problem label.
pub fn enrich_problem_for_embedding(label: &str) -> String {
    if label.trim().is_empty() {
        return String::new();
    }

    if let Some(context) = problem_context(label) {
        let parts: Vec<&str> = std::iter::once(label)
            .chain(context.synonyms.iter().copied())
            .chain(context.indicators.iter().take(AUTHORED_PROBLEM_INDICATORS).copied())
            .chain(context.negative_patterns.iter().copied())
            .chain(context.examples.iter().take(AUTHORED_EXAMPLES).copied())
            .collect();
        return parts.join(ENRICHMENT_DELIMITER);
    }

    log::warn!("No authored context for problem '{}', using generated enrichment", label);
    let parts: Vec<String> = std::iter::once(label.to_string())
        .chain(problem_synonyms(label))
        .chain(negative_indicators(label))
        .chain(negative_patterns(label))
        .collect();
    parts.join(ENRICHMENT_DELIMITER)
}

/// Expand free guest text with literal synonyms before embedding it.
///
/// The output starts with the original text, then the expansions of every
/// trigger found in the lowercased input, then an accent-stripped copy of
/// the input. Duplicates are dropped and parts are joined with spaces.
pub fn expand_query(text: &str) -> String {
    let lower = text.to_lowercase();

    let expansions = QUERY_EXPANSIONS
        .iter()
        .filter(|(trigger, _)| lower.contains(trigger))
        .flat_map(|(_, synonyms)| synonyms.iter().map(|s| s.to_string()));

    let parts = std::iter::once(text.to_string())
        .chain(expansions)
        .chain(std::iter::once(strip_accents(text)));

    dedup_in_order(parts).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("Manutenção"), "Manutencao");
        assert_eq!(strip_accents("não é péssimo"), "nao e pessimo");
        assert_eq!(strip_accents("A&B"), "A&B");
    }

    #[test]
    fn test_lookup_context() {
        assert!(lookup_context("A&B - Jantar").unwrap().is_authored());
        assert!(!lookup_context("A&B - Bar Molhado").unwrap().is_authored());
        assert!(lookup_context("  ").is_none());
    }

    #[test]
    fn test_authored_enrichment() {
        let text = enrich_for_embedding("A&B - Café da manhã");
        assert!(text.starts_with("A&B - Café da manhã | breakfast | desjejum"));
        // related terms are capped: "café preto" is the 17th term
        assert!(!text.contains("café preto"));
        // examples are capped at three
        assert!(text.ends_with("breakfast excelente"));
    }

    #[test]
    fn test_generated_enrichment_order() {
        let text = enrich_for_embedding("Lazer - Kids Club");
        let parts: Vec<&str> = text.split(ENRICHMENT_DELIMITER).collect();
        assert_eq!(&parts[..3], ["Lazer - Kids Club", "Lazer", "Kids Club"]);
        assert!(parts.contains(&"recreação"));
        assert!(parts.contains(&"kids-club"));
    }

    #[test]
    fn test_generated_enrichment_without_separator() {
        let text = enrich_for_embedding("Lavanderia");
        assert!(text.starts_with("Lavanderia | Lavanderia | Lavanderia | lavanderia"));
    }

    #[test]
    fn test_enrichment_is_pure() {
        for label in ["A&B - Serviço", "Produto - Cofre", "X"] {
            assert_eq!(enrich_for_embedding(label), enrich_for_embedding(label));
        }
    }

    #[test]
    fn test_problem_enrichment() {
        let text = enrich_problem_for_embedding("Preço Alto");
        assert_eq!(
            text,
            "Preço Alto | caro | preço elevado | caro | preço alto | muito caro | não vale \
             | muito caro | caro demais | preço alto | muito caro para o que oferece \
             | preço alto demais"
        );

        let generated = enrich_problem_for_embedding("Cofre quebrado");
        assert!(generated.starts_with("Cofre quebrado | não funciona | defeito"));
        assert!(generated.ends_with("cofre quebrado não funciona"));
    }

    #[test]
    fn test_expand_query() {
        let expanded = expand_query("o wifi do quarto não funciona");
        assert!(expanded.starts_with("o wifi do quarto não funciona acomodação"));
        assert!(expanded.contains("wi-fi internet conexão"));
        assert!(expanded.ends_with("o wifi do quarto nao funciona"));
    }

    #[test]
    fn test_expand_query_without_triggers() {
        assert_eq!(expand_query("tudo certo"), "tudo certo");
    }
}
