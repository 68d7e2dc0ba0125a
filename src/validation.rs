//! Structural validation of keyword/department pairs.
//!
//! Every canonical keyword belongs to exactly one department. Resolution
//! precedence is fixed:
//! 1. Runtime overlay (mappings added while the process runs)
//! 2. Static authoritative map
//! 3. Inference from the label (prefix table, then ordered substring rules)
//!
//! A keyword nothing recognises is accepted: validation only flags pairs
//! that are clearly wrong, it never blocks unknown vocabulary.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::taxonomy::{
    loose_prefix, Candidate, AB, CORPORATIVO, EG, GOVERNANCA, LABEL_SEPARATOR, LAZER,
    MANUTENCAO, OPERACOES, PRODUTO, RECEPCAO, TI,
};

static KEYWORD_DEPARTMENTS: &[(&str, &str)] = &[
    ("A&B - Café da manhã", AB),
    ("A&B - Jantar", AB),
    ("A&B - Almoço", AB),
    ("A&B - Serviço", AB),
    ("A&B - Gastronomia", AB),
    ("A&B - Room Service", AB),
    ("Limpeza - Banheiro", GOVERNANCA),
    ("Limpeza - Quarto", GOVERNANCA),
    ("Limpeza - Áreas sociais", GOVERNANCA),
    ("Limpeza - Enxoval", GOVERNANCA),
    ("Limpeza - Amenities", GOVERNANCA),
    ("Limpeza - Frigobar", GOVERNANCA),
    ("Manutenção - Ar-condicionado", MANUTENCAO),
    ("Manutenção - Banheiro", MANUTENCAO),
    ("Manutenção - Instalações", MANUTENCAO),
    ("Manutenção - Quarto", MANUTENCAO),
    ("Manutenção - Elevador", MANUTENCAO),
    ("Manutenção - Jardinagem", MANUTENCAO),
    ("Recepção - Estacionamento", RECEPCAO),
    ("Recepção - Check-in", RECEPCAO),
    ("Recepção - Check-out", RECEPCAO),
    ("Recepção - Serviço", RECEPCAO),
    ("Tecnologia - TV", TI),
    ("Tecnologia - Wi-fi", TI),
    ("Lazer - Estrutura", LAZER),
    ("Lazer - Variedade", LAZER),
    ("Lazer - Serviço", LAZER),
    ("Lazer - Atividades de Lazer", LAZER),
    ("Lazer - Piscina", LAZER),
    ("Lazer - Spa", LAZER),
    ("Lazer - Academia", LAZER),
    ("Produto - Transfer", PRODUTO),
    ("Produto - Acessibilidade", PRODUTO),
    ("Produto - Custo-benefício", PRODUTO),
    ("Produto - Localização", PRODUTO),
    ("Produto - Vista", PRODUTO),
    ("Produto - Experiência", PRODUTO),
    ("Produto - Modernização", PRODUTO),
    ("Produto - All Inclusive", PRODUTO),
    ("Produto - Isolamento Acustico", PRODUTO),
    ("Operações - Atendimento", OPERACOES),
    ("Operações - Cartão de acesso", OPERACOES),
    ("Operações - Acesso ao quarto", OPERACOES),
    ("Operações - Consumo Extra", OPERACOES),
    ("Corporativo - Marketing", CORPORATIVO),
    ("Corporativo - Reservas", CORPORATIVO),
    ("Corporativo - Financeiro", CORPORATIVO),
    ("EG - Abordagem", EG),
];

static KEYWORD_DEPARTMENT_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| KEYWORD_DEPARTMENTS.iter().copied().collect());

/// Department -> its keywords, built from the static map.
static DEPARTMENT_KEYWORDS_MAP: Lazy<BTreeMap<&'static str, Vec<&'static str>>> =
    Lazy::new(|| {
        let mut map: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (keyword, department) in KEYWORD_DEPARTMENTS {
            map.entry(*department).or_default().push(*keyword);
        }
        map
    });

/// Lowercased label prefix -> department.
static PREFIX_DEPARTMENTS: &[(&str, &str)] = &[
    ("a&b", AB),
    ("limpeza", GOVERNANCA),
    ("governança", GOVERNANCA),
    ("governanca", GOVERNANCA),
    ("tecnologia", TI),
    ("ti", TI),
    ("manutenção", MANUTENCAO),
    ("manutencao", MANUTENCAO),
    ("recepção", RECEPCAO),
    ("recepcao", RECEPCAO),
    ("lazer", LAZER),
    ("produto", PRODUTO),
    ("operações", OPERACOES),
    ("operacoes", OPERACOES),
    ("comercial", "Comercial"),
    ("marketing", "Marketing"),
    ("qualidade", "Qualidade"),
    ("programa de vendas", "Programa de vendas"),
    ("check-in", RECEPCAO),
    ("check-out", RECEPCAO),
];

/// A tagged inference rule: any fragment contained in the lowercased label
/// assigns the department.
#[derive(Debug, Clone, Copy)]
pub struct InferenceRule {
    pub department: &'static str,
    pub any_of: &'static [&'static str],
}

impl InferenceRule {
    pub fn matches(&self, lowercase_label: &str) -> bool {
        self.any_of.iter().any(|f| lowercase_label.contains(f))
    }
}

/// Evaluated in order; the first match wins.
pub static INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        department: AB,
        any_of: &[
            "garçom", "gastronomia", "comida", "café", "almoço", "jantar", "restaurante", "bar",
            "room service",
        ],
    },
    InferenceRule {
        department: GOVERNANCA,
        any_of: &[
            "limpo", "sujo", "arrumação", "enxoval", "toalha", "lençol", "amenities", "frigobar",
        ],
    },
    InferenceRule {
        department: TI,
        any_of: &["wifi", "wi-fi", "internet", "tv", "televisão", "tecnologia"],
    },
    InferenceRule {
        department: MANUTENCAO,
        any_of: &[
            "ar condicionado", "ar-condicionado", "chuveiro", "manutenção", "quebrado",
            "elevador", "jardinagem",
        ],
    },
    InferenceRule {
        department: RECEPCAO,
        any_of: &["check-in", "check-out", "recepção", "recepcionista", "estacionamento"],
    },
    InferenceRule {
        department: LAZER,
        any_of: &["piscina", "academia", "spa", "lazer", "atividades"],
    },
    InferenceRule {
        department: PRODUTO,
        any_of: &[
            "localização", "experiência", "custo-benefício", "vista", "transfer",
            "acessibilidade", "all inclusive", "modernização", "isolamento",
        ],
    },
    InferenceRule {
        department: OPERACOES,
        any_of: &["atendimento", "cartão", "acesso ao quarto", "consumo extra"],
    },
    InferenceRule {
        department: CORPORATIVO,
        any_of: &["reserva", "marketing", "financeiro"],
    },
    InferenceRule {
        department: EG,
        any_of: &["abordagem"],
    },
];

/// Department from the static authoritative map only.
pub fn mapped_department(keyword: &str) -> Option<&'static str> {
    KEYWORD_DEPARTMENT_MAP.get(keyword).copied()
}

/// Department inferred from the label text, for keywords absent from every
/// map. Tries the normalized prefix first, then the substring rules.
pub fn infer_department(keyword: &str) -> Option<&'static str> {
    let prefix = match keyword.split_once(LABEL_SEPARATOR) {
        Some((prefix, _)) => Some(prefix.trim()),
        None => loose_prefix(keyword),
    };

    if let Some(prefix) = prefix {
        let prefix = prefix.to_lowercase();
        if let Some((_, department)) = PREFIX_DEPARTMENTS.iter().find(|(p, _)| *p == prefix) {
            return Some(department);
        }
    }

    let lower = keyword.to_lowercase();
    INFERENCE_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.department)
}

/// Where a validation verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationBasis {
    Runtime,
    Mapped,
    Inferred,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub basis: ValidationBasis,
}

impl Validation {
    fn accepted(basis: ValidationBasis) -> Self {
        Self {
            valid: true,
            correct_department: None,
            error: None,
            basis,
        }
    }

    /// The keyword is recognised and filed under the wrong department.
    pub fn is_structural_mismatch(&self) -> bool {
        !self.valid && self.correct_department.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoCorrection {
    pub corrected: bool,
    pub new_department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingStats {
    pub total_keywords: usize,
    pub total_departments: usize,
    pub keywords_per_department: BTreeMap<String, usize>,
    pub runtime_mappings: usize,
}

/// Keyword/department validator with a runtime overlay on top of the static
/// authoritative map.
#[derive(Debug, Default)]
pub struct TaxonomyValidator {
    runtime: RwLock<HashMap<String, String>>,
}

impl TaxonomyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a keyword mapping that takes precedence over the
    /// static map.
    pub fn add_runtime_mapping(&self, keyword: &str, department: &str) {
        let mut runtime = self.runtime.write().unwrap_or_else(PoisonError::into_inner);
        runtime.insert(keyword.to_string(), department.to_string());
        log::info!("Runtime mapping added: '{}' -> '{}'", keyword, department);
    }

    /// Snapshot of the runtime overlay.
    pub fn runtime_mappings(&self) -> BTreeMap<String, String> {
        let runtime = self.runtime.read().unwrap_or_else(PoisonError::into_inner);
        runtime.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Authoritative department: runtime overlay, then static map.
    pub fn authoritative_department(&self, keyword: &str) -> Option<(String, ValidationBasis)> {
        let runtime = self
            .runtime
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(keyword)
            .cloned();

        match runtime {
            Some(department) => Some((department, ValidationBasis::Runtime)),
            None => mapped_department(keyword)
                .map(|department| (department.to_string(), ValidationBasis::Mapped)),
        }
    }

    /// Best known department for a keyword, falling back to inference.
    pub fn resolve_department(&self, keyword: &str) -> Option<(String, ValidationBasis)> {
        self.authoritative_department(keyword).or_else(|| {
            infer_department(keyword)
                .map(|department| (department.to_string(), ValidationBasis::Inferred))
        })
    }

    pub fn validate(&self, keyword: &str, department: &str) -> Validation {
        match self.resolve_department(keyword) {
            Some((expected, basis)) if expected == department => Validation::accepted(basis),
            Some((expected, basis)) => {
                let error = match basis {
                    ValidationBasis::Inferred => format!(
                        "Keyword '{}' probably belongs to '{}', not '{}' (inferred from label)",
                        keyword, expected, department
                    ),
                    _ => format!(
                        "Keyword '{}' must belong to '{}', not '{}'",
                        keyword, expected, department
                    ),
                };
                Validation {
                    valid: false,
                    correct_department: Some(expected),
                    error: Some(error),
                    basis,
                }
            }
            None => {
                log::warn!(
                    "Cannot validate '{}' in '{}': keyword is not mapped and no rule matches",
                    keyword,
                    department
                );
                Validation::accepted(ValidationBasis::Unknown)
            }
        }
    }

    pub fn is_valid_combination(&self, department: &str, keyword: &str) -> bool {
        self.validate(keyword, department).valid
    }

    pub fn auto_correct_department(&self, keyword: &str, current_department: &str) -> AutoCorrection {
        let validation = self.validate(keyword, current_department);
        match validation.correct_department {
            Some(correct) if !validation.valid => AutoCorrection {
                corrected: true,
                new_department: correct,
                reason: validation.error,
            },
            _ => AutoCorrection {
                corrected: false,
                new_department: current_department.to_string(),
                reason: None,
            },
        }
    }

    /// Keep only candidates that belong to `required_department`.
    ///
    /// Each candidate's department is resolved with the same precedence as
    /// [`validate`](Self::validate); when nothing recognises the label its own
    /// `department_id` decides. `None` returns the input unchanged.
    pub fn filter_by_department(
        &self,
        candidates: Vec<Candidate>,
        required_department: Option<&str>,
    ) -> Vec<Candidate> {
        let Some(required) = required_department else {
            return candidates;
        };

        candidates
            .into_iter()
            .filter(|candidate| match self.resolve_department(&candidate.label) {
                Some((department, _)) => department == required,
                None => candidate.department_id == required,
            })
            .collect()
    }

    pub fn mapping_stats(&self) -> MappingStats {
        MappingStats {
            total_keywords: KEYWORD_DEPARTMENT_MAP.len(),
            total_departments: DEPARTMENT_KEYWORDS_MAP.len(),
            keywords_per_department: DEPARTMENT_KEYWORDS_MAP
                .iter()
                .map(|(department, keywords)| (department.to_string(), keywords.len()))
                .collect(),
            runtime_mappings: self.runtime.read().unwrap_or_else(PoisonError::into_inner).len(),
        }
    }
}

/// All `(keyword, department)` pairs of the static map.
pub fn authoritative_pairs() -> impl Iterator<Item = (&'static str, &'static str)> {
    KEYWORD_DEPARTMENTS.iter().copied()
}

/// Keywords the static map files under `department`.
pub fn department_keywords(department: &str) -> &'static [&'static str] {
    DEPARTMENT_KEYWORDS_MAP
        .get(department)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::DEPARTMENTS;

    #[test]
    fn test_valid_pair() {
        let validator = TaxonomyValidator::new();
        let result = validator.validate("A&B - Café da manhã", "A&B");
        assert!(result.valid);
        assert_eq!(result.basis, ValidationBasis::Mapped);
        assert!(result.correct_department.is_none());
    }

    #[test]
    fn test_wrong_department() {
        let validator = TaxonomyValidator::new();
        let result = validator.validate("A&B - Café da manhã", "Governança");
        assert!(!result.valid);
        assert_eq!(result.correct_department.as_deref(), Some("A&B"));
        assert!(result.is_structural_mismatch());
        assert!(result.error.unwrap().contains("must belong to 'A&B'"));
    }

    #[test]
    fn test_prefix_is_not_department() {
        let validator = TaxonomyValidator::new();
        assert!(validator.validate("Limpeza - Quarto", "Governança").valid);
        assert!(!validator.validate("Limpeza - Quarto", "Limpeza").valid);
    }

    #[test]
    fn test_map_covers_every_department_once() {
        let mut seen = std::collections::HashSet::new();
        for (keyword, department) in authoritative_pairs() {
            assert!(seen.insert(keyword), "{keyword} mapped twice");
            assert!(DEPARTMENTS.contains(&department), "{department} is not canonical");
        }
        assert_eq!(seen.len(), 48);
        assert_eq!(department_keywords(TI), &["Tecnologia - TV", "Tecnologia - Wi-fi"]);
    }

    #[test]
    fn test_infer_from_prefix() {
        assert_eq!(infer_department("Limpeza - Corredor"), Some(GOVERNANCA));
        assert_eq!(infer_department("TI - Tomadas USB"), Some(TI));
        assert_eq!(infer_department("Check-in - Fila"), Some(RECEPCAO));
        assert_eq!(infer_department("Qualidade - Auditoria"), Some("Qualidade"));
    }

    #[test]
    fn test_infer_from_rules_first_match_wins() {
        // "café" (A&B) is checked before "sujo" (Governança)
        assert_eq!(infer_department("Xícara de café suja"), Some(AB));
        assert_eq!(infer_department("Toalha rasgada"), Some(GOVERNANCA));
        assert_eq!(infer_department("Sinal da internet"), Some(TI));
        assert_eq!(infer_department("Abordagem na chegada"), Some(EG));
        assert_eq!(infer_department("Lavanderia"), None);
    }

    #[test]
    fn test_inferred_mismatch_and_unknown() {
        let validator = TaxonomyValidator::new();
        let result = validator.validate("Limpeza - Corredor", "Manutenção");
        assert!(!result.valid);
        assert_eq!(result.basis, ValidationBasis::Inferred);
        assert_eq!(result.correct_department.as_deref(), Some(GOVERNANCA));

        let unknown = validator.validate("Lavanderia", "Manutenção");
        assert!(unknown.valid);
        assert_eq!(unknown.basis, ValidationBasis::Unknown);
    }

    #[test]
    fn test_mapped_keywords_never_use_inference() {
        let validator = TaxonomyValidator::new();
        for (keyword, department) in authoritative_pairs() {
            assert_eq!(
                validator.resolve_department(keyword),
                Some((department.to_string(), ValidationBasis::Mapped))
            );
        }
    }

    #[test]
    fn test_runtime_overlay_precedence() {
        let validator = TaxonomyValidator::new();
        validator.add_runtime_mapping("A&B - Serviço", OPERACOES);
        validator.add_runtime_mapping("Lavanderia", GOVERNANCA);

        let result = validator.validate("A&B - Serviço", AB);
        assert!(!result.valid);
        assert_eq!(result.basis, ValidationBasis::Runtime);
        assert!(validator.validate("Lavanderia", GOVERNANCA).valid);
        assert_eq!(validator.runtime_mappings().len(), 2);

        // other validators are unaffected
        assert!(TaxonomyValidator::new().validate("A&B - Serviço", AB).valid);
    }

    #[test]
    fn test_auto_correct() {
        let validator = TaxonomyValidator::new();
        let fix = validator.auto_correct_department("A&B - Serviço", OPERACOES);
        assert!(fix.corrected);
        assert_eq!(fix.new_department, AB);
        assert!(fix.reason.is_some());

        let keep = validator.auto_correct_department("Lavanderia", OPERACOES);
        assert!(!keep.corrected);
        assert_eq!(keep.new_department, OPERACOES);
    }

    #[test]
    fn test_filter_by_department() {
        let validator = TaxonomyValidator::new();
        let candidates = vec![
            Candidate::new("A&B - Serviço", OPERACOES, 0.9),
            Candidate::new("Operações - Atendimento", OPERACOES, 0.8),
            Candidate::new("Lavanderia", OPERACOES, 0.5),
            Candidate::new("Sem categoria", AB, 0.4),
        ];

        let unchanged = validator.filter_by_department(candidates.clone(), None);
        assert_eq!(unchanged, candidates);

        let kept: Vec<String> = validator
            .filter_by_department(candidates, Some(OPERACOES))
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(kept, vec!["Operações - Atendimento", "Lavanderia"]);
    }

    #[test]
    fn test_mapping_stats() {
        let validator = TaxonomyValidator::new();
        validator.add_runtime_mapping("Lavanderia", GOVERNANCA);
        let stats = validator.mapping_stats();
        assert_eq!(stats.total_keywords, 48);
        assert_eq!(stats.total_departments, 10);
        assert_eq!(stats.keywords_per_department[PRODUTO], 9);
        assert_eq!(stats.runtime_mappings, 1);
        assert!(validator.is_valid_combination(AB, "A&B - Jantar"));
    }

    #[test]
    fn test_filter_by_department_follows_runtime_overlay() {
        let validator = TaxonomyValidator::new();
        validator.add_runtime_mapping("A&B - Serviço", OPERACOES);
        let candidates = vec![
            Candidate::new("A&B - Serviço", AB, 0.9),
            Candidate::new("A&B - Jantar", AB, 0.7),
        ];

        let in_ab: Vec<String> = validator
            .filter_by_department(candidates.clone(), Some(AB))
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(in_ab, vec!["A&B - Jantar"]);

        let in_operations = validator.filter_by_department(candidates, Some(OPERACOES));
        assert_eq!(in_operations.len(), 1);
        assert_eq!(in_operations[0].label, "A&B - Serviço");
    }

    #[test]
    fn test_runtime_mappings_survive_poisoned_lock() {
        let validator = std::sync::Arc::new(TaxonomyValidator::new());
        let poisoner = validator.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.runtime.write().unwrap();
            panic!("poison the overlay lock");
        })
        .join();
        assert!(validator.runtime.is_poisoned());

        validator.add_runtime_mapping("Lavanderia", GOVERNANCA);
        assert_eq!(validator.runtime_mappings().len(), 1);
        assert!(validator.validate("Lavanderia", GOVERNANCA).valid);
        assert_eq!(validator.mapping_stats().runtime_mappings, 1);
    }
}
