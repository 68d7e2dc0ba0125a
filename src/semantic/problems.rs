//! Authored semantic context for problem labels.
//!
//! Problems carry indicators (words that signal the occurrence in guest text)
//! and negative patterns instead of the keyword dictionary's related terms
//! and colloquial variations.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Hand-authored context for one problem label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemContext {
    pub synonyms: &'static [&'static str],
    pub indicators: &'static [&'static str],
    pub negative_patterns: &'static [&'static str],
    pub examples: &'static [&'static str],
}

static PROBLEM_CONTEXTS: &[(&str, ProblemContext)] = &[
    (
        "Demora no Atendimento",
        ProblemContext {
            synonyms: &["lentidão", "demora", "delay", "espera"],
            indicators: &[
                "demorou", "demora", "lento", "devagar", "esperando", "esperei", "aguardando",
                "tempo", "minutos", "horas",
            ],
            negative_patterns: &["demorou muito", "muito tempo", "esperando horas"],
            examples: &[
                "demorou muito para atender",
                "esperamos horas",
                "atendimento muito lento",
            ],
        },
    ),
    (
        "Falta de Limpeza",
        ProblemContext {
            synonyms: &["sujeira", "falta de higiene", "imundície"],
            indicators: &[
                "sujo", "suja", "imundo", "nojento", "fedendo", "não limparam",
                "não arrumaram", "bagunçado",
            ],
            negative_patterns: &["muito sujo", "estava sujo", "falta de limpeza"],
            examples: &[
                "quarto estava sujo",
                "falta de limpeza",
                "muito sujo e mal cheiroso",
            ],
        },
    ),
    (
        "Equipamento com Falha",
        ProblemContext {
            synonyms: &["quebrado", "com defeito", "não funciona"],
            indicators: &[
                "quebrado", "não funciona", "defeito", "problema", "parado", "não liga",
                "estragado",
            ],
            negative_patterns: &["não funciona", "quebrado", "com defeito"],
            examples: &[
                "ar condicionado quebrado",
                "chuveiro não funcionava",
                "tv com defeito",
            ],
        },
    ),
    (
        "Qualidade da Refeição Abaixo do Esperado",
        ProblemContext {
            synonyms: &["comida ruim", "qualidade baixa"],
            indicators: &[
                "ruim", "péssimo", "horrível", "sem sabor", "fria", "mal feito", "queimado",
                "cru",
            ],
            negative_patterns: &["comida ruim", "sem sabor", "estava fria"],
            examples: &["comida estava ruim", "refeição péssima", "sem sabor nenhum"],
        },
    ),
    (
        "Wi-Fi Instável",
        ProblemContext {
            synonyms: &["internet ruim", "conexão ruim"],
            indicators: &["lento", "não funciona", "não pega", "cai", "instável", "fraco", "ruim"],
            negative_patterns: &["wifi não funciona", "internet lenta", "sempre cai"],
            examples: &[
                "wifi muito lento",
                "internet sempre caindo",
                "não consegui conectar",
            ],
        },
    ),
    (
        "Preço Alto",
        ProblemContext {
            synonyms: &["caro", "preço elevado"],
            indicators: &["caro", "preço alto", "muito caro", "não vale"],
            negative_patterns: &["muito caro", "caro demais", "preço alto"],
            examples: &["muito caro para o que oferece", "preço alto demais"],
        },
    ),
    (
        "Ruído Excessivo",
        ProblemContext {
            synonyms: &["barulho", "barulhento", "ruidoso"],
            indicators: &[
                "barulho", "barulhento", "ruído", "ruidoso", "alto", "não consegui dormir",
            ],
            negative_patterns: &["muito barulho", "barulhento demais", "ruído excessivo"],
            examples: &["muito barulho à noite", "quarto barulhento", "não consegui dormir"],
        },
    ),
    (
        "Falta de Variedade",
        ProblemContext {
            synonyms: &["pouca opção", "limitado"],
            indicators: &["pouco", "pouca", "falta", "faltou", "limitado"],
            negative_patterns: &["pouca variedade", "faltou opções", "muito limitado"],
            examples: &["pouca variedade no café", "faltou opções vegetarianas"],
        },
    ),
];

static PROBLEM_CONTEXT_INDEX: Lazy<HashMap<&'static str, &'static ProblemContext>> =
    Lazy::new(|| {
        PROBLEM_CONTEXTS
            .iter()
            .map(|(label, context)| (*label, context))
            .collect()
    });

/// Authored context for a problem label, if one exists. Exact match only.
pub fn problem_context(label: &str) -> Option<&'static ProblemContext> {
    PROBLEM_CONTEXT_INDEX.get(label).copied()
}

/// All authored problem labels, in authoring order.
pub fn authored_problem_labels() -> impl Iterator<Item = &'static str> {
    PROBLEM_CONTEXTS.iter().map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let context = problem_context("Wi-Fi Instável").unwrap();
        assert!(context.indicators.contains(&"não pega"));
        assert!(problem_context("Wi-Fi instável").is_none());
    }

    #[test]
    fn test_every_entry_has_indicators_and_examples() {
        for (label, context) in PROBLEM_CONTEXTS {
            assert!(!context.indicators.is_empty(), "{label}");
            assert!(!context.examples.is_empty(), "{label}");
        }
        assert_eq!(authored_problem_labels().count(), 8);
    }
}
