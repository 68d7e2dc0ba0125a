//! Generated context for labels with no authored dictionary entry.
//!
//! All generators are deterministic: same input, same list, same order.
//! Lists are deduplicated keeping first occurrence, then capped.

use crate::semantic::strip_accents;

const MAX_AUTO_SYNONYMS: usize = 6;
const MAX_AUTO_VARIATIONS: usize = 5;
const MAX_PROBLEM_SYNONYMS: usize = 5;
const MAX_NEGATIVE_INDICATORS: usize = 8;

/// Aspect fragment -> synonyms. Matched by case-insensitive containment.
static ASPECT_SYNONYMS: &[(&str, &[&str])] = &[
    ("serviço", &["atendimento", "service", "staff", "equipe"]),
    ("limpeza", &["higiene", "arrumação", "cleaning", "housekeeping"]),
    ("café da manhã", &["breakfast", "café", "manhã", "desjejum"]),
    ("jantar", &["dinner", "janta", "refeição noturna"]),
    ("almoço", &["lunch", "refeição", "meio-dia"]),
    ("quarto", &["acomodação", "suite", "apartamento", "room"]),
    ("banheiro", &["sanitário", "toalete", "lavabo", "bathroom"]),
    ("wi-fi", &["wifi", "internet", "conexão", "wireless", "rede"]),
    ("tv", &["televisão", "televisor", "smart tv"]),
    ("piscina", &["pool", "natação", "área aquática"]),
    ("academia", &["gym", "fitness", "musculação"]),
    ("transfer", &["transporte", "traslado", "shuttle"]),
    ("localização", &["location", "lugar", "posição", "situado"]),
    ("custo-benefício", &["preço", "valor", "price", "cost"]),
    ("vista", &["view", "panorama", "paisagem", "visual"]),
    ("experiência", &["estadia", "hospedagem", "stay", "vivência"]),
    ("check-in", &["entrada", "chegada", "registro"]),
    ("check-out", &["saída", "partida", "checkout"]),
    ("estacionamento", &["garagem", "parking", "vaga"]),
    ("ar-condicionado", &["ar", "climatização", "ac", "refrigeração"]),
    ("elevador", &["lift", "ascensor"]),
    ("gastronomia", &["culinária", "comida", "cozinha", "food"]),
    ("room service", &["serviço de quarto", "quarto service"]),
    ("all inclusive", &["tudo incluído", "pensão completa"]),
    ("isolamento acustico", &["barulho", "ruído", "silêncio", "insonorização"]),
    ("atendimento", &["service", "staff", "equipe", "funcionários"]),
    ("variedade", &["diversidade", "opções", "escolhas"]),
    ("estrutura", &["instalações", "infraestrutura", "facilities"]),
];

/// Department (or common label prefix) -> generic related terms.
static DEPARTMENT_TERMS: &[(&str, &[&str])] = &[
    (
        "A&B",
        &[
            "comida", "bebida", "restaurante", "garçom", "refeição", "prato", "menu", "cardápio",
            "bar", "buffet",
        ],
    ),
    (
        "Governança",
        &[
            "limpo", "sujo", "arrumado", "camareira", "higiene", "toalha", "lençol", "enxoval",
            "arrumação", "poeira",
        ],
    ),
    (
        "Limpeza",
        &[
            "limpo", "sujo", "arrumado", "camareira", "higiene", "toalha", "lençol", "enxoval",
            "arrumação", "poeira",
        ],
    ),
    (
        "Manutenção",
        &[
            "quebrado", "conserto", "reparo", "não funciona", "defeito", "vazamento",
            "estragado", "técnico", "instalação", "desgastado",
        ],
    ),
    (
        "Recepção",
        &[
            "recepcionista", "lobby", "front desk", "atendimento", "check-in", "check-out",
            "chegada", "saída", "reserva", "informação",
        ],
    ),
    (
        "TI",
        &[
            "tecnologia", "internet", "conexão", "funciona", "sinal", "wifi", "rede", "senha",
            "tv", "canais",
        ],
    ),
    (
        "Tecnologia",
        &[
            "tecnologia", "internet", "conexão", "funciona", "sinal", "wifi", "rede", "senha",
            "tv", "canais",
        ],
    ),
    (
        "Lazer",
        &[
            "diversão", "atividade", "entretenimento", "recreação", "piscina", "academia",
            "spa", "crianças", "monitor", "programação",
        ],
    ),
    (
        "Produto",
        &[
            "hotel", "qualidade", "oferece", "disponível", "estrutura", "localização", "preço",
            "valor", "vista", "estadia",
        ],
    ),
    (
        "Operações",
        &[
            "funcionário", "staff", "equipe", "atendimento", "serviço", "cartão", "acesso",
            "cobrança", "consumo", "processo",
        ],
    ),
    (
        "Corporativo",
        &[
            "gestão", "administração", "sistema", "reserva", "cobrança", "pagamento",
            "marketing", "política", "contrato", "financeiro",
        ],
    ),
    (
        "EG",
        &[
            "experiência", "hóspede", "personalizado", "especial", "abordagem", "relacionamento",
            "atenção", "cuidado", "gentileza", "surpresa",
        ],
    ),
];

/// Problem fragment -> synonyms.
static PROBLEM_SYNONYMS: &[(&str, &[&str])] = &[
    ("demora", &["lentidão", "delay", "espera", "demorado"]),
    ("falta", &["faltou", "não tem", "sem", "ausência"]),
    ("limpeza", &["higiene", "arrumação", "sujeira"]),
    ("quebrado", &["não funciona", "defeito", "problema", "estragado"]),
    ("atendimento", &["serviço", "staff", "funcionário"]),
    ("caro", &["preço alto", "excessivo", "custoso"]),
    ("barulho", &["ruído", "som", "barulhento", "ruidoso"]),
    ("qualidade", &["padrão", "nível", "estado"]),
];

static NEGATIVE_WORDS: &[&str] = &[
    "demora", "lento", "demorado", "espera",
    "falta", "faltou", "não tem", "sem",
    "sujo", "suja", "imundo", "nojento",
    "quebrado", "não funciona", "defeito", "problema",
    "ruim", "péssimo", "horrível", "terrível",
    "caro", "alto", "excessivo",
    "barulho", "barulhento", "ruidoso",
    "mal", "erro", "errado", "incorreto",
];

static GENERIC_PROBLEM_INDICATORS: &[&str] = &["problema", "insatisfeito", "reclamação"];

/// Deduplicate keeping the first occurrence of each entry.
pub(crate) fn dedup_in_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Synonyms for an aspect with no authored entry.
///
/// Every table key contained in the lowercased aspect contributes its list.
/// With no match the lowercased aspect is its own only synonym.
pub fn auto_synonyms(aspect: &str) -> Vec<String> {
    let lower = aspect.to_lowercase();
    let matched: Vec<String> = ASPECT_SYNONYMS
        .iter()
        .filter(|(key, _)| lower.contains(key))
        .flat_map(|(_, synonyms)| synonyms.iter().map(|s| s.to_string()))
        .collect();

    if matched.is_empty() {
        return vec![lower];
    }

    let mut synonyms = dedup_in_order(matched);
    synonyms.truncate(MAX_AUTO_SYNONYMS);
    synonyms
}

/// Generic related terms for a department, followed by the lowercased aspect.
///
/// Unknown departments yield `[department, aspect]`.
pub fn auto_related_terms(department: &str, aspect: &str) -> Vec<String> {
    let wanted = department.to_lowercase();
    let terms = DEPARTMENT_TERMS
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .map(|(_, terms)| *terms);

    match terms {
        Some(terms) => dedup_in_order(
            terms
                .iter()
                .map(|t| t.to_string())
                .chain(std::iter::once(aspect.to_lowercase())),
        ),
        None => dedup_in_order([department.to_string(), aspect.to_string()]),
    }
}

/// Orthographic variants of a term: lowercase, `ç` folded to `c`, accents
/// stripped, spaces as hyphens, and accents stripped with hyphens.
pub fn auto_variations(term: &str) -> Vec<String> {
    let lower = term.to_lowercase();
    let cedilla = lower.replace('ç', "c");
    let plain = strip_accents(&lower);
    let hyphenated = lower.split_whitespace().collect::<Vec<_>>().join("-");
    let plain_hyphenated = plain.split_whitespace().collect::<Vec<_>>().join("-");

    let mut variations = dedup_in_order([lower, cedilla, plain, hyphenated, plain_hyphenated]);
    variations.truncate(MAX_AUTO_VARIATIONS);
    variations
}

/// Synonyms for a problem label with no authored entry. May be empty.
pub fn problem_synonyms(label: &str) -> Vec<String> {
    let lower = label.to_lowercase();
    let mut synonyms = dedup_in_order(
        PROBLEM_SYNONYMS
            .iter()
            .filter(|(key, _)| lower.contains(key))
            .flat_map(|(_, synonyms)| synonyms.iter().map(|s| s.to_string())),
    );
    synonyms.truncate(MAX_PROBLEM_SYNONYMS);
    synonyms
}

/// Negative words found in the label plus the generic complaint indicators.
pub fn negative_indicators(label: &str) -> Vec<String> {
    let lower = label.to_lowercase();
    let found = NEGATIVE_WORDS
        .iter()
        .filter(|word| lower.contains(*word))
        .chain(GENERIC_PROBLEM_INDICATORS.iter())
        .map(|word| word.to_string());

    let mut indicators = dedup_in_order(found);
    indicators.truncate(MAX_NEGATIVE_INDICATORS);
    indicators
}

/// Fixed negative phrasings built around the label.
pub fn negative_patterns(label: &str) -> Vec<String> {
    let lower = label.to_lowercase();
    vec![
        format!("{lower} problema"),
        format!("falta de {lower}"),
        format!("{lower} ruim"),
        format!("{lower} não funciona"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_synonyms_match() {
        let synonyms = auto_synonyms("Wi-Fi do Lobby");
        assert_eq!(synonyms[0], "wifi");
        assert!(synonyms.contains(&"internet".to_string()));
    }

    #[test]
    fn test_auto_synonyms_merges_and_caps() {
        // "serviço" and "quarto" both match, and "room service" does not
        let synonyms = auto_synonyms("Serviço de quarto");
        assert_eq!(synonyms.len(), MAX_AUTO_SYNONYMS);
        assert_eq!(&synonyms[..4], ["atendimento", "service", "staff", "equipe"]);
        assert_eq!(synonyms[4], "acomodação");
    }

    #[test]
    fn test_auto_synonyms_no_match() {
        assert_eq!(auto_synonyms("Lavanderia"), vec!["lavanderia"]);
    }

    #[test]
    fn test_auto_related_terms_known_department() {
        let related = auto_related_terms("a&b", "Bar da Piscina");
        assert_eq!(related[0], "comida");
        assert_eq!(related.last().map(String::as_str), Some("bar da piscina"));
    }

    #[test]
    fn test_auto_related_terms_label_prefix_alias() {
        let related = auto_related_terms("Limpeza", "Corredor");
        assert!(related.contains(&"camareira".to_string()));
    }

    #[test]
    fn test_auto_related_terms_unknown_department() {
        assert_eq!(
            auto_related_terms("Jurídico", "Contratos"),
            vec!["Jurídico", "Contratos"]
        );
    }

    #[test]
    fn test_auto_variations() {
        let variations = auto_variations("Recepção Noturna");
        assert_eq!(
            variations,
            vec![
                "recepção noturna",
                "recepcão noturna",
                "recepcao noturna",
                "recepção-noturna",
                "recepcao-noturna",
            ]
        );
    }

    #[test]
    fn test_auto_variations_dedup() {
        assert_eq!(auto_variations("bar"), vec!["bar"]);
    }

    #[test]
    fn test_problem_fallbacks() {
        assert_eq!(
            problem_synonyms("Demora no check-in"),
            vec!["lentidão", "delay", "espera", "demorado"]
        );
        let indicators = negative_indicators("Demora no check-in");
        assert_eq!(indicators, vec!["demora", "problema", "insatisfeito", "reclamação"]);
        assert_eq!(negative_patterns("Cofre")[1], "falta de cofre");
    }
}
