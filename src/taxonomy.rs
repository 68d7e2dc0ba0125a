//! Core taxonomy vocabulary: departments, keyword/problem labels and the
//! record shapes persisted alongside their embeddings.
//!
//! Labels follow the `"<Department> - <Aspect>"` convention. The prefix is
//! not always the canonical department name (`"Limpeza - Quarto"` belongs to
//! `Governança`), so resolving the real department is the validator's job;
//! this module only splits and normalises text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::eid::Eid;
use crate::semantic::strip_accents;

/// Separator between department prefix and aspect in a label.
pub const LABEL_SEPARATOR: &str = " - ";

/// Department used for generated keyword records whose label carries no prefix.
pub const FALLBACK_DEPARTMENT: &str = "Operações";

pub const AB: &str = "A&B";
pub const GOVERNANCA: &str = "Governança";
pub const MANUTENCAO: &str = "Manutenção";
pub const RECEPCAO: &str = "Recepção";
pub const TI: &str = "TI";
pub const LAZER: &str = "Lazer";
pub const PRODUTO: &str = "Produto";
pub const OPERACOES: &str = "Operações";
pub const CORPORATIVO: &str = "Corporativo";
pub const EG: &str = "EG";

/// Canonical departments, in display order.
pub const DEPARTMENTS: [&str; 10] = [
    AB,
    GOVERNANCA,
    MANUTENCAO,
    RECEPCAO,
    TI,
    LAZER,
    PRODUTO,
    OPERACOES,
    CORPORATIVO,
    EG,
];

/// A label split into its department prefix and aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelParts<'a> {
    pub prefix: &'a str,
    pub aspect: &'a str,
}

/// Split a label on the first `" - "`.
///
/// Labels without a separator use the whole label for both parts.
pub fn split_label(label: &str) -> LabelParts<'_> {
    match label.split_once(LABEL_SEPARATOR) {
        Some((prefix, aspect)) if !aspect.trim().is_empty() => LabelParts {
            prefix: prefix.trim(),
            aspect: aspect.trim(),
        },
        Some((prefix, _)) => LabelParts {
            prefix: prefix.trim(),
            aspect: label,
        },
        None => LabelParts {
            prefix: label,
            aspect: label,
        },
    }
}

/// Loose prefix extraction used by department inference: everything before
/// the first hyphen, trimmed. Returns `None` when there is no hyphen.
pub fn loose_prefix(label: &str) -> Option<&str> {
    let (prefix, _) = label.split_once('-')?;
    let prefix = prefix.trim();
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

/// URL-safe slug: lowercase, accents stripped, only `[a-z0-9-]`,
/// whitespace runs collapsed to a single hyphen.
pub fn slugify(label: &str) -> String {
    let plain = strip_accents(&label.to_lowercase());
    let filtered: String = plain
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(filtered.len());
    let mut last_hyphen = false;
    for c in filtered.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' {
            if !last_hyphen {
                slug.push('-');
            }
            last_hyphen = true;
        } else {
            slug.push(c);
            last_hyphen = false;
        }
    }

    slug.trim_matches('-').to_string()
}

/// Raw keyword list as stored by the admin screens: either a flat array of
/// labels or a map from department to labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawKeywords {
    Flat(Vec<String>),
    ByDepartment(std::collections::BTreeMap<String, Vec<String>>),
}

impl Default for RawKeywords {
    fn default() -> Self {
        RawKeywords::Flat(vec![])
    }
}

impl RawKeywords {
    /// Flatten into a label list. Map-shaped input is flattened in key order.
    pub fn labels(&self) -> Vec<String> {
        match self {
            RawKeywords::Flat(labels) => labels.clone(),
            RawKeywords::ByDepartment(map) => map.values().flatten().cloned().collect(),
        }
    }
}

/// A department entry as stored: plain name or an object with an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDepartment {
    Name(String),
    Record {
        id: String,
        #[serde(default)]
        label: Option<String>,
    },
}

impl RawDepartment {
    pub fn id(&self) -> &str {
        match self {
            RawDepartment::Name(name) => name,
            RawDepartment::Record { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RawDepartment::Name(name) => name,
            RawDepartment::Record { id, label } => label.as_deref().unwrap_or(id),
        }
    }
}

/// The taxonomy lists read from storage before embedding generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTaxonomy {
    #[serde(default)]
    pub keywords: RawKeywords,
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub departments: Vec<RawDepartment>,
}

impl RawTaxonomy {
    /// Every mapped keyword, every authored problem and the canonical
    /// departments.
    pub fn builtin() -> Self {
        Self {
            keywords: RawKeywords::Flat(
                crate::validation::authoritative_pairs()
                    .map(|(keyword, _)| keyword.to_string())
                    .collect(),
            ),
            problems: crate::semantic::problems::authored_problem_labels()
                .map(str::to_string)
                .collect(),
            departments: DEPARTMENTS
                .iter()
                .map(|d| RawDepartment::Name(d.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Pending,
    Archived,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Pending => "pending",
            RecordStatus::Archived => "archived",
        }
    }
}

/// Keyword persisted with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: String,
    pub label: String,
    pub department_id: String,
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_record_version")]
    pub version: u32,
}

impl KeywordRecord {
    pub fn new(label: &str, department_id: &str, embedding: Vec<f32>, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Eid::prefixed("kw").to_string(),
            label: label.to_string(),
            department_id: department_id.to_string(),
            slug: slugify(label),
            aliases: vec![label.to_lowercase()],
            description: Some(format!("Keyword: {label}")),
            examples: vec![label.to_string()],
            embedding,
            status: RecordStatus::Active,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Problem persisted with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub id: String,
    pub label: String,
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    /// Empty means the problem applies to every department.
    #[serde(default)]
    pub applicable_departments: Vec<String>,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_record_version")]
    pub version: u32,
}

impl ProblemRecord {
    pub fn new(label: &str, embedding: Vec<f32>, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Eid::prefixed("pb").to_string(),
            label: label.to_string(),
            slug: slugify(label),
            aliases: vec![label.to_lowercase()],
            description: Some(format!("Problem: {label}")),
            examples: vec![label.to_string()],
            embedding,
            status: RecordStatus::Active,
            category: Some("Geral".to_string()),
            severity: Severity::Medium,
            applicable_departments: vec![],
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

fn default_record_version() -> u32 {
    1
}

/// A keyword proposed for a piece of guest text by embedding similarity.
/// Lives only for the duration of one classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    /// Department the candidate is currently filed under
    pub department_id: String,
    pub similarity_score: f64,
}

impl Candidate {
    pub fn new(label: &str, department_id: &str, similarity_score: f64) -> Self {
        Self {
            id: None,
            label: label.to_string(),
            department_id: department_id.to_string(),
            similarity_score,
        }
    }
}
