use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    WebTechnologies,
    Databases,
    CloudPlatforms,
    DataScience,
    MobileDevelopment,
    SoftSkills,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub category: SkillCategory,
    pub weight: f64,
}

/// Weight given to skills the catalog does not know.
pub const UNKNOWN_SKILL_WEIGHT: f64 = 0.5;

/// Canonical skill → (category, weight). Keys must use normalizer canonical spelling.
const BUILTIN_CATALOG: &[(SkillCategory, &[(&str, f64)])] = &[
    (
        SkillCategory::ProgrammingLanguages,
        &[
            ("python", 1.0),
            ("java", 1.0),
            ("javascript", 1.0),
            ("typescript", 1.0),
            ("c++", 1.0),
            ("c#", 1.0),
            ("php", 1.0),
            ("ruby", 1.0),
            ("go", 1.0),
            ("rust", 1.0),
            ("swift", 1.0),
            ("kotlin", 1.0),
            ("scala", 1.0),
        ],
    ),
    (
        SkillCategory::WebTechnologies,
        &[
            ("html", 0.8),
            ("css", 0.8),
            ("react", 1.0),
            ("angular", 1.0),
            ("vue", 1.0),
            ("node.js", 1.0),
            ("express", 0.9),
            ("django", 1.0),
            ("flask", 1.0),
            ("spring", 1.0),
            ("laravel", 1.0),
            ("rails", 1.0),
            ("bootstrap", 0.7),
        ],
    ),
    (
        SkillCategory::Databases,
        &[
            ("mysql", 1.0),
            ("postgresql", 1.0),
            ("mongodb", 1.0),
            ("redis", 0.9),
            ("sqlite", 0.8),
            ("oracle", 1.0),
            ("sql server", 1.0),
            ("cassandra", 0.9),
        ],
    ),
    (
        SkillCategory::CloudPlatforms,
        &[
            ("aws", 1.0),
            ("azure", 1.0),
            ("google cloud", 1.0),
            ("docker", 0.9),
            ("kubernetes", 0.9),
            ("terraform", 0.8),
            ("jenkins", 0.8),
        ],
    ),
    (
        SkillCategory::DataScience,
        &[
            ("machine learning", 1.0),
            ("artificial intelligence", 1.0),
            ("data science", 1.0),
            ("pandas", 0.9),
            ("numpy", 0.9),
            ("scikit-learn", 0.9),
            ("tensorflow", 0.9),
            ("pytorch", 0.9),
            ("r", 0.8),
            ("matplotlib", 0.7),
            ("seaborn", 0.7),
        ],
    ),
    (
        SkillCategory::MobileDevelopment,
        &[
            ("android", 1.0),
            ("ios", 1.0),
            ("react native", 1.0),
            ("flutter", 1.0),
            ("xamarin", 0.8),
            ("ionic", 0.7),
        ],
    ),
    (
        SkillCategory::SoftSkills,
        &[
            ("leadership", 0.8),
            ("communication", 0.8),
            ("teamwork", 0.7),
            ("problem solving", 0.9),
            ("analytical", 0.8),
            ("creative", 0.6),
            ("time management", 0.7),
            ("project management", 0.8),
        ],
    ),
];

static BUILTIN_INDEX: LazyLock<HashMap<&'static str, CatalogEntry>> = LazyLock::new(|| {
    BUILTIN_CATALOG
        .iter()
        .flat_map(|(category, skills)| {
            skills.iter().map(move |(skill, weight)| {
                (
                    *skill,
                    CatalogEntry {
                        category: *category,
                        weight: *weight,
                    },
                )
            })
        })
        .collect()
});

/// Category and importance lookup for canonical skills.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillCatalog;

impl SkillCatalog {
    pub fn lookup(&self, skill: &str) -> Option<CatalogEntry> {
        BUILTIN_INDEX.get(skill).copied()
    }

    /// Like [`lookup`](Self::lookup) but falls back to [`SkillCategory::Other`].
    pub fn entry_or_default(&self, skill: &str) -> CatalogEntry {
        self.lookup(skill).unwrap_or(CatalogEntry {
            category: SkillCategory::Other,
            weight: UNKNOWN_SKILL_WEIGHT,
        })
    }
}
