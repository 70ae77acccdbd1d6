use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use strsim::damerau_levenshtein;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Canonicalized skill tokens. Ordered so that serialized results are stable.
pub type SkillSet = BTreeSet<String>;

/// Built-in canonical skill → alias list.
///
/// Canonical names use the spelling job postings usually carry (`node.js`, `c++`),
/// so that a posting that already uses it reports the same token back.
const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    // JavaScript ecosystem
    ("javascript", &["js", "java script", "ecmascript", "es6", "es2015", "es2017"]),
    ("typescript", &["ts", "type script"]),
    ("node.js", &["nodejs", "node js", "node"]),
    ("react", &["reactjs", "react.js", "react js"]),
    ("vue", &["vue.js", "vuejs", "vue js", "vue3"]),
    ("angular", &["angularjs", "angular.js", "angular js"]),
    ("next.js", &["nextjs", "next js"]),
    ("express", &["express.js", "expressjs", "express js"]),
    // Markup and styling
    ("html", &["html5"]),
    ("css", &["css3", "cascading style sheets"]),
    ("sass", &["scss"]),
    ("bootstrap", &["bootstrap4", "bootstrap5"]),
    ("tailwind", &["tailwindcss", "tailwind css"]),
    // Backend frameworks
    ("django", &["django rest framework", "drf"]),
    ("flask", &["python flask"]),
    ("spring", &["spring boot", "springboot", "spring framework"]),
    ("fastapi", &["fast api"]),
    ("laravel", &["php laravel"]),
    ("rails", &["ruby on rails", "ror"]),
    // Databases
    ("postgresql", &["postgres", "postgre sql", "psql"]),
    ("mysql", &["my sql"]),
    ("mongodb", &["mongo", "mongo db"]),
    ("redis", &["redis cache"]),
    ("sqlite", &["sqlite3"]),
    ("sql server", &["mssql", "ms sql", "microsoft sql server"]),
    ("oracle", &["oracle db", "oracle database"]),
    ("cassandra", &["apache cassandra"]),
    ("elasticsearch", &["elastic search"]),
    // Cloud and DevOps
    ("aws", &["amazon web services", "amazon aws"]),
    ("azure", &["microsoft azure", "ms azure"]),
    ("google cloud", &["gcp", "google cloud platform"]),
    ("docker", &["docker container"]),
    ("kubernetes", &["k8s", "kube"]),
    ("terraform", &["infrastructure as code"]),
    ("jenkins", &["jenkins ci"]),
    ("git", &["git scm"]),
    // Programming languages
    ("python", &["python3", "python 3", "py"]),
    ("java", &["java8", "java11", "java17", "openjdk"]),
    ("c#", &["csharp", "c sharp"]),
    ("c++", &["cpp", "c plus plus"]),
    ("go", &["golang", "go lang"]),
    ("rust", &["rust lang", "rustlang"]),
    ("php", &["php7", "php8"]),
    ("ruby", &["ruby lang"]),
    ("swift", &["swift lang"]),
    ("kotlin", &["kotlin jvm"]),
    ("scala", &["scala lang"]),
    ("r", &["r lang", "r language"]),
    // Data science
    ("machine learning", &["ml"]),
    ("artificial intelligence", &["ai"]),
    ("deep learning", &["deeplearning", "neural networks"]),
    ("data science", &["data scientist"]),
    ("tensorflow", &["tensor flow", "tf"]),
    ("pytorch", &["torch", "py torch"]),
    ("scikit-learn", &["sklearn", "scikit learn"]),
    ("pandas", &["python pandas"]),
    ("numpy", &["numerical python"]),
    // Mobile
    ("react native", &["reactnative", "rn"]),
    ("flutter", &["dart flutter"]),
    ("android", &["android sdk"]),
    ("ios", &["ios development"]),
    // Soft skills
    ("teamwork", &["team work", "team player"]),
    ("problem solving", &["problem-solving"]),
    ("project management", &["project manager"]),
];

static BUILTIN_TABLE: LazyLock<SynonymTable> = LazyLock::new(|| {
    SynonymTable::from_entries(BUILTIN_SYNONYMS.iter().map(|(canonical, aliases)| {
        (
            (*canonical).to_string(),
            aliases.iter().map(|alias| (*alias).to_string()).collect(),
        )
    }))
});

#[derive(Debug, Error)]
pub enum SynonymTableError {
    #[error("failed to read synonym table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse synonym table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// NFKC fold, lowercase, trim and collapse inner whitespace runs to one space.
pub fn clean_token(input: &str) -> String {
    let folded = input.nfkc().collect::<String>().to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compact_key(input: &str) -> String {
    clean_token(input)
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

/// Alias lookup tables. Canonical names always resolve to themselves, which keeps
/// normalization idempotent even when a custom table reuses a canonical as an alias.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: Vec<(String, Vec<String>)>,
    alias_to_canonical: HashMap<String, String>,
    compact_to_canonical: HashMap<String, String>,
}

impl SynonymTable {
    pub fn builtin() -> Self {
        BUILTIN_TABLE.clone()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Later entries override earlier aliases, so custom tables can be chained after
    /// the built-in one.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let entries: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|(canonical, aliases)| {
                (
                    clean_token(&canonical),
                    aliases.iter().map(|alias| clean_token(alias)).collect(),
                )
            })
            .filter(|(canonical, _)| !canonical.is_empty())
            .collect();

        let mut alias_to_canonical = HashMap::new();
        for (canonical, aliases) in &entries {
            for alias in aliases.iter().filter(|alias| !alias.is_empty()) {
                alias_to_canonical.insert(alias.clone(), canonical.clone());
            }
        }
        for (canonical, _) in &entries {
            alias_to_canonical.insert(canonical.clone(), canonical.clone());
        }

        // Canonicals claim their compact key before any alias does.
        let mut compact_to_canonical = HashMap::new();
        for (canonical, _) in &entries {
            compact_to_canonical
                .entry(compact_key(canonical))
                .or_insert_with(|| canonical.clone());
        }
        for (canonical, aliases) in &entries {
            for alias in aliases {
                let key = compact_key(alias);
                if key.is_empty() {
                    continue;
                }
                compact_to_canonical
                    .entry(key)
                    .or_insert_with(|| canonical.clone());
            }
        }

        Self {
            entries,
            alias_to_canonical,
            compact_to_canonical,
        }
    }

    /// Parses `{"canonical": ["alias", ...]}`.
    pub fn from_json_str(raw: &str) -> Result<Self, SynonymTableError> {
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(parsed))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SynonymTableError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Returns a table containing `self` overlaid with `other`.
    pub fn merged_with(&self, other: &SynonymTable) -> Self {
        Self::from_entries(self.entries.iter().chain(other.entries.iter()).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn canonicals(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(canonical, _)| canonical.as_str())
    }

    fn exact(&self, cleaned: &str) -> Option<&str> {
        self.alias_to_canonical.get(cleaned).map(String::as_str)
    }

    fn compact(&self, compact: &str) -> Option<&str> {
        self.compact_to_canonical.get(compact).map(String::as_str)
    }

    fn fuzzy(&self, compact: &str) -> Option<&str> {
        if compact.len() < 5 {
            return None;
        }

        let mut best: Option<(&str, usize)> = None;
        for (alias, canonical) in &self.compact_to_canonical {
            // Short aliases and short canonical targets (java, rust, go) only match
            // through the exact lookups above.
            if alias.len() < 5 || canonical.len() < 5 {
                continue;
            }

            let distance = damerau_levenshtein(compact, alias);
            let len = compact.len().max(alias.len());
            let acceptable = distance <= 1 || (len >= 8 && distance == 2);
            if !acceptable {
                continue;
            }

            best = match best {
                None => Some((canonical.as_str(), distance)),
                Some((current, best_dist))
                    if distance < best_dist
                        || (distance == best_dist && canonical.as_str() < current) =>
                {
                    Some((canonical.as_str(), distance))
                }
                keep => keep,
            };
        }

        best.map(|(canonical, _)| canonical)
    }
}

/// Canonicalizes free-text skills into comparable sets.
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    table: SynonymTable,
    fuzzy_matching: bool,
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new(SynonymTable::builtin())
    }
}

impl SkillNormalizer {
    pub fn new(table: SynonymTable) -> Self {
        Self {
            table,
            fuzzy_matching: false,
        }
    }

    /// Enables Damerau–Levenshtein tolerance against known aliases.
    pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.fuzzy_matching = enabled;
        self
    }

    pub fn fuzzy_matching(&self) -> bool {
        self.fuzzy_matching
    }

    pub fn table(&self) -> &SynonymTable {
        &self.table
    }

    /// Canonical form of a single token. Blank input yields an empty string.
    pub fn normalize_skill(&self, raw: &str) -> String {
        let cleaned = clean_token(raw);
        if cleaned.is_empty() {
            return cleaned;
        }

        if let Some(canonical) = self.table.exact(&cleaned) {
            return canonical.to_string();
        }

        let compact = compact_key(&cleaned);
        if let Some(canonical) = self.table.compact(&compact) {
            return canonical.to_string();
        }

        if self.fuzzy_matching {
            if let Some(canonical) = self.table.fuzzy(&compact) {
                return canonical.to_string();
            }
        }

        cleaned
    }

    /// Normalizes a raw skill list into a deduplicated set; blank entries are dropped.
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> SkillSet {
        raw.iter()
            .map(|skill| self.normalize_skill(skill.as_ref()))
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}
