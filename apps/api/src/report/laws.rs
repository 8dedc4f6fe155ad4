//! Country law table and the keyword decision table used to label legal findings.
//!
//! The law table is inert data: it ships as `data/country_laws.json` and can be
//! replaced at startup through `LAW_TABLE_PATH`. Nothing here makes a legal
//! determination; matches are labels for the report.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Built-in table compiled into the binary.
const DEFAULT_LAW_TABLE: &str = include_str!("../../data/country_laws.json");

/// Key of the fallback entry every table must carry.
pub const GLOBAL_KEY: &str = "Global";

#[derive(Debug, Error)]
pub enum LawTableError {
    #[error("failed to read law table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("law table is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("law table has no \"Global\" entry")]
    MissingGlobal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawCategory {
    Privacy,
    Content,
    Accessibility,
    Consumer,
}

/// The four law references for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryLaws {
    pub privacy: String,
    pub content: String,
    pub accessibility: String,
    pub consumer: String,
}

impl CountryLaws {
    pub fn reference(&self, category: LawCategory) -> &str {
        match category {
            LawCategory::Privacy => &self.privacy,
            LawCategory::Content => &self.content,
            LawCategory::Accessibility => &self.accessibility,
            LawCategory::Consumer => &self.consumer,
        }
    }
}

/// Ordered decision table: evaluated top to bottom, first match wins.
/// Keywords are lowercase and matched as substrings.
pub const CATEGORY_RULES: &[(LawCategory, &[&str])] = &[
    (
        LawCategory::Privacy,
        &[
            "privacy",
            "cookie",
            "consent",
            "personal data",
            "personal information",
            "data collection",
            "tracking",
            "gdpr",
            "pdpa",
        ],
    ),
    (
        LawCategory::Content,
        &[
            "royal",
            "monarchy",
            "religio",
            "offensive",
            "taboo",
            "defamation",
            "obscene",
            "gambling",
            "political",
            "hate speech",
        ],
    ),
    (
        LawCategory::Accessibility,
        &[
            "accessibility",
            "accessible",
            "wcag",
            "screen reader",
            "alt text",
            "color blind",
            "colour blind",
            "keyboard navigation",
        ],
    ),
    (
        LawCategory::Consumer,
        &[
            "price",
            "pricing",
            "refund",
            "hidden fee",
            "misleading",
            "subscription",
            "cancellation",
            "dark pattern",
            "false advertising",
        ],
    ),
];

/// Returns the first category whose keyword set matches `text`, case-insensitively.
pub fn match_category(text: &str) -> Option<LawCategory> {
    let text = text.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
}

/// Static mapping from country name to its law references.
#[derive(Debug, Clone)]
pub struct CountryLawTable {
    // Keys are lowercased country names.
    entries: HashMap<String, CountryLaws>,
    global: CountryLaws,
}

impl CountryLawTable {
    pub fn from_json(json: &str) -> Result<Self, LawTableError> {
        let raw: HashMap<String, CountryLaws> = serde_json::from_str(json)?;
        let entries: HashMap<String, CountryLaws> = raw
            .into_iter()
            .map(|(country, laws)| (country.trim().to_lowercase(), laws))
            .collect();
        let global = entries
            .get(&GLOBAL_KEY.to_lowercase())
            .cloned()
            .ok_or(LawTableError::MissingGlobal)?;
        Ok(Self { entries, global })
    }

    pub fn from_path(path: &Path) -> Result<Self, LawTableError> {
        let json = std::fs::read_to_string(path).map_err(|source| LawTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Laws for `country`; unknown countries resolve to the Global entry.
    pub fn laws_for(&self, country: &str) -> &CountryLaws {
        self.entries
            .get(&country.trim().to_lowercase())
            .unwrap_or(&self.global)
    }

    pub fn global(&self) -> &CountryLaws {
        &self.global
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CountryLawTable {
    fn default() -> Self {
        // The bundled file is checked by `test_bundled_table_parses`.
        Self::from_json(DEFAULT_LAW_TABLE).unwrap_or_else(|_| Self {
            entries: HashMap::new(),
            global: CountryLaws {
                privacy: "Global Privacy Standards".to_string(),
                content: "Local Content Laws".to_string(),
                accessibility: "WCAG 2.1 AA".to_string(),
                consumer: "Consumer Protection Guidelines".to_string(),
            },
        })
    }
}
