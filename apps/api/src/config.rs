use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::credentials::CREDENTIALS_ENV;
use crate::llm_client::DEFAULT_API_BASE;

const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySelection {
    Random,
    RoundRobin,
}

/// Application configuration loaded from environment variables.
///
/// The credential pool is deliberately optional here: a missing pool is
/// reported on each relay request as a configuration error, not at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_keys: Option<String>,
    pub api_base: String,
    pub key_selection: KeySelection,
    pub law_table_path: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key_selection = match lookup("KEY_SELECTION").as_deref().map(str::trim) {
            None | Some("") | Some("random") => KeySelection::Random,
            Some("round_robin") => KeySelection::RoundRobin,
            Some(other) => bail!("KEY_SELECTION must be 'random' or 'round_robin', got '{other}'"),
        };

        Ok(Config {
            api_keys: lookup(CREDENTIALS_ENV),
            api_base: lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            key_selection,
            law_table_path: lookup("LAW_TABLE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_BODY_BYTES must be a positive integer")?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_keys, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.key_selection, KeySelection::Random);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GEMINI_API_KEYS", "a,b"),
            ("KEY_SELECTION", "round_robin"),
            ("LAW_TABLE_PATH", "/etc/laws.json"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.api_keys.as_deref(), Some("a,b"));
        assert_eq!(config.key_selection, KeySelection::RoundRobin);
        assert_eq!(config.law_table_path, Some(PathBuf::from("/etc/laws.json")));
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("KEY_SELECTION", "weighted")]).is_err());
        assert!(config_from(&[("MAX_BODY_BYTES", "-1")]).is_err());
    }
}
