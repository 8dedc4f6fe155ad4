//! Credential pool and key selection strategies.
//!
//! The pool comes from a comma-delimited `GEMINI_API_KEYS`. Each relay call picks
//! exactly one key through the configured [`KeySelector`]; a failed call is never
//! retried with another key.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

pub const CREDENTIALS_ENV: &str = "GEMINI_API_KEYS";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("GEMINI_API_KEYS is not set; configure at least one API key")]
    Missing,

    #[error("GEMINI_API_KEYS contains no keys")]
    Empty,
}

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Last four characters, for log lines.
    pub fn hint(&self) -> String {
        let tail: Vec<char> = self.0.chars().rev().take(4).collect();
        format!("...{}", tail.into_iter().rev().collect::<String>())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.hint())
    }
}

#[derive(Debug, Clone)]
pub struct CredentialPool {
    keys: Vec<ApiKey>,
}

impl CredentialPool {
    /// Parses a delimited key list. Blank entries are ignored.
    pub fn parse(raw: Option<&str>) -> Result<Self, CredentialError> {
        let raw = raw.ok_or(CredentialError::Missing)?;
        let keys: Vec<ApiKey> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ApiKey::new)
            .collect();
        if keys.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[ApiKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Chooses which key serves a call. Implementations must return an index
/// below `pool_size`; `pool_size` is never zero.
pub trait KeySelector: Send + Sync {
    fn select(&self, pool_size: usize) -> usize;
}

/// Uniform random choice per call.
#[derive(Debug, Default)]
pub struct RandomSelector;

impl KeySelector for RandomSelector {
    fn select(&self, pool_size: usize) -> usize {
        rand::rng().random_range(0..pool_size)
    }
}

/// Cycles through the pool in order.
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    next: AtomicUsize,
}

impl KeySelector for RoundRobinSelector {
    fn select(&self, pool_size: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % pool_size
    }
}

/// Always the same slot (clamped to the pool). Used for deterministic tests.
#[derive(Debug, Default)]
pub struct FixedSelector(pub usize);

impl KeySelector for FixedSelector {
    fn select(&self, pool_size: usize) -> usize {
        self.0.min(pool_size - 1)
    }
}

/// Pool plus selection strategy, shared by all relay handlers.
///
/// A missing or empty pool is kept as an error and reported on each request
/// rather than aborting startup.
#[derive(Clone)]
pub struct KeyRing {
    pool: Result<CredentialPool, CredentialError>,
    selector: Arc<dyn KeySelector>,
}

impl KeyRing {
    pub fn new(pool: Result<CredentialPool, CredentialError>, selector: Arc<dyn KeySelector>) -> Self {
        Self { pool, selector }
    }

    pub fn pool(&self) -> Result<&CredentialPool, CredentialError> {
        self.pool.as_ref().map_err(Clone::clone)
    }

    pub fn pick(&self) -> Result<ApiKey, CredentialError> {
        let pool = self.pool()?;
        let index = self.selector.select(pool.len()).min(pool.len() - 1);
        let key = pool.keys[index].clone();
        tracing::debug!("Using API key {}", key.hint());
        Ok(key)
    }
}
