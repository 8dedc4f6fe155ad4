use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::credentials::KeyRing;
use crate::llm_client::LlmClient;
use crate::report::laws::CountryLawTable;
use crate::scraper::BrowserLauncher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Credential pool and the strategy that picks one key per call.
    pub keys: KeyRing,
    /// Pluggable page scraper. Default: HttpLauncher.
    pub browser: Arc<dyn BrowserLauncher>,
    pub laws: Arc<CountryLawTable>,
    pub config: Config,
}
