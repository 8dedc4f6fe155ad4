//! Page scraping for the content audit.
//!
//! A [`BrowserLauncher`] hands out one [`BrowserSession`] per request. The
//! session is closed on every path out of [`scrape_page`], success, failure or
//! timeout, so repeated failures never accumulate open sessions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub mod html;
pub mod http;

pub use http::HttpLauncher;

/// Navigation budget per page.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Visible body text sent on to the model is capped at this many characters.
pub const BODY_TEXT_LIMIT: usize = 10_000;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Navigation timeout of {} ms exceeded", .0.as_millis())]
    Timeout(Duration),

    #[error("Failed to launch browser session: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Page returned HTTP {status}")]
    Status { status: u16 },
}

/// What the audit needs from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub title: String,
    pub meta_description: String,
    pub h1: String,
    pub body_text: String,
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScrapeError>;
}

#[async_trait]
pub trait BrowserSession: Send {
    async fn extract(&mut self, url: &str) -> Result<PageData, ScrapeError>;
    async fn close(self: Box<Self>);
}

/// Scrapes `url` in a fresh session bounded by `timeout`.
pub async fn scrape_page(
    launcher: &dyn BrowserLauncher,
    url: &str,
    timeout: Duration,
) -> Result<PageData, ScrapeError> {
    let mut session = launcher.launch().await?;

    let outcome = tokio::time::timeout(timeout, session.extract(url)).await;

    session.close().await;

    match outcome {
        Ok(Ok(page)) => {
            info!(url, title = %page.title, "Scraped page");
            Ok(page)
        }
        Ok(Err(e)) => {
            warn!(url, error = %e, "Scrape failed");
            Err(e)
        }
        Err(_) => {
            warn!(url, timeout_ms = timeout.as_millis() as u64, "Scrape timed out");
            Err(ScrapeError::Timeout(timeout))
        }
    }
}
