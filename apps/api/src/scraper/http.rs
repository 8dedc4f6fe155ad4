//! Default launcher: fetches the page over HTTP with a desktop browser user agent.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::html::extract_page_data;
use super::{BrowserLauncher, BrowserSession, PageData, ScrapeError, NAVIGATION_TIMEOUT};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Opens a fresh HTTP client per session, so no connection state is shared
/// between audits.
#[derive(Debug, Default, Clone)]
pub struct HttpLauncher;

struct HttpSession {
    client: Client,
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(NAVIGATION_TIMEOUT)
            .build()
            .map_err(|e| ScrapeError::Launch(e.to_string()))?;
        Ok(Box::new(HttpSession { client }))
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn extract(&mut self, url: &str) -> Result<PageData, ScrapeError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout(NAVIGATION_TIMEOUT)
            } else {
                ScrapeError::Navigation(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;
        debug!(url, bytes = html.len(), "Fetched page");

        Ok(extract_page_data(&html))
    }

    async fn close(self: Box<Self>) {
        drop(self.client);
    }
}

#[cfg(test)]
mod tests {
    use super::super::scrape_page;
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetches_and_extracts_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shop"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><head><title>Shop</title></head><body><h1>Sale</h1></body></html>",
            ))
            .mount(&server)
            .await;

        let page = scrape_page(&HttpLauncher, &format!("{}/shop", server.uri()), NAVIGATION_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(page.title, "Shop");
        assert_eq!(page.h1, "Sale");
    }

    #[tokio::test]
    async fn test_error_status_fails_scrape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = scrape_page(&HttpLauncher, &server.uri(), NAVIGATION_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Status { status: 404 }));
    }
}
