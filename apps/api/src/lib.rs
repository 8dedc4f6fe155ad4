pub mod config;
pub mod errors;
pub mod history;
pub mod llm_client;
pub mod relay;
pub mod report;
pub mod routes;
pub mod scraper;
pub mod state;
