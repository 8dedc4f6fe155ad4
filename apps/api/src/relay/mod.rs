// Relay endpoints: brand check, image audit and URL content audit.
// All model calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod image;
pub mod models;
pub mod prompts;
