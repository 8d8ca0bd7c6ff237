use anyhow::Result;
use std::env;

pub mod agent;
pub mod agents;
pub mod envelope;
pub mod error;

/// Timeout for search, scrape and transcript requests
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
/// Timeout for the summarization call
pub const SUMMARY_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mistral-7b-instruct:free";
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;
pub const DEFAULT_SUMMARY_MAX_LENGTH: usize = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub serper_api_key: Option<String>,
    pub serper_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub openrouter_model: String,
    pub max_search_results: usize,
    pub summary_max_length: usize,
    pub request_timeout_seconds: u64,
    pub summary_timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serper_api_key: None,
            serper_url: DEFAULT_SERPER_URL.to_string(),
            openrouter_api_key: None,
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            request_timeout_seconds: REQUEST_TIMEOUT_SECS,
            summary_timeout_seconds: SUMMARY_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenv::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }

        let serper_api_key = optional_var("SERPER_API_KEY");
        let openrouter_api_key = optional_var("OPENROUTER_API_KEY");
        let serper_url =
            env::var("SERPER_URL").unwrap_or_else(|_| DEFAULT_SERPER_URL.to_string());
        let openrouter_url =
            env::var("OPENROUTER_URL").unwrap_or_else(|_| DEFAULT_OPENROUTER_URL.to_string());
        let openrouter_model =
            env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string());
        let max_search_results = env::var("MAX_SEARCH_RESULTS")
            .unwrap_or_else(|_| DEFAULT_MAX_SEARCH_RESULTS.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_SEARCH_RESULTS);
        let summary_max_length = env::var("SUMMARY_MAX_LENGTH")
            .unwrap_or_else(|_| DEFAULT_SUMMARY_MAX_LENGTH.to_string())
            .parse()
            .unwrap_or(DEFAULT_SUMMARY_MAX_LENGTH);

        if max_search_results == 0 {
            return Err(anyhow::anyhow!("MAX_SEARCH_RESULTS must be at least 1"));
        }

        Ok(Self {
            serper_api_key,
            serper_url,
            openrouter_api_key,
            openrouter_url,
            openrouter_model,
            max_search_results,
            summary_max_length,
            ..Self::default()
        })
    }

    /// Build an HTTP client with the given timeout
    pub fn http_client(timeout_seconds: u64) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

// Re-export main agents for external use
use agent::Agent;
pub use agents::coordinator::{CoordinatorAgent, Workflow};
pub use envelope::{AgentResult, Envelope, Params};
pub use error::SmaraError;

/// Run one query through the coordinator and return the formatted report
pub async fn process_query(coordinator: &mut CoordinatorAgent, query: &str) -> Result<String> {
    match coordinator.run(query.to_string()).await {
        Ok(report) => {
            log::info!("Query completed successfully");
            Ok(report)
        }
        Err(e) => {
            log::error!("Query failed: {}", e);
            Err(e.into())
        }
    }
}
