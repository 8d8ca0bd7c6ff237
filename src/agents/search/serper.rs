use super::{SearchHit, SearchProvider};
use crate::error::{Result, SmaraError};
use crate::Config;
use serde::Deserialize;
use serde_json::json;

/// Keyed search against the Serper Google Search API
pub struct SerperSearch {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    link: String,
}

impl SerperSearch {
    /// `None` when no credential is configured
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(api_key) = config.serper_api_key.clone() else {
            return Ok(None);
        };

        let client = Config::http_client(config.request_timeout_seconds)?;
        Ok(Some(Self {
            api_key,
            api_url: config.serper_url.clone(),
            client,
        }))
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerperSearch {
    fn label(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let request_payload = json!({
            "q": query,
            "num": limit,
        });

        log::debug!("Calling Serper API for query: {}", query);

        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SmaraError::Provider(format!(
                "Serper API error {}: {}",
                status, error_text
            )));
        }

        let body: SerperResponse = response.json().await?;

        Ok(body
            .organic
            .into_iter()
            .take(limit)
            .map(|item| SearchHit {
                title: item.title,
                snippet: item.snippet,
                link: item.link,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_credential_means_no_provider() {
        let config = Config::default();
        assert!(SerperSearch::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let body: SerperResponse = serde_json::from_str(
            r#"{"searchParameters":{"q":"rust"},"organic":[{"title":"Rust","link":"https://www.rust-lang.org"}]}"#,
        )
        .unwrap();

        assert_eq!(body.organic.len(), 1);
        assert_eq!(body.organic[0].title, "Rust");
        assert_eq!(body.organic[0].snippet, "");

        let empty: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.organic.is_empty());
    }
}
