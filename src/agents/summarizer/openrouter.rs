use crate::error::{Result, SmaraError};
use crate::Config;
use serde_json::{json, Value};

/// Fixed sampling temperature for summaries
pub const TEMPERATURE: f32 = 0.3;

/// Text-completion capability used for abstractive summaries
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String>;
}

/// Chat completions through OpenRouter
pub struct OpenRouterLlm {
    api_key: String,
    api_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterLlm {
    /// `None` when no credential is configured
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(api_key) = config.openrouter_api_key.clone() else {
            return Ok(None);
        };

        let client = Config::http_client(config.summary_timeout_seconds)?;
        Ok(Some(Self {
            api_key,
            api_url: config.openrouter_url.clone(),
            model: config.openrouter_model.clone(),
            client,
        }))
    }
}

#[async_trait::async_trait]
impl LlmProvider for OpenRouterLlm {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String> {
        let request_payload = json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": prompt
            }],
            "max_tokens": max_tokens,
            "temperature": TEMPERATURE
        });

        log::debug!("Calling OpenRouter model {}", self.model);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request_payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SmaraError::Provider(format!(
                "OpenRouter API error {}: {}",
                status, error_text
            )));
        }

        let body: Value = response.json().await?;
        completion_text(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat completion
fn completion_text(body: &Value) -> Result<String> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| SmaraError::Provider("completion has no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_choice_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "  Short summary.\n" } }]
        });
        assert_eq!(completion_text(&body).unwrap(), "Short summary.");
    }

    #[test]
    fn missing_content_is_a_provider_error() {
        let body = json!({ "error": { "message": "rate limited" } });
        assert!(matches!(
            completion_text(&body),
            Err(SmaraError::Provider(_))
        ));
    }

    #[test]
    fn no_credential_means_no_provider() {
        assert!(OpenRouterLlm::from_config(&Config::default())
            .unwrap()
            .is_none());
    }
}
