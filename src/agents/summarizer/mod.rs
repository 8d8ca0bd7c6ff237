use crate::agent::Agent;
use crate::envelope::{str_param, AgentResult, Envelope, Params};
use crate::error::Result;
use crate::Config;
use serde_json::Value;
use std::str::FromStr;

mod extractive;
mod openrouter;
pub use extractive::{extractive_summary, NO_SUMMARY};
pub use openrouter::{LlmProvider, OpenRouterLlm};

/// Returned for empty or whitespace-only input
pub const NO_CONTENT: &str = "No content to summarize.";

/// Characters of input forwarded to the LLM
pub const PROMPT_CHAR_LIMIT: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerMethod {
    SummarizeText,
}

impl FromStr for SummarizerMethod {
    type Err = ();

    fn from_str(method: &str) -> std::result::Result<Self, Self::Err> {
        match method {
            "summarize_text" => Ok(SummarizerMethod::SummarizeText),
            _ => Err(()),
        }
    }
}

/// Text to summarize and its word budget
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub text: String,
    pub max_words: usize,
}

/// Summarizes with an LLM when one is configured, extractively otherwise.
/// LLM failures always fall back to the extractive path.
pub struct SummarizerAgent {
    llm: Option<Box<dyn LlmProvider>>,
    default_max_words: usize,
    log: Vec<Envelope>,
}

impl SummarizerAgent {
    pub fn new(config: &Config) -> Result<Self> {
        let llm = OpenRouterLlm::from_config(config)?
            .map(|llm| Box::new(llm) as Box<dyn LlmProvider>);
        Ok(Self::with_llm(llm, config.summary_max_length))
    }

    pub fn with_llm(llm: Option<Box<dyn LlmProvider>>, default_max_words: usize) -> Self {
        Self {
            llm,
            default_max_words,
            log: Vec::new(),
        }
    }
}

/// Build the LLM instruction from the leading part of the text
pub fn summary_prompt(text: &str, max_words: usize) -> String {
    let excerpt: String = text.chars().take(PROMPT_CHAR_LIMIT).collect();
    format!(
        "Summarize this text in under {} words:\n\n{}",
        max_words, excerpt
    )
}

#[async_trait::async_trait]
impl Agent for SummarizerAgent {
    type Method = SummarizerMethod;
    type Input = SummaryRequest;

    fn name(&self) -> &str {
        "summarizer_agent"
    }

    fn message_log(&self) -> &[Envelope] {
        &self.log
    }

    fn record(&mut self, envelope: Envelope) {
        self.log.push(envelope);
    }

    async fn handle(&mut self, method: SummarizerMethod, params: &Params) -> AgentResult {
        match method {
            SummarizerMethod::SummarizeText => {
                let max_words = params
                    .get("max_length")
                    .and_then(Value::as_u64)
                    .map(|n| n as usize)
                    .unwrap_or(0);
                let request = SummaryRequest {
                    text: str_param(params, "text").to_string(),
                    max_words,
                };
                self.run(request).await.into()
            }
        }
    }

    async fn run(&mut self, request: SummaryRequest) -> Result<String> {
        if request.text.trim().is_empty() {
            return Ok(NO_CONTENT.to_string());
        }

        let max_words = if request.max_words == 0 {
            self.default_max_words
        } else {
            request.max_words
        };

        if let Some(llm) = &self.llm {
            let prompt = summary_prompt(&request.text, max_words);
            match llm.complete(&prompt, max_words.saturating_mul(2)).await {
                Ok(summary) => return Ok(summary),
                Err(e) => log::warn!("LLM summarization failed: {}, using fallback...", e),
            }
        }

        Ok(extractive_summary(&request.text, max_words))
    }
}
