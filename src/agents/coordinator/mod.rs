use crate::agent::Agent;
use crate::agents::search::SearchAgent;
use crate::agents::summarizer::SummarizerAgent;
use crate::agents::transcript::TranscriptAgent;
use crate::envelope::{AgentResult, Envelope, Params};
use crate::error::Result;
use crate::Config;
use serde_json::json;
use std::str::FromStr;

mod report;
pub use report::{preview, search_report, youtube_report};

const VIDEO_HOSTS: [&str; 2] = ["youtube.com", "youtu.be"];

/// Which pipeline a piece of user input goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    YouTube,
    Search,
}

impl Workflow {
    /// Video-host domains anywhere in the input (any case) select the YouTube pipeline
    pub fn classify(input: &str) -> Self {
        let lowered = input.to_lowercase();
        if VIDEO_HOSTS.iter().any(|host| lowered.contains(host)) {
            Workflow::YouTube
        } else {
            Workflow::Search
        }
    }
}

/// The coordinator accepts no requests of its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorMethod {}

impl FromStr for CoordinatorMethod {
    type Err = ();

    fn from_str(_method: &str) -> std::result::Result<Self, Self::Err> {
        Err(())
    }
}

/// Routes user input to a worker agent, then to the summarizer, and formats the report
pub struct CoordinatorAgent {
    transcript: TranscriptAgent,
    search: SearchAgent,
    summarizer: SummarizerAgent,
    summary_max_length: usize,
    log: Vec<Envelope>,
}

impl CoordinatorAgent {
    pub fn new(config: &Config) -> Result<Self> {
        let coordinator = Self::with_agents(
            config,
            TranscriptAgent::new(config)?,
            SearchAgent::new(config)?,
            SummarizerAgent::new(config)?,
        );
        log::info!("Coordinator initialized");
        Ok(coordinator)
    }

    pub fn with_agents(
        config: &Config,
        transcript: TranscriptAgent,
        search: SearchAgent,
        summarizer: SummarizerAgent,
    ) -> Self {
        Self {
            transcript,
            search,
            summarizer,
            summary_max_length: config.summary_max_length,
            log: Vec::new(),
        }
    }

    pub fn transcript_agent(&self) -> &TranscriptAgent {
        &self.transcript
    }

    pub fn search_agent(&self) -> &SearchAgent {
        &self.search
    }

    pub fn summarizer_agent(&self) -> &SummarizerAgent {
        &self.summarizer
    }

    async fn summarize(&mut self, text: &str) -> AgentResult {
        let mut params = Params::new();
        params.insert("text".to_string(), json!(text));
        params.insert("max_length".to_string(), json!(self.summary_max_length));

        let recipient = self.summarizer.name().to_string();
        let envelope = self.send(&recipient, "summarize_text", params);
        self.summarizer.receive(envelope).await
    }

    async fn youtube_workflow(&mut self, url: &str) -> String {
        log::info!("YouTube analysis workflow");

        let mut params = Params::new();
        params.insert("url".to_string(), json!(url));
        let recipient = self.transcript.name().to_string();
        let envelope = self.send(&recipient, "extract_transcript", params);

        let transcript = match self.transcript.receive(envelope).await {
            AgentResult::Success(transcript) => transcript,
            AgentResult::Failure(error) => {
                return format!("❌ Transcript extraction failed: {}", error)
            }
        };
        log::info!("Transcript extracted: {} characters", transcript.chars().count());

        let summary = match self.summarize(&transcript).await {
            AgentResult::Success(summary) => summary,
            AgentResult::Failure(error) => return format!("❌ Summarization failed: {}", error),
        };
        log::info!("Summary generated: {} characters", summary.chars().count());

        youtube_report(&transcript, &summary)
    }

    async fn search_workflow(&mut self, query: &str) -> String {
        log::info!("Search analysis workflow");

        let mut params = Params::new();
        params.insert("query".to_string(), json!(query));
        let recipient = self.search.name().to_string();
        let envelope = self.send(&recipient, "web_search", params);

        let results = match self.search.receive(envelope).await {
            AgentResult::Success(results) => results,
            AgentResult::Failure(error) => return format!("❌ Search failed: {}", error),
        };
        log::info!("Search completed: {} characters", results.chars().count());

        let summary = match self.summarize(&results).await {
            AgentResult::Success(summary) => summary,
            AgentResult::Failure(error) => return format!("❌ Summarization failed: {}", error),
        };
        log::info!("Summary generated: {} characters", summary.chars().count());

        search_report(query, &results, &summary)
    }
}

#[async_trait::async_trait]
impl Agent for CoordinatorAgent {
    type Method = CoordinatorMethod;
    type Input = String;

    fn name(&self) -> &str {
        "coordinator"
    }

    fn message_log(&self) -> &[Envelope] {
        &self.log
    }

    fn record(&mut self, envelope: Envelope) {
        self.log.push(envelope);
    }

    async fn handle(&mut self, method: CoordinatorMethod, _params: &Params) -> AgentResult {
        match method {}
    }

    fn unrecognized(&self, method: &str) -> AgentResult {
        log::warn!("Coordinator refused request: {}", method);
        AgentResult::Failure("Coordinator handles orchestration only".to_string())
    }

    async fn run(&mut self, input: String) -> Result<String> {
        let head: String = input.chars().take(50).collect();
        log::info!("Coordinator starting workflow for: {}...", head);

        let report = match Workflow::classify(&input) {
            Workflow::YouTube => self.youtube_workflow(&input).await,
            Workflow::Search => self.search_workflow(&input).await,
        };
        Ok(report)
    }
}
