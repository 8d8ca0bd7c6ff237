use crate::agent::Agent;
use crate::envelope::{str_param, AgentResult, Envelope, Params};
use crate::error::{Result, SmaraError};
use crate::Config;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

mod youtube;
pub use youtube::{CaptionFragment, TranscriptProvider, YoutubeTranscripts};

/// Returned as content when a video has no usable captions
pub const NO_TRANSCRIPT: &str = "No transcript available for this video.";

const LANGUAGES: &[&str] = &["en"];

/// Known URL shapes, tried in order
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"youtube\.com/watch\?v=([^&\n]+)", r"youtu\.be/([^&\n]+)"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid regex"))
        .collect()
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static ANNOTATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptMethod {
    ExtractTranscript,
}

impl FromStr for TranscriptMethod {
    type Err = ();

    fn from_str(method: &str) -> std::result::Result<Self, Self::Err> {
        match method {
            "extract_transcript" => Ok(TranscriptMethod::ExtractTranscript),
            _ => Err(()),
        }
    }
}

/// Extracts and cleans the English transcript of a video
pub struct TranscriptAgent {
    provider: Box<dyn TranscriptProvider>,
    log: Vec<Envelope>,
}

impl TranscriptAgent {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_provider(Box::new(YoutubeTranscripts::new(config)?)))
    }

    pub fn with_provider(provider: Box<dyn TranscriptProvider>) -> Self {
        Self {
            provider,
            log: Vec::new(),
        }
    }
}

/// Pull the video identifier out of a URL; first matching pattern wins
pub fn extract_video_id(url: &str) -> Result<String> {
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| SmaraError::InvalidInput("Invalid YouTube URL".to_string()))
}

/// Drop bracketed cue markers, then collapse whitespace runs
pub fn clean_transcript(text: &str) -> String {
    let stripped = ANNOTATION.replace_all(text, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[async_trait::async_trait]
impl Agent for TranscriptAgent {
    type Method = TranscriptMethod;
    type Input = String;

    fn name(&self) -> &str {
        "transcript_agent"
    }

    fn message_log(&self) -> &[Envelope] {
        &self.log
    }

    fn record(&mut self, envelope: Envelope) {
        self.log.push(envelope);
    }

    async fn handle(&mut self, method: TranscriptMethod, params: &Params) -> AgentResult {
        match method {
            TranscriptMethod::ExtractTranscript => {
                let url = str_param(params, "url").to_string();
                self.run(url).await.into()
            }
        }
    }

    async fn run(&mut self, url: String) -> Result<String> {
        let video_id = extract_video_id(&url)?;
        log::info!("TranscriptAgent fetching transcript for video {}", video_id);

        match self.provider.fetch(&video_id, LANGUAGES).await {
            Ok(fragments) => {
                let joined = fragments
                    .iter()
                    .map(|fragment| fragment.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                Ok(clean_transcript(&joined))
            }
            Err(e) if e.is_missing_transcript() => {
                log::info!("No transcript for video {}: {}", video_id, e);
                Ok(NO_TRANSCRIPT.to_string())
            }
            Err(e) => Err(SmaraError::Extraction(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticTranscript(std::result::Result<Vec<&'static str>, &'static str>);

    #[async_trait::async_trait]
    impl TranscriptProvider for StaticTranscript {
        async fn fetch(&self, video_id: &str, _languages: &[&str]) -> Result<Vec<CaptionFragment>> {
            match &self.0 {
                Ok(lines) => Ok(lines
                    .iter()
                    .map(|text| CaptionFragment {
                        text: text.to_string(),
                        start: 0.0,
                        duration: 1.0,
                    })
                    .collect()),
                Err("disabled") => Err(SmaraError::TranscriptsDisabled(video_id.to_string())),
                Err("missing") => Err(SmaraError::NoTranscript {
                    video_id: video_id.to_string(),
                    languages: vec!["en".to_string()],
                }),
                Err(message) => Err(SmaraError::Provider(message.to_string())),
            }
        }
    }

    #[test]
    fn extracts_ids_from_supported_url_shapes() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("https://youtu.be/abc123").unwrap(), "abc123");
        assert_eq!(extract_video_id("youtu.be/abc123&feature=share").unwrap(), "abc123");
    }

    #[test]
    fn rejects_unrecognized_urls() {
        for input in ["https://vimeo.com/12345", "climate change", "https://youtube.com/"] {
            let err = extract_video_id(input).unwrap_err();
            assert!(matches!(err, SmaraError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Invalid YouTube URL");
        }
    }

    #[test]
    fn cleaning_collapses_whitespace_and_drops_cues() {
        assert_eq!(
            clean_transcript("  hello\n\n [Music]  world\t[Applause] again "),
            "hello world again"
        );
    }

    #[tokio::test]
    async fn joins_and_cleans_fragments() {
        let mut agent = TranscriptAgent::with_provider(Box::new(StaticTranscript(Ok(vec![
            "[Music] welcome",
            "to   the\nshow",
        ]))));

        let transcript = agent.run("https://youtu.be/abc123".to_string()).await.unwrap();
        assert_eq!(transcript, "welcome to the show");
    }

    #[tokio::test]
    async fn cue_inside_a_fragment_leaves_single_spaces() {
        let mut agent = TranscriptAgent::with_provider(Box::new(StaticTranscript(Ok(vec![
            "so we [Applause] begin",
            "[Music]",
            "right [inaudible] here",
        ]))));

        let transcript = agent.run("https://youtu.be/abc123".to_string()).await.unwrap();
        assert_eq!(transcript, "so we begin right here");
    }

    #[tokio::test]
    async fn disabled_transcripts_yield_sentinel_success() {
        let mut agent =
            TranscriptAgent::with_provider(Box::new(StaticTranscript(Err("disabled"))));

        let mut params = Params::new();
        params.insert("url".to_string(), json!("https://youtu.be/abc123"));
        let result = agent.handle_request("extract_transcript", &params).await;

        assert_eq!(result, AgentResult::Success(NO_TRANSCRIPT.to_string()));
    }

    #[tokio::test]
    async fn missing_language_yields_sentinel_success() {
        let mut agent = TranscriptAgent::with_provider(Box::new(StaticTranscript(Err("missing"))));

        let transcript = agent.run("https://youtu.be/abc123".to_string()).await.unwrap();
        assert_eq!(transcript, NO_TRANSCRIPT);
    }

    #[tokio::test]
    async fn provider_failures_surface_as_extraction_errors() {
        let mut agent =
            TranscriptAgent::with_provider(Box::new(StaticTranscript(Err("connection reset"))));

        let err = agent
            .run("https://youtu.be/abc123".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, SmaraError::Extraction(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn invalid_url_fails_the_request() {
        let mut agent = TranscriptAgent::with_provider(Box::new(StaticTranscript(Ok(vec![]))));

        let mut params = Params::new();
        params.insert("url".to_string(), json!("not a video"));
        let result = agent.handle_request("extract_transcript", &params).await;

        assert_eq!(result, AgentResult::Failure("Invalid YouTube URL".to_string()));
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let mut agent = TranscriptAgent::with_provider(Box::new(StaticTranscript(Ok(vec![]))));

        let result = agent.handle_request("summarize_text", &Params::new()).await;
        assert_eq!(result, AgentResult::unknown_method());
    }
}
