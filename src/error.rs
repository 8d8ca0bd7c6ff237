//! Error types for agent capabilities.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmaraError {
    /// Malformed user input, e.g. a URL no pattern recognizes.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Transcript extraction failed: {0}")]
    Extraction(String),

    #[error("No transcript found for {video_id} in languages {languages:?}")]
    NoTranscript {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmaraError {
    /// True for the provider outcomes that mean "this video has no usable captions".
    pub fn is_missing_transcript(&self) -> bool {
        matches!(
            self,
            SmaraError::NoTranscript { .. } | SmaraError::TranscriptsDisabled(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SmaraError>;
