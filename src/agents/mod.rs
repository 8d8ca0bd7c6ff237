// Re-export Agent trait from main agent module
pub use crate::agent::Agent;

// Agent implementation modules
pub mod coordinator;
pub mod search;
pub mod summarizer;
pub mod transcript;

// Re-export main agents
pub use coordinator::CoordinatorAgent;
pub use search::SearchAgent;
pub use summarizer::SummarizerAgent;
pub use transcript::TranscriptAgent;

/// Decode named and numeric HTML character references
pub(crate) fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
