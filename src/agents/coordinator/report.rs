//! Human-readable reports assembled from the two pipeline stages.

pub const TRANSCRIPT_PREVIEW_CHARS: usize = 500;
pub const SEARCH_PREVIEW_CHARS: usize = 800;

/// First `limit` characters, with an ellipsis when anything was cut
pub fn preview(text: &str, limit: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn communication_log(worker: &str, method: &str) -> String {
    format!(
        "🔄 **Agent Communication Log**\n\
         1. coordinator → {worker}: {method}\n\
         2. {worker} → coordinator: success\n\
         3. coordinator → summarizer_agent: summarize_text\n\
         4. summarizer_agent → coordinator: success"
    )
}

pub fn youtube_report(transcript: &str, summary: &str) -> String {
    format!(
        "🎥 **YouTube Video Analysis**\n\n\
         📋 **Full Transcript** ({} chars)\n\
         {}\n\n\
         📊 **AI Summary**\n\
         {}\n\n\
         {}\n\n\
         ✅ **Workflow Complete**",
        transcript.chars().count(),
        preview(transcript, TRANSCRIPT_PREVIEW_CHARS),
        summary,
        communication_log("transcript_agent", "extract_transcript"),
    )
}

pub fn search_report(query: &str, results: &str, summary: &str) -> String {
    format!(
        "🔍 **Research Results for: \"{}\"**\n\n\
         📊 **AI Summary**\n\
         {}\n\n\
         📋 **Detailed Search Results**\n\
         {}\n\n\
         {}\n\n\
         ✅ **Workflow Complete**",
        query,
        summary,
        preview(results, SEARCH_PREVIEW_CHARS),
        communication_log("search_agent", "web_search"),
    )
}
