use crate::agent::Agent;
use crate::envelope::{str_param, AgentResult, Envelope, Params};
use crate::error::Result;
use crate::Config;
use std::str::FromStr;

mod scrape;
mod serper;
pub use scrape::{parse_results, DuckDuckGoScrape};
pub use serper::SerperSearch;

/// Returned by the keyed provider when it finds nothing
pub const NO_RESULTS: &str = "No search results found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchHit {
    /// Bold title, snippet, then source line
    pub fn format(&self) -> String {
        format!("**{}**\n{}\nSource: {}\n", self.title, self.snippet, self.link)
    }
}

/// Format hits as blocks separated by blank lines
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter().map(SearchHit::format).collect::<Vec<_>>().join("\n")
}

/// A search backend returning at most `limit` hits
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in log lines
    fn label(&self) -> &str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    WebSearch,
}

impl FromStr for SearchMethod {
    type Err = ();

    fn from_str(method: &str) -> std::result::Result<Self, Self::Err> {
        match method {
            "web_search" => Ok(SearchMethod::WebSearch),
            _ => Err(()),
        }
    }
}

/// Web search with a keyed primary provider and a scraping fallback.
/// Never fails: every problem degrades to fallback results or sentinel text.
pub struct SearchAgent {
    primary: Option<Box<dyn SearchProvider>>,
    fallback: Box<dyn SearchProvider>,
    max_results: usize,
    log: Vec<Envelope>,
}

impl SearchAgent {
    pub fn new(config: &Config) -> Result<Self> {
        let primary = SerperSearch::from_config(config)?
            .map(|serper| Box::new(serper) as Box<dyn SearchProvider>);
        let fallback = Box::new(DuckDuckGoScrape::new(config)?);
        Ok(Self::with_providers(primary, fallback, config.max_search_results))
    }

    pub fn with_providers(
        primary: Option<Box<dyn SearchProvider>>,
        fallback: Box<dyn SearchProvider>,
        max_results: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            max_results,
            log: Vec::new(),
        }
    }

    async fn fallback_search(&self, query: &str) -> String {
        match self.fallback.search(query, self.max_results).await {
            Ok(hits) if hits.is_empty() => format!("Basic search completed for: {}", query),
            Ok(hits) => format_hits(&hits),
            Err(e) => {
                log::warn!("{} search failed: {}", self.fallback.label(), e);
                format!("Search unavailable. Query was: {}\nError: {}", query, e)
            }
        }
    }
}

#[async_trait::async_trait]
impl Agent for SearchAgent {
    type Method = SearchMethod;
    type Input = String;

    fn name(&self) -> &str {
        "search_agent"
    }

    fn message_log(&self) -> &[Envelope] {
        &self.log
    }

    fn record(&mut self, envelope: Envelope) {
        self.log.push(envelope);
    }

    async fn handle(&mut self, method: SearchMethod, params: &Params) -> AgentResult {
        match method {
            SearchMethod::WebSearch => {
                let query = str_param(params, "query").to_string();
                self.run(query).await.into()
            }
        }
    }

    async fn run(&mut self, query: String) -> Result<String> {
        if let Some(primary) = &self.primary {
            match primary.search(&query, self.max_results).await {
                Ok(hits) if hits.is_empty() => return Ok(NO_RESULTS.to_string()),
                Ok(hits) => return Ok(format_hits(&hits)),
                Err(e) => log::warn!(
                    "{} search failed: {}, trying fallback...",
                    primary.label(),
                    e
                ),
            }
        }

        Ok(self.fallback_search(&query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SmaraError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticSearch {
        outcome: std::result::Result<Vec<SearchHit>, String>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSearch {
        fn boxed(
            outcome: std::result::Result<Vec<SearchHit>, String>,
        ) -> (Box<dyn SearchProvider>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let provider = Box::new(Self {
                outcome,
                calls: calls.clone(),
            });
            (provider, calls)
        }
    }

    #[async_trait::async_trait]
    impl SearchProvider for StaticSearch {
        fn label(&self) -> &str {
            "static"
        }

        async fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(hits) => Ok(hits.iter().take(limit).cloned().collect()),
                Err(message) => Err(SmaraError::Provider(message.clone())),
            }
        }
    }

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            snippet: format!("About {}", title),
            link: format!("https://example.test/{}", title),
        }
    }

    #[test]
    fn hits_format_as_three_line_blocks() {
        let text = format_hits(&[hit("one"), hit("two")]);
        assert_eq!(
            text,
            "**one**\nAbout one\nSource: https://example.test/one\n\n**two**\nAbout two\nSource: https://example.test/two\n"
        );
    }

    #[tokio::test]
    async fn primary_results_win() {
        let (primary, _) = StaticSearch::boxed(Ok(vec![hit("keyed")]));
        let (fallback, fallback_calls) = StaticSearch::boxed(Ok(vec![hit("scraped")]));
        let mut agent = SearchAgent::with_providers(Some(primary), fallback, 5);

        let text = agent.run("rust".to_string()).await.unwrap();
        assert!(text.contains("**keyed**"));
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_primary_reports_no_results() {
        let (primary, _) = StaticSearch::boxed(Ok(vec![]));
        let (fallback, fallback_calls) = StaticSearch::boxed(Ok(vec![hit("scraped")]));
        let mut agent = SearchAgent::with_providers(Some(primary), fallback, 5);

        assert_eq!(agent.run("rust".to_string()).await.unwrap(), NO_RESULTS);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_through_to_scrape() {
        let (primary, primary_calls) = StaticSearch::boxed(Err("401 unauthorized".to_string()));
        let (fallback, fallback_calls) = StaticSearch::boxed(Ok(vec![hit("scraped")]));
        let mut agent = SearchAgent::with_providers(Some(primary), fallback, 5);

        let text = agent.run("rust".to_string()).await.unwrap();
        assert!(text.contains("**scraped**"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_scrape_without_key_returns_query_sentinel() {
        let (fallback, _) = StaticSearch::boxed(Ok(vec![]));
        let mut agent = SearchAgent::with_providers(None, fallback, 5);

        let mut params = Params::new();
        params.insert("query".to_string(), json!("quantum tunnelling"));
        let result = agent.handle_request("web_search", &params).await;

        assert!(result.is_success());
        let data = result.data().unwrap();
        assert_eq!(data, "Basic search completed for: quantum tunnelling");
    }

    #[tokio::test]
    async fn scrape_failure_embeds_query_and_error() {
        let (fallback, _) = StaticSearch::boxed(Err("dns failure".to_string()));
        let mut agent = SearchAgent::with_providers(None, fallback, 5);

        let text = agent.run("rust".to_string()).await.unwrap();
        assert_eq!(
            text,
            "Search unavailable. Query was: rust\nError: Provider error: dns failure"
        );
    }

    #[tokio::test]
    async fn result_count_is_capped() {
        let (fallback, _) = StaticSearch::boxed(Ok(vec![hit("a"), hit("b"), hit("c")]));
        let mut agent = SearchAgent::with_providers(None, fallback, 2);

        let text = agent.run("letters".to_string()).await.unwrap();
        assert!(text.contains("**b**"));
        assert!(!text.contains("**c**"));
    }
}
