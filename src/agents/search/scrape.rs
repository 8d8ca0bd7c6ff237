use super::{SearchHit, SearchProvider};
use crate::agents::decode_entities;
use crate::error::{Result, SmaraError};
use crate::Config;
use once_cell::sync::Lazy;
use regex::Regex;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; SMARA/1.0)";

static RESULT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div class="result[ "]"#).expect("valid regex"));
static TITLE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#).expect("valid regex")
});
static SNIPPET_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#).expect("valid regex")
});
static HREF_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]*)""#).expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Key-free search by scraping DuckDuckGo's HTML endpoint
pub struct DuckDuckGoScrape {
    client: reqwest::Client,
}

impl DuckDuckGoScrape {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl SearchProvider for DuckDuckGoScrape {
    fn label(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        log::debug!("Scraping DuckDuckGo for query: {}", query);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SmaraError::Provider(format!(
                "DuckDuckGo returned {}",
                response.status()
            )));
        }

        let html = response.text().await?;
        Ok(parse_results(&html, limit))
    }
}

/// Parse up to `limit` result blocks; blocks lacking a title or snippet are skipped
/// but still count toward the limit.
pub fn parse_results(html: &str, limit: usize) -> Vec<SearchHit> {
    let starts: Vec<usize> = RESULT_BLOCK.find_iter(html).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .take(limit)
        .filter_map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            parse_block(&html[start..end])
        })
        .collect()
}

fn parse_block(block: &str) -> Option<SearchHit> {
    let title = TITLE_ANCHOR.captures(block)?;
    let snippet = SNIPPET_ANCHOR.captures(block)?;

    let link = HREF_ATTR
        .captures(&title[1])
        .map(|caps| decode_entities(&caps[1]))
        .unwrap_or_default();

    Some(SearchHit {
        title: inner_text(&title[2]),
        snippet: inner_text(&snippet[1]),
        link,
    })
}

fn inner_text(fragment: &str) -> String {
    decode_entities(&TAG.replace_all(fragment, "")).trim().to_string()
}
