use crate::agents::decode_entities;
use crate::error::{Result, SmaraError};
use crate::Config;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_RESPONSE: &str = "ytInitialPlayerResponse";

static TEXT_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<text([^>]*)>(.*?)</text>"#).expect("valid regex"));
static START_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"start="([0-9.]+)""#).expect("valid regex"));
static DUR_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r#"dur="([0-9.]+)""#).expect("valid regex"));

/// One caption line as delivered by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Source of caption fragments for a video
#[async_trait::async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch captions in the first available language from `languages`.
    /// Fails with `NoTranscript` or `TranscriptsDisabled` when the video has none.
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<Vec<CaptionFragment>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
}

/// Reads caption tracks advertised on the public watch page
pub struct YoutubeTranscripts {
    client: reqwest::Client,
}

impl YoutubeTranscripts {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Config::http_client(config.request_timeout_seconds)?;
        Ok(Self { client })
    }

    async fn caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        log::debug!("Fetching watch page for video {}", video_id);

        let response = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SmaraError::Provider(format!(
                "watch page returned {}",
                response.status()
            )));
        }

        let page = response.text().await?;
        parse_caption_tracks(&page)?
            .ok_or_else(|| SmaraError::TranscriptsDisabled(video_id.to_string()))
    }
}

#[async_trait::async_trait]
impl TranscriptProvider for YoutubeTranscripts {
    async fn fetch(&self, video_id: &str, languages: &[&str]) -> Result<Vec<CaptionFragment>> {
        let tracks = self.caption_tracks(video_id).await?;

        let track = languages
            .iter()
            .find_map(|lang| tracks.iter().find(|track| track.language_code == *lang))
            .ok_or_else(|| SmaraError::NoTranscript {
                video_id: video_id.to_string(),
                languages: languages.iter().map(|lang| lang.to_string()).collect(),
            })?;

        log::debug!("Fetching {} captions for video {}", track.language_code, video_id);

        let response = self.client.get(&track.base_url).send().await?;
        if !response.status().is_success() {
            return Err(SmaraError::Provider(format!(
                "caption track returned {}",
                response.status()
            )));
        }

        let xml = response.text().await?;
        Ok(parse_timed_text(&xml))
    }
}

/// Locate and parse the player response JSON embedded in a watch page
fn player_response(page: &str) -> Result<Value> {
    let missing = || SmaraError::Provider("watch page has no player response".to_string());

    let marker = page.find(PLAYER_RESPONSE).ok_or_else(missing)?;
    let rest = &page[marker + PLAYER_RESPONSE.len()..];
    let assign = rest.find('=').ok_or_else(missing)?;
    let body = rest[assign + 1..].trim_start();
    if !body.starts_with('{') {
        return Err(missing());
    }

    // Let the JSON parser find the end of the object
    let mut stream = serde_json::Deserializer::from_str(body).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(SmaraError::Provider(format!(
            "unreadable player response: {}",
            e
        ))),
        None => Err(missing()),
    }
}

/// Caption tracks of a playable video.
/// `Ok(None)` means the video plays but advertises no captions.
fn parse_caption_tracks(page: &str) -> Result<Option<Vec<CaptionTrack>>> {
    let player = player_response(page)?;

    let status = player
        .pointer("/playabilityStatus/status")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    if status != "OK" {
        let reason = player
            .pointer("/playabilityStatus/reason")
            .and_then(Value::as_str)
            .unwrap_or("no reason given");
        return Err(SmaraError::Provider(format!(
            "video is not playable ({}): {}",
            status, reason
        )));
    }

    let tracks = match player
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks")
        .filter(|tracks| !tracks.is_null())
    {
        Some(tracks) => tracks,
        None => return Ok(None),
    };
    let tracks = Vec::<CaptionTrack>::deserialize(tracks)
        .map_err(|e| SmaraError::Provider(format!("unreadable caption tracks: {}", e)))?;

    if tracks.is_empty() {
        Ok(None)
    } else {
        Ok(Some(tracks))
    }
}

/// Parse timed-text XML into caption fragments
fn parse_timed_text(xml: &str) -> Vec<CaptionFragment> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .map(|caps| {
            let attrs = &caps[1];
            let number = |re: &Regex| {
                re.captures(attrs)
                    .and_then(|c| c[1].parse::<f64>().ok())
                    .unwrap_or(0.0)
            };

            CaptionFragment {
                // Caption text arrives entity-encoded inside XML, so decode both layers
                text: decode_entities(&decode_entities(&caps[2])),
                start: number(&*START_ATTR),
                duration: number(&*DUR_ATTR),
            }
        })
        .collect()
}
