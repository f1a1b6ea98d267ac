use eyre::{Result, bail};
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::app::TranscriptFetcher;
use crate::{Segment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Track `kind` YouTube assigns to automatic speech recognition captions
const GENERATED_KIND: &str = "asr";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
    #[serde(rename = "videoDetails")]
    video_details: Option<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

/// One caption track advertised by the player response
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "languageCode")]
    pub language_code: String,
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some(GENERATED_KIND)
    }
}

/// Caption tracks available for a video
#[derive(Debug, Clone)]
pub struct TrackList {
    pub video_id: String,
    pub title: String,
    pub tracks: Vec<CaptionTrack>,
}

impl TrackList {
    /// Pick the auto-generated track for `lang`.
    ///
    /// An empty list yields `Ok(None)`; a non-empty list without a generated
    /// track in that language is an error.
    pub fn find_generated(&self, lang: &str) -> Result<Option<&CaptionTrack>> {
        if self.tracks.is_empty() {
            return Ok(None);
        }
        match self.tracks.iter().find(|t| t.is_generated() && t.language_code == lang) {
            Some(track) => Ok(Some(track)),
            None => bail!("no auto-generated '{lang}' transcript for video {}", self.video_id),
        }
    }
}

/// Fetches auto-generated captions through YouTube's InnerTube API
#[derive(Debug, Clone)]
pub struct CaptionFetcher {
    client: reqwest::Client,
    lang: String,
}

impl CaptionFetcher {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
        }
    }
}

impl TranscriptFetcher for CaptionFetcher {
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        fetch_transcript(&self.client, video_id, &self.lang).await
    }
}

/// List the caption tracks for a video
pub async fn list_tracks(client: &reqwest::Client, video_id: &str, lang: &str) -> Result<TrackList> {
    // Step 1: Fetch the watch page to get the InnerTube API key
    let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
    debug!("Fetching watch page: {watch_url}");

    let page_html = client
        .get(&watch_url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let api_key = extract_api_key(&page_html)?;
    debug!("Extracted InnerTube API key: {api_key}");

    // Step 2: Call InnerTube player endpoint
    let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

    let body = serde_json::json!({
        "context": {
            "client": {
                "hl": lang,
                "gl": "US",
                "clientName": "WEB",
                "clientVersion": "2.20241126.01.00"
            }
        },
        "videoId": video_id
    });

    let resp: InnerTubePlayerResponse = client
        .post(&player_url)
        .header("User-Agent", USER_AGENT)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    track_list(video_id, resp)
}

fn track_list(video_id: &str, resp: InnerTubePlayerResponse) -> Result<TrackList> {
    // Missing, private and age-gated videos come back without captions
    if let Some(ps) = resp.playability_status.as_ref().filter(|ps| ps.status != "OK") {
        match ps.reason.as_deref() {
            Some(reason) => bail!("video {video_id} is not playable ({}): {reason}", ps.status),
            None => bail!("video {video_id} is not playable ({})", ps.status),
        }
    }

    let title = resp
        .video_details
        .and_then(|vd| vd.title)
        .unwrap_or_default();

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    debug!("Video {video_id} lists {} caption track(s)", tracks.len());

    Ok(TrackList {
        video_id: video_id.to_string(),
        title,
        tracks,
    })
}

/// Fetch the auto-generated transcript for a video.
///
/// A video with no caption tracks yields a transcript with no segments.
pub async fn fetch_transcript(client: &reqwest::Client, video_id: &str, lang: &str) -> Result<Transcript> {
    let list = list_tracks(client, video_id, lang).await?;

    let segments = match list.find_generated(lang)? {
        Some(track) => {
            debug!("Using generated caption track: lang={}", track.language_code);
            fetch_segments(client, track).await?
        }
        None => Vec::new(),
    };

    Ok(Transcript {
        video_id: list.video_id,
        title: list.title,
        language: lang.to_string(),
        segments,
    })
}

async fn fetch_segments(client: &reqwest::Client, track: &CaptionTrack) -> Result<Vec<Segment>> {
    let caption_xml = client
        .get(&track.base_url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_caption_xml(&caption_xml)
}

fn extract_api_key(html: &str) -> Result<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#)?;
    if let Some(caps) = re.captures(html) {
        return Ok(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#)?;
    if let Some(caps) = re2.captures(html) {
        return Ok(caps[1].to_string());
    }

    bail!("could not extract InnerTube API key from watch page");
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value);
                    match attr.key.as_ref() {
                        b"start" => current_start = value.parse::<f64>().ok(),
                        b"dur" => current_dur = value.parse::<f64>().ok(),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(start) = current_start.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: current_dur.take().unwrap_or_default(),
                        });
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("error parsing caption XML: {e}"),
            _ => {}
        }
    }

    Ok(segments)
}
