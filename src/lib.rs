pub mod app;
pub mod config;
pub mod output;
pub mod summarize;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A single captioned segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Concatenate segment texts, each followed by a single space.
    ///
    /// Timing is dropped and nothing is de-duplicated, so `["Hello", "world"]`
    /// becomes `"Hello world "`.
    pub fn text(&self) -> String {
        self.segments.iter().fold(String::new(), |mut acc, s| {
            acc.push_str(&s.text);
            acc.push(' ');
            acc
        })
    }
}

// Priority order: watch page, short link, embed page
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"youtube\.com/.*v=([^&]*)").expect("watch pattern"),
        Regex::new(r"youtu\.be/([^\?]*)").expect("short pattern"),
        Regex::new(r"youtube\.com/embed/([^\?]*)").expect("embed pattern"),
    ]
});

/// Extract the video ID from a watch, youtu.be or embed URL
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
}

/// Thumbnail image URL for a video ID
pub fn thumbnail_url(video_id: &str) -> String {
    format!("http://img.youtube.com/vi/{video_id}/0.jpg")
}
