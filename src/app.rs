//! Event handlers behind the notes front end.
//!
//! Each user action is one call: entering a link runs [`App::on_link`],
//! asking for notes runs [`App::on_get_notes`]. Nothing is remembered
//! between calls.

use std::future::Future;

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::{Transcript, extract_video_id, thumbnail_url};

/// Topic label handed to the summarizer
pub const DEFAULT_SUBJECT: &str = "Summary";

/// Source of transcripts, keyed by video ID
pub trait TranscriptFetcher {
    fn fetch(&self, video_id: &str) -> impl Future<Output = eyre::Result<Transcript>>;
}

/// Turns transcript text into prose
pub trait Summarizer {
    fn summarize(&self, transcript_text: &str, subject: &str) -> impl Future<Output = eyre::Result<String>>;
}

/// User-facing failure of a single request
#[derive(Debug, Error)]
pub enum Failure {
    #[error("Please enter a valid YouTube link.")]
    InvalidLink,

    #[error("Transcripts are disabled or unavailable for this video.")]
    TranscriptUnavailable,

    #[error("Failed to retrieve transcript: {0}")]
    TranscriptFetch(String),

    #[error("Failed to generate notes: {0}")]
    Generation(String),
}

/// Result of entering a link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPreview {
    pub video_id: String,
    pub thumbnail_url: String,
}

/// Generated notes for one video
#[derive(Debug, Clone, Serialize)]
pub struct Notes {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub summary: String,
}

pub struct App<F, S> {
    fetcher: F,
    summarizer: S,
    subject: String,
}

impl<F: TranscriptFetcher, S: Summarizer> App<F, S> {
    pub fn new(fetcher: F, summarizer: S) -> Self {
        Self {
            fetcher,
            summarizer,
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }

    /// Resolve a link to its video ID and thumbnail
    pub fn on_link(&self, link: &str) -> Result<LinkPreview, Failure> {
        let video_id = extract_video_id(link).ok_or(Failure::InvalidLink)?;
        debug!("Link resolved to video {video_id}");
        Ok(LinkPreview {
            thumbnail_url: thumbnail_url(&video_id),
            video_id,
        })
    }

    /// Fetch the transcript for a link and summarize it
    pub async fn on_get_notes(&self, link: &str) -> Result<Notes, Failure> {
        let preview = self.on_link(link)?;

        let transcript = self
            .fetcher
            .fetch(&preview.video_id)
            .await
            .map_err(|e| Failure::TranscriptFetch(format!("{e:#}")))?;

        let text = transcript.text();
        if text.is_empty() {
            debug!("Video {} produced an empty transcript", preview.video_id);
            return Err(Failure::TranscriptUnavailable);
        }
        info!(
            "Transcript for {}: {} segments, {} bytes",
            preview.video_id,
            transcript.segments.len(),
            text.len()
        );

        let summary = self
            .summarizer
            .summarize(&text, &self.subject)
            .await
            .map_err(|e| Failure::Generation(format!("{e:#}")))?;

        Ok(Notes {
            video_id: preview.video_id,
            title: transcript.title,
            thumbnail_url: preview.thumbnail_url,
            summary,
        })
    }
}
