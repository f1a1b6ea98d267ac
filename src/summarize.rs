use eyre::{Result, bail};
use log::debug;

use crate::app::Summarizer;

pub const DEFAULT_MODEL: &str = "gemini-pro";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Wrap transcript text in the note-taking instructions
pub fn build_prompt(transcript_text: &str) -> String {
    format!(
        "\n    You are a YouTube video summarizer. You will be taking the transcript text\n    \
         and summarizing the entire video, providing the important points within 1000 words.\n    \
         Please provide the summary of the text given here:\n    \
         {transcript_text}\n    "
    )
}

/// `generateContent` body carrying a single text prompt
fn request_body(prompt: &str) -> serde_json::Value {
    serde_json::json!({
        "contents": [
            {
                "parts": [
                    { "text": prompt }
                ]
            }
        ]
    })
}

fn api_error(status: reqwest::StatusCode, body: &str) -> eyre::Report {
    eyre::eyre!("Gemini API returned {status}: {body}")
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct Gemini {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
}

impl Gemini {
    /// The key is not checked here; a missing key fails the first request.
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key,
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!(
                "{} environment variable not set (required for Gemini summarization)",
                crate::config::API_KEY_ENV
            );
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&request_body(prompt))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let json: serde_json::Value = resp.json().await?;
        extract_gemini_text(&json)
    }
}

impl Summarizer for Gemini {
    async fn summarize(&self, transcript_text: &str, subject: &str) -> Result<String> {
        debug!(
            "Summarizing ({subject}) via Gemini model {} with {} bytes of transcript",
            self.model,
            transcript_text.len()
        );
        self.generate(&build_prompt(transcript_text)).await
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect();
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        bail!("Gemini blocked the prompt: {reason}");
    }
    bail!("unexpected Gemini API response format");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_embeds_transcript_verbatim() {
        let prompt = build_prompt("Hello world ");
        assert!(prompt.contains("You are a YouTube video summarizer."));
        assert!(prompt.contains("within 1000 words"));
        assert_eq!(
            prompt,
            "\n    You are a YouTube video summarizer. You will be taking the transcript text\n    \
             and summarizing the entire video, providing the important points within 1000 words.\n    \
             Please provide the summary of the text given here:\n    Hello world \n    "
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body("the prompt");
        assert_eq!(
            body,
            serde_json::json!({ "contents": [ { "parts": [ { "text": "the prompt" } ] } ] })
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = api_error(reqwest::StatusCode::FORBIDDEN, r#"{"error":{"status":"PERMISSION_DENIED"}}"#);
        assert_eq!(
            err.to_string(),
            r#"Gemini API returned 403 Forbidden: {"error":{"status":"PERMISSION_DENIED"}}"#
        );
    }

    #[test]
    fn test_endpoint() {
        let g = Gemini::new(reqwest::Client::new(), None, DEFAULT_MODEL);
        assert_eq!(
            g.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_on_request() {
        let g = Gemini::new(reqwest::Client::new(), None, DEFAULT_MODEL);
        let err = g.summarize("text ", "Summary").await.unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_extract_gemini_text_unmodified() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [
                            { "text": "  * First point\n" },
                            { "text": "* Second point  " }
                        ]
                    }
                }
            ]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "  * First point\n* Second point  ");
    }

    #[test]
    fn test_extract_gemini_text_empty() {
        let json = serde_json::json!({"candidates": []});
        assert!(extract_gemini_text(&json).is_err());
    }

    #[test]
    fn test_extract_gemini_text_blocked() {
        let json = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
