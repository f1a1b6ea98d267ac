use eyre::Result;

use crate::app::Notes;

/// Render notes as text: thumbnail, heading, then the summary as returned
pub fn render_text(notes: &Notes) -> String {
    let mut out = String::new();
    if !notes.title.is_empty() {
        out.push_str(&format!("# {}\n\n", notes.title));
    }
    out.push_str(&format!("Thumbnail: {}\n\n", notes.thumbnail_url));
    out.push_str("## Detailed Notes:\n");
    out.push_str(&notes.summary);
    out
}

/// Render notes as pretty-printed JSON
pub fn render_json(notes: &Notes) -> Result<String> {
    Ok(serde_json::to_string_pretty(notes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_notes() -> Notes {
        Notes {
            video_id: "dQw4w9WgXcQ".to_string(),
            title: "Test Video".to_string(),
            thumbnail_url: "http://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg".to_string(),
            summary: "* First point\n* Second point".to_string(),
        }
    }

    #[test]
    fn test_render_text() {
        let output = render_text(&sample_notes());
        assert_eq!(
            output,
            "# Test Video\n\nThumbnail: http://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg\n\n\
             ## Detailed Notes:\n* First point\n* Second point"
        );
    }

    #[test]
    fn test_render_text_untitled() {
        let notes = Notes {
            title: String::new(),
            ..sample_notes()
        };
        assert!(render_text(&notes).starts_with("Thumbnail: "));
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_notes()).unwrap()).unwrap();
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
        assert_eq!(json["summary"], "* First point\n* Second point");
    }
}
