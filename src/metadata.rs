// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::feed::Episode;

/// Upload payload for the videos.insert call, `snippet,status` parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
}

/// Render the configured title template against an episode.
///
/// Supports the fields `{title}` and `{number}`.
pub fn render_title(template: &str, title: &str, number: u32) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + title.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or(TemplateError::Unclosed {
            position: consumed + open,
        })?;
        match &after[..close] {
            "title" => out.push_str(title),
            "number" => out.push_str(&number.to_string()),
            field => {
                return Err(TemplateError::UnknownField {
                    field: field.to_string(),
                });
            }
        }
        consumed += open + 1 + close + 1;
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Strip all markup from an episode description and flatten line breaks
/// to single spaces, leaving plain text suitable for a video description.
pub fn sanitize_description(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for c in raw.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = html_escape::decode_html_entities(&text);
    decoded.replace('\n', " ")
}

/// Build the final upload metadata for one episode: description prefixed
/// with the original post link, feed tags followed by the configured extra
/// tags, visibility fixed to unlisted.
pub fn build_metadata(episode: &Episode, title: String, extra_tags: &[String]) -> VideoMetadata {
    let description = format!(
        "Original post: {}\n\n{}",
        episode.link,
        sanitize_description(&episode.description)
    );

    let mut tags = episode.tags.clone();
    tags.extend(extra_tags.iter().cloned());

    VideoMetadata {
        snippet: VideoSnippet {
            title,
            description,
            tags,
        },
        status: VideoStatus {
            privacy_status: "unlisted".to_string(),
        },
    }
}
