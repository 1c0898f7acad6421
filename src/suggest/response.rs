//! `generateContent` request/response schema and suggestion cleanup.
//!
//! Every level of the response is optional or may be empty; any missing
//! piece yields `None` rather than an error.

use serde::{Deserialize, Serialize};

/// Request body: one content entry with a single text part.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct RequestContent<'a> {
    pub parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct RequestPart<'a> {
    pub text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let part = content.parts.first()?;
        part.text.as_deref()
    }
}

/// Normalize raw model output into a commit message.
///
/// Trims whitespace and strips code-fence backtick runs at either end. If an
/// opening fence is immediately followed by a language tag on its own line
/// (as in "```text"), the tag is dropped too. Repeats until nothing changes,
/// so cleaning is idempotent.
pub fn clean_suggestion(raw: &str) -> String {
    let mut current = raw.trim();
    loop {
        let unfenced = current.trim_start_matches('`');
        let had_opening_fence = unfenced.len() != current.len();
        let mut body = unfenced.trim_end_matches('`');

        if had_opening_fence
            && let Some((first_line, rest)) = body.split_once('\n')
            && is_language_tag(first_line)
        {
            body = rest;
        }

        let next = body.trim();
        if next.len() == current.len() {
            return next.to_string();
        }
        current = next;
    }
}

fn is_language_tag(line: &str) -> bool {
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}
