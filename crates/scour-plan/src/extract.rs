//! JSON extraction from free-form advisor text.
//!
//! Advisors are asked for raw JSON but often wrap it in prose or a fenced
//! code block. Extraction tries three rungs in order: the whole text as
//! JSON, a ```json fenced block, then the first brace-delimited value.

use serde_json::Value;

use crate::error::AdvisorError;

/// Extract a JSON value from advisor response text.
pub fn extract_json(text: &str) -> Result<Value, AdvisorError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }
    if let Some(block) = fenced_block(trimmed)
        && let Ok(value) = serde_json::from_str::<Value>(block.trim())
    {
        return Ok(value);
    }
    if let Some(idx) = trimmed.find('{') {
        let mut stream = serde_json::Deserializer::from_str(&trimmed[idx..]).into_iter::<Value>();
        if let Some(Ok(value)) = stream.next() {
            return Ok(value);
        }
    }
    Err(AdvisorError::Extraction(preview(trimmed)))
}

/// Body of the first ```json (or bare ```) fenced block, if any.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

fn preview(text: &str) -> String {
    const MAX: usize = 80;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}...")
    }
}
