//! Splits a free-text model reply into its narrative and its JSON design block.
//!
//! Extraction rule:
//! - a code fence (```, ```json, ```JSON, ...) whose body opens with `{` marks
//!   the JSON object, and the narrative ends at that fence;
//! - without such a fence, the object is the first balanced `{...}` span that
//!   parses as JSON, so stray braces in prose like `{points}` are skipped;
//! - the object ends at the matching `}` (braces inside JSON strings are ignored);
//! - the narrative is everything before it, trimmed, minus any dangling fence line;
//! - after the object only whitespace and one closing fence may follow.
//!
//! Anything else is a `SchemaValidation` error. There is no fallback design.

use serde_json::Value;

use crate::design::models::LoyaltyProgramDesign;
use crate::errors::AppError;

const FENCE: &str = "```";
const DESIGN_KEY: &str = "loyalty_program_design";

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub narrative: String,
    pub design: LoyaltyProgramDesign,
}

/// Byte offsets of the JSON object within a reply.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ObjectSpan {
    narrative_end: usize,
    start: usize,
    end: usize,
}

pub fn split_reply(reply: &str) -> Result<ParsedReply, AppError> {
    let span = locate_object(reply)?;

    let trailing = reply[span.end..].trim_start();
    let trailing = trailing.strip_prefix(FENCE).unwrap_or(trailing);
    if !trailing.trim().is_empty() {
        return Err(AppError::SchemaValidation(
            "unexpected text after the JSON object".to_string(),
        ));
    }

    let design = parse_design(&reply[span.start..span.end])?;
    let narrative = strip_trailing_fence(reply[..span.narrative_end].trim()).to_string();

    Ok(ParsedReply { narrative, design })
}

fn locate_object(reply: &str) -> Result<ObjectSpan, AppError> {
    if let Some((fence_start, start)) = fenced_object_start(reply) {
        let len = find_object_end(&reply[start..]).ok_or_else(|| {
            AppError::SchemaValidation("JSON object in reply is not closed".to_string())
        })?;
        return Ok(ObjectSpan {
            narrative_end: fence_start,
            start,
            end: start + len,
        });
    }

    let mut search_from = 0;
    while let Some(offset) = reply[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(len) = find_object_end(&reply[start..]) {
            let end = start + len;
            if serde_json::from_str::<Value>(&reply[start..end]).is_ok() {
                return Ok(ObjectSpan {
                    narrative_end: start,
                    start,
                    end,
                });
            }
        }
        search_from = start + 1;
    }

    Err(AppError::SchemaValidation(
        "reply contains no JSON object".to_string(),
    ))
}

/// Finds the first fence (any or no language tag) whose body starts with `{`.
/// Returns (fence start, object start).
fn fenced_object_start(reply: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;

    while let Some(offset) = reply[search_from..].find(FENCE) {
        let fence_start = search_from + offset;
        let after_fence = fence_start + FENCE.len();
        let line_end = reply[after_fence..]
            .find('\n')
            .map_or(reply.len(), |i| after_fence + i);

        let tag = reply[after_fence..line_end].trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            let body = reply[line_end..].trim_start();
            if body.starts_with('{') {
                return Some((fence_start, reply.len() - body.len()));
            }
        }

        search_from = after_fence;
    }

    None
}

/// Drops a last line that is only a fence opener, e.g. "```" or "```JSON".
fn strip_trailing_fence(narrative: &str) -> &str {
    let last_line_start = narrative.rfind('\n').map_or(0, |i| i + 1);
    if narrative[last_line_start..].trim_start().starts_with(FENCE) {
        narrative[..last_line_start].trim_end()
    } else {
        narrative
    }
}

/// Given text starting with `{`, returns the byte length of the balanced object.
fn find_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Accepts either `{"loyalty_program_design": {...}}` or the bare design object.
fn parse_design(segment: &str) -> Result<LoyaltyProgramDesign, AppError> {
    let mut value: Value = serde_json::from_str(segment)
        .map_err(|e| AppError::SchemaValidation(format!("malformed JSON: {e}")))?;

    let design_value = match value.as_object_mut().and_then(|map| map.remove(DESIGN_KEY)) {
        Some(inner) => inner,
        None => value,
    };

    serde_json::from_value(design_value)
        .map_err(|e| AppError::SchemaValidation(format!("design does not match schema: {e}")))
}
