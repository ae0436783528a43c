use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

/// Parse a model reply into `T`.
///
/// Tries, in order:
/// 1. the whole reply (with any Markdown code fence removed)
/// 2. for each `{` in the text: the balanced object starting there, then the
///    greedy span from there to the last `}`
///
/// Returns `None` when no candidate yields a `T` with all required fields,
/// leaving the caller to substitute its fallback.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let cleaned = strip_code_fence(raw);

    if let Ok(parsed) = serde_json::from_str::<T>(cleaned) {
        return Some(parsed);
    }

    for (start, _) in cleaned.match_indices('{') {
        if let Some(object) = balanced_object_at(cleaned, start) {
            match serde_json::from_str::<T>(object) {
                Ok(parsed) => {
                    info!("Extracted embedded JSON object from model reply ({} chars)", object.len());
                    return Some(parsed);
                }
                Err(e) => debug!("Embedded candidate at offset {} rejected: {}", start, e),
            }
        }

        if let Some(span) = greedy_object_span(cleaned, start) {
            if let Ok(parsed) = serde_json::from_str::<T>(span) {
                info!("Extracted JSON span from model reply ({} chars)", span.len());
                return Some(parsed);
            }
        }
    }

    None
}

/// The reply text worth keeping as free-text reasoning, if any
pub fn preserved_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// First few hundred chars of a reply, for logs
pub fn preview(raw: &str) -> String {
    raw.chars().take(300).collect()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.trim_end_matches("```").trim()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

/// Scan from the `{` at `start` until its matching `}`, ignoring braces inside strings.
/// `None` if the object never closes (truncated reply).
fn balanced_object_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

fn greedy_object_span(text: &str, start: usize) -> Option<&str> {
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Accepts a JSON number or a numeric string such as `"8.5"` or `"15%"`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("expected number, got \"{}\"", s))),
        other => Err(serde::de::Error::custom(format!("expected number, got {}", other))),
    }
}
