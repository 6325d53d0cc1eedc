//! Oracle reply cleanup utilities
//!
//! The oracle is asked for strict JSON, but generative models routinely wrap
//! payloads in Markdown fences or lead with prose. These helpers normalize a
//! reply before it reaches serde, and shorten long text for log lines.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0

/// Character cap applied by [`preview`] for log output.
pub const PREVIEW_LIMIT: usize = 100;

/// Extract the JSON payload from a model reply.
///
/// A fenced ```` ```json ```` block wins; otherwise the widest brace or
/// bracket span is used. Falls back to the trimmed reply so serde produces
/// the parse error instead of this function.
pub fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }

    let open = trimmed.find(['{', '[']);
    let close = trimmed.rfind(['}', ']']);
    if let (Some(open), Some(close)) = (open, close) {
        if close > open {
            return trimmed[open..=close].trim();
        }
    }

    trimmed
}

/// Shorten text to [`PREVIEW_LIMIT`] characters for log lines.
pub fn preview(text: &str) -> String {
    let mut shortened: String = text.chars().take(PREVIEW_LIMIT).collect();
    if text.chars().count() > PREVIEW_LIMIT {
        shortened.push('…');
    }
    shortened
}
