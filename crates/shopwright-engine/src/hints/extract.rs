use shopwright_common::{Hint, HintError};

/// Parse a hint from free-form model output: bare JSON, JSON inside a
/// Markdown code fence, or JSON embedded in surrounding prose.
pub fn parse_hint_text(text: &str) -> Result<Hint, HintError> {
    let body = strip_fences(text.trim());

    match serde_json::from_str::<Hint>(body) {
        Ok(hint) => Ok(hint),
        Err(first) => match (body.find('{'), body.rfind('}')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end])
                .map_err(|e| HintError::Malformed(e.to_string())),
            _ => Err(HintError::Malformed(first.to_string())),
        },
    }
}

fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
