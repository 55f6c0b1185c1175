use crate::outcome::Attempt;
use thiserror::Error;

/// Errors reported by a page implementation.
#[derive(Error, Debug, Clone)]
pub enum PageError {
    #[error("Element {id} is stale (removed from DOM)")]
    Stale { id: u32 },

    #[error("Element {id} is not interactable: {reason}")]
    NotInteractable { id: u32, reason: String },

    #[error("Invalid selector: {selector}")]
    SelectorInvalid { selector: String },

    #[error("Option {index} not available on element {id}")]
    OptionNotFound { id: u32, index: usize },

    #[error("Script execution error: {0}")]
    Script(String),

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Not ready")]
    NotReady,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Other: {0}")]
    Other(String),
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Serialization(err.to_string())
    }
}

/// Failures of the external hint service. Never fatal: callers degrade to
/// static and fallback candidates.
#[derive(Error, Debug)]
pub enum HintError {
    #[error("Hint service not configured: {0}")]
    NotConfigured(String),

    #[error("Hint service request failed: {0}")]
    Transport(String),

    #[error("Hint service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Hint service timed out")]
    Timeout,

    #[error("Malformed hint response: {0}")]
    Malformed(String),

    #[error("Page snapshot unavailable: {0}")]
    Snapshot(#[from] PageError),
}

/// Failures a resolution caller surfaces to its own caller.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("No candidates for goal '{0}'; nothing was attempted")]
    NoCandidates(String),

    #[error(
        "Every candidate for goal '{goal}' failed ({} tried):{}",
        .attempts.len(),
        format_attempts(.attempts)
    )]
    ExhaustedCandidates { goal: String, attempts: Vec<Attempt> },

    #[error("Could not understand command '{0}': expected 'return', 'replace' or 'exchange'")]
    UnparseableIntent(String),

    #[error("No records found on the page")]
    NoRecords,

    #[error("No record matches '{command}' ({records} record(s) scored 0)")]
    NoMatch { command: String, records: usize },

    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

fn format_attempts(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .enumerate()
        .map(|(i, a)| format!("\n  {}. {}", i + 1, a))
        .collect()
}
