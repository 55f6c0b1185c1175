//! Optional external hint service. Hints only ever add candidates; any
//! failure degrades to "no hint".

pub mod chat;
pub mod extract;
pub mod http;

use crate::config::{HintConfig, HintProvider};
use crate::page::Page;
use async_trait::async_trait;
use serde::Serialize;
use shopwright_common::{Hint, HintError, PageSnapshot};
use std::time::Duration;
use tracing::{debug, warn};

pub use chat::ChatHintSource;
pub use extract::parse_hint_text;
pub use http::HttpHintSource;

#[derive(Debug, Clone, Serialize)]
pub struct HintRequest {
    pub goal: String,
    /// Plain-language description of what to find.
    pub description: String,
    pub snapshot: PageSnapshot,
}

#[async_trait]
pub trait HintSource: Send + Sync {
    async fn suggest(&self, request: &HintRequest) -> Result<Hint, HintError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLimits {
    pub max_elements: usize,
    pub max_text_len: usize,
}

impl Default for SnapshotLimits {
    fn default() -> Self {
        Self::from(&HintConfig::default())
    }
}

impl From<&HintConfig> for SnapshotLimits {
    fn from(config: &HintConfig) -> Self {
        Self {
            max_elements: config.max_elements,
            max_text_len: config.max_text_len,
        }
    }
}

/// Snapshot the page and ask `source` for a hint. Every failure is logged
/// and becomes `None`.
pub async fn request_hint<P: Page + ?Sized>(
    source: &dyn HintSource,
    goal: &str,
    description: &str,
    page: &mut P,
    limits: SnapshotLimits,
) -> Option<Hint> {
    let snapshot = match page.snapshot().await {
        Ok(snapshot) => snapshot.bounded(limits.max_elements, limits.max_text_len),
        Err(e) => {
            warn!(goal, error = %HintError::from(e), "hint unavailable");
            return None;
        }
    };

    let request = HintRequest {
        goal: goal.to_string(),
        description: description.to_string(),
        snapshot,
    };

    match source.suggest(&request).await {
        Ok(hint) => {
            debug!(
                goal,
                found = hint.found,
                targets = hint.targets().count(),
                "received hint"
            );
            Some(hint)
        }
        Err(e) => {
            warn!(goal, error = %e, "hint unavailable");
            None
        }
    }
}

/// Build the configured hint source, or `None` when hints are disabled.
pub fn from_config(config: &HintConfig) -> Result<Option<Box<dyn HintSource>>, HintError> {
    if !config.enabled {
        return Ok(None);
    }
    let timeout = Duration::from_millis(config.timeout_ms);

    let source: Box<dyn HintSource> = match config.provider {
        HintProvider::Http => Box::new(HttpHintSource::new(config.endpoint.clone(), timeout)),
        HintProvider::Chat => {
            let api_key = std::env::var(&config.api_key_env)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    HintError::NotConfigured(format!("environment variable {} is not set", config.api_key_env))
                })?;
            Box::new(ChatHintSource::new(
                api_key,
                config.model.clone(),
                config.endpoint.clone(),
                timeout,
            ))
        }
    };
    Ok(Some(source))
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> HintError {
    if error.is_timeout() {
        HintError::Timeout
    } else {
        HintError::Transport(error.to_string())
    }
}
