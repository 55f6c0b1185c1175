//! Builds the ordered candidate list for a resolution goal.

use crate::config::ShopwrightConfig;
use shopwright_common::{Candidate, CandidateSource, Hint, HintTarget, Locator};
use tracing::debug;

/// Structural scopes used to synthesize text fallbacks.
pub const FALLBACK_SCOPES: &[&str] = &["button", "a", "[role=\"button\"]"];

/// Produces candidates from the configured selector tables and optional hints.
#[derive(Debug, Clone, Default)]
pub struct CandidateGenerator {
    config: ShopwrightConfig,
}

impl CandidateGenerator {
    pub fn new(config: &ShopwrightConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Replace the static selectors for one goal.
    pub fn with_selectors(mut self, goal: &str, selectors: Vec<String>) -> Self {
        self.config.selectors.insert(goal.to_string(), selectors);
        self
    }

    pub fn static_selectors(&self, goal: &str) -> Vec<String> {
        self.config.selectors_for(goal)
    }

    /// Ordered candidates for `goal`: static selectors, then hint-derived
    /// selectors and texts, then text fallbacks, then hint coordinates.
    /// Empty only when nothing is configured and no usable hint was given.
    pub fn generate(&self, goal: &str, hint: Option<&Hint>) -> Vec<Candidate> {
        let statics = static_candidates(&self.static_selectors(goal));
        let hinted = hint.map(hint_candidates).unwrap_or_default();

        let mut texts: Vec<&str> = Vec::new();
        for candidate in statics.iter().chain(hinted.iter()) {
            if let Some(text) = candidate.locator.literal_text()
                && !texts.contains(&text)
            {
                texts.push(text);
            }
        }
        let fallbacks = text_fallbacks(&texts);

        let mut candidates: Vec<Candidate> = Vec::new();
        let mut all: Vec<Candidate> = statics
            .iter()
            .chain(hinted.iter())
            .chain(fallbacks.iter())
            .cloned()
            .collect();
        // stable: declaration order survives within a source
        all.sort_by_key(Candidate::priority);

        for candidate in all {
            let duplicate = candidate.source == CandidateSource::TextFallback
                && candidates.iter().any(|c| c.locator == candidate.locator);
            if !duplicate {
                candidates.push(candidate);
            }
        }

        debug!(goal, count = candidates.len(), "generated candidates");
        candidates
    }
}

pub fn static_candidates(selectors: &[String]) -> Vec<Candidate> {
    selectors
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(Candidate::from_notation)
        .collect()
}

/// Convert a hint into candidates, primary target first. A hint that found
/// nothing contributes nothing.
pub fn hint_candidates(hint: &Hint) -> Vec<Candidate> {
    if !hint.found {
        debug!(
            reasoning = hint.reasoning.as_deref().unwrap_or(""),
            "hint reported no target"
        );
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for (index, target) in hint.targets().enumerate() {
        let name = if index == 0 && hint.primary.is_some() {
            "hint primary".to_string()
        } else {
            format!("hint alternative {}", index)
        };
        push_target(&mut candidates, &name, target);
    }
    candidates
}

fn push_target(out: &mut Vec<Candidate>, name: &str, target: &HintTarget) {
    if let Some(selector) = target.selector() {
        out.push(Candidate::new(
            CandidateSource::HintSelector,
            Locator::selector(selector),
            format!("{} selector {}", name, selector),
        ));
    }
    if let Some(text) = target.text() {
        out.push(Candidate::new(
            CandidateSource::HintText,
            Locator::exact_text(text),
            format!("{} text \"{}\"", name, text),
        ));
    }
    if let Some(point) = target.point() {
        out.push(Candidate::new(
            CandidateSource::HintCoordinate,
            Locator::Point {
                x: point.x,
                y: point.y,
            },
            format!("{} at ({}, {})", name, point.x, point.y),
        ));
    }
}

/// Generic "any button/link containing this text" candidates.
pub fn text_fallbacks(texts: &[&str]) -> Vec<Candidate> {
    let mut out = Vec::new();
    for text in texts {
        for scope in FALLBACK_SCOPES {
            out.push(Candidate::new(
                CandidateSource::TextFallback,
                Locator::text_within(*scope, *text),
                format!("any {} containing \"{}\"", scope, text),
            ));
        }
    }
    out
}
