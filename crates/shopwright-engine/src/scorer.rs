//! Scores page records (orders) against a parsed intent.

use crate::page::{ElementRef, Page};
use shopwright_common::{Action, AttributeKind, Intent, MatchCandidate, PageError};
use tracing::{debug, warn};

pub const KEYWORD_WEIGHT: f64 = 0.5;
pub const AFFORDANCE_BONUS: f64 = 1.0;
/// Keywords must be longer than this to count.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Itemized score of one record. `total` is already gated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub products: f64,
    pub colors: f64,
    pub keywords: f64,
    pub has_control: bool,
    pub total: f64,
}

/// Score record text against an intent. `has_control` says whether the record
/// exposes a control for the intent's action; without one the score is 0.
pub fn score_text(text: &str, intent: &Intent, has_control: bool) -> ScoreBreakdown {
    let haystack = text.to_lowercase();
    let mut breakdown = ScoreBreakdown {
        has_control,
        ..Default::default()
    };

    for attribute in &intent.attributes {
        if matches_word_start(&haystack, &attribute.token) {
            let weight = attribute.kind.weight();
            match attribute.kind {
                AttributeKind::Product => breakdown.products += weight,
                AttributeKind::Color => breakdown.colors += weight,
            }
        }
    }

    for keyword in &intent.keywords {
        let keyword = keyword.trim_matches(|c: char| !c.is_alphanumeric());
        if keyword.chars().count() > MIN_KEYWORD_LEN && matches_word_start(&haystack, &keyword.to_lowercase()) {
            breakdown.keywords += KEYWORD_WEIGHT;
        }
    }

    breakdown.total = if has_control {
        breakdown.products + breakdown.colors + breakdown.keywords + AFFORDANCE_BONUS
    } else {
        0.0
    };
    breakdown
}

/// True when `needle` occurs at the start of a word in `haystack`, so "shirt"
/// matches "Shirts" but "red" does not match "ordered". Both are lowercase.
fn matches_word_start(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack
        .match_indices(needle)
        .any(|(start, _)| !haystack[..start].chars().next_back().is_some_and(is_word))
}

/// Score one record on the page. Reads text and enumerates controls; never
/// mutates. A record that cannot be read scores 0.
pub async fn score_record<P: Page + ?Sized>(
    page: &mut P,
    record: ElementRef,
    intent: &Intent,
) -> MatchCandidate<ElementRef> {
    match read_record(page, record, intent.action).await {
        Ok((text, has_control)) => {
            let breakdown = score_text(&text, intent, has_control);
            debug!(
                record = %record,
                score = breakdown.total,
                has_control,
                "scored record"
            );
            MatchCandidate::new(record, breakdown.total)
        }
        Err(e) => {
            warn!(record = %record, error = %e, "could not read record, scoring 0");
            MatchCandidate::new(record, 0.0)
        }
    }
}

async fn read_record<P: Page + ?Sized>(
    page: &mut P,
    record: ElementRef,
    action: Action,
) -> Result<(String, bool), PageError> {
    let text = page.inner_text(record).await?;
    let mut has_control = false;
    for control in page.controls(record).await? {
        let label = page.inner_text(control).await?;
        if action.matches_control_text(&label) {
            has_control = true;
            break;
        }
    }
    Ok((text, has_control))
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection<R> {
    /// There were no records to score.
    NoCandidates,
    /// Every record scored 0.
    NoMatch,
    Match(MatchCandidate<R>),
}

/// Pick the strictly greatest score; ties go to the earliest record.
pub fn select_best<R: Clone>(candidates: &[MatchCandidate<R>]) -> Selection<R> {
    if candidates.is_empty() {
        return Selection::NoCandidates;
    }
    let mut best: Option<&MatchCandidate<R>> = None;
    for candidate in candidates.iter().filter(|c| c.is_eligible()) {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    match best {
        Some(winner) => Selection::Match(winner.clone()),
        None => Selection::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::parse;

    #[test]
    fn test_gate_zeroes_perfect_text_match() {
        let intent = parse("return my red shoes");
        let score = score_text("Red Nike Shoes", &intent, false);
        assert_eq!(score.total, 0.0);
        assert_eq!(score.products, 3.0);
        assert_eq!(score.colors, 2.0);
    }

    #[test]
    fn test_additive_score_with_control() {
        let intent = parse("return my red shoes");
        let score = score_text("Red Nike Shoes", &intent, true);
        // shoes 3 + red 2 + keyword "shoes" 0.5 + control 1
        assert_eq!(score.total, 6.5);
    }

    #[test]
    fn test_keywords_require_length_and_word_starts() {
        let intent = parse("return the blue shirt, please");
        // "please," is trimmed to "please"; "the" is too short
        let score = score_text("Blue shirt - please note", &intent, true);
        assert_eq!(score.keywords, 1.5); // blue, shirt, please
        assert_eq!(score.total, 3.0 + 2.0 + 1.5 + 1.0);
    }

    #[test]
    fn test_plural_listing_still_matches_product() {
        let intent = parse("replace my blue shirt");
        let score = score_text("Blue Formal Shirts (Pack of 2)", &intent, true);
        assert_eq!(score.products, 3.0);
        assert_eq!(score.colors, 2.0);
        // blue, shirt
        assert_eq!(score.keywords, 1.0);
        assert_eq!(score.total, 7.0);
    }

    #[test]
    fn test_color_does_not_match_inside_words() {
        let intent = parse("return red top");
        let score = score_text("Ordered: stopwatch", &intent, true);
        assert_eq!(score.colors, 0.0);
        assert_eq!(score.products, 0.0);
        assert_eq!(score.total, 1.0);
    }

    #[test]
    fn test_select_best_prefers_strictly_greater() {
        let candidates = vec![
            MatchCandidate::new("a", 0.0),
            MatchCandidate::new("b", 4.0),
            MatchCandidate::new("c", 6.0),
            MatchCandidate::new("d", 6.0),
        ];
        assert_eq!(select_best(&candidates), Selection::Match(MatchCandidate::new("c", 6.0)));
    }

    #[test]
    fn test_select_best_distinguishes_no_match_from_no_candidates() {
        let empty: Vec<MatchCandidate<&str>> = vec![];
        assert_eq!(select_best(&empty), Selection::NoCandidates);
        let zeros = vec![MatchCandidate::new("a", 0.0), MatchCandidate::new("b", 0.0)];
        assert_eq!(select_best(&zeros), Selection::NoMatch);
    }
}
