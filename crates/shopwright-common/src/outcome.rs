use crate::candidate::Candidate;
use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened when one candidate was tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded,
    /// The locator matched nothing before the candidate's deadline.
    NotFound,
    /// A page call did not answer within the candidate's budget.
    Timeout,
    /// Matched, but hidden, disabled or otherwise not actionable.
    NotInteractable(String),
    /// Anything else the page reported.
    Fault(String),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Succeeded)
    }

    /// Human readable failure reason; `None` on success.
    pub fn error_reason(&self) -> Option<String> {
        match self {
            AttemptOutcome::Succeeded => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Succeeded => f.write_str("succeeded"),
            AttemptOutcome::NotFound => f.write_str("not found"),
            AttemptOutcome::Timeout => f.write_str("timed out"),
            AttemptOutcome::NotInteractable(reason) => write!(f, "not interactable ({})", reason),
            AttemptOutcome::Fault(reason) => write!(f, "fault: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub candidate: Candidate,
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

impl Attempt {
    pub fn error_reason(&self) -> Option<String> {
        self.outcome.error_reason()
    }
}

impl fmt::Display for Attempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({} ms)", self.candidate, self.outcome, self.elapsed_ms)
    }
}

/// Outcome of one resolution call. `attempts` lists every candidate tried, in
/// trial order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub goal: String,
    pub succeeded: bool,
    pub winning_candidate: Option<Candidate>,
    pub attempts: Vec<Attempt>,
}

impl ResolutionResult {
    pub fn won(goal: impl Into<String>, winner: Candidate, attempts: Vec<Attempt>) -> Self {
        Self {
            goal: goal.into(),
            succeeded: true,
            winning_candidate: Some(winner),
            attempts,
        }
    }

    pub fn failed(goal: impl Into<String>, attempts: Vec<Attempt>) -> Self {
        Self {
            goal: goal.into(),
            succeeded: false,
            winning_candidate: None,
            attempts,
        }
    }

    /// Convert into the winning candidate or the error a caller surfaces.
    pub fn into_result(self) -> Result<Candidate, ResolveError> {
        match self.winning_candidate {
            Some(candidate) if self.succeeded => Ok(candidate),
            _ if self.attempts.is_empty() => Err(ResolveError::NoCandidates(self.goal)),
            _ => Err(ResolveError::ExhaustedCandidates {
                goal: self.goal,
                attempts: self.attempts,
            }),
        }
    }
}

impl fmt::Display for ResolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.winning_candidate {
            Some(winner) if self.succeeded => write!(
                f,
                "{}: resolved by {} after {} attempt(s)",
                self.goal,
                winner,
                self.attempts.len()
            ),
            _ => {
                write!(f, "{}: unresolved", self.goal)?;
                for (i, attempt) in self.attempts.iter().enumerate() {
                    write!(f, "\n  {}. {}", i + 1, attempt)?;
                }
                Ok(())
            }
        }
    }
}

/// A page record paired with its match score against an intent.
/// A score of `0` means ineligible.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<R> {
    pub record_ref: R,
    pub score: f64,
}

impl<R> MatchCandidate<R> {
    pub fn new(record_ref: R, score: f64) -> Self {
        Self { record_ref, score }
    }

    pub fn is_eligible(&self) -> bool {
        self.score > 0.0
    }
}
