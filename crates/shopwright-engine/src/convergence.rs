//! Repeats dismissal strategies until a round makes no progress.

use crate::executor::Resolver;
use crate::page::{Interaction, Page};
use shopwright_common::Candidate;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// A named group of candidates that dismiss one kind of popup.
#[derive(Debug, Clone, PartialEq)]
pub struct DismissStrategy {
    pub name: String,
    pub candidates: Vec<Candidate>,
}

impl DismissStrategy {
    pub fn new(name: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            name: name.into(),
            candidates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceState {
    /// A round dismissed nothing.
    Converged,
    /// Every allowed round made progress.
    BudgetExhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceReport {
    /// Names of the strategies that succeeded, in order, once per success.
    pub dismissed: Vec<String>,
    pub rounds: usize,
    pub state: ConvergenceState,
}

impl ConvergenceReport {
    pub fn count(&self) -> usize {
        self.dismissed.len()
    }
}

#[derive(Debug, Clone)]
pub struct ConvergenceLoop {
    resolver: Resolver,
    /// Wait before each round so late popups can appear.
    round_delay: Duration,
    /// Wait after each dismissal so animations can finish.
    settle_delay: Duration,
}

impl ConvergenceLoop {
    pub fn new(resolver: Resolver, round_delay: Duration, settle_delay: Duration) -> Self {
        Self {
            resolver,
            round_delay,
            settle_delay,
        }
    }

    /// Best effort: both terminal states are success for the caller.
    pub async fn converge<P: Page + ?Sized>(
        &self,
        strategies: &[DismissStrategy],
        page: &mut P,
        max_rounds: usize,
    ) -> ConvergenceReport {
        let mut dismissed = Vec::new();

        for round in 1..=max_rounds {
            if !self.round_delay.is_zero() {
                sleep(self.round_delay).await;
            }
            debug!(round, max_rounds, "checking for popups");

            let mut progressed = false;
            for strategy in strategies {
                let result = self
                    .resolver
                    .resolve(&strategy.name, &strategy.candidates, page, &Interaction::Click)
                    .await;
                if result.succeeded {
                    info!(strategy = %strategy.name, round, "dismissed popup");
                    dismissed.push(strategy.name.clone());
                    progressed = true;
                    if !self.settle_delay.is_zero() {
                        sleep(self.settle_delay).await;
                    }
                }
            }

            if !progressed {
                info!(round, dismissed = dismissed.len(), "popups converged");
                return ConvergenceReport {
                    dismissed,
                    rounds: round,
                    state: ConvergenceState::Converged,
                };
            }
        }

        info!(max_rounds, dismissed = dismissed.len(), "popup round budget exhausted");
        ConvergenceReport {
            dismissed,
            rounds: max_rounds,
            state: ConvergenceState::BudgetExhausted,
        }
    }
}
