//! Tries candidates against the live page, strictly one at a time.

use crate::config::ResolverConfig;
use crate::page::{ElementRef, Interaction, Page};
use shopwright_common::{Attempt, AttemptOutcome, Candidate, Locator, PageError, ResolutionResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info};

/// Budget for the single probe a zero candidate timeout still makes.
pub const SINGLE_PROBE: Duration = Duration::from_millis(250);
const MIN_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    pub candidate_timeout: Duration,
    pub poll_interval: Duration,
    pub settle_delay: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

impl From<&ResolverConfig> for ResolverSettings {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            candidate_timeout: Duration::from_millis(config.candidate_timeout_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Resolver {
    settings: ResolverSettings,
}

impl Resolver {
    pub fn new(settings: ResolverSettings) -> Self {
        Self { settings }
    }

    /// Try `candidates` in order until one succeeds.
    pub async fn resolve<P: Page + ?Sized>(
        &self,
        goal: &str,
        candidates: &[Candidate],
        page: &mut P,
        interaction: &Interaction,
    ) -> ResolutionResult {
        self.resolve_within(goal, candidates, page, interaction, None)
            .await
    }

    /// Like [`Resolver::resolve`], but locators only match inside `scope`.
    pub async fn resolve_within<P: Page + ?Sized>(
        &self,
        goal: &str,
        candidates: &[Candidate],
        page: &mut P,
        interaction: &Interaction,
        scope: Option<ElementRef>,
    ) -> ResolutionResult {
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let started = Instant::now();
            let outcome = self.attempt(candidate, page, interaction, scope).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            debug!(
                goal,
                candidate = %candidate.label,
                source = %candidate.source,
                outcome = %outcome,
                elapsed_ms,
                "candidate attempted"
            );

            let succeeded = outcome.is_success();
            attempts.push(Attempt {
                candidate: candidate.clone(),
                outcome,
                elapsed_ms,
            });

            if succeeded {
                info!(goal, candidate = %candidate.label, "resolved");
                if !self.settings.settle_delay.is_zero() {
                    sleep(self.settings.settle_delay).await;
                }
                return ResolutionResult::won(goal, candidate.clone(), attempts);
            }
        }

        debug!(goal, tried = attempts.len(), "no candidate succeeded");
        ResolutionResult::failed(goal, attempts)
    }

    async fn attempt<P: Page + ?Sized>(
        &self,
        candidate: &Candidate,
        page: &mut P,
        interaction: &Interaction,
        scope: Option<ElementRef>,
    ) -> AttemptOutcome {
        let budget = if self.settings.candidate_timeout.is_zero() {
            SINGLE_PROBE
        } else {
            self.settings.candidate_timeout
        };
        let deadline = Instant::now() + budget;

        let element = match self.locate(page, &candidate.locator, scope, deadline).await {
            Ok(Some(element)) => element,
            Ok(None) => return AttemptOutcome::NotFound,
            Err(outcome) => return outcome,
        };

        match self
            .act(page, &candidate.locator, element, interaction, deadline)
            .await
        {
            Ok(()) => AttemptOutcome::Succeeded,
            Err(outcome) => outcome,
        }
    }

    /// Poll until the locator matches or the deadline passes.
    async fn locate<P: Page + ?Sized>(
        &self,
        page: &mut P,
        locator: &Locator,
        scope: Option<ElementRef>,
        deadline: Instant,
    ) -> Result<Option<ElementRef>, AttemptOutcome> {
        let poll = self.settings.poll_interval.max(MIN_POLL);
        loop {
            if let Some(element) = bounded(deadline, "locate", page.find(locator, scope)).await? {
                return Ok(Some(element));
            }
            let now = Instant::now();
            if self.settings.candidate_timeout.is_zero() || now >= deadline {
                return Ok(None);
            }
            sleep(poll.min(deadline - now)).await;
        }
    }

    async fn act<P: Page + ?Sized>(
        &self,
        page: &mut P,
        locator: &Locator,
        element: ElementRef,
        interaction: &Interaction,
        deadline: Instant,
    ) -> Result<(), AttemptOutcome> {
        if !bounded(deadline, "visibility check", page.is_visible(element)).await? {
            return Err(AttemptOutcome::NotInteractable("not visible".into()));
        }
        if !bounded(deadline, "enabled check", page.is_enabled(element)).await? {
            return Err(AttemptOutcome::NotInteractable("disabled".into()));
        }

        if let Err(e) = bounded(deadline, "scroll", page.scroll_into_view(element)).await {
            debug!(element = %element, error = %e, "scroll into view failed, acting anyway");
        }

        match (interaction, locator) {
            (Interaction::Click, Locator::Point { x, y }) => {
                bounded(deadline, "click", page.click_at(*x, *y)).await
            }
            (Interaction::Click, _) => bounded(deadline, "click", page.click(element)).await,
            (Interaction::Type(text), _) => {
                bounded(deadline, "type", page.type_text(element, text)).await
            }
            (Interaction::Select(index), _) => {
                bounded(deadline, "select", page.select_option(element, *index)).await
            }
        }
    }
}

/// Run one page call with whatever is left before `deadline`.
async fn bounded<T, F>(deadline: Instant, operation: &str, call: F) -> Result<T, AttemptOutcome>
where
    F: Future<Output = Result<T, PageError>>,
{
    let budget = deadline.saturating_duration_since(Instant::now());
    match timeout(budget, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify(e)),
        Err(_) => {
            debug!(operation, budget_ms = budget.as_millis() as u64, "page call timed out");
            Err(AttemptOutcome::Timeout)
        }
    }
}

fn classify(error: PageError) -> AttemptOutcome {
    match error {
        PageError::Timeout { .. } => AttemptOutcome::Timeout,
        PageError::NotInteractable { reason, .. } => AttemptOutcome::NotInteractable(reason),
        PageError::Stale { .. } => AttemptOutcome::NotInteractable("element went stale".into()),
        other => AttemptOutcome::Fault(other.to_string()),
    }
}

impl std::fmt::Display for ResolverSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "timeout {} ms, poll {} ms, settle {} ms",
            self.candidate_timeout.as_millis(),
            self.poll_interval.as_millis(),
            self.settle_delay.as_millis()
        )
    }
}
