use crate::config::{ShopwrightConfig, goals};
use crate::executor::{Resolver, ResolverSettings};
use crate::generator::CandidateGenerator;
use crate::intent;
use crate::page::{ElementRef, Interaction, Page};
use crate::scorer::{Selection, score_record, select_best};
use shopwright_common::{Action, Intent, MatchCandidate, ResolutionResult, ResolveError};
use tracing::{debug, info, warn};

pub const DEFAULT_RETURN_REASON: &str = "Product not as expected";

#[derive(Debug, Clone)]
pub struct ActionReport {
    pub command: String,
    pub intent: Intent,
    /// Every record's score, in page order.
    pub scores: Vec<MatchCandidate<ElementRef>>,
    pub chosen: MatchCandidate<ElementRef>,
    pub action: ResolutionResult,
    /// Best-effort follow-up steps (reason, variant, confirm), in order.
    pub confirmation: Vec<ResolutionResult>,
}

impl ActionReport {
    pub fn confirmed(&self) -> bool {
        self.confirmation
            .last()
            .is_some_and(|step| step.succeeded)
    }
}

/// Matches a free-text command to an order on the page and starts its
/// return or replacement.
pub struct ReturnFlow {
    generator: CandidateGenerator,
    resolver: Resolver,
    return_reason: String,
}

impl ReturnFlow {
    pub fn new(config: &ShopwrightConfig) -> Self {
        Self {
            generator: CandidateGenerator::new(config),
            resolver: Resolver::new(ResolverSettings::from(&config.resolver)),
            return_reason: DEFAULT_RETURN_REASON.to_string(),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_return_reason(mut self, reason: impl Into<String>) -> Self {
        self.return_reason = reason.into();
        self
    }

    pub async fn run<P: Page + ?Sized>(
        &self,
        page: &mut P,
        command: &str,
    ) -> Result<ActionReport, ResolveError> {
        let intent = intent::parse(command);
        if !intent.is_actionable() {
            return Err(ResolveError::UnparseableIntent(command.to_string()));
        }

        let records = self.collect_records(page).await;
        if records.is_empty() {
            return Err(ResolveError::NoRecords);
        }
        info!(records = records.len(), action = %intent.action, "scoring records");

        let mut scores = Vec::with_capacity(records.len());
        for record in &records {
            scores.push(score_record(page, *record, &intent).await);
        }

        let chosen = match select_best(&scores) {
            Selection::Match(chosen) => chosen,
            Selection::NoMatch => {
                return Err(ResolveError::NoMatch {
                    command: command.to_string(),
                    records: records.len(),
                });
            }
            Selection::NoCandidates => return Err(ResolveError::NoRecords),
        };
        info!(record = %chosen.record_ref, score = chosen.score, "selected record");

        let control_goal = match intent.action {
            Action::Replace => goals::REPLACE_CONTROL,
            _ => goals::RETURN_CONTROL,
        };
        let candidates = self.generator.generate(control_goal, None);
        let action = self
            .resolver
            .resolve_within(
                control_goal,
                &candidates,
                page,
                &Interaction::Click,
                Some(chosen.record_ref),
            )
            .await;
        if !action.succeeded {
            return Err(action
                .into_result()
                .err()
                .unwrap_or_else(|| ResolveError::NoCandidates(control_goal.to_string())));
        }

        let confirmation = match intent.action {
            Action::Replace => self.confirm_replace(page).await,
            _ => self.confirm_return(page).await,
        };

        Ok(ActionReport {
            command: command.to_string(),
            intent,
            scores,
            chosen,
            action,
            confirmation,
        })
    }

    /// Records come from the first `orders.record` selector that matches.
    async fn collect_records<P: Page + ?Sized>(&self, page: &mut P) -> Vec<ElementRef> {
        for selector in self.generator.static_selectors(goals::ORDER_RECORD) {
            match page.find_all(&selector, None).await {
                Ok(found) if !found.is_empty() => return innermost(page, &selector, found).await,
                Ok(_) => {}
                Err(e) => warn!(selector = %selector, error = %e, "record selector failed"),
            }
        }
        Vec::new()
    }

    async fn confirm_return<P: Page + ?Sized>(&self, page: &mut P) -> Vec<ResolutionResult> {
        let mut steps = Vec::new();

        let reason = self
            .best_effort(page, goals::RETURN_REASON_SELECT, Interaction::Select(1))
            .await;
        let picked = reason.succeeded;
        steps.push(reason);
        if !picked {
            steps.push(
                self.best_effort(
                    page,
                    goals::RETURN_REASON_TEXT,
                    Interaction::Type(self.return_reason.clone()),
                )
                .await,
            );
        }

        steps.push(
            self.best_effort(page, goals::RETURN_CONFIRM, Interaction::Click)
                .await,
        );
        steps
    }

    async fn confirm_replace<P: Page + ?Sized>(&self, page: &mut P) -> Vec<ResolutionResult> {
        let variant = self
            .best_effort(page, goals::REPLACE_VARIANT_SELECT, Interaction::Select(1))
            .await;
        let confirm = self
            .best_effort(page, goals::REPLACE_CONFIRM, Interaction::Click)
            .await;
        vec![variant, confirm]
    }

    async fn best_effort<P: Page + ?Sized>(
        &self,
        page: &mut P,
        goal: &str,
        interaction: Interaction,
    ) -> ResolutionResult {
        let candidates = self.generator.generate(goal, None);
        let result = self
            .resolver
            .resolve(goal, &candidates, page, &interaction)
            .await;
        if !result.succeeded {
            warn!(goal, "confirmation step skipped: {}", result);
        }
        result
    }
}

/// Drop every match that wraps another match of the same selector, such as
/// the list around all the orders.
async fn innermost<P: Page + ?Sized>(
    page: &mut P,
    selector: &str,
    found: Vec<ElementRef>,
) -> Vec<ElementRef> {
    let mut records = Vec::with_capacity(found.len());
    for element in found {
        match page.find_all(selector, Some(element)).await {
            Ok(nested) if !nested.is_empty() => {
                debug!(element = %element, nested = nested.len(), "skipping record container");
            }
            Ok(_) => records.push(element),
            Err(e) => {
                warn!(element = %element, error = %e, "could not check record nesting");
                records.push(element);
            }
        }
    }
    records
}
