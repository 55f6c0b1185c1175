use super::FlowError;
use super::popups::{DismissalReport, PopupDismisser};
use crate::config::{ShopwrightConfig, defaults, goals};
use crate::executor::{Resolver, ResolverSettings};
use crate::generator::CandidateGenerator;
use crate::hints::{HintSource, SnapshotLimits, request_hint};
use crate::page::{Interaction, Page};
use async_trait::async_trait;
use shopwright_common::{ResolutionResult, ResolveError};
use tracing::info;

/// Supplies the one-time password sent to the user's phone.
#[async_trait]
pub trait OtpProvider: Send + Sync {
    async fn otp(&self) -> Result<String, FlowError>;
}

/// Fixed OTP, mainly for scripted runs.
pub struct StaticOtp(pub String);

#[async_trait]
impl OtpProvider for StaticOtp {
    async fn otp(&self) -> Result<String, FlowError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone)]
pub struct LoginReport {
    pub popups: Option<DismissalReport>,
    /// One result per completed step, in order.
    pub steps: Vec<ResolutionResult>,
}

/// Phone + OTP login, one resolution goal per step.
pub struct LoginFlow {
    generator: CandidateGenerator,
    resolver: Resolver,
    popups: Option<PopupDismisser>,
    hints: Option<Box<dyn HintSource>>,
    limits: SnapshotLimits,
}

impl LoginFlow {
    pub fn new(config: &ShopwrightConfig) -> Self {
        Self {
            generator: CandidateGenerator::new(config),
            resolver: Resolver::new(ResolverSettings::from(&config.resolver)),
            popups: Some(PopupDismisser::new(&config.popups)),
            hints: None,
            limits: SnapshotLimits::from(&config.hints),
        }
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Ask `source` for a hint before every step.
    pub fn with_hints(mut self, source: Box<dyn HintSource>) -> Self {
        self.hints = Some(source);
        self
    }

    pub fn without_popups(mut self) -> Self {
        self.popups = None;
        self
    }

    pub async fn run<P: Page + ?Sized>(
        &self,
        page: &mut P,
        phone: &str,
        otp: &dyn OtpProvider,
    ) -> Result<LoginReport, FlowError> {
        let popups = match &self.popups {
            Some(dismisser) => Some(dismisser.dismiss(page).await),
            None => None,
        };

        let mut steps = Vec::new();
        steps.push(self.step(page, goals::LOGIN_BUTTON, Interaction::Click).await?);
        steps.push(
            self.step(page, goals::PHONE_INPUT, Interaction::Type(phone.to_string()))
                .await?,
        );
        steps.push(self.step(page, goals::OTP_BUTTON, Interaction::Click).await?);

        let code = otp.otp().await?;
        steps.push(self.step(page, goals::OTP_INPUT, Interaction::Type(code)).await?);
        steps.push(self.step(page, goals::VERIFY_BUTTON, Interaction::Click).await?);

        info!("login flow completed");
        Ok(LoginReport { popups, steps })
    }

    async fn step<P: Page + ?Sized>(
        &self,
        page: &mut P,
        goal: &str,
        interaction: Interaction,
    ) -> Result<ResolutionResult, FlowError> {
        let hint = match &self.hints {
            Some(source) => {
                request_hint(source.as_ref(), goal, defaults::describe(goal), page, self.limits).await
            }
            None => None,
        };

        let candidates = self.generator.generate(goal, hint.as_ref());
        let result = self
            .resolver
            .resolve(goal, &candidates, page, &interaction)
            .await;

        if result.succeeded {
            info!(goal, "{}", result);
            Ok(result)
        } else {
            Err(step_error(goal, result))
        }
    }
}

fn step_error(goal: &str, result: ResolutionResult) -> FlowError {
    let source = match result.into_result() {
        Err(e) => e,
        Ok(_) => ResolveError::NoCandidates(goal.to_string()),
    };
    FlowError::Step {
        goal: goal.to_string(),
        source,
    }
}
