use crate::config::PopupConfig;
use crate::convergence::{ConvergenceLoop, ConvergenceReport, DismissStrategy};
use crate::executor::{Resolver, ResolverSettings};
use crate::generator::static_candidates;
use crate::page::Page;
use std::time::Duration;

pub type DismissalReport = ConvergenceReport;

/// Dismisses cookie banners, newsletter modals and similar overlays.
#[derive(Debug, Clone)]
pub struct PopupDismisser {
    strategies: Vec<DismissStrategy>,
    convergence: ConvergenceLoop,
    max_rounds: usize,
}

impl PopupDismisser {
    pub fn new(config: &PopupConfig) -> Self {
        // Popups are probed, not waited for: the round delay already gave
        // them time to appear.
        let probe = Resolver::new(ResolverSettings {
            candidate_timeout: Duration::from_millis(config.probe_timeout_ms),
            poll_interval: ResolverSettings::default().poll_interval,
            settle_delay: Duration::ZERO,
        });

        let strategies = config
            .strategies
            .iter()
            .map(|s| DismissStrategy::new(s.name.clone(), static_candidates(&s.selectors)))
            .collect();

        Self {
            strategies,
            convergence: ConvergenceLoop::new(
                probe,
                Duration::from_millis(config.round_delay_ms),
                Duration::from_millis(config.settle_delay_ms),
            ),
            max_rounds: config.max_rounds,
        }
    }

    pub fn strategies(&self) -> &[DismissStrategy] {
        &self.strategies
    }

    pub async fn dismiss<P: Page + ?Sized>(&self, page: &mut P) -> DismissalReport {
        self.convergence
            .converge(&self.strategies, page, self.max_rounds)
            .await
    }
}
