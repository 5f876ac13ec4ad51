//! Session
//!
//! Drives one [`AppState`] through intents and promotion ticks. The session
//! owns its random source and clock, so a seeded rng and a fixed clock give a
//! fully reproducible run.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::{
    catalog::Catalog,
    clock::Clock,
    config::StoreConfig,
    pricing::{PricingPolicy, PricingResult},
    promotions::{PromotionEngine, PromotionError, PromotionEvent, PromotionKind},
    schedule::PromotionSchedule,
    state::{AppState, Intent},
};

/// Session
#[derive(Debug)]
pub struct Session<'a, R, C> {
    state: AppState<'a>,
    policy: PricingPolicy,
    engine: PromotionEngine,
    schedule: PromotionSchedule,
    rng: R,
    clock: C,
}

impl<'a, R: Rng, C: Clock> Session<'a, R, C> {
    /// Start a session over `catalog` with an empty cart. The promotion
    /// timers start now.
    pub fn new(catalog: Catalog<'a>, config: StoreConfig, mut rng: R, clock: C) -> Self {
        let schedule = PromotionSchedule::new(&config.schedule, &mut rng);

        Self {
            state: AppState::new(catalog),
            policy: config.pricing,
            engine: PromotionEngine::new(config.promotions),
            schedule,
            rng,
            clock,
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn state(&self) -> &AppState<'a> {
        &self.state
    }

    /// Promotion timers
    #[must_use]
    pub fn schedule(&self) -> &PromotionSchedule {
        &self.schedule
    }

    /// Apply `intent`. Returns the notice for a rejected intent.
    pub fn dispatch(&mut self, intent: &Intent) -> Option<String> {
        let transition = self
            .state
            .dispatch(intent, &self.policy, self.clock.today());

        self.state = transition.state;

        transition.notice
    }

    /// Run a single promotion now, outside the schedule.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the selected product cannot be repriced.
    pub fn tick(&mut self, kind: PromotionKind) -> Result<Option<PromotionEvent>, PromotionError> {
        let (state, event) = self.state.run_promotion(kind, &self.engine, &mut self.rng)?;

        self.state = state;

        if let Some(event) = &event {
            info!(promotion = %kind, message = %event.message(), "promotion notice");
        }

        Ok(event)
    }

    /// Move time forward by `elapsed` and run every promotion that fell due.
    ///
    /// # Errors
    ///
    /// Returns the first [`PromotionError`]; ticks before it have already
    /// been applied.
    pub fn advance(&mut self, elapsed: Duration) -> Result<Vec<PromotionEvent>, PromotionError> {
        let mut events = Vec::new();

        for kind in self.schedule.advance(elapsed) {
            if let Some(event) = self.tick(kind)? {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Stop `kind` from firing again.
    pub fn cancel(&mut self, kind: PromotionKind) {
        self.schedule.cancel(kind);
    }

    /// Price the current cart as of today.
    #[must_use]
    pub fn pricing(&self) -> PricingResult<'a> {
        self.policy
            .calculate_cart_total_now(self.state.cart(), &self.clock)
    }
}
