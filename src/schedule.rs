//! Promotion Schedule
//!
//! Two independent repeating timers, one per [`PromotionKind`]. The schedule
//! never reads the wall clock: callers move it forward with
//! [`PromotionSchedule::advance`] and run the ticks it returns.

use std::time::Duration;

use rand::Rng;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::promotions::PromotionKind;

/// Errors related to timer configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A timer period of zero would fire forever.
    #[error("Timer period must be greater than zero")]
    ZeroPeriod,
}

/// Repeating timer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    period: Duration,
    max_jitter: Duration,
}

impl TimerConfig {
    /// Create a timer that first fires after `period` plus a random delay in
    /// `[0, max_jitter)`, then every `period`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::ZeroPeriod`] if `period` is zero.
    pub fn new(period: Duration, max_jitter: Duration) -> Result<Self, ScheduleError> {
        if period.is_zero() {
            return Err(ScheduleError::ZeroPeriod);
        }

        Ok(Self { period, max_jitter })
    }

    /// Interval between ticks
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Upper bound (exclusive) of the start-up delay
    #[must_use]
    pub fn max_jitter(&self) -> Duration {
        self.max_jitter
    }

    fn first_fire<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let jitter = if self.max_jitter.is_zero() {
            Duration::ZERO
        } else {
            rng.gen_range(Duration::ZERO..self.max_jitter)
        };

        jitter.saturating_add(self.period)
    }
}

/// Timer settings for both promotions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Flash sale timer
    pub flash_sale: TimerConfig,

    /// Recommendation timer
    pub recommendation: TimerConfig,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            flash_sale: TimerConfig {
                period: Duration::from_secs(30),
                max_jitter: Duration::from_secs(10),
            },
            recommendation: TimerConfig {
                period: Duration::from_secs(60),
                max_jitter: Duration::from_secs(20),
            },
        }
    }
}

impl ScheduleConfig {
    /// Settings for `kind`.
    #[must_use]
    pub fn timer(&self, kind: PromotionKind) -> TimerConfig {
        match kind {
            PromotionKind::FlashSale => self.flash_sale,
            PromotionKind::Recommendation => self.recommendation,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    kind: PromotionKind,
    period: Duration,
    // `None` once cancelled.
    next_fire: Option<Duration>,
}

/// Promotion Schedule
#[derive(Debug, Clone)]
pub struct PromotionSchedule {
    timers: [Timer; 2],
    now: Duration,
}

impl PromotionSchedule {
    /// Start both timers at time zero, drawing their start-up delays from `rng`.
    pub fn new<R: Rng + ?Sized>(config: &ScheduleConfig, rng: &mut R) -> Self {
        let timers = [PromotionKind::FlashSale, PromotionKind::Recommendation].map(|kind| {
            let timer = config.timer(kind);

            Timer {
                kind,
                period: timer.period,
                next_fire: Some(timer.first_fire(rng)),
            }
        });

        Self {
            timers,
            now: Duration::ZERO,
        }
    }

    /// Time elapsed since the schedule started.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the schedule forward by `elapsed` and return the ticks that fell
    /// due, oldest first. A timer that fell behind fires once per missed
    /// period. Ties go to the flash sale.
    pub fn advance(&mut self, elapsed: Duration) -> SmallVec<[PromotionKind; 4]> {
        self.now = self.now.saturating_add(elapsed);

        let mut due: SmallVec<[(Duration, PromotionKind); 4]> = SmallVec::new();

        for timer in &mut self.timers {
            while let Some(at) = timer.next_fire {
                if at > self.now {
                    break;
                }

                due.push((at, timer.kind));
                timer.next_fire = Some(at.saturating_add(timer.period));
            }
        }

        due.sort_unstable();

        if !due.is_empty() {
            debug!(now = ?self.now, ticks = due.len(), "promotion timers fired");
        }

        due.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Stop `kind` from ever firing again.
    pub fn cancel(&mut self, kind: PromotionKind) {
        for timer in &mut self.timers {
            if timer.kind == kind {
                timer.next_fire = None;
            }
        }

        debug!(promotion = %kind, "promotion timer cancelled");
    }

    /// Whether `kind` is still scheduled.
    #[must_use]
    pub fn is_active(&self, kind: PromotionKind) -> bool {
        self.next_fire(kind).is_some()
    }

    /// Time (since start) of the next `kind` tick.
    #[must_use]
    pub fn next_fire(&self, kind: PromotionKind) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.kind == kind)
            .and_then(|timer| timer.next_fire)
    }
}
