//! Store Config

use crate::{pricing::PricingPolicy, promotions::PromotionConfig, schedule::ScheduleConfig};

/// Every tunable of the store. `Default` reproduces the reference behaviour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreConfig {
    /// Cart discount rules
    pub pricing: PricingPolicy,

    /// Promotion rates and probability
    pub promotions: PromotionConfig,

    /// Promotion timers
    pub schedule: ScheduleConfig,
}
