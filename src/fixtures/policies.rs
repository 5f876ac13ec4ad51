//! Policy Fixtures
//!
//! Every field is optional; anything left out keeps its default.

use std::time::Duration;

use decimal_percentage::Percentage;
use jiff::civil::Weekday;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    config::StoreConfig,
    fixtures::FixtureError,
    pricing::PricingPolicy,
    products::ProductId,
    promotions::{Probability, PromotionConfig},
    schedule::{ScheduleConfig, TimerConfig},
};

/// Wrapper for policies in YAML
#[derive(Debug, Default, Deserialize)]
pub struct PoliciesFixture {
    /// Cart discount rules
    #[serde(default)]
    pub pricing: PricingFixture,

    /// Promotion rates and probability
    #[serde(default)]
    pub promotions: PromotionsFixture,

    /// Promotion timers
    #[serde(default)]
    pub schedule: ScheduleFixture,
}

/// Pricing Fixture
#[derive(Debug, Default, Deserialize)]
pub struct PricingFixture {
    /// Product id -> rate (e.g., "10%")
    pub item_discount_rates: Option<FxHashMap<String, String>>,

    /// Minimum line quantity for a per-item rate
    pub item_discount_threshold: Option<u32>,

    /// Minimum cart quantity for the bulk rate
    pub bulk_threshold: Option<u64>,

    /// Bulk rate
    pub bulk_rate: Option<String>,

    /// Day of the week (e.g., "tuesday")
    pub discount_day: Option<String>,

    /// Day-of-week rate
    pub day_rate: Option<String>,

    /// Minor units per bonus point
    pub points_per_amount: Option<u64>,
}

/// Promotions Fixture
#[derive(Debug, Default, Deserialize)]
pub struct PromotionsFixture {
    /// Chance a flash sale tick fires, in `0.0..=1.0`
    pub flash_sale_probability: Option<f64>,

    /// Flash sale rate
    pub flash_sale_rate: Option<String>,

    /// Recommendation rate
    pub recommendation_rate: Option<String>,
}

/// Schedule Fixture
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleFixture {
    /// Flash sale timer
    pub flash_sale: Option<TimerFixture>,

    /// Recommendation timer
    pub recommendation: Option<TimerFixture>,
}

/// Timer Fixture
#[derive(Debug, Deserialize)]
pub struct TimerFixture {
    /// Seconds between ticks
    pub period_secs: u64,

    /// Upper bound of the start-up delay, in seconds
    #[serde(default)]
    pub max_jitter_secs: u64,
}

impl TryFrom<PoliciesFixture> for StoreConfig {
    type Error = FixtureError;

    fn try_from(fixture: PoliciesFixture) -> Result<Self, Self::Error> {
        Ok(StoreConfig {
            pricing: fixture.pricing.try_into()?,
            promotions: fixture.promotions.try_into()?,
            schedule: fixture.schedule.try_into()?,
        })
    }
}

impl TryFrom<PricingFixture> for PricingPolicy {
    type Error = FixtureError;

    fn try_from(fixture: PricingFixture) -> Result<Self, Self::Error> {
        let defaults = PricingPolicy::default();

        let item_discount_rates: FxHashMap<ProductId, Percentage> = match fixture.item_discount_rates {
            Some(rates) => rates
                .into_iter()
                .map(|(id, rate)| Ok((ProductId::from(id), parse_percentage(&rate)?)))
                .collect::<Result<_, FixtureError>>()?,
            None => defaults.item_discount_rates,
        };

        Ok(PricingPolicy {
            item_discount_rates,
            item_discount_threshold: fixture
                .item_discount_threshold
                .unwrap_or(defaults.item_discount_threshold),
            bulk_threshold: fixture.bulk_threshold.unwrap_or(defaults.bulk_threshold),
            bulk_rate: parse_optional_percentage(fixture.bulk_rate.as_deref(), defaults.bulk_rate)?,
            discount_day: fixture
                .discount_day
                .as_deref()
                .map(parse_weekday)
                .transpose()?
                .unwrap_or(defaults.discount_day),
            day_rate: parse_optional_percentage(fixture.day_rate.as_deref(), defaults.day_rate)?,
            points_per_amount: fixture
                .points_per_amount
                .unwrap_or(defaults.points_per_amount),
        })
    }
}

impl TryFrom<PromotionsFixture> for PromotionConfig {
    type Error = FixtureError;

    fn try_from(fixture: PromotionsFixture) -> Result<Self, Self::Error> {
        let defaults = PromotionConfig::default();

        Ok(PromotionConfig {
            flash_sale_probability: fixture
                .flash_sale_probability
                .map(Probability::new)
                .transpose()?
                .unwrap_or(defaults.flash_sale_probability),
            flash_sale_rate: parse_optional_percentage(
                fixture.flash_sale_rate.as_deref(),
                defaults.flash_sale_rate,
            )?,
            recommendation_rate: parse_optional_percentage(
                fixture.recommendation_rate.as_deref(),
                defaults.recommendation_rate,
            )?,
        })
    }
}

impl TryFrom<ScheduleFixture> for ScheduleConfig {
    type Error = FixtureError;

    fn try_from(fixture: ScheduleFixture) -> Result<Self, Self::Error> {
        let defaults = ScheduleConfig::default();

        Ok(ScheduleConfig {
            flash_sale: fixture
                .flash_sale
                .map(TimerConfig::try_from)
                .transpose()?
                .unwrap_or(defaults.flash_sale),
            recommendation: fixture
                .recommendation
                .map(TimerConfig::try_from)
                .transpose()?
                .unwrap_or(defaults.recommendation),
        })
    }
}

impl TryFrom<TimerFixture> for TimerConfig {
    type Error = FixtureError;

    fn try_from(fixture: TimerFixture) -> Result<Self, Self::Error> {
        Ok(TimerConfig::new(
            Duration::from_secs(fixture.period_secs),
            Duration::from_secs(fixture.max_jitter_secs),
        )?)
    }
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the rate is outside
/// `0..=1`.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let parsed = if let Some(percent_str) = trimmed.strip_suffix('%') {
        // "15%" -> 0.15
        percent_str
            .trim()
            .parse::<Decimal>()
            .map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        trimmed.parse::<Decimal>()
    };

    let value = parsed.map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

fn parse_optional_percentage(
    value: Option<&str>,
    default: Percentage,
) -> Result<Percentage, FixtureError> {
    value.map_or(Ok(default), parse_percentage)
}

/// Parse an English weekday name (e.g., "tuesday" or "Tue").
///
/// # Errors
///
/// Returns [`FixtureError::InvalidWeekday`] for anything else.
pub fn parse_weekday(s: &str) -> Result<Weekday, FixtureError> {
    let weekday = match s.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Weekday::Monday,
        "tuesday" | "tue" => Weekday::Tuesday,
        "wednesday" | "wed" => Weekday::Wednesday,
        "thursday" | "thu" => Weekday::Thursday,
        "friday" | "fri" => Weekday::Friday,
        "saturday" | "sat" => Weekday::Saturday,
        "sunday" | "sun" => Weekday::Sunday,
        _ => return Err(FixtureError::InvalidWeekday(s.to_string())),
    };

    Ok(weekday)
}
