//! Promotions
//!
//! Timed promotions that reprice catalog products: the flash sale and the
//! recommendation. Selection and application are separate steps, so a caller
//! can inspect or override the chosen product before repricing.

use std::fmt;

use decimal_percentage::Percentage;
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    catalog::{Catalog, CatalogError},
    products::ProductId,
};

pub mod flash_sale;
pub mod recommendation;

/// Errors related to promotions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PromotionError {
    /// A probability outside `0.0..=1.0` (or NaN) was supplied.
    #[error("Probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),

    /// The selected product is not in the catalog.
    #[error("상품을 찾을 수 없습니다.")]
    ProductNotFound(ProductId),

    /// Wrapped catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Promotion kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromotionKind {
    /// Random discount on a random in-stock product
    FlashSale,

    /// Discount on a product other than the last one added
    Recommendation,
}

impl fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionKind::FlashSale => f.write_str("flash_sale"),
            PromotionKind::Recommendation => f.write_str("recommendation"),
        }
    }
}

/// Probability in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Always fires.
    pub const ALWAYS: Probability = Probability(1.0);

    /// Never fires.
    pub const NEVER: Probability = Probability(0.0);

    /// Create a new probability.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidProbability`] when `value` is NaN or
    /// outside `0.0..=1.0`.
    pub fn new(value: f64) -> Result<Self, PromotionError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PromotionError::InvalidProbability(value))
        }
    }

    /// Raw value
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Promotion Config
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionConfig {
    /// Chance that a flash sale tick discounts anything
    pub flash_sale_probability: Probability,

    /// Flash sale rate
    pub flash_sale_rate: Percentage,

    /// Recommendation rate
    pub recommendation_rate: Percentage,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            flash_sale_probability: Probability(0.3),
            flash_sale_rate: Percentage::from(Decimal::new(20, 2)),
            recommendation_rate: Percentage::from(Decimal::new(5, 2)),
        }
    }
}

/// A promotion that repriced a product.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionEvent {
    /// Promotion that fired
    pub kind: PromotionKind,

    /// Product that was repriced
    pub product_id: ProductId,

    /// Product name at the time of the promotion
    pub product_name: String,

    /// Rate applied to the product's current price
    pub rate: Percentage,
}

impl PromotionEvent {
    /// Customer-facing notification text.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            PromotionKind::FlashSale => flash_sale::message(&self.product_name, self.rate),
            PromotionKind::Recommendation => recommendation::message(&self.product_name, self.rate),
        }
    }
}

/// Promotion Engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionEngine {
    config: PromotionConfig,
}

impl PromotionEngine {
    /// Create a new engine.
    #[must_use]
    pub fn new(config: PromotionConfig) -> Self {
        Self { config }
    }

    /// Engine configuration
    #[must_use]
    pub fn config(&self) -> &PromotionConfig {
        &self.config
    }

    /// Rate applied by `kind`.
    #[must_use]
    pub fn rate(&self, kind: PromotionKind) -> Percentage {
        match kind {
            PromotionKind::FlashSale => self.config.flash_sale_rate,
            PromotionKind::Recommendation => self.config.recommendation_rate,
        }
    }

    /// Choose the product `kind` would discount, if any.
    ///
    /// `last_selected` only affects recommendations.
    pub fn select<R: Rng + ?Sized>(
        &self,
        kind: PromotionKind,
        catalog: &Catalog<'_>,
        last_selected: Option<&ProductId>,
        rng: &mut R,
    ) -> Option<ProductId> {
        let product = match kind {
            PromotionKind::FlashSale => {
                flash_sale::select(catalog, self.config.flash_sale_probability, rng)
            }
            PromotionKind::Recommendation => recommendation::select(catalog, last_selected, rng),
        };

        if product.is_none() {
            debug!(promotion = %kind, "no promotion candidate");
        }

        product.map(|product| product.id().clone())
    }

    /// Apply `kind` to `product_id`, returning the repriced catalog and the
    /// event describing it.
    ///
    /// # Errors
    ///
    /// - [`PromotionError::ProductNotFound`]: the product is not in the catalog.
    /// - [`PromotionError::Catalog`]: the reduced price could not be calculated.
    pub fn apply<'a>(
        &self,
        kind: PromotionKind,
        catalog: &Catalog<'a>,
        product_id: &ProductId,
    ) -> Result<(Catalog<'a>, PromotionEvent), PromotionError> {
        let product = catalog
            .get(product_id)
            .ok_or_else(|| PromotionError::ProductNotFound(product_id.clone()))?;

        let rate = self.rate(kind);
        let updated = catalog.with_discount(std::slice::from_ref(product_id), rate)?;

        let event = PromotionEvent {
            kind,
            product_id: product_id.clone(),
            product_name: product.name().to_string(),
            rate,
        };

        info!(
            promotion = %kind,
            product_id = %product_id,
            from = product.price().to_minor_units(),
            to = updated.get(product_id).map(|p| p.price().to_minor_units()),
            "promotion applied"
        );

        Ok((updated, event))
    }

    /// Select and apply `kind` in one step.
    ///
    /// Returns the unchanged catalog and no event when nothing was selected.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the selected product cannot be repriced.
    pub fn run<'a, R: Rng + ?Sized>(
        &self,
        kind: PromotionKind,
        catalog: &Catalog<'a>,
        last_selected: Option<&ProductId>,
        rng: &mut R,
    ) -> Result<(Catalog<'a>, Option<PromotionEvent>), PromotionError> {
        match self.select(kind, catalog, last_selected, rng) {
            Some(product_id) => {
                let (catalog, event) = self.apply(kind, catalog, &product_id)?;

                Ok((catalog, Some(event)))
            }
            None => Ok((catalog.clone(), None)),
        }
    }
}
