//! Application State
//!
//! An immutable snapshot of the store as seen by one customer, and the
//! intents that move it from one snapshot to the next.

use jiff::civil::Date;
use rand::Rng;
use tracing::warn;

use crate::{
    cart::{Cart, CartError, add_to_cart, change_quantity, remove_from_cart},
    catalog::Catalog,
    pricing::{PricingPolicy, PricingResult},
    products::ProductId,
    promotions::{PromotionEngine, PromotionError, PromotionEvent, PromotionKind},
};

/// Customer action on the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Add one unit of a product.
    AddToCart(ProductId),

    /// Add one unit to an existing line.
    IncreaseQuantity(ProductId),

    /// Take one unit from an existing line.
    DecreaseQuantity(ProductId),

    /// Change an existing line by a signed amount.
    ChangeQuantity(ProductId, i64),

    /// Drop a line, returning its units to stock.
    RemoveFromCart(ProductId),
}

impl Intent {
    /// Product the intent refers to
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        match self {
            Intent::AddToCart(id)
            | Intent::IncreaseQuantity(id)
            | Intent::DecreaseQuantity(id)
            | Intent::ChangeQuantity(id, _)
            | Intent::RemoveFromCart(id) => id,
        }
    }
}

/// Outcome of [`AppState::dispatch`].
#[derive(Debug, Clone)]
pub struct Transition<'a> {
    /// State after the intent; unchanged if it was rejected
    pub state: AppState<'a>,

    /// User-facing message for a rejected intent
    pub notice: Option<String>,
}

/// Application State
#[derive(Debug, Clone)]
pub struct AppState<'a> {
    catalog: Catalog<'a>,
    cart: Cart<'a>,
    last_selected: Option<ProductId>,
    bonus_points: u64,
}

impl<'a> AppState<'a> {
    /// Start with an empty cart.
    #[must_use]
    pub fn new(catalog: Catalog<'a>) -> Self {
        let cart = Cart::new(catalog.currency());

        Self {
            catalog,
            cart,
            last_selected: None,
            bonus_points: 0,
        }
    }

    /// Catalog snapshot
    #[must_use]
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Cart snapshot
    #[must_use]
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Product most recently added to the cart
    #[must_use]
    pub fn last_selected(&self) -> Option<&ProductId> {
        self.last_selected.as_ref()
    }

    /// Points the current cart would earn
    #[must_use]
    pub fn bonus_points(&self) -> u64 {
        self.bonus_points
    }

    /// Price the current cart.
    #[must_use]
    pub fn pricing(&self, policy: &PricingPolicy, date: Date) -> PricingResult<'a> {
        policy.calculate_cart_total(&self.cart, date)
    }

    /// Apply `intent` and reprice.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] raised by the cart operation; `self` is not
    /// modified.
    pub fn apply(
        &self,
        intent: &Intent,
        policy: &PricingPolicy,
        date: Date,
    ) -> Result<Self, CartError> {
        let mut last_selected = self.last_selected.clone();

        let (catalog, cart) = match intent {
            Intent::AddToCart(id) => {
                last_selected = Some(id.clone());

                add_to_cart(&self.catalog, &self.cart, id)?
            }
            Intent::IncreaseQuantity(id) => self.change(id, 1)?,
            Intent::DecreaseQuantity(id) => self.change(id, -1)?,
            Intent::ChangeQuantity(id, delta) => self.change(id, *delta)?,
            Intent::RemoveFromCart(id) => {
                let (cart, removed) = remove_from_cart(&self.cart, id)?;
                let catalog = self
                    .catalog
                    .with_stock_adjusted(id, i64::from(removed.quantity()))?;

                (catalog, cart)
            }
        };

        let bonus_points = policy.calculate_cart_total(&cart, date).bonus_points();

        Ok(Self {
            catalog,
            cart,
            last_selected,
            bonus_points,
        })
    }

    /// Apply `intent`, turning a rejection into a notice instead of an error.
    #[must_use]
    pub fn dispatch(&self, intent: &Intent, policy: &PricingPolicy, date: Date) -> Transition<'a> {
        match self.apply(intent, policy, date) {
            Ok(state) => Transition {
                state,
                notice: None,
            },
            Err(err) => {
                warn!(
                    product_id = %intent.product_id(),
                    kind = ?err.kind(),
                    error = %err,
                    "intent rejected"
                );

                Transition {
                    state: self.clone(),
                    notice: Some(err.to_string()),
                }
            }
        }
    }

    /// Run one promotion tick against the catalog.
    ///
    /// Cart lines keep the price they were added at.
    ///
    /// # Errors
    ///
    /// Returns a [`PromotionError`] if the selected product cannot be repriced.
    pub fn run_promotion<R: Rng + ?Sized>(
        &self,
        kind: PromotionKind,
        engine: &PromotionEngine,
        rng: &mut R,
    ) -> Result<(Self, Option<PromotionEvent>), PromotionError> {
        let (catalog, event) = engine.run(kind, &self.catalog, self.last_selected.as_ref(), rng)?;

        Ok((Self { catalog, ..self.clone() }, event))
    }

    fn change(&self, id: &ProductId, delta: i64) -> Result<(Catalog<'a>, Cart<'a>), CartError> {
        let (cart, catalog) = change_quantity(&self.cart, &self.catalog, id, delta)?;

        Ok((catalog, cart))
    }
}
