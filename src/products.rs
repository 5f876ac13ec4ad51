//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Caller-facing product identifier (e.g. `p1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Product
///
/// Products are values: price and stock changes return a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    id: ProductId,
    name: String,
    price: Money<'a, Currency>,
    stock: u32,
}

impl<'a> Product<'a> {
    /// Create a new product.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        stock: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
        }
    }

    /// Product identifier
    #[must_use]
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Product name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current shelf price
    #[must_use]
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Units available
    #[must_use]
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whether `quantity` units are available.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u64) -> bool {
        u64::from(self.stock) >= quantity
    }

    /// Return a copy of this product with a new price.
    #[must_use]
    pub fn with_price(&self, price: Money<'a, Currency>) -> Self {
        Self {
            price,
            ..self.clone()
        }
    }

    /// Return a copy of this product with its stock changed by `delta`.
    ///
    /// The result is clamped to `0..=u32::MAX`.
    #[must_use]
    pub fn with_stock_change(&self, delta: i64) -> Self {
        let stock = i64::from(self.stock)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));

        Self {
            stock: u32::try_from(stock).unwrap_or(u32::MAX),
            ..self.clone()
        }
    }
}
