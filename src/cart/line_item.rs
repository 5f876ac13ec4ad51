//! Cart line items

use rusty_money::{Money, iso::Currency};

use crate::products::{Product, ProductId};

/// A single cart line.
///
/// Name and price are copied from the product when the line is created, so
/// later catalog price changes do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product_id: ProductId,
    name: String,
    price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Create a line from a product snapshot.
    #[must_use]
    pub fn from_product(product: &Product<'a>, quantity: u32) -> Self {
        Self {
            product_id: product.id().clone(),
            name: product.name().to_string(),
            price: *product.price(),
            quantity,
        }
    }

    /// Product this line refers to
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at the time the line was created
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price at the time the line was created
    #[must_use]
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Units held
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Money<'a, Currency> {
        Money::from_minor(self.line_total_minor(), self.price.currency())
    }

    /// Unit price multiplied by quantity, in minor units.
    #[must_use]
    pub fn line_total_minor(&self) -> i64 {
        self.price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }

    /// Return a copy of this line with the quantity changed by `delta`,
    /// clamped at zero.
    #[must_use]
    pub fn with_quantity_change(&self, delta: i64) -> Self {
        let quantity = i64::from(self.quantity)
            .saturating_add(delta)
            .clamp(0, i64::from(u32::MAX));

        Self {
            quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
            ..self.clone()
        }
    }

    /// A line with no units is equivalent to no line at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}
