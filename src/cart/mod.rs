//! Cart
//!
//! An ordered list of [`CartItem`]s plus the stock-aware operations that move
//! units between the catalog and the cart. Every operation takes snapshots
//! and returns new ones; a failed operation returns an error and no state.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    products::ProductId,
};

mod line_item;

pub use line_item::CartItem;

/// Coarse classification of cart failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced product or cart line does not exist.
    NotFound,

    /// The product has no units left.
    OutOfStock,

    /// The request exceeds the stock (or the units held in the cart).
    InsufficientStock,

    /// Configuration or arithmetic failure unrelated to the request.
    Other,
}

/// Errors raised by cart operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No product with this id exists in the catalog.
    #[error("상품을 찾을 수 없습니다.")]
    ProductNotFound(ProductId),

    /// The cart holds no line for this product.
    #[error("장바구니에 해당 상품이 없습니다.")]
    ItemNotFound(ProductId),

    /// The product is sold out.
    #[error("재고가 부족합니다.")]
    OutOfStock(ProductId),

    /// More units were requested than the catalog holds.
    #[error("재고가 부족합니다.")]
    InsufficientStock {
        /// Product whose stock was requested
        product_id: ProductId,
        /// Units requested
        requested: u64,
        /// Units available in the catalog
        available: u32,
    },

    /// More units were removed than the cart holds.
    #[error("장바구니에 담긴 상품 수량이 부족합니다.")]
    InsufficientQuantity {
        /// Product whose quantity was reduced
        product_id: ProductId,
        /// Units requested for removal
        requested: u64,
        /// Units held in the cart
        held: u32,
    },

    /// The product is priced in a different currency from the cart.
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// Wrapped catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl CartError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::ProductNotFound(_)
            | CartError::ItemNotFound(_)
            | CartError::Catalog(CatalogError::ProductNotFound(_)) => ErrorKind::NotFound,
            CartError::OutOfStock(_) => ErrorKind::OutOfStock,
            CartError::InsufficientStock { .. }
            | CartError::InsufficientQuantity { .. }
            | CartError::Catalog(CatalogError::InsufficientStock { .. }) => {
                ErrorKind::InsufficientStock
            }
            CartError::CurrencyMismatch(..) | CartError::Catalog(_) => ErrorKind::Other,
        }
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    items: SmallVec<[CartItem<'a>; 8]>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            items: SmallVec::new(),
            currency,
        }
    }

    /// Find the line for a product.
    #[must_use]
    pub fn find_item(&self, product_id: &ProductId) -> Option<&CartItem<'a>> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem<'a>> {
        self.items.iter()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity())).sum()
    }

    /// Sum of price × quantity across all lines, before any discount.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        let minor = self
            .items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.line_total_minor()));

        Money::from_minor(minor, self.currency)
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Return a new cart with `item` appended, or merged into the existing
    /// line for the same product.
    #[must_use]
    fn with_item(&self, item: CartItem<'a>) -> Self {
        let mut cart = self.clone();

        if let Some(existing) = cart
            .items
            .iter_mut()
            .find(|line| line.product_id() == item.product_id())
        {
            *existing = existing.with_quantity_change(i64::from(item.quantity()));
        } else {
            cart.items.push(item);
        }

        cart
    }

    /// Return a new cart with the line for `product_id` changed by `delta`.
    /// Lines that reach zero are dropped.
    #[must_use]
    fn with_quantity_change(&self, product_id: &ProductId, delta: i64) -> Self {
        let mut cart = self.clone();

        for line in &mut cart.items {
            if line.product_id() == product_id {
                *line = line.with_quantity_change(delta);
            }
        }

        cart.items.retain(|line| !line.is_empty());

        cart
    }

    /// Return a new cart without the line for `product_id`.
    #[must_use]
    fn without_item(&self, product_id: &ProductId) -> Self {
        let mut cart = self.clone();

        cart.items.retain(|line| line.product_id() != product_id);

        cart
    }
}

/// Add one unit of `product_id` to the cart, taking it from catalog stock.
///
/// # Errors
///
/// - [`CartError::ProductNotFound`]: the product is not in the catalog.
/// - [`CartError::OutOfStock`]: the product has no units left.
/// - [`CartError::CurrencyMismatch`]: the product and cart currencies differ.
pub fn add_to_cart<'a>(
    catalog: &Catalog<'a>,
    cart: &Cart<'a>,
    product_id: &ProductId,
) -> Result<(Catalog<'a>, Cart<'a>), CartError> {
    let product = catalog
        .get(product_id)
        .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

    if !product.has_stock() {
        return Err(CartError::OutOfStock(product_id.clone()));
    }

    let product_currency = product.price().currency();

    if product_currency != cart.currency() {
        return Err(CartError::CurrencyMismatch(
            product_id.clone(),
            product_currency.iso_alpha_code,
            cart.currency().iso_alpha_code,
        ));
    }

    let catalog = catalog.with_stock_adjusted(product_id, -1)?;
    let cart = cart.with_item(CartItem::from_product(product, 1));

    debug!(
        product_id = %product_id,
        quantity = cart.find_item(product_id).map(CartItem::quantity),
        "added item to cart"
    );

    Ok((catalog, cart))
}

/// Change the quantity of an existing cart line by `delta`, moving the same
/// number of units in the opposite direction in the catalog.
///
/// A `delta` of zero returns both snapshots unchanged.
///
/// # Errors
///
/// - [`CartError::ItemNotFound`]: the cart has no line for the product.
/// - [`CartError::ProductNotFound`]: the product is no longer in the catalog.
/// - [`CartError::InsufficientStock`]: `delta > 0` exceeds catalog stock.
/// - [`CartError::InsufficientQuantity`]: `delta < 0` exceeds the units held.
pub fn change_quantity<'a>(
    cart: &Cart<'a>,
    catalog: &Catalog<'a>,
    product_id: &ProductId,
    delta: i64,
) -> Result<(Cart<'a>, Catalog<'a>), CartError> {
    if delta == 0 {
        return Ok((cart.clone(), catalog.clone()));
    }

    let item = cart
        .find_item(product_id)
        .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

    let requested = delta.unsigned_abs();

    if delta > 0 {
        let product = catalog
            .get(product_id)
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        if !product.has_stock_for(requested) {
            return Err(CartError::InsufficientStock {
                product_id: product_id.clone(),
                requested,
                available: product.stock(),
            });
        }
    } else if u64::from(item.quantity()) < requested {
        return Err(CartError::InsufficientQuantity {
            product_id: product_id.clone(),
            requested,
            held: item.quantity(),
        });
    }

    let catalog = catalog.with_stock_adjusted(product_id, -delta)?;
    let cart = cart.with_quantity_change(product_id, delta);

    debug!(
        product_id = %product_id,
        delta,
        quantity = cart.find_item(product_id).map_or(0, CartItem::quantity),
        "changed cart quantity"
    );

    Ok((cart, catalog))
}

/// Remove the line for `product_id` from the cart.
///
/// The removed line is returned so the caller can put its full quantity back
/// into catalog stock.
///
/// # Errors
///
/// Returns [`CartError::ItemNotFound`] if the cart has no line for the product.
pub fn remove_from_cart<'a>(
    cart: &Cart<'a>,
    product_id: &ProductId,
) -> Result<(Cart<'a>, CartItem<'a>), CartError> {
    let item = cart
        .find_item(product_id)
        .cloned()
        .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

    debug!(product_id = %product_id, quantity = item.quantity(), "removed item from cart");

    Ok((cart.without_item(product_id), item))
}
