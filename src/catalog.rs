//! Catalog
//!
//! The ordered set of products offered for sale. Catalog operations never
//! mutate in place: every change returns a new catalog, leaving the original
//! snapshot intact.

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::debug;

use crate::{
    discounts::{DiscountError, discounted_minor},
    products::{Product, ProductId},
};

/// Products with fewer units than this are reported as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Errors related to catalog construction or updates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product with this id exists.
    #[error("상품을 찾을 수 없습니다.")]
    ProductNotFound(ProductId),

    /// A stock decrement exceeds the units available.
    #[error("재고가 부족합니다.")]
    InsufficientStock {
        /// Product whose stock was requested
        product_id: ProductId,
        /// Units requested
        requested: u64,
        /// Units available
        available: u32,
    },

    /// The same id was supplied twice.
    #[error("Product {0} is listed more than once")]
    DuplicateProduct(ProductId),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A price reduction could not be calculated.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    // Products are never removed, so slot order is insertion order.
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<ProductId, ProductKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog priced in `currency`.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog with the given products, in order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a product id is repeated or a product is
    /// priced in another currency.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(currency);

        for product in products {
            let product_currency = product.price().currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.id().clone(),
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if catalog.keys.contains_key(product.id()) {
                return Err(CatalogError::DuplicateProduct(product.id().clone()));
            }

            let id = product.id().clone();
            let key = catalog.products.insert(product);

            catalog.keys.insert(id, key);
        }

        Ok(catalog)
    }

    /// Find a product by id.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&Product<'a>> {
        self.keys
            .get(product_id)
            .and_then(|key| self.products.get(*key))
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Iterate over the products that have at least one unit in stock.
    pub fn in_stock(&self) -> impl Iterator<Item = &Product<'a>> {
        self.iter().filter(|product| product.has_stock())
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every product is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Return a new catalog with the stock of `product_id` changed by `delta`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::ProductNotFound`]: the id is unknown.
    /// - [`CatalogError::InsufficientStock`]: a decrement exceeds the stock.
    pub fn with_stock_adjusted(
        &self,
        product_id: &ProductId,
        delta: i64,
    ) -> Result<Self, CatalogError> {
        let key = self.key(product_id)?;
        let product = self
            .products
            .get(key)
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))?;

        if delta < 0 && !product.has_stock_for(delta.unsigned_abs()) {
            return Err(CatalogError::InsufficientStock {
                product_id: product_id.clone(),
                requested: delta.unsigned_abs(),
                available: product.stock(),
            });
        }

        let updated = product.with_stock_change(delta);

        debug!(
            product_id = %product_id,
            delta,
            stock = updated.stock(),
            "adjusted stock"
        );

        Ok(self.replace(key, updated))
    }

    /// Return a new catalog where every listed product has its *current*
    /// price reduced by `rate`.
    ///
    /// Repeated application compounds. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Discount`] if the reduced price cannot be
    /// calculated.
    pub fn with_discount(
        &self,
        product_ids: &[ProductId],
        rate: Percentage,
    ) -> Result<Self, CatalogError> {
        let mut catalog = self.clone();

        for (key, product) in &mut catalog.products {
            if !product_ids.contains(product.id()) {
                continue;
            }

            let current = product.price().to_minor_units();
            let discounted = discounted_minor(rate, current)?;

            debug!(
                product_id = %product.id(),
                ?key,
                from = current,
                to = discounted,
                "discounted product"
            );

            *product = product.with_price(Money::from_minor(discounted, self.currency));
        }

        Ok(catalog)
    }

    /// Products that are running low or sold out, in catalog order.
    #[must_use]
    pub fn low_stock_products(&self, threshold: u32) -> Vec<&Product<'a>> {
        self.iter()
            .filter(|product| product.stock() < threshold)
            .collect()
    }

    /// One line per product below [`LOW_STOCK_THRESHOLD`], e.g.
    /// `상품5: 재고 부족 (3개 남음)` or `상품4: 품절`.
    #[must_use]
    pub fn low_stock_info(&self) -> String {
        self.low_stock_products(LOW_STOCK_THRESHOLD)
            .into_iter()
            .map(|product| {
                if product.has_stock() {
                    format!("{}: 재고 부족 ({}개 남음)", product.name(), product.stock())
                } else {
                    format!("{}: 품절", product.name())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(&self, product_id: &ProductId) -> Result<ProductKey, CatalogError> {
        self.keys
            .get(product_id)
            .copied()
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.clone()))
    }

    fn replace(&self, key: ProductKey, product: Product<'a>) -> Self {
        let mut catalog = self.clone();

        if let Some(slot) = catalog.products.get_mut(key) {
            *slot = product;
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso::{KRW, USD};
    use testresult::TestResult;

    use super::*;

    fn test_catalog() -> Result<Catalog<'static>, CatalogError> {
        Catalog::with_products(
            [
                Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 50),
                Product::new("p2", "상품2", Money::from_minor(20_000, KRW), 3),
                Product::new("p3", "상품3", Money::from_minor(30_000, KRW), 0),
            ],
            KRW,
        )
    }

    #[test]
    fn with_products_preserves_order() -> TestResult {
        let catalog = test_catalog()?;

        let ids: Vec<&str> = catalog.iter().map(|product| product.id().as_str()).collect();

        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(catalog.len(), 3);

        Ok(())
    }

    #[test]
    fn with_products_rejects_duplicates() {
        let result = Catalog::with_products(
            [
                Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 1),
                Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 1),
            ],
            KRW,
        );

        assert!(matches!(result, Err(CatalogError::DuplicateProduct(id)) if id.as_str() == "p1"));
    }

    #[test]
    fn with_products_rejects_currency_mismatch() {
        let result = Catalog::with_products(
            [Product::new("p1", "상품1", Money::from_minor(100, USD), 1)],
            KRW,
        );

        match result {
            Err(CatalogError::CurrencyMismatch(id, product_currency, catalog_currency)) => {
                assert_eq!(id.as_str(), "p1");
                assert_eq!(product_currency, USD.iso_alpha_code);
                assert_eq!(catalog_currency, KRW.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn with_stock_adjusted_returns_new_catalog() -> TestResult {
        let catalog = test_catalog()?;
        let id = ProductId::from("p1");

        let updated = catalog.with_stock_adjusted(&id, -1)?;

        assert_eq!(updated.get(&id).map(Product::stock), Some(49));
        assert_eq!(catalog.get(&id).map(Product::stock), Some(50));

        Ok(())
    }

    #[test]
    fn with_stock_adjusted_rejects_overdraw() -> TestResult {
        let catalog = test_catalog()?;

        let result = catalog.with_stock_adjusted(&ProductId::from("p2"), -4);

        assert_eq!(
            result.err(),
            Some(CatalogError::InsufficientStock {
                product_id: ProductId::from("p2"),
                requested: 4,
                available: 3,
            })
        );

        Ok(())
    }

    #[test]
    fn with_stock_adjusted_unknown_product() -> TestResult {
        let catalog = test_catalog()?;

        let result = catalog.with_stock_adjusted(&ProductId::from("p9"), 1);

        assert!(matches!(result, Err(CatalogError::ProductNotFound(_))));

        Ok(())
    }

    #[test]
    fn with_discount_compounds_on_current_price() -> TestResult {
        let catalog = test_catalog()?;
        let id = ProductId::from("p1");
        let ids = [id.clone()];
        let rate = Percentage::from(Decimal::new(20, 2));

        let once = catalog.with_discount(&ids, rate)?;
        let twice = once.with_discount(&ids, rate)?;

        let price = |catalog: &Catalog<'_>| {
            catalog
                .get(&id)
                .map(|product| product.price().to_minor_units())
        };

        assert_eq!(price(&once), Some(8_000));
        assert_eq!(price(&twice), Some(6_400));
        assert_ne!(price(&twice), Some(6_000), "rates compound rather than stack");

        Ok(())
    }

    #[test]
    fn with_discount_leaves_other_products_alone() -> TestResult {
        let catalog = test_catalog()?;

        let updated =
            catalog.with_discount(&[ProductId::from("p1")], Percentage::from(Decimal::new(5, 2)))?;

        assert_eq!(
            updated
                .get(&ProductId::from("p2"))
                .map(|product| product.price().to_minor_units()),
            Some(20_000)
        );

        Ok(())
    }

    #[test]
    fn low_stock_products_includes_sold_out() -> TestResult {
        let catalog = test_catalog()?;

        let ids: Vec<&str> = catalog
            .low_stock_products(LOW_STOCK_THRESHOLD)
            .into_iter()
            .map(|product| product.id().as_str())
            .collect();

        assert_eq!(ids, vec!["p2", "p3"]);

        Ok(())
    }

    #[test]
    fn low_stock_info_formats_each_product() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(
            catalog.low_stock_info(),
            "상품2: 재고 부족 (3개 남음)\n상품3: 품절"
        );

        Ok(())
    }

    #[test]
    fn in_stock_skips_sold_out_products() -> TestResult {
        let catalog = test_catalog()?;

        assert_eq!(catalog.in_stock().count(), 2);

        Ok(())
    }
}
