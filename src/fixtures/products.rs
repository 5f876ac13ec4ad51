//! Product Fixtures

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, KRW, USD},
};
use serde::Deserialize;

use crate::{catalog::Catalog, fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id (e.g. `p1`)
    pub id: String,

    /// Product name
    pub name: String,

    /// Product price (e.g., "10000 KRW")
    pub price: String,

    /// Units in stock
    pub stock: u32,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        Ok(Product::new(
            fixture.id,
            fixture.name,
            Money::from_minor(minor_units, currency),
            fixture.stock,
        ))
    }
}

impl ProductsFixture {
    /// Build a catalog, taking the currency from the first product.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, a price is malformed, or the
    /// products are not all priced in the same currency.
    pub fn into_catalog(self) -> Result<Catalog<'static>, FixtureError> {
        let products = self
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let currency = products
            .first()
            .map(|product| product.price().currency())
            .ok_or(FixtureError::NoProducts)?;

        if let Some(other) = products
            .iter()
            .map(|product| product.price().currency())
            .find(|other| *other != currency)
        {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                other.iso_alpha_code.to_string(),
            ));
        }

        Ok(Catalog::with_products(products, currency)?)
    }
}

/// Parse price string (e.g., "10000 KRW" or "2.99 GBP") into minor units and
/// currency, using the currency's own number of minor digits.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative whole number of minor units, or if the
/// currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "KRW" => KRW,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let minor = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .filter(|minor| minor.fract().is_zero() && !minor.is_sign_negative())
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor, currency))
}

/// The store's opening catalog.
///
/// # Errors
///
/// Returns an error only if the built-in product list is inconsistent.
pub fn reference_catalog() -> Result<Catalog<'static>, FixtureError> {
    let products = [
        ("p1", "상품1", 10_000, 50),
        ("p2", "상품2", 20_000, 30),
        ("p3", "상품3", 30_000, 20),
        ("p4", "상품4", 15_000, 0),
        ("p5", "상품5", 25_000, 10),
    ]
    .map(|(id, name, price, stock)| Product::new(id, name, Money::from_minor(price, KRW), stock));

    Ok(Catalog::with_products(products, KRW)?)
}
