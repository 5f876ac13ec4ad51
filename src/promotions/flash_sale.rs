//! Flash Sale
//!
//! A timed, probabilistic discount on one randomly chosen in-stock product.

use decimal_percentage::Percentage;
use rand::{Rng, seq::SliceRandom};

use crate::{
    catalog::Catalog,
    discounts::percent_points,
    products::Product,
    promotions::Probability,
};

/// Roll against `probability`, then pick one in-stock product uniformly.
///
/// Returns `None` when the roll fails or nothing is in stock.
pub fn select<'c, 'a, R: Rng + ?Sized>(
    catalog: &'c Catalog<'a>,
    probability: Probability,
    rng: &mut R,
) -> Option<&'c Product<'a>> {
    if !rng.gen_bool(probability.value()) {
        return None;
    }

    let candidates: Vec<&Product<'a>> = catalog.in_stock().collect();

    candidates.choose(rng).copied()
}

/// Notification shown when a flash sale starts.
pub fn message(name: &str, rate: Percentage) -> String {
    format!("번개세일! \"{name}\" 상품이 {}% 할인됩니다!", percent_points(rate))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::KRW};
    use testresult::TestResult;

    use super::*;

    fn test_catalog() -> Result<Catalog<'static>, crate::catalog::CatalogError> {
        Catalog::with_products(
            [
                Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 0),
                Product::new("p2", "상품2", Money::from_minor(20_000, KRW), 3),
                Product::new("p3", "상품3", Money::from_minor(30_000, KRW), 0),
            ],
            KRW,
        )
    }

    #[test]
    fn select_only_picks_in_stock_products() -> TestResult {
        let catalog = test_catalog()?;
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let picked = select(&catalog, Probability::ALWAYS, &mut rng).map(|p| p.id().as_str());

            assert_eq!(picked, Some("p2"));
        }

        Ok(())
    }

    #[test]
    fn select_never_fires_at_zero_probability() -> TestResult {
        let catalog = test_catalog()?;
        let mut rng = StdRng::seed_from_u64(7);

        assert!((0..50).all(|_| select(&catalog, Probability::NEVER, &mut rng).is_none()));

        Ok(())
    }

    #[test]
    fn select_returns_none_when_sold_out() -> TestResult {
        let catalog = Catalog::with_products(
            [Product::new("p4", "상품4", Money::from_minor(15_000, KRW), 0)],
            KRW,
        )?;
        let mut rng = StdRng::seed_from_u64(1);

        assert!(select(&catalog, Probability::ALWAYS, &mut rng).is_none());

        Ok(())
    }

    #[test]
    fn message_names_product_and_rate() {
        assert_eq!(
            message("상품3", Percentage::from(Decimal::new(20, 2))),
            "번개세일! \"상품3\" 상품이 20% 할인됩니다!"
        );
    }
}
