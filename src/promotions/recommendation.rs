//! Recommendation
//!
//! Suggests a product other than the one the customer last added.

use decimal_percentage::Percentage;
use rand::{Rng, seq::SliceRandom};

use crate::{
    catalog::Catalog,
    discounts::percent_points,
    products::{Product, ProductId},
};

/// Pick one in-stock product other than `last_selected` uniformly.
///
/// With no previous selection every in-stock product is a candidate.
pub fn select<'c, 'a, R: Rng + ?Sized>(
    catalog: &'c Catalog<'a>,
    last_selected: Option<&ProductId>,
    rng: &mut R,
) -> Option<&'c Product<'a>> {
    let candidates: Vec<&Product<'a>> = catalog
        .in_stock()
        .filter(|product| Some(product.id()) != last_selected)
        .collect();

    candidates.choose(rng).copied()
}

/// Notification shown when a product is recommended.
pub fn message(name: &str, rate: Percentage) -> String {
    format!(
        "추천 상품! \"{name}\"을 장바구니에 추가해보세요. ({}% 할인)",
        percent_points(rate)
    )
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
                Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 5),
                Product::new("p2", "상품2", Money::from_minor(20_000, KRW), 5),
                Product::new("p4", "상품4", Money::from_minor(15_000, KRW), 0),
            ],
            KRW,
        )
    }

    #[test]
    fn select_skips_last_selected_and_sold_out() -> TestResult {
        let catalog = test_catalog()?;
        let last = ProductId::from("p1");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let picked = select(&catalog, Some(&last), &mut rng).map(|p| p.id().as_str());

            assert_eq!(picked, Some("p2"));
        }

        Ok(())
    }

    #[test]
    fn select_without_last_selected_considers_all_in_stock() -> TestResult {
        let catalog = test_catalog()?;
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen: Vec<&str> = (0..100)
            .filter_map(|_| select(&catalog, None, &mut rng))
            .map(|product| product.id().as_str())
            .collect();

        seen.sort_unstable();
        seen.dedup();

        assert_eq!(seen, vec!["p1", "p2"]);

        Ok(())
    }

    #[test]
    fn select_returns_none_without_candidates() -> TestResult {
        let catalog = Catalog::with_products(
            [Product::new("p1", "상품1", Money::from_minor(10_000, KRW), 5)],
            KRW,
        )?;
        let last = ProductId::from("p1");
        let mut rng = StdRng::seed_from_u64(3);

        assert!(select(&catalog, Some(&last), &mut rng).is_none());

        Ok(())
    }

    #[test]
    fn message_names_product_and_rate() {
        assert_eq!(
            message("상품2", Percentage::from(Decimal::new(5, 2))),
            "추천 상품! \"상품2\"을 장바구니에 추가해보세요. (5% 할인)"
        );
    }
}
