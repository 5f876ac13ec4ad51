//! Pricing
//!
//! Cart totals under the store's discount policy. At most one discount
//! mechanism takes effect: per-item rates and the bulk rate are compared by
//! absolute amount, and the day-of-week rate only replaces a smaller rate.

use decimal_percentage::Percentage;
use jiff::civil::{Date, Weekday};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{Cart, CartItem},
    clock::Clock,
    discounts::{fraction, round_minor},
    products::ProductId,
};

/// Discount mechanism that produced the final total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedDiscount {
    /// No discount applied.
    None,

    /// Per-item quantity rates.
    PerItem,

    /// Whole-cart bulk rate.
    Bulk,

    /// Day-of-week rate.
    DayOfWeek,
}

/// Store discount policy.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingPolicy {
    /// Per-product rates applied to lines at or above `item_discount_threshold`
    pub item_discount_rates: FxHashMap<ProductId, Percentage>,

    /// Minimum line quantity for a per-item rate
    pub item_discount_threshold: u32,

    /// Minimum total cart quantity for the bulk rate
    pub bulk_threshold: u64,

    /// Whole-cart bulk rate
    pub bulk_rate: Percentage,

    /// Weekday on which `day_rate` applies
    pub discount_day: Weekday,

    /// Day-of-week rate
    pub day_rate: Percentage,

    /// One bonus point is earned per this many minor units of the final total
    pub points_per_amount: u64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        let item_discount_rates = [
            ("p1", Decimal::new(10, 2)),
            ("p2", Decimal::new(15, 2)),
            ("p3", Decimal::new(20, 2)),
            ("p4", Decimal::new(5, 2)),
            ("p5", Decimal::new(25, 2)),
        ]
        .into_iter()
        .map(|(id, rate)| (ProductId::from(id), Percentage::from(rate)))
        .collect();

        Self {
            item_discount_rates,
            item_discount_threshold: 10,
            bulk_threshold: 30,
            bulk_rate: Percentage::from(Decimal::new(25, 2)),
            discount_day: Weekday::Tuesday,
            day_rate: Percentage::from(Decimal::new(10, 2)),
            points_per_amount: 1_000,
        }
    }
}

impl PricingPolicy {
    /// Rate applied to a single cart line, zero below the quantity threshold
    /// or for products without a configured rate.
    #[must_use]
    pub fn item_discount_rate(&self, item: &CartItem<'_>) -> Decimal {
        if item.quantity() < self.item_discount_threshold {
            return Decimal::ZERO;
        }

        self.item_discount_rates
            .get(item.product_id())
            .map_or(Decimal::ZERO, |rate| fraction(*rate))
    }

    /// Price the cart as of `date`.
    ///
    /// A cart whose subtotal is zero, such as one holding only zero-priced
    /// products, prices to zeros with no discount applied on any day.
    #[must_use]
    pub fn calculate_cart_total<'a>(&self, cart: &Cart<'a>, date: Date) -> PricingResult<'a> {
        let currency = cart.currency();

        if cart.is_empty() {
            return PricingResult::empty(currency);
        }

        let (subtotal, discounted) = cart.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(subtotal, discounted), item| {
                let line = Decimal::from(item.line_total_minor());
                let rate = self.item_discount_rate(item);

                (subtotal + line, discounted + line * (Decimal::ONE - rate))
            },
        );

        if subtotal <= Decimal::ZERO {
            return PricingResult::empty(currency);
        }

        let mut final_total = discounted;
        let mut rate = (subtotal - discounted) / subtotal;
        let mut applied = if rate > Decimal::ZERO {
            AppliedDiscount::PerItem
        } else {
            AppliedDiscount::None
        };

        if cart.total_quantity() >= self.bulk_threshold {
            let bulk_rate = fraction(self.bulk_rate);
            let bulk_discount = discounted * bulk_rate;
            let item_discount = subtotal - discounted;

            if bulk_discount > item_discount {
                final_total = subtotal * (Decimal::ONE - bulk_rate);
                rate = bulk_rate;
                applied = AppliedDiscount::Bulk;
            }
        }

        let day_rate = fraction(self.day_rate);

        if date.weekday() == self.discount_day && day_rate > rate {
            final_total = subtotal * (Decimal::ONE - day_rate);
            rate = day_rate;
            applied = AppliedDiscount::DayOfWeek;
        }

        PricingResult {
            subtotal: money(subtotal, currency),
            final_total: money(round_minor(final_total), currency),
            discount_rate: Percentage::from(rate),
            bonus_points: self.bonus_points(final_total),
            applied,
        }
    }

    /// Price the cart as of the clock's current date.
    #[must_use]
    pub fn calculate_cart_total_now<'a>(
        &self,
        cart: &Cart<'a>,
        clock: &impl Clock,
    ) -> PricingResult<'a> {
        self.calculate_cart_total(cart, clock.today())
    }

    fn bonus_points(&self, final_total: Decimal) -> u64 {
        if self.points_per_amount == 0 {
            return 0;
        }

        (final_total / Decimal::from(self.points_per_amount))
            .floor()
            .to_u64()
            .unwrap_or(0)
    }
}

/// Price `cart` under the reference policy.
#[must_use]
pub fn calculate_cart_total<'a>(cart: &Cart<'a>, date: Date) -> PricingResult<'a> {
    PricingPolicy::default().calculate_cart_total(cart, date)
}

/// Priced cart summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult<'a> {
    subtotal: Money<'a, Currency>,
    final_total: Money<'a, Currency>,
    discount_rate: Percentage,
    bonus_points: u64,
    applied: AppliedDiscount,
}

impl<'a> PricingResult<'a> {
    /// Result for an empty cart.
    #[must_use]
    pub fn empty(currency: &'static Currency) -> Self {
        Self {
            subtotal: Money::from_minor(0, currency),
            final_total: Money::from_minor(0, currency),
            discount_rate: Percentage::from(Decimal::ZERO),
            bonus_points: 0,
            applied: AppliedDiscount::None,
        }
    }

    /// Sum of price × quantity before any discount
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount payable, rounded to whole minor units
    #[must_use]
    pub fn final_total(&self) -> Money<'a, Currency> {
        self.final_total
    }

    /// Effective discount rate, unrounded
    #[must_use]
    pub fn discount_rate(&self) -> Percentage {
        self.discount_rate
    }

    /// Loyalty points earned
    #[must_use]
    pub fn bonus_points(&self) -> u64 {
        self.bonus_points
    }

    /// Mechanism that produced the final total
    #[must_use]
    pub fn applied(&self) -> AppliedDiscount {
        self.applied
    }

    /// Subtotal minus final total.
    #[must_use]
    pub fn savings(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.subtotal
                .to_minor_units()
                .saturating_sub(self.final_total.to_minor_units()),
            self.subtotal.currency(),
        )
    }
}

fn money(minor: Decimal, currency: &'static Currency) -> Money<'static, Currency> {
    Money::from_minor(minor.to_i64().unwrap_or(i64::MAX), currency)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::iso::KRW;
    use testresult::TestResult;

    use crate::{
        cart::{add_to_cart, change_quantity},
        catalog::Catalog,
        products::Product,
    };

    use super::*;

    const WEDNESDAY: Date = date(2024, 1, 3);
    const TUESDAY: Date = date(2024, 1, 2);

    fn cart_with(lines: &[(&str, i64, u32)]) -> Result<Cart<'static>, Box<dyn std::error::Error>> {
        let products = lines
            .iter()
            .map(|(id, price, _)| Product::new(*id, format!("상품 {id}"), Money::from_minor(*price, KRW), 1_000));
        let mut catalog = Catalog::with_products(products, KRW)?;
        let mut cart = Cart::new(KRW);

        for (id, _, quantity) in lines {
            let id = ProductId::from(*id);

            (catalog, cart) = add_to_cart(&catalog, &cart, &id)?;
            (cart, catalog) = change_quantity(&cart, &catalog, &id, i64::from(*quantity) - 1)?;
        }

        Ok(cart)
    }

    fn rate(value: i64, scale: u32) -> Percentage {
        Percentage::from(Decimal::new(value, scale))
    }

    #[test]
    fn empty_cart_prices_to_zero() {
        let result = calculate_cart_total(&Cart::new(KRW), TUESDAY);

        assert_eq!(result, PricingResult::empty(KRW));
        assert_eq!(result.applied(), AppliedDiscount::None);
    }

    #[test]
    fn small_quantities_get_no_discount() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 2)])?;

        let result = calculate_cart_total(&cart, WEDNESDAY);

        assert_eq!(result.subtotal(), Money::from_minor(20_000, KRW));
        assert_eq!(result.final_total(), Money::from_minor(20_000, KRW));
        assert_eq!(result.discount_rate(), rate(0, 0));
        assert_eq!(result.bonus_points(), 20);
        assert_eq!(result.applied(), AppliedDiscount::None);

        Ok(())
    }

    #[test]
    fn per_item_rate_applies_from_ten_units() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 10)])?;

        let result = calculate_cart_total(&cart, WEDNESDAY);

        assert_eq!(result.final_total(), Money::from_minor(90_000, KRW));
        assert_eq!(result.discount_rate(), rate(10, 2));
        assert_eq!(result.bonus_points(), 90);
        assert_eq!(result.applied(), AppliedDiscount::PerItem);

        Ok(())
    }

    #[test]
    fn unknown_products_have_no_item_rate() -> TestResult {
        let cart = cart_with(&[("p9", 1_000, 12)])?;

        let result = calculate_cart_total(&cart, WEDNESDAY);

        assert_eq!(result.final_total(), Money::from_minor(12_000, KRW));
        assert_eq!(result.applied(), AppliedDiscount::None);

        Ok(())
    }

    #[test]
    fn bulk_rate_wins_when_larger_in_absolute_terms() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 30)])?;

        let result = calculate_cart_total(&cart, WEDNESDAY);

        // item discount 30,000 vs bulk 270,000 * 0.25 = 67,500
        assert_eq!(result.final_total(), Money::from_minor(225_000, KRW));
        assert_eq!(result.discount_rate(), rate(25, 2));
        assert_eq!(result.bonus_points(), 225);
        assert_eq!(result.applied(), AppliedDiscount::Bulk);

        Ok(())
    }

    #[test]
    fn bulk_rate_loses_to_larger_item_discount() -> TestResult {
        let policy = PricingPolicy {
            item_discount_rates: [(ProductId::from("p1"), rate(30, 2))].into_iter().collect(),
            ..PricingPolicy::default()
        };
        let cart = cart_with(&[("p1", 10_000, 30)])?;

        let result = policy.calculate_cart_total(&cart, WEDNESDAY);

        // item discount 90,000 vs bulk 210,000 * 0.25 = 52,500
        assert_eq!(result.final_total(), Money::from_minor(210_000, KRW));
        assert_eq!(result.applied(), AppliedDiscount::PerItem);

        Ok(())
    }

    #[test]
    fn tuesday_rate_applies_when_larger() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 1)])?;

        let result = calculate_cart_total(&cart, TUESDAY);

        assert_eq!(result.final_total(), Money::from_minor(9_000, KRW));
        assert_eq!(result.discount_rate(), rate(10, 2));
        assert_eq!(result.bonus_points(), 9);
        assert_eq!(result.applied(), AppliedDiscount::DayOfWeek);

        Ok(())
    }

    #[test]
    fn tuesday_rate_does_not_replace_larger_discount() -> TestResult {
        let cart = cart_with(&[("p3", 30_000, 10)])?;

        let result = calculate_cart_total(&cart, TUESDAY);

        assert_eq!(result.final_total(), Money::from_minor(240_000, KRW));
        assert_eq!(result.discount_rate(), rate(20, 2));
        assert_eq!(result.applied(), AppliedDiscount::PerItem);

        Ok(())
    }

    #[test]
    fn tuesday_rate_does_not_replace_bulk_rate() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 30)])?;

        let result = calculate_cart_total(&cart, TUESDAY);

        assert_eq!(result.final_total(), Money::from_minor(225_000, KRW));
        assert_eq!(result.discount_rate(), rate(25, 2));
        assert_eq!(result.applied(), AppliedDiscount::Bulk);

        Ok(())
    }

    #[test]
    fn zero_priced_cart_gets_no_discount() -> TestResult {
        let cart = cart_with(&[("p9", 0, 3)])?;

        let result = calculate_cart_total(&cart, TUESDAY);

        assert_eq!(result.final_total(), Money::from_minor(0, KRW));
        assert_eq!(result.discount_rate(), rate(0, 0));
        assert_eq!(result.bonus_points(), 0);
        assert_eq!(result.applied(), AppliedDiscount::None);

        Ok(())
    }

    #[test]
    fn mixed_cart_rate_is_weighted() -> TestResult {
        let cart = cart_with(&[("p1", 10_000, 10), ("p2", 20_000, 5)])?;

        let result = calculate_cart_total(&cart, WEDNESDAY);

        // 200,000 subtotal, 10,000 off p1 only
        assert_eq!(result.final_total(), Money::from_minor(190_000, KRW));
        assert_eq!(result.discount_rate(), rate(5, 2));
        assert_eq!(result.savings(), Money::from_minor(10_000, KRW));

        Ok(())
    }

    #[test]
    fn bonus_points_floor_the_unrounded_total() -> TestResult {
        let policy = PricingPolicy {
            day_rate: rate(1, 4),
            ..PricingPolicy::default()
        };
        let cart = cart_with(&[("p9", 2_000, 1)])?;

        let result = policy.calculate_cart_total(&cart, TUESDAY);

        // 2,000 * 0.9999 = 1,999.8: rounds to 2,000 but earns a single point
        assert_eq!(result.final_total(), Money::from_minor(2_000, KRW));
        assert_eq!(result.bonus_points(), 1);

        Ok(())
    }

    #[test]
    fn zero_points_divisor_earns_nothing() -> TestResult {
        let policy = PricingPolicy {
            points_per_amount: 0,
            ..PricingPolicy::default()
        };
        let cart = cart_with(&[("p1", 10_000, 3)])?;

        assert_eq!(policy.calculate_cart_total(&cart, WEDNESDAY).bonus_points(), 0);

        Ok(())
    }
}
