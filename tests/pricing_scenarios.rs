//! Integration tests for cart pricing against the reference catalog.
//!
//! Scenarios, all priced on a Wednesday unless noted:
//!
//! 1. 상품1 × 1 on a Tuesday: 10,000 -> 9,000 (10% day rate), 9 points
//! 2. 상품1 × 10: per-item 10%, 100,000 -> 90,000, 90 points
//! 3. 상품1 × 10 + 상품2 × 5: only 상품1 qualifies, 200,000 -> 190,000 (5.0%)
//! 4. 상품1 × 30: bulk 25% beats the 30,000 item discount, 300,000 -> 225,000
//! 5. 상품5 × 10 on a Tuesday: per-item 25% beats the 10% day rate
//! 6. 상품1 × 30 on a Tuesday: bulk 25% stays ahead of the 10% day rate

use jiff::civil::{Date, date};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::KRW};
use testresult::TestResult;

use checkout::{
    cart::Cart,
    discounts::fraction,
    fixtures::reference_catalog,
    pricing::{AppliedDiscount, PricingPolicy, calculate_cart_total},
    products::ProductId,
    receipt::cart_total_summary,
    state::{AppState, Intent},
};

const TUESDAY: Date = date(2024, 1, 2);
const WEDNESDAY: Date = date(2024, 1, 3);

fn state_with(lines: &[(&str, i64)]) -> Result<AppState<'static>, Box<dyn std::error::Error>> {
    let policy = PricingPolicy::default();
    let mut state = AppState::new(reference_catalog()?);

    for (id, quantity) in lines {
        let id = ProductId::from(*id);

        state = state.apply(&Intent::AddToCart(id.clone()), &policy, WEDNESDAY)?;
        state = state.apply(&Intent::ChangeQuantity(id, quantity - 1), &policy, WEDNESDAY)?;
    }

    Ok(state)
}

fn cart_with(lines: &[(&str, i64)]) -> Result<Cart<'static>, Box<dyn std::error::Error>> {
    Ok(state_with(lines)?.cart().clone())
}

#[test]
fn single_item_on_tuesday_gets_day_rate() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p1", 1)])?, TUESDAY);

    assert_eq!(result.final_total(), Money::from_minor(9_000, KRW));
    assert_eq!(result.bonus_points(), 9);
    assert_eq!(result.applied(), AppliedDiscount::DayOfWeek);

    Ok(())
}

#[test]
fn ten_units_get_per_item_rate() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p1", 10)])?, WEDNESDAY);

    assert_eq!(result.final_total(), Money::from_minor(90_000, KRW));
    assert_eq!(result.bonus_points(), 90);
    assert_eq!(
        cart_total_summary(&result),
        "총액: 90000원 (10.0% 할인 적용) (포인트: 90)"
    );

    Ok(())
}

#[test]
fn mixed_cart_reports_weighted_rate() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p1", 10), ("p2", 5)])?, WEDNESDAY);

    assert_eq!(result.subtotal(), Money::from_minor(200_000, KRW));
    assert_eq!(result.final_total(), Money::from_minor(190_000, KRW));
    assert_eq!(fraction(result.discount_rate()), Decimal::new(5, 2));
    assert_eq!(
        cart_total_summary(&result),
        "총액: 190000원 (5.0% 할인 적용) (포인트: 190)"
    );

    Ok(())
}

#[test]
fn thirty_units_get_bulk_rate() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p1", 30)])?, WEDNESDAY);

    assert_eq!(result.final_total(), Money::from_minor(225_000, KRW));
    assert_eq!(fraction(result.discount_rate()), Decimal::new(25, 2));
    assert_eq!(result.applied(), AppliedDiscount::Bulk);

    Ok(())
}

#[test]
fn larger_item_rate_survives_tuesday() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p5", 10)])?, TUESDAY);

    assert_eq!(result.final_total(), Money::from_minor(187_500, KRW));
    assert_eq!(result.applied(), AppliedDiscount::PerItem);

    Ok(())
}

#[test]
fn bulk_rate_survives_tuesday() -> TestResult {
    let result = calculate_cart_total(&cart_with(&[("p1", 30)])?, TUESDAY);

    assert_eq!(result.final_total(), Money::from_minor(225_000, KRW));
    assert_eq!(fraction(result.discount_rate()), Decimal::new(25, 2));
    assert_eq!(result.applied(), AppliedDiscount::Bulk);

    Ok(())
}

#[test]
fn pricing_properties_hold_across_carts() -> TestResult {
    let carts = [
        vec![("p1", 1)],
        vec![("p2", 9), ("p3", 10)],
        vec![("p1", 12), ("p2", 12), ("p3", 12)],
        vec![("p5", 10), ("p3", 20)],
        vec![("p1", 50)],
    ];

    for lines in &carts {
        let cart = cart_with(lines)?;

        for day in [TUESDAY, WEDNESDAY] {
            let result = calculate_cart_total(&cart, day);
            let rate = fraction(result.discount_rate());

            assert!(
                result.final_total().to_minor_units() <= result.subtotal().to_minor_units(),
                "final total exceeds subtotal for {lines:?}"
            );
            assert!(
                rate >= Decimal::ZERO && rate <= Decimal::ONE,
                "rate {rate} out of range for {lines:?}"
            );
            assert_eq!(
                result.bonus_points(),
                u64::try_from(result.final_total().to_minor_units())? / 1_000,
                "points are not floor(total / 1000) for {lines:?}"
            );
        }
    }

    Ok(())
}

#[test]
fn state_points_track_latest_pricing() -> TestResult {
    let state = state_with(&[("p1", 10)])?;

    assert_eq!(state.bonus_points(), 90);
    assert_eq!(
        state.pricing(&PricingPolicy::default(), WEDNESDAY).final_total(),
        Money::from_minor(90_000, KRW)
    );

    Ok(())
}
