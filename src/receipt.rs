//! Receipt
//!
//! Plain-text rendering of a priced cart.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    discounts::{fraction, percent_points},
    pricing::{AppliedDiscount, PricingPolicy, PricingResult},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Output could not be written.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// One printed cart line.
#[derive(Debug, Clone)]
struct ReceiptLine<'a> {
    name: String,
    quantity: u32,
    unit_price: Money<'a, Currency>,
    line_total: Money<'a, Currency>,
    item_rate: Decimal,
}

/// Receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 8]>,
    pricing: PricingResult<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from the cart and the result of pricing it under
    /// `policy`.
    #[must_use]
    pub fn new(cart: &Cart<'a>, policy: &PricingPolicy, pricing: PricingResult<'a>) -> Self {
        let lines = cart
            .iter()
            .map(|item| ReceiptLine {
                name: item.name().to_string(),
                quantity: item.quantity(),
                unit_price: *item.price(),
                line_total: item.line_total(),
                item_rate: policy.item_discount_rate(item),
            })
            .collect();

        Self { lines, pricing }
    }

    /// Pricing the receipt was built from
    #[must_use]
    pub fn pricing(&self) -> &PricingResult<'a> {
        &self.pricing
    }

    /// Writes the receipt table and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["#", "상품", "수량", "단가", "금액", "상품 할인"]);

        for (idx, line) in self.lines.iter().enumerate() {
            let item_discount = if line.item_rate.is_zero() {
                String::new()
            } else {
                format!("{}%", (line.item_rate * Decimal::ONE_HUNDRED).normalize())
            };

            builder.push_record([
                (idx + 1).to_string(),
                line.name.clone(),
                line.quantity.to_string(),
                line.unit_price.to_string(),
                line.line_total.to_string(),
                item_discount,
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let pricing = &self.pricing;

        let rows = [
            ("소계:", pricing.subtotal().to_string()),
            (
                "할인:",
                format!(
                    "({}%) -{} {}",
                    percent_points(pricing.discount_rate()).round_dp(2),
                    pricing.savings(),
                    applied_label(pricing.applied()),
                ),
            ),
            ("합계:", pricing.final_total().to_string()),
            ("포인트:", pricing.bonus_points().to_string()),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:>label_width$}  {value}")?;
        }

        writeln!(out, " {}", cart_total_summary(pricing))?;

        Ok(())
    }
}

fn applied_label(applied: AppliedDiscount) -> &'static str {
    match applied {
        AppliedDiscount::None => "",
        AppliedDiscount::PerItem => "[상품]",
        AppliedDiscount::Bulk => "[대량]",
        AppliedDiscount::DayOfWeek => "[요일]",
    }
}

/// Cart total line, e.g. `총액: 90000원 (10.0% 할인 적용) (포인트: 90)`.
///
/// The rate is left out when no discount applies.
#[must_use]
pub fn cart_total_summary(pricing: &PricingResult<'_>) -> String {
    let rate = fraction(pricing.discount_rate());
    let total = pricing.final_total().to_minor_units();
    let points = pricing.bonus_points();

    if rate > Decimal::ZERO {
        let percent = (rate * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

        format!("총액: {total}원 ({percent:.1}% 할인 적용) (포인트: {points})")
    } else {
        format!("총액: {total}원 (포인트: {points})")
    }
}
