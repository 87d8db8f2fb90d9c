//! Money arithmetic on `rust_decimal::Decimal`.
//!
//! Amounts are kept exact in major units (e.g. 4.50). Rounding happens only when an
//! amount leaves the system as gateway minor units. Every operation is checked:
//! `None` means the result does not fit in a `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::OrderItem;

/// Decimal places of the store currency.
pub const CURRENCY_SCALE: u32 = 2;

const MINOR_UNITS_PER_MAJOR: i64 = 100;

pub fn line_total(unit_price: Decimal, quantity: u32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

pub fn order_total<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// Convert to integer minor units, rounding half away from zero at cent precision.
///
/// Returns `None` when the result does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?
        .to_i64()
}
