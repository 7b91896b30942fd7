//! Sizing of deliberately non-executable probe orders.
//!
//! A probe order asks for more than twice the free balance and is priced
//! above the last trade, so the exchange accepts it into the book but can
//! never fill it.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default markup over the last price, 5%.
pub const DEFAULT_PRICE_MARKUP: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

fn round_whole(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Quantity that always exceeds the free balance: `round(2 * free) + 1`.
pub fn probe_quantity(free: Decimal) -> Decimal {
    round_whole(free * Decimal::TWO) + Decimal::ONE
}

/// Ask price strictly above `last`: `round(last * (1 + markup))`.
///
/// For small prices the rounded markup can land back on `last` (e.g.
/// `round(1 * 1.05) == 1`), so the result is never below `floor(last) + 1`.
pub fn probe_ask_price(last: Decimal, markup: Decimal) -> Decimal {
    let marked_up = round_whole(last + last * markup);
    let floor_above = last.floor() + Decimal::ONE;
    marked_up.max(floor_above).normalize()
}
