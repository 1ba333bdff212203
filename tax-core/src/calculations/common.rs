//! Rounding and percentage helpers shared by the tax calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero. The result always
/// carries a scale of two, so `10` is returned as `10.00`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(10)).to_string(), "10.00");
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Returns `percent` percent of `amount`, unrounded, or `None` when the
/// product does not fit in a [`Decimal`].
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(1000), dec!(1)), Some(dec!(10)));
/// assert_eq!(percent_of(Decimal::MAX, dec!(50)), None);
/// ```
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Option<Decimal> {
    amount
        .checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_pads_to_two_digits() {
        assert_eq!(round_half_up(dec!(2700)).to_string(), "2700.00");
        assert_eq!(round_half_up(dec!(0.5)).to_string(), "0.50");
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // percent_of tests
    // =========================================================================

    #[test]
    fn percent_of_whole_percent() {
        assert_eq!(percent_of(dec!(500), dec!(20)), Some(dec!(100)));
    }

    #[test]
    fn percent_of_fractional_percent() {
        assert_eq!(percent_of(dec!(1234.56), dec!(2.5)), Some(dec!(30.864)));
    }

    #[test]
    fn percent_of_zero_amount_is_zero() {
        assert_eq!(percent_of(Decimal::ZERO, dec!(20)), Some(Decimal::ZERO));
    }

    #[test]
    fn percent_of_overflowing_product_is_none() {
        assert_eq!(percent_of(Decimal::MAX, dec!(50)), None);
    }

    #[test]
    fn percent_of_maximum_amount_at_one_percent() {
        assert_eq!(
            percent_of(Decimal::MAX, Decimal::ONE),
            Some(Decimal::MAX / Decimal::ONE_HUNDRED)
        );
    }
}
