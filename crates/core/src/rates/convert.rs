//! Conversion of entry-currency amounts into the tenant base currency.

use rust_decimal::{Decimal, RoundingStrategy};

/// Converts an entry-currency amount to the base currency.
///
/// Multiplies by the resolved rate and rounds to `scale` decimal places
/// using banker's rounding, so repeated conversions do not drift in one
/// direction.
#[must_use]
pub fn to_base(amount: Decimal, rate: Decimal, scale: u32) -> Decimal {
    (amount * rate).round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_at_resolved_rate() {
        assert_eq!(to_base(dec!(100.00), dec!(0.92), 4), dec!(92.0000));
    }

    #[test]
    fn identity_rate_preserves_amount() {
        assert_eq!(to_base(dec!(1234.56), dec!(1), 4), dec!(1234.5600));
    }

    #[test]
    fn rounds_half_to_even() {
        // 0.00005 at scale 4 sits exactly on the midpoint.
        assert_eq!(to_base(dec!(0.0001), dec!(0.5), 4), dec!(0.0000));
        assert_eq!(to_base(dec!(0.0003), dec!(0.5), 4), dec!(0.0002));
        // Non-midpoint values round normally.
        assert_eq!(to_base(dec!(0.0003), dec!(0.51), 4), dec!(0.0002));
    }

    #[test]
    fn large_amounts_do_not_lose_precision() {
        assert_eq!(
            to_base(dec!(1_000_000_000.00), dec!(1.0837), 4),
            dec!(1_083_700_000.0000)
        );
    }
}
