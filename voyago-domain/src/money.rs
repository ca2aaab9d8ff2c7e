use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fraction of the original price returned on cancellation.
pub const REFUND_RATE: Decimal = dec!(0.80);

/// Credit granted to every account at registration.
pub const SIGNUP_CREDIT: Decimal = dec!(100.00);

/// Refund owed for a booking of the given price, rounded to cents.
///
/// Computed once, at cancellation time. Later price changes on the
/// underlying ticket or tour do not affect an already-settled refund.
pub fn refund_for(price: Decimal) -> Decimal {
    (price * REFUND_RATE).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refund_is_eighty_percent() {
        assert_eq!(refund_for(dec!(80.00)), dec!(64.00));
        assert_eq!(refund_for(dec!(100.00)), dec!(80.00));
    }

    #[test]
    fn refund_rounds_to_cents() {
        // 0.8 * 12.99 = 10.392
        assert_eq!(refund_for(dec!(12.99)), dec!(10.39));
        assert_eq!(refund_for(dec!(0.01)), dec!(0.01));
    }
}
