//! Pricing engine for cart and order totals.
//!
//! Discounts and platform commission are percentage based and truncate
//! toward zero (floor), never round. The commission is taken from the
//! already-discounted price, with its own independent truncation.

use rust_decimal::Decimal;

/// Unit price after applying the product discount.
///
/// `discounted = price - floor(price * discount / 100)`. A discount of 0
/// falls out of the same formula (floor(0) = 0), so no special case exists.
pub fn discounted_unit_price(price: Decimal, discount_percent: i32) -> Decimal {
    price - (price * Decimal::from(discount_percent) / Decimal::ONE_HUNDRED).floor()
}

/// Unit price credited to the seller, net of platform commission.
pub fn seller_net_unit_price(
    price: Decimal,
    discount_percent: i32,
    commission_percent: u32,
) -> Decimal {
    let discounted = discounted_unit_price(price, discount_percent);
    discounted - (discounted * Decimal::from(commission_percent) / Decimal::ONE_HUNDRED).floor()
}

/// Flat shipping fee: per-seller fee times the number of distinct sellers.
pub fn shipping_fee(fee_per_seller: u32, distinct_sellers: usize) -> Decimal {
    Decimal::from(fee_per_seller) * Decimal::from(distinct_sellers as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn worked_scenario() {
        // price 100, discount 10%, commission 5%
        assert_eq!(discounted_unit_price(dec!(100), 10), dec!(90));
        assert_eq!(seller_net_unit_price(dec!(100), 10, 5), dec!(86));
        // two units for one seller plus one flat shipping fee
        assert_eq!(seller_net_unit_price(dec!(100), 10, 5) * dec!(2), dec!(172));
        assert_eq!(
            discounted_unit_price(dec!(100), 10) * dec!(2) + shipping_fee(20, 1),
            dec!(200)
        );
    }

    #[test]
    fn truncation_is_floor_not_round() {
        // 99 * 10% = 9.9, floored to 9
        assert_eq!(discounted_unit_price(dec!(99), 10), dec!(90));
        // 90 * 5% = 4.5, floored to 4
        assert_eq!(seller_net_unit_price(dec!(99), 10, 5), dec!(86));
    }

    #[test]
    fn zero_discount_is_identity() {
        for price in [dec!(0), dec!(1), dec!(19.99), dec!(123456)] {
            assert_eq!(discounted_unit_price(price, 0), price);
        }
    }

    #[test]
    fn shipping_fee_scales_with_seller_count() {
        assert_eq!(shipping_fee(20, 0), dec!(0));
        assert_eq!(shipping_fee(20, 3), dec!(60));
    }

    proptest! {
        #[test]
        fn discount_never_increases_price(price in 0i64..1_000_000, discount in 0i32..=100) {
            let price = Decimal::from(price);
            let discounted = discounted_unit_price(price, discount);
            prop_assert!(discounted <= price);
            prop_assert!(discounted >= Decimal::ZERO);
        }

        #[test]
        fn net_price_never_exceeds_discounted(
            price in 0i64..1_000_000,
            discount in 0i32..=100,
            commission in 0u32..=100,
        ) {
            let price = Decimal::from(price);
            let discounted = discounted_unit_price(price, discount);
            let net = seller_net_unit_price(price, discount, commission);
            prop_assert!(net <= discounted);
            prop_assert!(net >= Decimal::ZERO);
        }

        #[test]
        fn zero_discount_matches_general_formula(price in 0i64..1_000_000) {
            let price = Decimal::from(price);
            prop_assert_eq!(discounted_unit_price(price, 0), price);
        }
    }
}
