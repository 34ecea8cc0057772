//! Commission and release-split math (佣金 / 分期释放)
//!
//! Conservation rule: the rounded parts always re-add to the whole. The
//! commission rounds first and the net is the exact remainder; likewise the
//! immediate tranche rounds first and the locked tranche takes the remainder.

use super::money::{to_decimal, to_f64};
use rust_decimal::Decimal;

/// Gross → commission + net
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionSplit {
    pub gross_amount: f64,
    pub commission: f64,
    pub net_amount: f64,
}

/// Net → immediate + locked tranches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseSplit {
    pub immediate: f64,
    pub locked: f64,
}

/// Deduct the platform commission from a gross amount.
///
/// `rate_percent` is a percentage (15.0 = 15%).
pub fn take_commission(gross: f64, rate_percent: f64) -> CommissionSplit {
    let gross_d = to_decimal(gross);
    let commission = to_f64(gross_d * to_decimal(rate_percent) / Decimal::ONE_HUNDRED);
    let net_amount = to_f64(gross_d - to_decimal(commission));
    CommissionSplit {
        gross_amount: to_f64(gross_d),
        commission,
        net_amount,
    }
}

/// Split a net amount into immediate and locked tranches.
///
/// Odd cents land in the locked tranche.
pub fn release_split(net: f64, immediate_percent: f64) -> ReleaseSplit {
    let net_d = to_decimal(net);
    let immediate = to_f64(net_d * to_decimal(immediate_percent) / Decimal::ONE_HUNDRED);
    let locked = to_f64(net_d - to_decimal(immediate));
    ReleaseSplit { immediate, locked }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::money::money_eq;

    #[test]
    fn test_commission_standard_rate() {
        let split = take_commission(10_000.0, 15.0);
        assert_eq!(split.commission, 1_500.0);
        assert_eq!(split.net_amount, 8_500.0);
    }

    #[test]
    fn test_release_split_80_20() {
        let split = release_split(8_500.0, 80.0);
        assert_eq!(split.immediate, 6_800.0);
        assert_eq!(split.locked, 1_700.0);
    }

    #[test]
    fn test_conservation_with_odd_cents() {
        // 33.33 at 15% → commission 5.00, net 28.33
        let c = take_commission(33.33, 15.0);
        assert_eq!(c.commission, 5.0);
        assert_eq!(c.net_amount, 28.33);
        assert!(money_eq(c.commission + c.net_amount, c.gross_amount));

        // 28.33 at 80% → 22.66 immediate, 5.67 locked; parts re-add exactly
        let r = release_split(c.net_amount, 80.0);
        assert_eq!(r.immediate, 22.66);
        assert_eq!(r.locked, 5.67);
        assert!(money_eq(r.immediate + r.locked, c.net_amount));
    }

    #[test]
    fn test_conservation_sweep() {
        for cents in 1..5_000u32 {
            let gross = cents as f64 / 100.0;
            let c = take_commission(gross, 15.0);
            assert!(money_eq(c.commission + c.net_amount, gross), "gross={gross}");
            let r = release_split(c.net_amount, 80.0);
            assert!(
                money_eq(r.immediate + r.locked, c.net_amount),
                "net={}",
                c.net_amount
            );
        }
    }

    #[test]
    fn test_zero_rate_passthrough() {
        let c = take_commission(100.0, 0.0);
        assert_eq!(c.commission, 0.0);
        assert_eq!(c.net_amount, 100.0);

        let r = release_split(100.0, 100.0);
        assert_eq!(r.immediate, 100.0);
        assert_eq!(r.locked, 0.0);
    }
}
