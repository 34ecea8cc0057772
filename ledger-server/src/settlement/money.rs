//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use rust_decimal::prelude::*;
use shared::LedgerError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed unit price (KES 1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Compare two monetary values within tolerance
#[inline]
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), LedgerError> {
    if !value.is_finite() {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a unit price: finite, positive, capped
pub fn validate_price(price: f64) -> Result<(), LedgerError> {
    require_finite(price, "price")?;
    if price <= 0.0 {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "price must be positive, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a line quantity: positive, within bounds
pub fn validate_quantity(quantity: i32) -> Result<(), LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(LedgerError::InvalidOrderComposition(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// line_total = price × quantity, rounded once at the line level
pub fn line_total(price: f64, quantity: i32) -> f64 {
    to_f64(to_decimal(price) * Decimal::from(quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        assert_ne!(a + b, 0.3_f64);

        let sum = to_decimal(a) + to_decimal(b);
        assert_eq!(to_f64(sum), 0.3);
    }

    #[test]
    fn test_to_f64_rounds_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(12345, 3)), 12.35); // 12.345
        assert_eq!(to_f64(Decimal::new(12344, 3)), 12.34); // 12.344
    }

    #[test]
    fn test_money_eq_tolerance() {
        assert!(money_eq(10.001, 10.002));
        assert!(!money_eq(10.00, 10.01));
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(19.99, 3), 59.97);
        // Rounds once at the line, not per unit
        assert_eq!(line_total(0.333, 3), 1.0);
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(100.0).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
        assert!(validate_price(MAX_PRICE + 1.0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
