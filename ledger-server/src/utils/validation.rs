//! Handler 层输入校验
//!
//! 金额与文本的通用校验，在进入 repository 之前拦截坏输入。

use super::{AppError, AppResult};

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_NOTE_LEN: usize = 500;

/// Maximum allowed monetary amount (1,000,000 currency units)
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Validate an amount is finite, positive and within bounds
pub fn validate_amount(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a required text field (non-empty after trim, length-capped)
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if trimmed.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum length of {max_len}"
        )));
    }
    Ok(())
}

/// Validate an optional text field (length-capped when present)
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum length of {max_len}"
        )));
    }
    Ok(())
}
