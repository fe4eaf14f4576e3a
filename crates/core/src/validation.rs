//! Field validators shared by request DTOs.
//!
//! Plug these into `#[validate(custom(function = "..."))]`. Each returns a
//! [`ValidationError`] carrying a message suitable for the response body.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Rejects empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Must not be empty"));
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("range", "Must be greater than or equal to 0"));
    }
    Ok(())
}

pub fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if value <= &Decimal::ZERO {
        return Err(error("range", "Must be greater than 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("Rent").is_ok());
    }

    #[test]
    fn zero_is_non_negative_but_not_positive() {
        assert!(non_negative(&dec!(0)).is_ok());
        assert!(positive(&dec!(0)).is_err());
    }

    #[test]
    fn negative_amounts_fail_both() {
        assert!(non_negative(&dec!(-0.01)).is_err());
        assert!(positive(&dec!(-3)).is_err());
        assert!(positive(&dec!(0.01)).is_ok());
    }
}
