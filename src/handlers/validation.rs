// src/handlers/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// A negative zero (e.g. `-0.00` from a client) is still zero.
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}
