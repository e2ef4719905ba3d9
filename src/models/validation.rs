use bigdecimal::BigDecimal;
use thiserror::Error;

use super::Project;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} may not be blank")]
    Blank { field: &'static str },

    #[error("{field} has {actual} characters (at most {max} allowed)")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{field} has more than {max} digits in total")]
    MaxDigits { field: &'static str, max: u64 },

    #[error("{field} has more than {max} decimal places")]
    MaxDecimalPlaces { field: &'static str, max: u64 },

    #[error("{field} has more than {max} digits before the decimal point")]
    MaxWholeDigits { field: &'static str, max: u64 },
}

/// Every constraint a record violates, in field order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid project: {}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Project {
    /// Checks field lengths and budget precision. Dates are not compared.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        errors.extend(check_text("name", &self.name, Self::NAME_MAX_LENGTH));
        errors.extend(check_text("sector", &self.sector, Self::SECTOR_MAX_LENGTH));
        errors.extend(check_decimal(
            "budget",
            &self.budget,
            Self::BUDGET_MAX_DIGITS,
            Self::BUDGET_DECIMAL_PLACES,
        ));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Option<ValidationError> {
    if value.is_empty() {
        return Some(ValidationError::Blank { field });
    }

    // Lengths are counted in characters, not bytes.
    let actual = value.chars().count();
    (actual > max).then_some(ValidationError::TooLong { field, max, actual })
}

/// Returns `(digits, decimals)` of the exact decimal representation.
/// Trailing zeros count, so `1.500` has three decimal places.
fn precision(value: &BigDecimal) -> (u64, u64) {
    let (unscaled, scale) = value.as_bigint_and_exponent();
    let significant = unscaled.to_string().trim_start_matches('-').len() as u64;

    if scale <= 0 {
        (significant + scale.unsigned_abs(), 0)
    } else if scale.unsigned_abs() > significant {
        (scale.unsigned_abs(), scale.unsigned_abs())
    } else {
        (significant, scale.unsigned_abs())
    }
}

fn check_decimal(
    field: &'static str,
    value: &BigDecimal,
    max_digits: u64,
    decimal_places: u64,
) -> Option<ValidationError> {
    let (digits, decimals) = precision(value);
    let whole_digits = digits - decimals;
    let max_whole_digits = max_digits - decimal_places;

    if digits > max_digits {
        Some(ValidationError::MaxDigits { field, max: max_digits })
    } else if decimals > decimal_places {
        Some(ValidationError::MaxDecimalPlaces { field, max: decimal_places })
    } else if whole_digits > max_whole_digits {
        Some(ValidationError::MaxWholeDigits { field, max: max_whole_digits })
    } else {
        None
    }
}
