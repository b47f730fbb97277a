//! Validation utilities

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that an amount is not negative
pub fn validate_non_negative_amount(amount: &BigDecimal) -> AccountingResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(AccountingError::Validation(
            "Amount cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an account code is valid
pub fn validate_account_code(code: &str) -> AccountingResult<()> {
    if code.trim().is_empty() {
        return Err(AccountingError::Validation(
            "Account code cannot be empty".to_string(),
        ));
    }

    if code.len() > 20 {
        return Err(AccountingError::Validation(
            "Account code cannot exceed 20 characters".to_string(),
        ));
    }

    // Check for valid characters (alphanumeric, dashes, underscores)
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AccountingError::Validation(
            "Account code can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validate that an account name is valid
pub fn validate_account_name(name: &str) -> AccountingResult<()> {
    if name.trim().is_empty() {
        return Err(AccountingError::Validation(
            "Account name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(AccountingError::Validation(
            "Account name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a financial year name is valid
pub fn validate_year_name(name: &str) -> AccountingResult<()> {
    if name.trim().is_empty() {
        return Err(AccountingError::Validation(
            "Financial year name cannot be empty".to_string(),
        ));
    }

    if name.len() > 50 {
        return Err(AccountingError::Validation(
            "Financial year name cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a caller-supplied entry number is valid
pub fn validate_entry_number(entry_number: &str) -> AccountingResult<()> {
    if entry_number.trim().is_empty() {
        return Err(AccountingError::Validation(
            "Entry number cannot be empty".to_string(),
        ));
    }

    if entry_number.len() > 50 {
        return Err(AccountingError::Validation(
            "Entry number cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_codes_allow_dashed_numbering() {
        assert!(validate_account_code("1000-CASH").is_ok());
        assert!(validate_account_code("").is_err());
        assert!(validate_account_code("10 00").is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(validate_non_negative_amount(&BigDecimal::from(0)).is_ok());
        assert!(validate_non_negative_amount(&BigDecimal::from(-1)).is_err());
    }
}
