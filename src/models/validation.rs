//! Field checks shared by the input schemas

use crate::types::VaultError;

/// Upper bound for names, titles, labels and contact fields
pub const MAX_FIELD_LEN: usize = 200;
/// Upper bound for free-text fields such as a biography
pub const MAX_TEXT_LEN: usize = 20_000;
/// Upper bound on beneficiaries, assets, witnesses or photos per record
pub const MAX_ITEMS: usize = 100;

/// Non-empty, bounded text without control characters
pub fn required(field: &str, value: &str, max_len: usize) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        return Err(VaultError::Validation(format!("{} is required", field)));
    }
    bounded(field, value, max_len)
}

/// Bounded text without control characters; may be empty
pub fn bounded(field: &str, value: &str, max_len: usize) -> Result<(), VaultError> {
    if value.chars().count() > max_len {
        return Err(VaultError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    // Newlines and tabs are fine in multi-line fields; anything else is not.
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(VaultError::Validation(format!(
            "{} contains control characters",
            field
        )));
    }
    Ok(())
}

/// Bounded single-line text
pub fn single_line(field: &str, value: &str, max_len: usize) -> Result<(), VaultError> {
    bounded(field, value, max_len)?;
    if value.contains(['\n', '\r']) {
        return Err(VaultError::Validation(format!(
            "{} must be a single line",
            field
        )));
    }
    Ok(())
}

pub fn max_items(field: &str, len: usize) -> Result<(), VaultError> {
    if len > MAX_ITEMS {
        return Err(VaultError::Validation(format!(
            "At most {} {} are allowed",
            MAX_ITEMS, field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_blank() {
        assert!(required("name", "  ", 10).is_err());
        assert!(required("name", "Alice", 10).is_ok());
    }

    #[test]
    fn test_length_is_counted_in_chars() {
        assert!(bounded("name", "ééééé", 5).is_ok());
        assert!(bounded("name", "éééééé", 5).is_err());
    }

    #[test]
    fn test_control_characters() {
        assert!(bounded("bio", "line one\nline two\ttabbed", 100).is_ok());
        assert!(bounded("bio", "bell\u{7}", 100).is_err());
        assert!(single_line("title", "two\nlines", 100).is_err());
    }
}
