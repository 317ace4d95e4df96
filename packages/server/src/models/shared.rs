use std::collections::HashSet;

use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Trim a required text field, rejecting blank input.
pub fn required(value: &str, label: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{label} is required")));
    }
    Ok(value.to_string())
}

/// Trim an optional text field. Blank strings become `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

/// Enforce a maximum length in Unicode characters.
pub fn validate_max_len(value: &str, max: usize, label: &str) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{label} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Minimal email shape check: something on both sides of a single `@`.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            validate_max_len(email, 254, "Email")
        }
        _ => Err(AppError::Validation("Email address is invalid".into())),
    }
}

/// Reject duplicate IDs in a reorder list. Completeness is checked against
/// the stored rows by the caller.
pub fn validate_reorder_ids(ids: &[i32], name: &str) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for &id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "Duplicate {name} {id} in reorder list"
            )));
        }
    }
    Ok(())
}
