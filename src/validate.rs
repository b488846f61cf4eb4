//! Required-argument validation
//!
//! Every service operation validates its identifiers before issuing any
//! HTTP request; failures surface as [`Error::Validation`].

use crate::error::{Error, Result};

/// Reject an empty or whitespace-only identifier.
pub fn not_empty<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{name} must not be empty")));
    }
    Ok(value)
}

/// Reject a missing or empty optional field.
pub fn not_empty_opt<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    match value {
        Some(v) => not_empty(v, name),
        None => Err(Error::validation(format!("{name} must be present"))),
    }
}

/// Reject an empty slice.
pub fn non_empty_slice<'a, T>(values: &'a [T], name: &str) -> Result<&'a [T]> {
    if values.is_empty() {
        return Err(Error::validation(format!("{name} must not be empty")));
    }
    Ok(values)
}
