//! Error types for input validation and catalog loading.
//!
//! Domain findings are never errors: they are reported as `Violation`s.
//! The types here cover contract violations on the inputs themselves
//! (inverted depths, non-finite numbers) and catalog I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected input: a record that cannot be evaluated meaningfully.
///
/// Raised when constructing or deserializing input types, before any check runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("{context}: identifier must not be empty")]
    EmptyIdentifier { context: String },

    #[error("{context}: {field} must be a finite number (got {value})")]
    NonFinite {
        context: String,
        field: &'static str,
        value: f64,
    },

    #[error("{context}: {field} must be > 0 (got {value})")]
    NotPositive {
        context: String,
        field: &'static str,
        value: f64,
    },

    #[error("{context}: {field} cannot be negative (got {value})")]
    Negative {
        context: String,
        field: &'static str,
        value: f64,
    },

    #[error("{context}: top depth {top} ft is deeper than bottom depth {bottom} ft")]
    InvertedDepths {
        context: String,
        top: f64,
        bottom: f64,
    },
}

/// Equipment catalog loading failure.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog entry '{id}': {source}")]
    InvalidEntry {
        id: String,
        #[source]
        source: InputError,
    },

    #[error("Duplicate equipment id in catalog: {0}")]
    DuplicateId(String),
}

// ============================================================================
// Field checks shared by the input types
// ============================================================================

pub(crate) fn ensure_identifier(context: &str, id: &str) -> Result<(), InputError> {
    if id.trim().is_empty() {
        return Err(InputError::EmptyIdentifier {
            context: context.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(context: &str, field: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite {
            context: context.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn ensure_positive(context: &str, field: &'static str, value: f64) -> Result<(), InputError> {
    ensure_finite(context, field, value)?;
    if value <= 0.0 {
        return Err(InputError::NotPositive {
            context: context.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn ensure_non_negative(
    context: &str,
    field: &'static str,
    value: f64,
) -> Result<(), InputError> {
    ensure_finite(context, field, value)?;
    if value < 0.0 {
        return Err(InputError::Negative {
            context: context.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

pub(crate) fn ensure_ordered(context: &str, top: f64, bottom: f64) -> Result<(), InputError> {
    ensure_finite(context, "top depth", top)?;
    ensure_finite(context, "bottom depth", bottom)?;
    if top > bottom {
        return Err(InputError::InvertedDepths {
            context: context.to_string(),
            top,
            bottom,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_accepts_equal_depths() {
        assert!(ensure_ordered("plug", 1000.0, 1000.0).is_ok());
    }

    #[test]
    fn test_ordered_rejects_inverted() {
        let err = ensure_ordered("plug", 2000.0, 1000.0).unwrap_err();
        assert!(matches!(err, InputError::InvertedDepths { .. }));
        assert!(err.to_string().contains("plug"));
    }

    #[test]
    fn test_positive_rejects_nan_as_non_finite() {
        let err = ensure_positive("tool", "od", f64::NAN).unwrap_err();
        assert!(matches!(err, InputError::NonFinite { field: "od", .. }));
    }

    #[test]
    fn test_non_negative_allows_zero() {
        assert!(ensure_non_negative("tool", "weight", 0.0).is_ok());
        assert!(ensure_non_negative("tool", "weight", -1.0).is_err());
    }

    #[test]
    fn test_blank_identifier_rejected() {
        assert!(ensure_identifier("barrier", "   ").is_err());
        assert!(ensure_identifier("barrier", "P-1").is_ok());
    }
}
