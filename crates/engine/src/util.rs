//! Internal helpers for input normalisation and conversion.
//!
//! These utilities are **not** part of the public API.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trims and NFC-normalises `value`, rejecting blank input.
pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(normalized)
}

/// Trims and NFC-normalises `value`; blank input becomes `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.nfc().collect())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_is_trimmed_and_composed() {
        // "e" + combining acute accent composes to a single code point.
        let value = normalize_required_text("  Cafe\u{301} ", "title").unwrap();
        assert_eq!(value, "Caf\u{e9}");
        assert!(normalize_required_text("   ", "title").is_err());
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some(" note ")), Some("note".to_string()));
    }

    #[test]
    fn parse_uuid_labels_failures() {
        let err = parse_uuid("nope", "expense").unwrap_err();
        assert_eq!(err, EngineError::InvalidId("invalid expense id".to_string()));
    }
}
