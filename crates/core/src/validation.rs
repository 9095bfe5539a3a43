//! Input parsing for values that arrive as loosely formatted text.

use crate::error::{ImageError, ImageResult};

/// Parses a label list as supplied by a caller.
///
/// Two forms are accepted:
/// - a JSON array of strings, e.g. `["beach", "summer"]`
/// - a comma-delimited string, e.g. `beach, summer` (entries are trimmed)
///
/// Text that opens like a JSON array or object must be an array of strings. Blank entries are
/// passed through; dropping them is [`crate::ImageRecord`]'s job.
///
/// # Errors
///
/// Returns [`ImageError::InvalidLabels`] for JSON that is not an array of strings.
pub fn parse_labels(raw: &str) -> ImageResult<Vec<String>> {
    let trimmed = raw.trim();

    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| {
            ImageError::InvalidLabels(format!("expected an array of strings: {}", e))
        });
    }

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    Ok(trimmed.split(',').map(|label| label.trim().to_owned()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array() {
        assert_eq!(
            parse_labels(r#"["beach", "summer"]"#).unwrap(),
            ["beach", "summer"]
        );
    }

    #[test]
    fn test_json_array_keeps_blank_entries() {
        assert_eq!(parse_labels(r#"["a", " ", ""]"#).unwrap(), ["a", " ", ""]);
    }

    #[test]
    fn test_comma_delimited() {
        assert_eq!(
            parse_labels("beach, summer ,holiday").unwrap(),
            ["beach", "summer", "holiday"]
        );
        assert_eq!(parse_labels("single").unwrap(), ["single"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_labels("").unwrap().is_empty());
        assert!(parse_labels("   ").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_string_json() {
        for raw in [r#"[1, 2]"#, r#"{"a": "b"}"#, r#"["a", null]"#, "[unclosed"] {
            assert!(
                matches!(parse_labels(raw), Err(ImageError::InvalidLabels(_))),
                "accepted {}",
                raw
            );
        }
    }
}
