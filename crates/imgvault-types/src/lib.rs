//! Validated text primitives shared across imgvault crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// Every entry of a text list was blank
    #[error("List must contain at least one non-blank entry")]
    NoEntries,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction and must
/// contain at least one character afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// An ordered list of labels with blank entries removed.
///
/// Entries are kept exactly as supplied (no trimming of the survivors); an entry is dropped
/// only when it is empty or whitespace. At least one entry must survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels(Vec<String>);

impl Labels {
    /// Filters out blank entries, preserving order.
    ///
    /// Returns `Err(TextError::NoEntries)` when nothing is left.
    pub fn new<I, S>(entries: I) -> Result<Self, TextError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let kept: Vec<String> = entries
            .into_iter()
            .map(Into::into)
            .filter(|label| !label.trim().is_empty())
            .collect();

        if kept.is_empty() {
            return Err(TextError::NoEntries);
        }
        Ok(Self(kept))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims() {
        let text = NonEmptyText::new("  sunset over the bay \n").unwrap();
        assert_eq!(text.as_str(), "sunset over the bay");
    }

    #[test]
    fn test_non_empty_text_rejects_blank() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(" \t\n"), Err(TextError::Empty));
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"   \"");
        assert!(result.is_err());
    }

    #[test]
    fn test_labels_filters_blank_entries_in_order() {
        let labels = Labels::new(["beach", " ", "", "sunset", "\t"]).unwrap();
        assert_eq!(labels.as_slice(), ["beach", "sunset"]);
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_labels_keeps_survivors_verbatim() {
        let labels = Labels::new([" padded "]).unwrap();
        assert_eq!(labels.as_slice(), [" padded "]);
    }

    #[test]
    fn test_labels_rejects_all_blank() {
        assert_eq!(Labels::new(["", "  "]), Err(TextError::NoEntries));
        assert_eq!(Labels::new(Vec::<String>::new()), Err(TextError::NoEntries));
    }
}
