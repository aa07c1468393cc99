//! Validated primitive types shared by the patient records crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text had no characters at all
    #[error("must not be empty")]
    Empty,
}

/// A string type that guarantees at least one character.
///
/// Whitespace counts as content, and the accepted text is kept exactly as supplied so that
/// a stored value reads back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is the empty string.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let text = input.into();
        if text.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(text))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
