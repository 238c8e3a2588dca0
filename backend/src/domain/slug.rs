//! Page slugs.
//!
//! Slugs are trimmed, non-empty path segments composed of lowercase ASCII
//! letters, digits, and hyphens. They are unique per tenant, not globally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted slug length in characters.
pub const SLUG_MAX: usize = 100;

/// Validation failures for [`Slug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug must be at most {max} characters")]
    TooLong { max: usize },
    #[error("slug may only contain lowercase letters, digits, or hyphens")]
    InvalidCharacters,
}

/// Return `true` when `value` only uses slug characters.
pub(crate) fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

/// URL path segment addressing a page within its tenant site.
///
/// # Examples
/// ```
/// use lejio::domain::Slug;
///
/// assert!(Slug::new("om-os").is_ok());
/// assert!(Slug::new("Om Os").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug. Surrounding whitespace is ignored.
    pub fn new(value: impl Into<String>) -> Result<Self, SlugValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if trimmed.chars().count() > SLUG_MAX {
            return Err(SlugValidationError::TooLong { max: SLUG_MAX });
        }
        if !has_allowed_slug_chars(trimmed) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
