//! Size label type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Size`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The input string is empty or only whitespace.
    #[error("size cannot be empty")]
    Empty,
}

/// A product size label, such as `S`, `M`, or `XL`.
///
/// Sizes identify cart line items, so two sizes are equal only when their
/// labels match exactly. Labels are kept as the product endpoint sends them.
///
/// ## Examples
///
/// ```
/// use tee_storefront_core::Size;
///
/// assert_eq!(Size::parse("M").unwrap().as_str(), "M");
/// assert!(Size::parse("").is_err());
/// assert!(Size::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Size(String);

impl Size {
    /// Parse a `Size` from a string.
    ///
    /// # Errors
    ///
    /// Returns `SizeError::Empty` if the input is empty or only whitespace.
    pub fn parse(s: &str) -> Result<Self, SizeError> {
        if s.trim().is_empty() {
            return Err(SizeError::Empty);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the size label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Size` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Size {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Size {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
