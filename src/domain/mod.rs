//! Domain primitives for the catalog.
//!
//! Catalog entries are addressed by a short user-visible code. Codes are
//! plain strings in storage; the `AnimeCode` newtype keeps them from being
//! mixed up with titles or other free text.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// User-visible identifier of a catalog entry.
///
/// # Examples
///
/// ```rust
/// use anicat::domain::AnimeCode;
///
/// let code = AnimeCode::new("42");
/// assert_eq!(code.as_str(), "42");
/// assert_eq!(code.with_suffix(1).to_string(), "42_1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimeCode(String);

impl AnimeCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the renamed code `<code>_<n>` used when a foreign entry
    /// collides with a different local work.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{n}", self.0))
    }
}

impl fmt::Display for AnimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AnimeCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for AnimeCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<AnimeCode> for String {
    fn from(code: AnimeCode) -> Self {
        code.0
    }
}

impl AsRef<str> for AnimeCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AnimeCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}
