use crate::domain::AnimeCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: AnimeCode,
    pub title: String,
    #[serde(flatten)]
    pub details: EntryDetails,
}

/// Descriptive attributes carried along with an entry. None of them take
/// part in duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetails {
    pub country: Option<String>,
    pub language: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
}

impl CatalogEntry {
    pub fn new(code: impl Into<AnimeCode>, title: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            details: EntryDetails::default(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: EntryDetails) -> Self {
        self.details = details;
        self
    }

    /// Same entry stored under a different code.
    #[must_use]
    pub fn recoded(&self, code: AnimeCode) -> Self {
        Self {
            code,
            title: self.title.clone(),
            details: self.details.clone(),
        }
    }
}
