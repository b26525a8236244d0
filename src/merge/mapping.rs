use crate::domain::AnimeCode;
use std::collections::BTreeMap;
use tracing::warn;

/// Foreign code to local code, for one merge only.
///
/// Holds identity rows for duplicates too, so a missing row always means the
/// entry never made it into the local catalog.
#[derive(Debug, Clone, Default)]
pub struct CodeMapping {
    codes: BTreeMap<AnimeCode, AnimeCode>,
}

impl CodeMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins if `old` was already recorded.
    pub fn record(&mut self, old: AnimeCode, new: AnimeCode) {
        if let Some(previous) = self.codes.get(&old)
            && *previous != new
        {
            warn!(
                "Code mapping for {} replaced: {} -> {}",
                old, previous, new
            );
        }
        self.codes.insert(old, new);
    }

    #[must_use]
    pub fn lookup(&self, old: &str) -> Option<&AnimeCode> {
        self.codes.get(old)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
