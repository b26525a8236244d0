use crate::domain::AnimeCode;
use crate::models::anime::CatalogEntry;
use serde::Serialize;
use std::collections::HashMap;

/// Read view of the local catalog used to settle code collisions.
pub trait LocalLookup {
    fn title_of(&self, code: &str) -> Option<&str>;
}

impl LocalLookup for HashMap<AnimeCode, String> {
    fn title_of(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Insert,
    Skip,
    InsertRenamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Code is free locally.
    Insert(AnimeCode),
    /// The work is already present under this code.
    Duplicate(AnimeCode),
    /// Same code, different title: stored under a fresh code.
    Renamed { from: AnimeCode, to: AnimeCode },
}

impl Resolution {
    #[must_use]
    pub const fn decision(&self) -> Decision {
        match self {
            Self::Insert(_) => Decision::Insert,
            Self::Duplicate(_) => Decision::Skip,
            Self::Renamed { .. } => Decision::InsertRenamed,
        }
    }

    /// Code the entry ends up under locally.
    #[must_use]
    pub const fn code(&self) -> &AnimeCode {
        match self {
            Self::Insert(code) | Self::Duplicate(code) => code,
            Self::Renamed { to, .. } => to,
        }
    }
}

/// Decides how a foreign entry lands in the local catalog.
///
/// Only the title decides duplicate versus conflict; other attributes are
/// ignored. On a conflict the codes `<code>_1`, `<code>_2`, ... are tried in
/// order: the first free one is taken, unless an earlier one already holds
/// the same title, in which case the entry was renamed by a previous merge
/// and counts as a duplicate of it. The same inputs always give the same
/// code.
pub fn resolve(entry: &CatalogEntry, local: &impl LocalLookup) -> Resolution {
    match local.title_of(entry.code.as_str()) {
        None => Resolution::Insert(entry.code.clone()),
        Some(title) if title == entry.title => Resolution::Duplicate(entry.code.clone()),
        Some(_) => settle_collision(entry, local),
    }
}

fn settle_collision(entry: &CatalogEntry, local: &impl LocalLookup) -> Resolution {
    let mut n = 1;
    loop {
        let candidate = entry.code.with_suffix(n);
        match local.title_of(candidate.as_str()) {
            None => {
                return Resolution::Renamed {
                    from: entry.code.clone(),
                    to: candidate,
                };
            }
            Some(title) if title == entry.title => return Resolution::Duplicate(candidate),
            Some(_) => n += 1,
        }
    }
}
