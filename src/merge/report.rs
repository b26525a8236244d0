use super::Phase;
use crate::domain::AnimeCode;
use serde::Serialize;
use std::fmt;

/// Default number of example titles kept per category.
pub const DEFAULT_SAMPLE_CAP: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub entries: u64,
    pub episodes: u64,
    pub ongoing: u64,
}

impl EntityCounts {
    #[must_use]
    pub const fn get(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Entries => self.entries,
            Phase::Episodes => self.episodes,
            Phase::Ongoing => self.ongoing,
        }
    }

    pub fn add(&mut self, phase: Phase, n: u64) {
        match phase {
            Phase::Entries => self.entries += n,
            Phase::Episodes => self.episodes += n,
            Phase::Ongoing => self.ongoing += n,
        }
    }
}

/// The first `cap` items of a list plus the full length of that list.
#[derive(Debug, Clone, Serialize)]
pub struct Sample<T> {
    items: Vec<T>,
    total: usize,
    #[serde(skip)]
    cap: usize,
}

impl<T> Sample<T> {
    #[must_use]
    pub const fn with_cap(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            cap,
        }
    }

    pub fn push(&mut self, item: T) {
        self.total += 1;
        if self.items.len() < self.cap {
            self.items.push(item);
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

impl<T> Extend<T> for Sample<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedEntry {
    pub title: String,
    pub code: AnimeCode,
}

impl fmt::Display for AddedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.title, self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamedEntry {
    pub title: String,
    pub original_code: AnimeCode,
    pub new_code: AnimeCode,
}

impl fmt::Display for RenamedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (code: {} → {})",
            self.title, self.original_code, self.new_code
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    Completed,
    /// Stopped at a phase boundary; earlier phases are committed.
    Cancelled { next_phase: Phase },
    /// A phase failed as a whole and was rolled back; earlier phases are
    /// committed.
    PartiallyApplied { failed_phase: Phase, reason: String },
}

impl MergeOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled { .. } => "cancelled",
            Self::PartiallyApplied { .. } => "partially_applied",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub transferred: EntityCounts,
    pub skipped: EntityCounts,
    pub conflicts_resolved: u64,
    pub added: Sample<AddedEntry>,
    pub renamed: Sample<RenamedEntry>,
    pub outcome: MergeOutcome,
}

impl MergeReport {
    #[must_use]
    pub const fn new(sample_cap: usize) -> Self {
        Self {
            transferred: EntityCounts {
                entries: 0,
                episodes: 0,
                ongoing: 0,
            },
            skipped: EntityCounts {
                entries: 0,
                episodes: 0,
                ongoing: 0,
            },
            conflicts_resolved: 0,
            added: Sample::with_cap(sample_cap),
            renamed: Sample::with_cap(sample_cap),
            outcome: MergeOutcome::Completed,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.outcome, MergeOutcome::Completed)
    }
}

impl Default for MergeReport {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_CAP)
    }
}
