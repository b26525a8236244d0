//! Catalog merge engine.
//!
//! Imports a foreign catalog store (entries, episodes and ongoing markers)
//! into the local [`Store`](crate::db::Store). The pipeline is:
//!
//! 1. [`validator::validate`] checks the foreign store shape and counts rows.
//! 2. [`orchestrator::CatalogMerger`] runs three phases, each in its own
//!    transaction: entries, episodes, ongoing markers. Code collisions are
//!    settled by [`resolver::resolve`] and recorded in a
//!    [`mapping::CodeMapping`] that the later phases use to rewrite
//!    foreign keys.
//! 3. [`render::ReportBuilder`] turns the [`report::MergeReport`] into
//!    size-bounded text chunks.
//! 4. [`staging::release`] removes the staged copy of the foreign store.

pub mod foreign;
pub mod mapping;
pub mod orchestrator;
pub mod render;
pub mod report;
pub mod resolver;
pub mod staging;
pub mod validator;

use serde::Serialize;
use std::fmt;

pub use mapping::CodeMapping;
pub use orchestrator::{CatalogMerger, MergeError};
pub use render::ReportBuilder;
pub use report::{MergeOutcome, MergeReport};
pub use resolver::{Decision, Resolution, resolve};
pub use staging::{StagedCatalog, StagingError, release};
pub use validator::{ValidationError, validate};

/// The three ordered merge stages. Also names the entity kind each stage
/// transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Entries,
    Episodes,
    Ongoing,
}

impl Phase {
    pub const ALL: [Self; 3] = [Self::Entries, Self::Episodes, Self::Ongoing];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::Episodes => "episodes",
            Self::Ongoing => "ongoing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
