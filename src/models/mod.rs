pub mod anime;
pub mod episode;

use serde::Serialize;

/// Row counts of the three catalog collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub entries: u64,
    pub episodes: u64,
    pub ongoing: u64,
}
