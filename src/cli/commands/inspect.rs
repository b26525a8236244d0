//! Inspect command handler

use super::open_store;
use crate::config::Config;
use crate::models::CatalogCounts;
use crate::services::{CatalogMergeService, DefaultCatalogMergeService};
use std::path::Path;
use std::sync::Arc;

pub async fn cmd_inspect(config: &Config, file: &Path) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let service = DefaultCatalogMergeService::new(store, Arc::new(config.clone()));

    let counts = service.inspect(file).await?;
    println!("✓ {} is a valid catalog", file.display());
    print_counts(&counts);

    Ok(())
}

pub(super) fn print_counts(counts: &CatalogCounts) {
    println!("  Entries:  {}", counts.entries);
    println!("  Episodes: {}", counts.episodes);
    println!("  Ongoing:  {}", counts.ongoing);
}
