//! Export command handler

use super::open_store;
use crate::config::Config;
use std::path::Path;

pub async fn cmd_export(config: &Config, dest: &Path) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let counts = store.catalog_counts().await?;

    store.export_snapshot(dest).await?;

    println!(
        "✓ Exported {} entries, {} episodes and {} ongoing markers to {}",
        counts.entries,
        counts.episodes,
        counts.ongoing,
        dest.display()
    );

    Ok(())
}
