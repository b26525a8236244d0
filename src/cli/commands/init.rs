//! Init command handler

use super::open_store;
use crate::config::Config;
use std::path::Path;

/// Writes a default config to `config_path` (or `config.toml`) unless one
/// exists, then creates and migrates the catalog database.
pub async fn cmd_init(config: &Config, config_path: Option<&Path>) -> anyhow::Result<()> {
    let target = config_path.map_or_else(Config::default_config_path, Path::to_path_buf);

    if Config::create_default_at(&target)? {
        println!("✓ Wrote default config to {}", target.display());
    } else {
        println!("Config already exists at {}", target.display());
    }

    let store = open_store(config).await?;
    let counts = store.catalog_counts().await?;
    println!(
        "✓ Catalog ready at {} ({} entries)",
        config.general.database_path, counts.entries
    );

    Ok(())
}
