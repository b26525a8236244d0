//! Stats command handler

use super::inspect::print_counts;
use super::open_store;
use crate::config::Config;

pub async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let counts = store.catalog_counts().await?;

    println!("Local catalog: {}", config.general.database_path);
    println!("{:-<50}", "");
    print_counts(&counts);

    let orphans = store.count_orphan_episodes().await?;
    if orphans > 0 {
        println!();
        println!("⚠ {orphans} episodes point at missing entries");
    }

    let ongoing = store.list_ongoing().await?;
    if !ongoing.is_empty() {
        let codes: Vec<&str> = ongoing.iter().map(|c| c.as_str()).collect();
        println!();
        println!("Ongoing: {}", codes.join(", "));
    }

    Ok(())
}
