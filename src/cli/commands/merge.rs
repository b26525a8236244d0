//! Merge command handler

use super::inspect::print_counts;
use super::open_store;
use crate::config::Config;
use crate::services::{CatalogMergeService, DefaultCatalogMergeService};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub async fn cmd_merge(
    config: &Config,
    file: &Path,
    assume_yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let cancel = CancellationToken::new();
    let service = DefaultCatalogMergeService::new(store, Arc::new(config.clone()))
        .with_cancellation(cancel.clone());

    let preview = service.inspect(file).await?;

    if !json {
        println!("Catalog to merge: {}", file.display());
        print_counts(&preview);
    }

    if !assume_yes {
        println!();
        println!("Merge into {}?", config.general.database_path);
        println!("Enter 'y' to confirm, anything else to cancel:");

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current phase");
                cancel.cancel();
            }
        }
    });

    let result = service.merge_upload(file).await;
    interrupt.abort();
    let summary = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        for chunk in &summary.chunks {
            println!("{chunk}");
            println!();
        }
    }

    Ok(())
}
