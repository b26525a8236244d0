//! Default implementation of the `CatalogMergeService` trait.

use crate::config::Config;
use crate::db::Store;
use crate::merge::{CatalogMerger, ReportBuilder, StagedCatalog, validate};
use crate::models::CatalogCounts;
use crate::services::catalog_merge_service::{
    CatalogMergeService, MergeServiceError, MergeSummary,
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct DefaultCatalogMergeService {
    store: Store,
    config: Arc<Config>,
    cancel: CancellationToken,
}

impl DefaultCatalogMergeService {
    #[must_use]
    pub fn new(store: Store, config: Arc<Config>) -> Self {
        Self {
            store,
            config,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    async fn stage(&self, source: &Path) -> Result<StagedCatalog, MergeServiceError> {
        let merge = &self.config.merge;
        Ok(StagedCatalog::stage(&merge.staging_root(), source, &merge.accepted_extensions).await?)
    }

    async fn merge_staged(&self, staged: &StagedCatalog) -> Result<MergeSummary, MergeServiceError> {
        let preview = validate(staged.path()).await?;

        let report = CatalogMerger::new(self.store.clone())
            .with_sample_cap(self.config.merge.sample_cap)
            .with_cancellation(self.cancel.clone())
            .merge(staged.path())
            .await?;

        let chunks = ReportBuilder::from_config(&self.config.report).build(&report);

        Ok(MergeSummary {
            preview,
            report,
            chunks,
        })
    }
}

#[async_trait]
impl CatalogMergeService for DefaultCatalogMergeService {
    async fn inspect(&self, source: &Path) -> Result<CatalogCounts, MergeServiceError> {
        let staged = self.stage(source).await?;
        let result = validate(staged.path()).await;
        staged.release().await;
        Ok(result?)
    }

    async fn merge_upload(&self, source: &Path) -> Result<MergeSummary, MergeServiceError> {
        let staged = self.stage(source).await?;
        let result = self.merge_staged(&staged).await;
        staged.release().await;

        if let Ok(summary) = &result {
            info!(
                "Merged {} ({}): {} entries, {} episodes, {} ongoing transferred",
                source.display(),
                summary.report.outcome.label(),
                summary.report.transferred.entries,
                summary.report.transferred.episodes,
                summary.report.transferred.ongoing
            );
        }

        result
    }
}
