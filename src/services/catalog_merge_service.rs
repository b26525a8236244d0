//! Domain service for merging uploaded catalog stores.
//!
//! Wraps the merge engine with the steps around it: staging the upload,
//! validating its shape, rendering the report and removing the staged copy
//! on every exit path.

use crate::merge::{MergeError, MergeReport, StagingError, ValidationError};
use crate::models::CatalogCounts;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Errors specific to the merge workflow.
#[derive(Debug, Error)]
pub enum MergeServiceError {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Outcome of a merge, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct MergeSummary {
    /// Foreign row counts seen by validation.
    pub preview: CatalogCounts,
    pub report: MergeReport,
    /// The report rendered into size-bounded chunks.
    pub chunks: Vec<String>,
}

#[async_trait::async_trait]
pub trait CatalogMergeService: Send + Sync {
    /// Validates an uploaded store without touching the local catalog.
    ///
    /// # Errors
    ///
    /// Returns [`MergeServiceError::Staging`] if the upload cannot be copied.
    /// Returns [`MergeServiceError::Validation`] if its shape is wrong.
    async fn inspect(&self, source: &Path) -> Result<CatalogCounts, MergeServiceError>;

    /// Stages, validates and merges an uploaded store.
    ///
    /// A phase failure still yields `Ok`; check `report.outcome`.
    async fn merge_upload(&self, source: &Path) -> Result<MergeSummary, MergeServiceError>;
}
