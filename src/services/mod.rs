pub mod catalog_merge_service;
pub mod catalog_merge_service_impl;
pub use catalog_merge_service::{CatalogMergeService, MergeServiceError, MergeSummary};
pub use catalog_merge_service_impl::DefaultCatalogMergeService;
