use super::Phase;
use super::foreign::ForeignCatalog;
use super::mapping::CodeMapping;
use super::report::{AddedEntry, DEFAULT_SAMPLE_CAP, MergeOutcome, MergeReport, RenamedEntry};
use super::resolver::{Resolution, resolve};
use crate::db::Store;
use crate::db::repositories::anime::AnimeRepository;
use crate::db::repositories::episode::EpisodeRepository;
use crate::db::repositories::ongoing::OngoingRepository;
use crate::models::episode::Episode;
use sea_orm::{DatabaseTransaction, DbErr, TransactionError, TransactionTrait};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Failed to open foreign catalog {}: {source}", .path.display())]
    ForeignStore { path: PathBuf, source: DbErr },
}

/// Aborts the current phase. Earlier phases stay committed.
#[derive(Debug, Error)]
enum PhaseError {
    #[error("foreign store read failed: {source}")]
    ForeignRead { phase: Phase, source: DbErr },

    #[error("local store error: {source}")]
    LocalStore { phase: Phase, source: DbErr },
}

impl PhaseError {
    const fn phase(&self) -> Phase {
        match self {
            Self::ForeignRead { phase, .. } | Self::LocalStore { phase, .. } => *phase,
        }
    }

    fn foreign(phase: Phase) -> impl Fn(DbErr) -> Self {
        move |source| Self::ForeignRead { phase, source }
    }

    fn local(phase: Phase) -> impl Fn(DbErr) -> Self {
        move |source| Self::LocalStore { phase, source }
    }
}

/// Result of one row's savepoint. A rejected row is rolled back on its own
/// and the phase goes on.
enum RowOutcome<T> {
    Applied(T),
    Rejected(DbErr),
}

type RowFuture<'c, T> = Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 'c>>;

/// Runs `op` inside a savepoint of `txn`.
///
/// Statement errors raised by `op` become [`RowOutcome::Rejected`]. Failing
/// to open or release the savepoint is returned as `Err` and ends the phase.
async fn in_savepoint<T, F>(txn: &DatabaseTransaction, op: F) -> Result<RowOutcome<T>, DbErr>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> RowFuture<'c, T> + Send,
    T: Send,
{
    match txn.transaction::<F, T, DbErr>(op).await {
        Ok(value) => Ok(RowOutcome::Applied(value)),
        Err(TransactionError::Transaction(e)) => Ok(RowOutcome::Rejected(e)),
        Err(TransactionError::Connection(e)) => Err(e),
    }
}

/// Counts gathered inside one phase transaction. Only folded into the
/// report once the phase has committed.
#[derive(Debug, Default)]
struct PhaseTally {
    transferred: u64,
    skipped: u64,
    conflicts: u64,
    added: Vec<AddedEntry>,
    renamed: Vec<RenamedEntry>,
}

impl PhaseTally {
    fn apply(self, phase: Phase, report: &mut MergeReport) {
        report.transferred.add(phase, self.transferred);
        report.skipped.add(phase, self.skipped);
        report.conflicts_resolved += self.conflicts;
        report.added.extend(self.added);
        report.renamed.extend(self.renamed);
    }
}

/// Merges foreign catalog stores into one local [`Store`].
pub struct CatalogMerger {
    store: Store,
    sample_cap: usize,
    cancel: CancellationToken,
}

impl CatalogMerger {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            sample_cap: DEFAULT_SAMPLE_CAP,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub const fn with_sample_cap(mut self, sample_cap: usize) -> Self {
        self.sample_cap = sample_cap;
        self
    }

    /// Cancellation is honoured between phases only.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Merges the foreign store at `path` into the local store.
    ///
    /// Phase-fatal failures do not return `Err`; they show up as
    /// [`MergeOutcome::PartiallyApplied`] in the report.
    pub async fn merge(&self, path: &Path) -> Result<MergeReport, MergeError> {
        self.merge_with_mapping(path).await.map(|(report, _)| report)
    }

    /// Like [`merge`](Self::merge), also returning the code mapping built by
    /// the entries phase.
    pub async fn merge_with_mapping(
        &self,
        path: &Path,
    ) -> Result<(MergeReport, CodeMapping), MergeError> {
        let _guard = self.store.lock_for_merge().await;
        let started = Instant::now();

        let foreign =
            ForeignCatalog::open(path)
                .await
                .map_err(|source| MergeError::ForeignStore {
                    path: path.to_path_buf(),
                    source,
                })?;

        info!("Starting catalog merge from {}", path.display());

        let mut report = MergeReport::new(self.sample_cap);
        let mut mapping = CodeMapping::new();
        report.outcome = self.run_phases(&foreign, &mut report, &mut mapping).await;

        foreign.close().await;
        record_metrics(&report);

        info!(
            event = "catalog_merge_finished",
            outcome = report.outcome.label(),
            entries = report.transferred.entries,
            episodes = report.transferred.episodes,
            ongoing = report.transferred.ongoing,
            conflicts = report.conflicts_resolved,
            duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Catalog merge finished"
        );

        Ok((report, mapping))
    }

    async fn run_phases(
        &self,
        foreign: &ForeignCatalog,
        report: &mut MergeReport,
        mapping: &mut CodeMapping,
    ) -> MergeOutcome {
        for phase in Phase::ALL {
            if self.cancel.is_cancelled() {
                info!("Merge cancelled before the {} phase", phase);
                return MergeOutcome::Cancelled { next_phase: phase };
            }

            let result = match phase {
                Phase::Entries => self.merge_entries(foreign).await.map(|(tally, codes)| {
                    debug!("{} foreign codes mapped", codes.len());
                    *mapping = codes;
                    tally
                }),
                Phase::Episodes => self.merge_episodes(foreign, mapping).await,
                Phase::Ongoing => self.merge_ongoing(foreign, mapping).await,
            };

            match result {
                Ok(tally) => {
                    info!(
                        "Merged {}: {} transferred, {} skipped",
                        phase, tally.transferred, tally.skipped
                    );
                    tally.apply(phase, report);
                }
                Err(e) => {
                    error!("Merge {} phase rolled back: {}", e.phase(), e);
                    return MergeOutcome::PartiallyApplied {
                        failed_phase: e.phase(),
                        reason: e.to_string(),
                    };
                }
            }
        }

        MergeOutcome::Completed
    }

    async fn merge_entries(
        &self,
        foreign: &ForeignCatalog,
    ) -> Result<(PhaseTally, CodeMapping), PhaseError> {
        let phase = Phase::Entries;
        let rows = foreign.entries().await.map_err(PhaseError::foreign(phase))?;

        let txn = self
            .store
            .conn
            .begin()
            .await
            .map_err(PhaseError::local(phase))?;
        let mut local = AnimeRepository::new(&txn)
            .titles_by_code()
            .await
            .map_err(PhaseError::local(phase))?;

        let mut mapping = CodeMapping::new();
        let mut tally = PhaseTally::default();

        for row in rows {
            let entry = match row.into_entry() {
                Ok(entry) => entry,
                Err(defect) => {
                    warn!("Skipping foreign entry: {}", defect);
                    tally.skipped += 1;
                    continue;
                }
            };

            let resolution = resolve(&entry, &local);
            debug!(
                code = %entry.code,
                decision = ?resolution.decision(),
                "Resolved foreign entry"
            );

            if let Resolution::Duplicate(code) = &resolution {
                mapping.record(entry.code.clone(), code.clone());
                tally.skipped += 1;
                continue;
            }

            let target = resolution.code().clone();
            let candidate = entry.recoded(target.clone());
            let outcome = in_savepoint(&txn, move |txn| {
                Box::pin(async move { AnimeRepository::new(txn).insert(&candidate).await })
            })
            .await
            .map_err(PhaseError::local(phase))?;

            match outcome {
                RowOutcome::Applied(()) => {
                    local.insert(target.clone(), entry.title.clone());
                    mapping.record(entry.code.clone(), target.clone());
                    tally.transferred += 1;

                    if let Resolution::Renamed { from, to } = resolution {
                        tally.conflicts += 1;
                        tally.renamed.push(RenamedEntry {
                            title: entry.title.clone(),
                            original_code: from,
                            new_code: to,
                        });
                    }
                    tally.added.push(AddedEntry {
                        title: entry.title,
                        code: target,
                    });
                }
                RowOutcome::Rejected(e) => {
                    error!(
                        "Failed to insert entry {} (code: {}): {}",
                        entry.title, target, e
                    );
                    tally.skipped += 1;
                }
            }
        }

        txn.commit().await.map_err(PhaseError::local(phase))?;
        Ok((tally, mapping))
    }

    async fn merge_episodes(
        &self,
        foreign: &ForeignCatalog,
        mapping: &CodeMapping,
    ) -> Result<PhaseTally, PhaseError> {
        let phase = Phase::Episodes;
        if mapping.is_empty() {
            debug!("No entries were mapped; every foreign episode will be skipped");
        }
        let rows = foreign
            .episodes()
            .await
            .map_err(PhaseError::foreign(phase))?;

        let txn = self
            .store
            .conn
            .begin()
            .await
            .map_err(PhaseError::local(phase))?;
        let mut tally = PhaseTally::default();

        for row in rows {
            let episode = match row.into_episode() {
                Ok(episode) => episode,
                Err(defect) => {
                    warn!("Skipping foreign episode: {}", defect);
                    tally.skipped += 1;
                    continue;
                }
            };

            let Some(local_code) = mapping.lookup(episode.anime_code.as_str()) else {
                warn!(
                    "Skipping episode {} of {}: entry was not transferred",
                    episode.episode_number, episode.anime_code
                );
                tally.skipped += 1;
                continue;
            };

            let candidate = Episode {
                anime_code: local_code.clone(),
                ..episode
            };
            let code = candidate.anime_code.clone();
            let number = candidate.episode_number;

            let outcome = in_savepoint(&txn, move |txn| {
                Box::pin(async move {
                    let repo = EpisodeRepository::new(txn);
                    let present = repo
                        .exists(candidate.anime_code.as_str(), candidate.episode_number)
                        .await?;
                    if !present {
                        repo.insert(&candidate).await?;
                    }
                    Ok::<_, DbErr>(!present)
                })
            })
            .await
            .map_err(PhaseError::local(phase))?;

            match outcome {
                RowOutcome::Applied(true) => tally.transferred += 1,
                RowOutcome::Applied(false) => {
                    debug!("Episode {} of {} already present", number, code);
                    tally.skipped += 1;
                }
                RowOutcome::Rejected(e) => {
                    error!(
                        "Failed to insert episode {} of {}: {}",
                        number, code, e
                    );
                    tally.skipped += 1;
                }
            }
        }

        txn.commit().await.map_err(PhaseError::local(phase))?;
        Ok(tally)
    }

    async fn merge_ongoing(
        &self,
        foreign: &ForeignCatalog,
        mapping: &CodeMapping,
    ) -> Result<PhaseTally, PhaseError> {
        let phase = Phase::Ongoing;
        let rows = foreign
            .ongoing()
            .await
            .map_err(PhaseError::foreign(phase))?;

        let txn = self
            .store
            .conn
            .begin()
            .await
            .map_err(PhaseError::local(phase))?;
        let mut tally = PhaseTally::default();

        for row in rows {
            let code = match row.into_code() {
                Ok(code) => code,
                Err(defect) => {
                    warn!("Skipping ongoing marker: {}", defect);
                    tally.skipped += 1;
                    continue;
                }
            };

            let Some(local_code) = mapping.lookup(code.as_str()).cloned() else {
                warn!("Skipping ongoing marker for {}: entry was not transferred", code);
                tally.skipped += 1;
                continue;
            };

            let marked = local_code.clone();
            let outcome = in_savepoint(&txn, move |txn| {
                Box::pin(async move { OngoingRepository::new(txn).mark(marked.as_str()).await })
            })
            .await
            .map_err(PhaseError::local(phase))?;

            match outcome {
                RowOutcome::Applied(true) => tally.transferred += 1,
                RowOutcome::Applied(false) => tally.skipped += 1,
                RowOutcome::Rejected(e) => {
                    error!("Failed to mark {} as ongoing: {}", local_code, e);
                    tally.skipped += 1;
                }
            }
        }

        txn.commit().await.map_err(PhaseError::local(phase))?;
        Ok(tally)
    }
}

fn record_metrics(report: &MergeReport) {
    for phase in Phase::ALL {
        for (result, count) in [
            ("transferred", report.transferred.get(phase)),
            ("skipped", report.skipped.get(phase)),
        ] {
            let labels = [
                ("entity", phase.as_str().to_string()),
                ("result", result.to_string()),
            ];
            metrics::counter!("catalog_merge_rows_total", &labels).increment(count);
        }
    }

    metrics::counter!("catalog_merges_total", "outcome" => report.outcome.label()).increment(1);
}
