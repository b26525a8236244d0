use crate::models::CatalogCounts;
use crate::models::anime::CatalogEntry;
use crate::models::episode::Episode;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::info;

pub mod migrator;
pub mod repositories;

use repositories::anime::AnimeRepository;
use repositories::episode::EpisodeRepository;
use repositories::ongoing::OngoingRepository;

/// Handle to the local catalog store.
///
/// Clones share the connection pool and the merge lock.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    merge_lock: Arc<AsyncMutex<()>>,
}

/// File path behind a SQLite URL. `None` for in-memory databases.
///
/// Accepts `sqlite:path`, `sqlite://path` and a trailing `?query`.
fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url.strip_prefix("sqlite:").unwrap_or(db_url);
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    let path = rest.split_once('?').map_or(rest, |(path, _)| path);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// One lock per database file, so two `Store`s opened on the same file in
/// this process still serialize their merges, whatever URL spelling they
/// used.
fn merge_lock_for(db_url: &str) -> Arc<AsyncMutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>> = OnceLock::new();

    let key = sqlite_file_path(db_url).map_or_else(
        || db_url.to_string(),
        |path| {
            std::fs::canonicalize(&path)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned()
        },
    );

    let mut locks = LOCKS
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    Arc::clone(locks.entry(key).or_default())
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path) = sqlite_file_path(db_url) {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path.exists() {
                std::fs::File::create(&path).with_context(|| {
                    format!("Failed to create database file: {}", path.display())
                })?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Catalog database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self {
            conn,
            merge_lock: merge_lock_for(db_url),
        })
    }

    /// Waits until no other merge holds this store, then returns the guard.
    pub async fn lock_for_merge(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.merge_lock).lock_owned().await
    }

    fn anime_repo(&self) -> AnimeRepository<'_, DatabaseConnection> {
        AnimeRepository::new(&self.conn)
    }

    fn episode_repo(&self) -> EpisodeRepository<'_, DatabaseConnection> {
        EpisodeRepository::new(&self.conn)
    }

    fn ongoing_repo(&self) -> OngoingRepository<'_, DatabaseConnection> {
        OngoingRepository::new(&self.conn)
    }

    pub async fn add_entry(&self, entry: &CatalogEntry) -> Result<()> {
        self.anime_repo().insert(entry).await?;
        info!("Added catalog entry: {} (code: {})", entry.title, entry.code);
        Ok(())
    }

    pub async fn get_entry(&self, code: &str) -> Result<Option<CatalogEntry>> {
        Ok(self.anime_repo().get(code).await?)
    }

    pub async fn list_entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.anime_repo().list_all().await?)
    }

    pub async fn add_episode(&self, episode: &Episode) -> Result<()> {
        self.episode_repo().insert(episode).await?;
        Ok(())
    }

    pub async fn get_episodes(&self, code: &str) -> Result<Vec<Episode>> {
        Ok(self.episode_repo().list_for(code).await?)
    }

    pub async fn count_orphan_episodes(&self) -> Result<u64> {
        Ok(self.episode_repo().count_orphans().await?)
    }

    pub async fn mark_ongoing(&self, code: &str) -> Result<bool> {
        Ok(self.ongoing_repo().mark(code).await?)
    }

    pub async fn is_ongoing(&self, code: &str) -> Result<bool> {
        Ok(self.ongoing_repo().is_ongoing(code).await?)
    }

    pub async fn list_ongoing(&self) -> Result<Vec<crate::domain::AnimeCode>> {
        Ok(self.ongoing_repo().list_codes().await?)
    }

    pub async fn catalog_counts(&self) -> Result<CatalogCounts> {
        Ok(CatalogCounts {
            entries: self.anime_repo().count().await?,
            episodes: self.episode_repo().count().await?,
            ongoing: self.ongoing_repo().count().await?,
        })
    }

    /// Writes a compacted, self-contained copy of the catalog to `dest`.
    ///
    /// The copy has the same schema and can be merged into another instance.
    pub async fn export_snapshot(&self, dest: &Path) -> Result<()> {
        if dest.exists() {
            anyhow::bail!("Export target already exists: {}", dest.display());
        }
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let backend = self.conn.get_database_backend();
        self.conn
            .execute(Statement::from_sql_and_values(
                backend,
                "VACUUM INTO ?",
                [dest.to_string_lossy().into_owned().into()],
            ))
            .await
            .with_context(|| format!("Failed to export catalog to {}", dest.display()))?;

        info!("Exported catalog to {}", dest.display());
        Ok(())
    }
}
