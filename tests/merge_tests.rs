//! Integration tests for the catalog merge engine.
//!
//! Each test builds a local store and a hand-written foreign store in temp
//! files and drives them through the public API.

use anicat::config::Config;
use anicat::db::Store;
use anicat::merge::{
    CatalogMerger, MergeOutcome, ReportBuilder, StagedCatalog, ValidationError, validate,
};
use anicat::models::anime::CatalogEntry;
use anicat::models::episode::Episode;
use anicat::services::{CatalogMergeService, DefaultCatalogMergeService, MergeServiceError};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const FOREIGN_SCHEMA: [&str; 3] = [
    "CREATE TABLE anime (id INTEGER PRIMARY KEY, code TEXT, title TEXT, year INTEGER, genre TEXT)",
    "CREATE TABLE episodes (id INTEGER PRIMARY KEY, anime_code TEXT, episode_number INTEGER, video_file_id TEXT)",
    "CREATE TABLE ongoing_anime (anime_code TEXT)",
];

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("anicat-{label}-{}.db", uuid::Uuid::new_v4()))
}

async fn local_store() -> (Store, PathBuf) {
    let path = temp_path("local");
    let store = Store::new(&format!("sqlite:{}", path.display()))
        .await
        .expect("Failed to open local store");
    (store, path)
}

/// A foreign store written with raw SQL, without the local constraints.
struct ForeignStore {
    path: PathBuf,
    conn: DatabaseConnection,
}

impl ForeignStore {
    async fn with_schema(schema: &[&str]) -> Self {
        let path = temp_path("foreign");
        let conn = Database::connect(format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .expect("Failed to create foreign store");

        for statement in schema {
            conn.execute_unprepared(statement).await.unwrap();
        }

        Self { path, conn }
    }

    async fn new() -> Self {
        Self::with_schema(&FOREIGN_SCHEMA).await
    }

    async fn exec(&self, sql: &str, values: Vec<Value>) {
        self.conn
            .execute(Statement::from_sql_and_values(DbBackend::Sqlite, sql, values))
            .await
            .unwrap();
    }

    async fn entry(&self, code: &str, title: &str) {
        self.exec(
            "INSERT INTO anime (code, title) VALUES (?, ?)",
            vec![code.into(), title.into()],
        )
        .await;
    }

    async fn episode(&self, code: &str, number: i32) {
        self.exec(
            "INSERT INTO episodes (anime_code, episode_number, video_file_id) VALUES (?, ?, ?)",
            vec![code.into(), number.into(), format!("file-{code}-{number}").into()],
        )
        .await;
    }

    async fn ongoing(&self, code: &str) {
        self.exec(
            "INSERT INTO ongoing_anime (anime_code) VALUES (?)",
            vec![code.into()],
        )
        .await;
    }

    async fn finish(self) -> PathBuf {
        self.conn.close().await.ok();
        self.path
    }
}

fn cleanup(paths: &[&Path]) {
    for path in paths {
        std::fs::remove_file(path).ok();
    }
}

async fn naruto_local() -> (Store, PathBuf) {
    let (store, path) = local_store().await;
    store
        .add_entry(&CatalogEntry::new("1", "Naruto"))
        .await
        .unwrap();
    for n in 1..=3 {
        store
            .add_episode(&Episode::new("1", n, format!("local-{n}")))
            .await
            .unwrap();
    }
    (store, path)
}

async fn naruto_bleach_foreign() -> PathBuf {
    let foreign = ForeignStore::new().await;
    foreign.entry("1", "Naruto").await;
    foreign.entry("2", "Bleach").await;
    for n in 1..=5 {
        foreign.episode("1", n).await;
    }
    for n in 1..=2 {
        foreign.episode("2", n).await;
    }
    foreign.ongoing("1").await;
    foreign.finish().await
}

#[tokio::test]
async fn test_end_to_end_merge() {
    let (store, local_path) = naruto_local().await;
    let foreign_path = naruto_bleach_foreign().await;

    let (report, mapping) = CatalogMerger::new(store.clone())
        .merge_with_mapping(&foreign_path)
        .await
        .unwrap();

    assert_eq!(report.outcome, MergeOutcome::Completed);
    assert_eq!(report.transferred.entries, 1);
    assert_eq!(report.skipped.entries, 1);
    assert_eq!(report.conflicts_resolved, 0);

    // Bleach 1-2 plus Naruto 4-5; Naruto 1-3 already exist.
    assert_eq!(report.transferred.episodes, 4);
    assert_eq!(report.skipped.episodes, 3);
    assert_eq!(report.transferred.ongoing, 1);

    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.lookup("1").map(|c| c.as_str()), Some("1"));
    assert_eq!(mapping.lookup("2").map(|c| c.as_str()), Some("2"));

    let naruto = store.get_episodes("1").await.unwrap();
    assert_eq!(naruto.len(), 5);
    assert_eq!(naruto[0].video_file_id, "local-1");
    assert_eq!(store.get_episodes("2").await.unwrap().len(), 2);
    assert!(store.is_ongoing("1").await.unwrap());

    assert_eq!(report.added.total(), 1);
    assert_eq!(report.added.items()[0].title, "Bleach");

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    let (store, local_path) = local_store().await;
    store
        .add_entry(&CatalogEntry::new("5", "A"))
        .await
        .unwrap();

    let foreign = ForeignStore::new().await;
    foreign.entry("5", "B").await;
    foreign.entry("7", "C").await;
    foreign.episode("5", 1).await;
    foreign.episode("7", 1).await;
    foreign.ongoing("7").await;
    let foreign_path = foreign.finish().await;

    let merger = CatalogMerger::new(store.clone());

    let (first, first_mapping) = merger.merge_with_mapping(&foreign_path).await.unwrap();
    assert_eq!(first.transferred.entries, 2);
    assert_eq!(first.conflicts_resolved, 1);
    assert_eq!(first_mapping.lookup("5").map(|c| c.as_str()), Some("5_1"));

    let before = store.catalog_counts().await.unwrap();
    let (second, second_mapping) = merger.merge_with_mapping(&foreign_path).await.unwrap();
    let after = store.catalog_counts().await.unwrap();

    assert_eq!(second.transferred.entries, 0);
    assert_eq!(second.transferred.episodes, 0);
    assert_eq!(second.transferred.ongoing, 0);
    assert_eq!(second.skipped.entries, 2);
    assert_eq!(second.skipped.ongoing, 1);
    assert_eq!(before, after);

    // The earlier rename is found again instead of producing "5_2".
    assert_eq!(second_mapping.lookup("5").map(|c| c.as_str()), Some("5_1"));
    assert_eq!(second_mapping.lookup("7").map(|c| c.as_str()), Some("7"));
    assert!(store.get_entry("5_2").await.unwrap().is_none());

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_conflict_resolution_is_deterministic() {
    let (store, local_path) = local_store().await;
    store
        .add_entry(&CatalogEntry::new("5", "A"))
        .await
        .unwrap();

    let foreign = ForeignStore::new().await;
    foreign.entry("5", "A").await;
    foreign.entry("5", "B").await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert_eq!(report.skipped.entries, 1);
    assert_eq!(report.transferred.entries, 1);
    assert_eq!(report.conflicts_resolved, 1);

    let renamed = &report.renamed.items()[0];
    assert_eq!(renamed.title, "B");
    assert_eq!(renamed.original_code.as_str(), "5");
    assert_eq!(renamed.new_code.as_str(), "5_1");

    assert_eq!(store.get_entry("5").await.unwrap().unwrap().title, "A");
    assert_eq!(store.get_entry("5_1").await.unwrap().unwrap().title, "B");

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_episodes_without_transferred_entry_are_skipped() {
    let (store, local_path) = local_store().await;

    let foreign = ForeignStore::new().await;
    foreign.entry("1", "Naruto").await;
    // Entry with no title never transfers.
    foreign
        .exec(
            "INSERT INTO anime (code, title) VALUES (?, NULL)",
            vec!["9".into()],
        )
        .await;
    foreign.episode("1", 1).await;
    foreign.episode("9", 1).await;
    foreign.episode("404", 1).await;
    foreign.ongoing("9").await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert_eq!(report.transferred.entries, 1);
    assert_eq!(report.skipped.entries, 1);
    assert_eq!(report.transferred.episodes, 1);
    assert_eq!(report.skipped.episodes, 2);
    assert_eq!(report.skipped.ongoing, 1);

    assert!(store.get_episodes("9").await.unwrap().is_empty());
    assert!(store.get_episodes("404").await.unwrap().is_empty());

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_merge_keeps_referential_integrity() {
    let (store, local_path) = naruto_local().await;

    let foreign = ForeignStore::new().await;
    foreign.entry("1", "Boruto").await;
    foreign.entry("3", "One Piece").await;
    foreign.episode("1", 1).await;
    foreign.episode("1", 1).await;
    foreign.episode("3", 0).await;
    foreign.episode("3", 1).await;
    foreign.episode("8", 1).await;
    foreign.ongoing("1").await;
    foreign.ongoing("8").await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.conflicts_resolved, 1);
    assert_eq!(store.count_orphan_episodes().await.unwrap(), 0);

    // Boruto's episodes follow it to "1_1"; Naruto is untouched.
    assert_eq!(store.get_episodes("1").await.unwrap().len(), 3);
    assert_eq!(store.get_episodes("1_1").await.unwrap().len(), 1);
    assert_eq!(store.get_episodes("3").await.unwrap().len(), 1);

    let entries = store.list_entries().await.unwrap();
    for code in store.list_ongoing().await.unwrap() {
        assert!(entries.iter().any(|e| e.code == code));
    }
    assert!(store.is_ongoing("1_1").await.unwrap());
    assert!(!store.is_ongoing("1").await.unwrap());

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_cancel_before_first_phase_changes_nothing() {
    let (store, local_path) = naruto_local().await;
    let foreign_path = naruto_bleach_foreign().await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let before = store.catalog_counts().await.unwrap();
    let report = CatalogMerger::new(store.clone())
        .with_cancellation(cancel)
        .merge(&foreign_path)
        .await
        .unwrap();

    assert!(matches!(
        report.outcome,
        MergeOutcome::Cancelled { next_phase } if next_phase.as_str() == "entries"
    ));
    assert_eq!(store.catalog_counts().await.unwrap(), before);

    let text = ReportBuilder::new(5, 4000).build(&report).join("\n");
    assert!(text.contains("cancelled before the entries phase"));

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_concurrent_merges_do_not_duplicate_renames() {
    let (store, local_path) = local_store().await;
    store
        .add_entry(&CatalogEntry::new("5", "A"))
        .await
        .unwrap();

    let foreign = ForeignStore::new().await;
    foreign.entry("5", "B").await;
    let foreign_path = foreign.finish().await;

    let first = CatalogMerger::new(store.clone());
    let second = CatalogMerger::new(store.clone());
    let (a, b) = tokio::join!(first.merge(&foreign_path), second.merge(&foreign_path));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.transferred.entries + b.transferred.entries, 1);
    assert_eq!(a.conflicts_resolved + b.conflicts_resolved, 1);
    assert_eq!(store.catalog_counts().await.unwrap().entries, 2);
    assert!(store.get_entry("5_2").await.unwrap().is_none());

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_report_truncates_renamed_titles() {
    let (store, local_path) = local_store().await;
    let foreign = ForeignStore::new().await;
    for i in 0..12 {
        let code = format!("c{i}");
        store
            .add_entry(&CatalogEntry::new(code.as_str(), "Local"))
            .await
            .unwrap();
        foreign.entry(&code, &format!("Foreign {i}")).await;
    }
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();
    assert_eq!(report.conflicts_resolved, 12);

    let builder = ReportBuilder::new(5, 200);
    let chunks = builder.build(&report);
    let text = chunks.join("\n");

    let renamed_lines = text.lines().filter(|l| l.contains(" → ")).count();
    assert_eq!(renamed_lines, 5);
    assert!(text.lines().any(|l| l == "+7 more"));
    assert!(chunks.iter().all(|c| c.chars().count() <= 200));

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_validator_rejects_bad_shapes() {
    let missing = ForeignStore::with_schema(&[FOREIGN_SCHEMA[0]]).await;
    let missing_path = missing.finish().await;
    let err = validate(&missing_path).await.unwrap_err();
    match err {
        ValidationError::MissingCollections(tables) => {
            assert_eq!(tables, vec!["episodes", "ongoing_anime"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let no_video = ForeignStore::with_schema(&[
        FOREIGN_SCHEMA[0],
        "CREATE TABLE episodes (anime_code TEXT, episode_number INTEGER)",
        FOREIGN_SCHEMA[2],
    ])
    .await;
    let no_video_path = no_video.finish().await;
    let err = validate(&no_video_path).await.unwrap_err();
    assert!(matches!(
        err,
        ValidationError::MissingField { ref collection, ref field }
            if collection == "episodes" && field == "video_file_id"
    ));

    let mistyped = ForeignStore::with_schema(&[
        FOREIGN_SCHEMA[0],
        "CREATE TABLE episodes (anime_code TEXT, episode_number TEXT, video_file_id TEXT)",
        FOREIGN_SCHEMA[2],
    ])
    .await;
    let mistyped_path = mistyped.finish().await;
    let err = validate(&mistyped_path).await.unwrap_err();
    assert!(matches!(err, ValidationError::MistypedField { .. }));

    cleanup(&[&missing_path, &no_video_path, &mistyped_path]);
}

#[tokio::test]
async fn test_validator_counts_rows() {
    let foreign_path = naruto_bleach_foreign().await;

    let counts = validate(&foreign_path).await.unwrap();
    assert_eq!(counts.entries, 2);
    assert_eq!(counts.episodes, 7);
    assert_eq!(counts.ongoing, 1);

    cleanup(&[&foreign_path]);
}

#[tokio::test]
async fn test_export_can_be_merged_elsewhere() {
    let (source, source_path) = naruto_local().await;
    source.mark_ongoing("1").await.unwrap();

    let export_path = temp_path("export");
    source.export_snapshot(&export_path).await.unwrap();
    assert!(source.export_snapshot(&export_path).await.is_err());

    let counts = validate(&export_path).await.unwrap();
    assert_eq!(counts.entries, 1);
    assert_eq!(counts.episodes, 3);

    let (target, target_path) = local_store().await;
    let report = CatalogMerger::new(target.clone())
        .merge(&export_path)
        .await
        .unwrap();

    assert_eq!(report.transferred.entries, 1);
    assert_eq!(report.transferred.episodes, 3);
    assert_eq!(report.transferred.ongoing, 1);
    assert_eq!(target.get_entry("1").await.unwrap().unwrap().title, "Naruto");

    cleanup(&[&source_path, &export_path, &target_path]);
}

#[tokio::test]
async fn test_service_merges_and_cleans_up_staging() {
    let (store, local_path) = naruto_local().await;
    let foreign_path = naruto_bleach_foreign().await;

    let staging_root = std::env::temp_dir().join(format!("anicat-stage-{}", uuid::Uuid::new_v4()));
    let mut config = Config::default();
    config.merge.staging_dir = staging_root.display().to_string();
    config.report.max_chunk_len = 80;

    let service = DefaultCatalogMergeService::new(store.clone(), Arc::new(config));

    let preview = service.inspect(&foreign_path).await.unwrap();
    assert_eq!(preview.entries, 2);

    let summary = service.merge_upload(&foreign_path).await.unwrap();
    assert_eq!(summary.preview, preview);
    assert_eq!(summary.report.transferred.entries, 1);
    assert!(!summary.chunks.is_empty());
    assert!(summary.chunks.iter().all(|c| c.chars().count() <= 80));

    let leftovers = std::fs::read_dir(&staging_root)
        .map(|dir| dir.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);

    // The upload itself is never touched.
    assert!(foreign_path.exists());

    std::fs::remove_dir_all(&staging_root).ok();
    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_service_releases_staging_on_validation_failure() {
    let (store, local_path) = local_store().await;

    let broken = ForeignStore::with_schema(&[FOREIGN_SCHEMA[0]]).await;
    let broken_path = broken.finish().await;

    let staging_root = std::env::temp_dir().join(format!("anicat-stage-{}", uuid::Uuid::new_v4()));
    let mut config = Config::default();
    config.merge.staging_dir = staging_root.display().to_string();

    let service = DefaultCatalogMergeService::new(store.clone(), Arc::new(config));
    let err = service.merge_upload(&broken_path).await.unwrap_err();
    assert!(matches!(err, MergeServiceError::Validation(_)));

    let leftovers = std::fs::read_dir(&staging_root)
        .map(|dir| dir.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
    assert_eq!(store.catalog_counts().await.unwrap().entries, 0);

    std::fs::remove_dir_all(&staging_root).ok();
    cleanup(&[&local_path, &broken_path]);
}

#[tokio::test]
async fn test_staged_copy_is_removed_on_drop() {
    let foreign_path = naruto_bleach_foreign().await;
    let root = std::env::temp_dir();

    let staged = StagedCatalog::stage(&root, &foreign_path, &["db".to_string()])
        .await
        .unwrap();
    let dir = staged.dir().to_path_buf();
    assert!(staged.path().exists());

    drop(staged);
    assert!(!dir.exists());

    cleanup(&[&foreign_path]);
}

#[tokio::test]
async fn test_without_rowid_entry_table_merges() {
    let (store, local_path) = local_store().await;

    let foreign = ForeignStore::with_schema(&[
        "CREATE TABLE anime (code TEXT PRIMARY KEY, title TEXT) WITHOUT ROWID",
        FOREIGN_SCHEMA[1],
        FOREIGN_SCHEMA[2],
    ])
    .await;
    foreign.entry("1", "Naruto").await;
    foreign.episode("1", 1).await;
    let foreign_path = foreign.finish().await;

    assert_eq!(validate(&foreign_path).await.unwrap().entries, 1);

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert_eq!(report.outcome, MergeOutcome::Completed);
    assert_eq!(report.transferred.entries, 1);
    assert_eq!(report.transferred.episodes, 1);
    assert_eq!(store.get_entry("1").await.unwrap().unwrap().title, "Naruto");

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_failed_phase_keeps_earlier_phases() {
    let (store, local_path) = naruto_local().await;

    // No episodes table: the entries phase commits, the episodes phase
    // cannot read its rows.
    let foreign = ForeignStore::with_schema(&[FOREIGN_SCHEMA[0], FOREIGN_SCHEMA[2]]).await;
    foreign.entry("2", "Bleach").await;
    foreign.entry("3", "One Piece").await;
    foreign.ongoing("2").await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    match &report.outcome {
        MergeOutcome::PartiallyApplied {
            failed_phase,
            reason,
        } => {
            assert_eq!(failed_phase.as_str(), "episodes");
            assert!(reason.contains("foreign store read failed"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(report.transferred.entries, 2);
    assert_eq!(report.transferred.episodes, 0);
    assert_eq!(report.skipped.episodes, 0);
    assert_eq!(report.transferred.ongoing, 0);

    assert_eq!(store.get_entry("2").await.unwrap().unwrap().title, "Bleach");
    assert_eq!(store.get_entry("3").await.unwrap().unwrap().title, "One Piece");
    assert!(!store.is_ongoing("2").await.unwrap());
    assert_eq!(store.get_episodes("1").await.unwrap().len(), 3);

    let text = ReportBuilder::new(5, 4000).build(&report).join("\n");
    assert!(text.contains("Merge stopped in the episodes phase"));

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_failed_ongoing_phase_keeps_episodes() {
    let (store, local_path) = local_store().await;

    let foreign = ForeignStore::with_schema(&[FOREIGN_SCHEMA[0], FOREIGN_SCHEMA[1]]).await;
    foreign.entry("2", "Bleach").await;
    foreign.episode("2", 1).await;
    foreign.episode("2", 2).await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert!(matches!(
        report.outcome,
        MergeOutcome::PartiallyApplied { failed_phase, .. } if failed_phase.as_str() == "ongoing"
    ));
    assert_eq!(report.transferred.episodes, 2);
    assert_eq!(report.transferred.ongoing, 0);
    assert_eq!(report.skipped.ongoing, 0);
    assert_eq!(store.get_episodes("2").await.unwrap().len(), 2);
    assert!(store.list_ongoing().await.unwrap().is_empty());

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_rejected_entry_insert_is_skipped_and_merge_continues() {
    let (store, local_path) = local_store().await;
    store
        .conn
        .execute_unprepared(
            "CREATE TRIGGER reject_cursed BEFORE INSERT ON anime \
             WHEN NEW.title = 'Cursed' BEGIN SELECT RAISE(ABORT, 'title rejected'); END",
        )
        .await
        .unwrap();

    let foreign = ForeignStore::new().await;
    foreign.entry("1", "Naruto").await;
    foreign.entry("2", "Cursed").await;
    foreign.entry("3", "Bleach").await;
    foreign.episode("2", 1).await;
    foreign.episode("3", 1).await;
    let foreign_path = foreign.finish().await;

    let report = CatalogMerger::new(store.clone())
        .merge(&foreign_path)
        .await
        .unwrap();

    assert_eq!(report.outcome, MergeOutcome::Completed);
    assert_eq!(report.transferred.entries, 2);
    assert_eq!(report.skipped.entries, 1);
    assert_eq!(report.added.total(), 2);

    // The rejected entry's episodes have no parent to follow.
    assert_eq!(report.transferred.episodes, 1);
    assert_eq!(report.skipped.episodes, 1);

    assert!(store.get_entry("2").await.unwrap().is_none());
    assert!(store.get_entry("3").await.unwrap().is_some());
    assert_eq!(store.count_orphan_episodes().await.unwrap(), 0);

    cleanup(&[&local_path, &foreign_path]);
}

#[tokio::test]
async fn test_validator_reports_damaged_pages_as_corrupt() {
    use std::io::{Seek, SeekFrom, Write};

    let foreign = ForeignStore::new().await;
    foreign.entry("1", "Naruto").await;
    let foreign_path = foreign.finish().await;

    // Page 2 is the root of the first table; overwrite it with garbage.
    let page_size = 4096;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .open(&foreign_path)
        .unwrap();
    file.seek(SeekFrom::Start(page_size)).unwrap();
    file.write_all(&[0xFF; 4096]).unwrap();
    file.sync_all().unwrap();
    drop(file);

    let err = validate(&foreign_path).await.unwrap_err();
    assert!(matches!(err, ValidationError::Corrupt(_)), "{err}");

    let garbage = temp_path("garbage");
    std::fs::write(&garbage, b"this is not a catalog store, just text").unwrap();
    let err = validate(&garbage).await.unwrap_err();
    assert!(!matches!(err, ValidationError::Corrupt(_)), "{err}");

    cleanup(&[&foreign_path, &garbage]);
}
