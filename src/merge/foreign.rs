//! Read-only access to a foreign catalog store.

use crate::domain::AnimeCode;
use crate::models::anime::{CatalogEntry, EntryDetails};
use crate::models::episode::Episode;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement,
};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub const ENTRY_TABLE: &str = "anime";
pub const EPISODE_TABLE: &str = "episodes";
pub const ONGOING_TABLE: &str = "ongoing_anime";

/// Optional descriptive columns of the entry table. Missing ones read as NULL.
const DETAIL_COLUMNS: [&str; 7] = [
    "country",
    "language",
    "year",
    "genre",
    "description",
    "image",
    "video",
];

pub(crate) async fn open_read_only(path: &Path) -> Result<DatabaseConnection, DbErr> {
    let url = format!("sqlite:{}?mode=ro", path.display());

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(opt).await
}

#[derive(Debug, Clone, FromQueryResult)]
pub(crate) struct TableName {
    pub name: String,
}

#[derive(Debug, Clone, FromQueryResult)]
pub(crate) struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

pub(crate) async fn list_tables(conn: &DatabaseConnection) -> Result<HashSet<String>, DbErr> {
    let rows = TableName::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        "SELECT name FROM sqlite_master WHERE type = 'table'",
    ))
    .all(conn)
    .await?;

    Ok(rows.into_iter().map(|row| row.name).collect())
}

/// `table` must be one of the trusted table constants above.
pub(crate) async fn table_columns(
    conn: &DatabaseConnection,
    table: &str,
) -> Result<Vec<ColumnInfo>, DbErr> {
    ColumnInfo::find_by_statement(Statement::from_string(
        DbBackend::Sqlite,
        format!("SELECT name, type AS declared_type FROM pragma_table_info('{table}')"),
    ))
    .all(conn)
    .await
}

/// Why a foreign row cannot be merged. Such rows are skipped, not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDefect {
    MissingCode,
    MissingTitle,
    MissingVideo,
    InvalidEpisodeNumber(Option<i64>),
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode => f.write_str("missing code"),
            Self::MissingTitle => f.write_str("missing title"),
            Self::MissingVideo => f.write_str("missing video reference"),
            Self::InvalidEpisodeNumber(Some(n)) => write!(f, "invalid episode number {n}"),
            Self::InvalidEpisodeNumber(None) => f.write_str("missing episode number"),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ForeignEntryRow {
    pub code: Option<String>,
    pub title: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub year: Option<i64>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
}

impl ForeignEntryRow {
    pub fn into_entry(self) -> Result<CatalogEntry, RowDefect> {
        let code = non_blank(self.code).ok_or(RowDefect::MissingCode)?;
        let title = self.title.ok_or(RowDefect::MissingTitle)?;

        Ok(CatalogEntry::new(AnimeCode::from(code), title).with_details(EntryDetails {
            country: self.country,
            language: self.language,
            year: self.year.and_then(|y| i32::try_from(y).ok()),
            genre: self.genre,
            description: self.description,
            image: self.image,
            video: self.video,
        }))
    }
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ForeignEpisodeRow {
    pub anime_code: Option<String>,
    pub episode_number: Option<i64>,
    pub video_file_id: Option<String>,
}

impl ForeignEpisodeRow {
    pub fn into_episode(self) -> Result<Episode, RowDefect> {
        let anime_code = non_blank(self.anime_code).ok_or(RowDefect::MissingCode)?;
        let episode_number = self
            .episode_number
            .filter(|n| *n > 0)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or(RowDefect::InvalidEpisodeNumber(self.episode_number))?;
        let video_file_id = non_blank(self.video_file_id).ok_or(RowDefect::MissingVideo)?;

        Ok(Episode::new(anime_code, episode_number, video_file_id))
    }
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ForeignOngoingRow {
    pub anime_code: Option<String>,
}

impl ForeignOngoingRow {
    pub fn into_code(self) -> Result<AnimeCode, RowDefect> {
        non_blank(self.anime_code)
            .map(AnimeCode::from)
            .ok_or(RowDefect::MissingCode)
    }
}

/// An opened foreign store. Never written to.
pub struct ForeignCatalog {
    conn: DatabaseConnection,
    detail_columns: HashSet<String>,
}

impl ForeignCatalog {
    pub async fn open(path: &Path) -> Result<Self, DbErr> {
        let conn = open_read_only(path).await?;
        let detail_columns = table_columns(&conn, ENTRY_TABLE)
            .await?
            .into_iter()
            .map(|c| c.name.to_lowercase())
            .filter(|name| DETAIL_COLUMNS.contains(&name.as_str()))
            .collect::<HashSet<_>>();

        debug!(
            "Opened foreign catalog {} ({} descriptive columns)",
            path.display(),
            detail_columns.len()
        );

        Ok(Self {
            conn,
            detail_columns,
        })
    }

    fn entry_select(&self) -> String {
        let mut columns = vec![
            "CAST(code AS TEXT) AS code".to_string(),
            "CAST(title AS TEXT) AS title".to_string(),
        ];

        for column in DETAIL_COLUMNS {
            let expr = match (self.detail_columns.contains(column), column) {
                (false, _) => format!("NULL AS {column}"),
                (true, "year") => {
                    "CASE WHEN CAST(year AS INTEGER) > 0 THEN CAST(year AS INTEGER) END AS year"
                        .to_string()
                }
                (true, _) => format!("CAST({column} AS TEXT) AS {column}"),
            };
            columns.push(expr);
        }

        // No ORDER BY: `WITHOUT ROWID` tables have no rowid to sort on.
        format!("SELECT {} FROM {ENTRY_TABLE}", columns.join(", "))
    }

    /// Entries in storage order.
    pub async fn entries(&self) -> Result<Vec<ForeignEntryRow>, DbErr> {
        ForeignEntryRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            self.entry_select(),
        ))
        .all(&self.conn)
        .await
    }

    /// Episodes ordered by `(anime_code, episode_number)`.
    pub async fn episodes(&self) -> Result<Vec<ForeignEpisodeRow>, DbErr> {
        ForeignEpisodeRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            format!(
                "SELECT CAST(anime_code AS TEXT) AS anime_code, \
                 CAST(episode_number AS INTEGER) AS episode_number, \
                 CAST(video_file_id AS TEXT) AS video_file_id \
                 FROM {EPISODE_TABLE} \
                 ORDER BY CAST(anime_code AS TEXT), CAST(episode_number AS INTEGER)"
            ),
        ))
        .all(&self.conn)
        .await
    }

    pub async fn ongoing(&self) -> Result<Vec<ForeignOngoingRow>, DbErr> {
        ForeignOngoingRow::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            format!(
                "SELECT CAST(anime_code AS TEXT) AS anime_code \
                 FROM {ONGOING_TABLE} ORDER BY anime_code"
            ),
        ))
        .all(&self.conn)
        .await
    }

    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            debug!("Closing foreign catalog failed: {}", e);
        }
    }
}
