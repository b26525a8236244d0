//! Shape check for a candidate foreign catalog store.

use super::foreign::{
    ENTRY_TABLE, EPISODE_TABLE, ONGOING_TABLE, list_tables, open_read_only, table_columns,
};
use crate::models::CatalogCounts;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Statement};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// SQLite column affinity, derived from a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Integer,
    Text,
    Real,
    Numeric,
    Blob,
}

impl Affinity {
    /// Applies SQLite's affinity rules. `None` means the column has no
    /// declared type and accepts any value.
    #[must_use]
    pub fn of_declared(declared: &str) -> Option<Self> {
        let declared = declared.trim().to_ascii_uppercase();
        if declared.is_empty() {
            return None;
        }

        let affinity = if declared.contains("INT") {
            Self::Integer
        } else if ["CHAR", "CLOB", "TEXT"].iter().any(|t| declared.contains(t)) {
            Self::Text
        } else if declared.contains("BLOB") {
            Self::Blob
        } else if ["REAL", "FLOA", "DOUB"].iter().any(|t| declared.contains(t)) {
            Self::Real
        } else {
            Self::Numeric
        };

        Some(affinity)
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
            Self::Numeric => "NUMERIC",
            Self::Blob => "BLOB",
        };
        f.write_str(name)
    }
}

/// Minimum columns each collection must expose.
const REQUIRED_SCHEMA: [(&str, &[(&str, Affinity)]); 3] = [
    (
        ENTRY_TABLE,
        &[("code", Affinity::Text), ("title", Affinity::Text)],
    ),
    (
        EPISODE_TABLE,
        &[
            ("anime_code", Affinity::Text),
            ("episode_number", Affinity::Integer),
            ("video_file_id", Affinity::Text),
        ],
    ),
    (ONGOING_TABLE, &[("anime_code", Affinity::Text)]),
];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Catalog store could not be read: {0}")]
    Unreadable(String),

    #[error("Catalog store is corrupt: {0}")]
    Corrupt(String),

    #[error("Missing required tables: {}", .0.join(", "))]
    MissingCollections(Vec<String>),

    #[error("Table `{collection}` has no `{field}` column")]
    MissingField { collection: String, field: String },

    #[error("Column `{collection}.{field}` is declared as {declared}, expected {expected}")]
    MistypedField {
        collection: String,
        field: String,
        declared: String,
        expected: Affinity,
    },
}

impl ValidationError {
    fn unreadable(err: &DbErr) -> Self {
        Self::Unreadable(err.to_string())
    }
}

/// Confirms that the store at `path` looks like a catalog and counts its rows.
///
/// Read-only: the store is opened with `mode=ro` and closed before returning.
pub async fn validate(path: &Path) -> Result<CatalogCounts, ValidationError> {
    if !tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
    {
        return Err(ValidationError::Unreadable(format!(
            "no such file: {}",
            path.display()
        )));
    }

    let conn = open_read_only(path)
        .await
        .map_err(|e| ValidationError::unreadable(&e))?;

    let result = inspect(&conn).await;

    if let Err(e) = conn.close().await {
        debug!("Closing validated store failed: {}", e);
    }

    if let Ok(counts) = &result {
        info!(
            "Validated catalog {}: {} entries, {} episodes, {} ongoing",
            path.display(),
            counts.entries,
            counts.episodes,
            counts.ongoing
        );
    }

    result
}

async fn inspect(conn: &DatabaseConnection) -> Result<CatalogCounts, ValidationError> {
    check_integrity(conn).await?;

    let tables = list_tables(conn)
        .await
        .map_err(|e| ValidationError::unreadable(&e))?;

    let missing: Vec<String> = REQUIRED_SCHEMA
        .iter()
        .map(|(table, _)| *table)
        .filter(|table| !tables.contains(*table))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingCollections(missing));
    }

    for (table, fields) in REQUIRED_SCHEMA {
        let columns = table_columns(conn, table)
            .await
            .map_err(|e| ValidationError::unreadable(&e))?;

        for (field, expected) in fields {
            let column = columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(field))
                .ok_or_else(|| ValidationError::MissingField {
                    collection: table.to_string(),
                    field: (*field).to_string(),
                })?;

            if let Some(actual) = Affinity::of_declared(&column.declared_type)
                && actual != *expected
            {
                return Err(ValidationError::MistypedField {
                    collection: table.to_string(),
                    field: (*field).to_string(),
                    declared: column.declared_type.clone(),
                    expected: *expected,
                });
            }
        }
    }

    Ok(CatalogCounts {
        entries: count_rows(conn, ENTRY_TABLE).await?,
        episodes: count_rows(conn, EPISODE_TABLE).await?,
        ongoing: count_rows(conn, ONGOING_TABLE).await?,
    })
}

/// A file that is not a database fails here as unreadable; a database
/// with damaged pages reports problems and is corrupt.
async fn check_integrity(conn: &DatabaseConnection) -> Result<(), ValidationError> {
    let rows = conn
        .query_all(Statement::from_string(
            DbBackend::Sqlite,
            "PRAGMA quick_check(1)",
        ))
        .await
        .map_err(|e| ValidationError::unreadable(&e))?;

    let verdict = rows
        .first()
        .map(|row| row.try_get_by_index::<String>(0))
        .transpose()
        .map_err(|e| ValidationError::unreadable(&e))?
        .unwrap_or_default();

    if verdict.eq_ignore_ascii_case("ok") {
        Ok(())
    } else {
        Err(ValidationError::Corrupt(verdict))
    }
}

async fn count_rows(conn: &DatabaseConnection, table: &str) -> Result<u64, ValidationError> {
    let row = conn
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            format!("SELECT COUNT(*) AS count FROM {table}"),
        ))
        .await
        .map_err(|e| ValidationError::unreadable(&e))?;

    let count = row
        .map(|r| r.try_get::<i64>("", "count"))
        .transpose()
        .map_err(|e| ValidationError::unreadable(&e))?
        .unwrap_or(0);

    Ok(u64::try_from(count).unwrap_or(0))
}
