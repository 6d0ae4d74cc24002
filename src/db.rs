use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::Path;

use crate::error::{storage_unavailable, Result};
use crate::models::BookStatus;

pub const DB_FILE_NAME: &str = "bookshelf.db";

const MIGRATION_BOOKS_SQL: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        category TEXT NOT NULL,
        year INTEGER NOT NULL,
        status TEXT NOT NULL,
        image TEXT NOT NULL DEFAULT '',
        quantity INTEGER,
        content TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_books_title ON books (title);
    CREATE INDEX IF NOT EXISTS idx_books_category ON books (category);
";

const MIGRATION_LOCAL_STORAGE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS local_storage (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    );
";

/// Opens (creating if needed) the database file and brings its schema up to date.
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(|err| {
                storage_unavailable(format!("cannot create {}: {}", dir.display(), err))
            })?;
        }
    }

    let conn = Connection::open(path).map_err(storage_unavailable)?;
    init_db(&conn)?;
    log::info!("database ready at {}", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(storage_unavailable)?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            id TEXT PRIMARY KEY NOT NULL,
            applied_at INTEGER NOT NULL
        );",
    )
    .map_err(storage_unavailable)?;

    apply_migration(conn, "0000_books", MIGRATION_BOOKS_SQL)?;
    apply_migration(conn, "0001_local_storage", MIGRATION_LOCAL_STORAGE_SQL)?;
    Ok(())
}

fn apply_migration(conn: &Connection, id: &str, sql: &str) -> Result<()> {
    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM schema_migrations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_unavailable)?;
    if existing.is_some() {
        return Ok(());
    }
    conn.execute_batch(sql).map_err(storage_unavailable)?;
    conn.execute(
        "INSERT INTO schema_migrations (id, applied_at) VALUES (?1, ?2)",
        params![id, chrono::Utc::now().timestamp_millis()],
    )
    .map_err(storage_unavailable)?;
    log::info!("applied migration {}", id);
    Ok(())
}

impl ToSql for BookStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let label = value.as_str()?;
        BookStatus::from_label(label)
            .ok_or_else(|| FromSqlError::Other(format!("unknown book status: {}", label).into()))
    }
}
