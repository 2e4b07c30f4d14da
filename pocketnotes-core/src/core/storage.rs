use crate::{PocketnotesError, Result};
use rusqlite::Connection;
use std::path::Path;

/// Columns added after the first release, with the DDL that adds each one.
const MIGRATED_COLUMNS: &[(&str, &str)] = &[
    (
        "is_bookmarked",
        "ALTER TABLE notes ADD COLUMN is_bookmarked INTEGER NOT NULL DEFAULT 0",
    ),
    (
        "created_at",
        "ALTER TABLE notes ADD COLUMN created_at INTEGER NOT NULL DEFAULT 0",
    ),
    (
        "modified_at",
        "ALTER TABLE notes ADD COLUMN modified_at INTEGER NOT NULL DEFAULT 0",
    ),
];

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Opens `path`, creating the schema when the file is new.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let is_new = std::fs::metadata(path.as_ref())
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        if is_new {
            Self::create(path)
        } else {
            Self::open(path)
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Validate database structure
        let table_count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name = 'notes'",
            [],
            |row| row.get(0),
        )?;

        if table_count != 1 {
            return Err(PocketnotesError::InvalidDatabase(
                "Not a valid Pocketnotes database".to_string(),
            ));
        }

        for (column, ddl) in MIGRATED_COLUMNS {
            let column_exists: bool = conn.query_row(
                "SELECT COUNT(*) FROM pragma_table_info('notes') WHERE name = ?1",
                [column],
                |row| row.get::<_, i64>(0).map(|count| count > 0),
            )?;

            if !column_exists {
                log::info!("migrating notes table: adding column {column}");
                conn.execute(ddl, [])?;
            }
        }

        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
