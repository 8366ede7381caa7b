//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, init)
//! - Idempotent schema creation
//!
//! All table operations are in the tables/ subdirectory.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Main database wrapper, shared between the HTTP handlers and the
/// dispatch loop via a Mutex around the single connection.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database and initialize the schema.
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// Create all tables if absent. Safe to run on every startup.
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        // Subscriber registry: exactly one current row per recipient.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS subscribers (
                recipient_id TEXT PRIMARY KEY,
                channel TEXT NOT NULL,
                address TEXT NOT NULL,
                language TEXT NOT NULL DEFAULT 'english',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // Append-only interaction log, read back only by the dashboard.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS interactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                channel TEXT NOT NULL,
                intent TEXT NOT NULL,
                message TEXT NOT NULL,
                response TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}
