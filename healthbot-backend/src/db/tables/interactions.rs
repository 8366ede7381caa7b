//! Interaction log operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Result as SqliteResult};

use super::super::Database;
use crate::models::Interaction;

impl Database {
    /// Append one conversational exchange. Timestamps are server-assigned.
    pub fn insert_interaction(
        &self,
        user_id: &str,
        channel: &str,
        intent: &str,
        message: &str,
        response: &str,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO interactions (user_id, channel, intent, message, response, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![user_id, channel, intent, message, response, now],
        )?;

        Ok(())
    }

    /// Most recent interactions first, for the dashboard.
    pub fn recent_interactions(&self, limit: i64) -> SqliteResult<Vec<Interaction>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, user_id, channel, intent, message, response, created_at
             FROM interactions ORDER BY id DESC LIMIT ?1",
        )?;

        let interactions = stmt
            .query_map([limit], |row| {
                let created_at_str: String = row.get(6)?;

                Ok(Interaction {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    channel: row.get(2)?,
                    intent: row.get(3)?,
                    message: row.get(4)?,
                    response: row.get(5)?,
                    created_at: DateTime::parse_from_rfc3339(&created_at_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_default(),
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(interactions)
    }

    pub fn count_interactions(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))
    }

    pub fn count_interaction_users(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(DISTINCT user_id) FROM interactions",
            [],
            |row| row.get(0),
        )
    }
}
