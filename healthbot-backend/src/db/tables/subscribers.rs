//! Subscriber registry operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Result as SqliteResult};

use super::super::Database;
use crate::models::{ChannelKind, Language, Subscriber};

impl Database {
    /// Insert or fully overwrite the row for `recipient_id`.
    ///
    /// The unique-per-recipient invariant is enforced by sqlite itself via
    /// ON CONFLICT, so concurrent subscribe requests can never create a
    /// duplicate row.
    pub fn upsert_subscriber(
        &self,
        recipient_id: &str,
        channel: ChannelKind,
        address: &str,
        language: Language,
    ) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO subscribers (recipient_id, channel, address, language, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             ON CONFLICT(recipient_id) DO UPDATE SET
                 channel = excluded.channel,
                 address = excluded.address,
                 language = excluded.language,
                 updated_at = excluded.updated_at",
            params![recipient_id, channel.as_str(), address, language.as_str(), now],
        )?;

        Ok(())
    }

    /// Remove the subscription for `recipient_id`. Deleting an id that was
    /// never subscribed is a no-op success.
    pub fn delete_subscriber(&self, recipient_id: &str) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM subscribers WHERE recipient_id = ?1",
            [recipient_id],
        )?;
        Ok(())
    }

    /// Look up a single subscription.
    pub fn get_subscriber(&self, recipient_id: &str) -> SqliteResult<Option<Subscriber>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT recipient_id, channel, address, language, created_at, updated_at
             FROM subscribers WHERE recipient_id = ?1",
        )?;

        let subscriber = stmt.query_row([recipient_id], row_to_subscriber).ok();

        Ok(subscriber)
    }

    /// All current subscriptions, for the dispatch fan-out.
    pub fn list_subscribers(&self) -> SqliteResult<Vec<Subscriber>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT recipient_id, channel, address, language, created_at, updated_at
             FROM subscribers ORDER BY recipient_id",
        )?;

        let subscribers = stmt
            .query_map([], row_to_subscriber)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(subscribers)
    }

    pub fn count_subscribers(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM subscribers", [], |row| row.get(0))
    }
}

fn row_to_subscriber(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subscriber> {
    let channel_str: String = row.get(1)?;
    let language_str: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    let updated_at_str: String = row.get(5)?;

    Ok(Subscriber {
        recipient_id: row.get(0)?,
        // Unknown stored values fall back rather than poisoning the list.
        channel: ChannelKind::from_str(&channel_str).unwrap_or(ChannelKind::Rest),
        address: row.get(2)?,
        language: Language::from_str(&language_str).unwrap_or_default(),
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    #[test]
    fn test_upsert_is_idempotent_per_recipient() {
        let (_dir, db) = test_db();

        db.upsert_subscriber("u1", ChannelKind::TwilioSms, "+15551234567", Language::English)
            .unwrap();
        db.upsert_subscriber("u1", ChannelKind::TwilioWhatsapp, "+15557654321", Language::Hindi)
            .unwrap();

        let subs = db.list_subscribers().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].recipient_id, "u1");
        assert_eq!(subs[0].channel, ChannelKind::TwilioWhatsapp);
        assert_eq!(subs[0].address, "+15557654321");
        assert_eq!(subs[0].language, Language::Hindi);
    }

    #[test]
    fn test_delete_then_list_never_contains_id() {
        let (_dir, db) = test_db();

        db.upsert_subscriber("u1", ChannelKind::TwilioSms, "+15551234567", Language::English)
            .unwrap();
        db.upsert_subscriber("u2", ChannelKind::Rest, "user-two", Language::English)
            .unwrap();
        db.delete_subscriber("u1").unwrap();

        let subs = db.list_subscribers().unwrap();
        assert!(subs.iter().all(|s| s.recipient_id != "u1"));
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn test_delete_missing_id_is_ok() {
        let (_dir, db) = test_db();
        assert!(db.delete_subscriber("nobody").is_ok());
    }

    #[test]
    fn test_get_subscriber() {
        let (_dir, db) = test_db();

        db.upsert_subscriber("u1", ChannelKind::TwilioSms, "+15551234567", Language::Hindi)
            .unwrap();

        let found = db.get_subscriber("u1").unwrap().unwrap();
        assert_eq!(found.language, Language::Hindi);
        assert!(db.get_subscriber("u2").unwrap().is_none());
    }

    #[test]
    fn test_count_subscribers() {
        let (_dir, db) = test_db();
        assert_eq!(db.count_subscribers().unwrap(), 0);

        db.upsert_subscriber("u1", ChannelKind::Rest, "user-one", Language::English)
            .unwrap();
        assert_eq!(db.count_subscribers().unwrap(), 1);
    }
}
