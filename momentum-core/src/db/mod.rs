//! Persisted client state: a single key-value table in SQLite.

mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::UserProfile;

pub use schema::{SCHEMA, TOKEN_KEY, USER_PROFILE_KEY};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening database at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "opened local store");
        Ok(Self::from_connection(conn))
    }

    /// `<data dir>/momentum.db`, e.g. `~/.local/share/momentum/momentum.db`.
    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()?)
    }

    pub fn open_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "momentum")
            .ok_or_else(|| anyhow!("unable to determine data directory"))?;
        Ok(dirs.data_dir().join("momentum.db"))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("database lock poisoned"))
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn()?
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns true if the key existed.
    pub fn delete_setting(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn()?
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.get_setting(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.set_setting(TOKEN_KEY, token)
    }

    /// Signing out drops the token and the cached profile together.
    pub fn clear_session(&self) -> Result<()> {
        self.delete_setting(TOKEN_KEY)?;
        self.delete_setting(USER_PROFILE_KEY)?;
        Ok(())
    }

    pub fn user_profile(&self) -> Result<Option<UserProfile>> {
        match self.get_setting(USER_PROFILE_KEY)? {
            Some(json) => Ok(Some(
                serde_json::from_str(&json).context("decoding cached user profile")?,
            )),
            None => Ok(None),
        }
    }

    pub fn set_user_profile(&self, profile: &UserProfile) -> Result<()> {
        self.set_setting(USER_PROFILE_KEY, &serde_json::to_string(profile)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Database {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn settings_upsert_and_delete() {
        let db = store();
        assert_eq!(db.get_setting("k").unwrap(), None);

        db.set_setting("k", "one").unwrap();
        db.set_setting("k", "two").unwrap();
        assert_eq!(db.get_setting("k").unwrap().as_deref(), Some("two"));

        assert!(db.delete_setting("k").unwrap());
        assert!(!db.delete_setting("k").unwrap());
    }

    #[test]
    fn clear_session_drops_token_and_profile() {
        let db = store();
        db.set_token("abc").unwrap();
        db.set_user_profile(&UserProfile {
            id: 7,
            name: "Sam".into(),
            email: "sam@example.com".into(),
            extra: serde_json::Map::new(),
        })
        .unwrap();

        db.clear_session().unwrap();
        assert_eq!(db.token().unwrap(), None);
        assert_eq!(db.user_profile().unwrap(), None);
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let db = store();
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 1, "name": "A", "email": "a@b.c", "avatar": "x.png"}"#,
        )
        .unwrap();
        db.set_user_profile(&profile).unwrap();

        let cached = db.user_profile().unwrap().unwrap();
        assert_eq!(cached.extra.get("avatar").and_then(|v| v.as_str()), Some("x.png"));
    }

    #[test]
    fn on_disk_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("momentum.db");

        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        db.set_token("persisted").unwrap();
        drop(db);

        let reopened = Database::open(&path).unwrap();
        reopened.migrate().unwrap();
        assert_eq!(reopened.token().unwrap().as_deref(), Some("persisted"));
    }
}
