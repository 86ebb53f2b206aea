//! Persisted session state.
//!
//! The auth token and minimal profile fields live in a small key-value
//! table under a fixed namespace, hydrated once at startup and cleared on
//! sign-out. Nothing else is persisted; the query cache in particular is
//! in-memory only.

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::PathBuf;

/// Fixed namespace key for all session fields.
const NAMESPACE: &str = "folio.session";

/// Session context passed to the parts of the app that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
  pub token: Option<String>,
  pub display_name: Option<String>,
}

impl Session {
  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }
}

/// SQLite-backed store for the session namespace.
pub struct SessionStore {
  conn: Connection,
}

const SESSION_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (namespace, key)
);
"#;

impl SessionStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create data directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open session store at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// In-memory store, used by tests.
  #[cfg(test)]
  pub fn in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory store: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SESSION_SCHEMA)
      .map_err(|e| eyre!("Failed to run session migrations: {}", e))?;
    Ok(Self { conn })
  }

  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("folio").join("session.db"))
  }

  /// Load the persisted session, empty when nothing is stored.
  pub fn hydrate(&self) -> Result<Session> {
    Ok(Session {
      token: self.get("token")?,
      display_name: self.get("display_name")?,
    })
  }

  /// Persist the whole session, removing fields that are `None`.
  pub fn save(&self, session: &Session) -> Result<()> {
    self.set("token", session.token.as_deref())?;
    self.set("display_name", session.display_name.as_deref())?;
    Ok(())
  }

  /// Drop every field in the namespace (sign-out).
  pub fn clear(&self) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM kv WHERE namespace = ?", params![NAMESPACE])
      .map_err(|e| eyre!("Failed to clear session: {}", e))?;
    Ok(())
  }

  fn get(&self, key: &str) -> Result<Option<String>> {
    let mut stmt = self
      .conn
      .prepare("SELECT value FROM kv WHERE namespace = ? AND key = ?")
      .map_err(|e| eyre!("Failed to prepare session query: {}", e))?;

    let value = stmt
      .query_row(params![NAMESPACE, key], |row| row.get(0))
      .ok();
    Ok(value)
  }

  fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
    match value {
      Some(value) => self
        .conn
        .execute(
          "INSERT OR REPLACE INTO kv (namespace, key, value) VALUES (?, ?, ?)",
          params![NAMESPACE, key, value],
        )
        .map_err(|e| eyre!("Failed to store session field: {}", e))?,
      None => self
        .conn
        .execute(
          "DELETE FROM kv WHERE namespace = ? AND key = ?",
          params![NAMESPACE, key],
        )
        .map_err(|e| eyre!("Failed to remove session field: {}", e))?,
    };
    Ok(())
  }
}
