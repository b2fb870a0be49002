//! Session context.
//!
//! Identity of the signed-in user, passed explicitly to the client and the
//! portal views. `SessionStore` keeps it in a small SQLite file between CLI
//! invocations.

use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Result, SchoolHubError};
use crate::types::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user_id: String,
    role: Role,
    student_id: Option<String>,
    parent_id: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            student_id: None,
            parent_id: None,
            token: None,
        }
    }

    pub fn with_student_id(mut self, id: impl Into<String>) -> Self {
        self.student_id = Some(id.into());
        self
    }

    pub fn with_parent_id(mut self, id: impl Into<String>) -> Self {
        self.parent_id = Some(id.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Bearer token for `Authorization` headers, if the user has one.
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Student id the portal acts on: the student's own record, or the one a
    /// parent picked.
    pub fn require_student_id(&self) -> Result<&str> {
        self.student_id()
            .ok_or_else(|| SchoolHubError::Session("no student selected in session".into()))
    }
}

/// SQLite-backed persistence for the current session.
pub struct SessionStore {
    conn: Mutex<Connection>,
}

impl SessionStore {
    /// Open or create the session database. `:memory:` is accepted.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && path != Path::new(":memory:")
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| SchoolHubError::Session(format!("Session DB open error: {e}")))?;
        let store = Self { conn: Mutex::new(conn) };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                student_id TEXT,
                parent_id TEXT,
                token TEXT,
                updated_at TEXT DEFAULT (datetime('now'))
            );",
        )
        .map_err(|e| SchoolHubError::Session(format!("Migration error: {e}")))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| SchoolHubError::Session(format!("Lock: {e}")))
    }

    /// Current session, if one was saved.
    pub fn load(&self) -> Result<Option<Session>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT user_id, role, student_id, parent_id, token FROM session WHERE key = 'current'",
                [],
                |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, Option<String>>(2)?,
                        r.get::<_, Option<String>>(3)?,
                        r.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| SchoolHubError::Session(format!("Load session: {e}")))?;

        let Some((user_id, role, student_id, parent_id, token)) = row else {
            return Ok(None);
        };
        Ok(Some(Session {
            user_id,
            role: role.parse()?,
            student_id,
            parent_id,
            token,
        }))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO session (key, user_id, role, student_id, parent_id, token, updated_at)
             VALUES ('current', ?1, ?2, ?3, ?4, ?5, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
                user_id = excluded.user_id,
                role = excluded.role,
                student_id = excluded.student_id,
                parent_id = excluded.parent_id,
                token = excluded.token,
                updated_at = excluded.updated_at",
            params![
                session.user_id,
                session.role.as_str(),
                session.student_id,
                session.parent_id,
                session.token,
            ],
        )
        .map_err(|e| SchoolHubError::Session(format!("Save session: {e}")))?;
        tracing::debug!(user_id = %session.user_id, role = %session.role, "session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM session WHERE key = 'current'", [])
            .map_err(|e| SchoolHubError::Session(format!("Clear session: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SessionStore {
        SessionStore::open(Path::new(":memory:")).unwrap()
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(temp_store().load().unwrap(), None);
    }

    #[test]
    fn test_save_load_clear() {
        let store = temp_store();
        let session = Session::new("u-7", Role::Parent)
            .with_parent_id("p-1")
            .with_student_id("s-3")
            .with_token("jwt-abc");
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.bearer(), Some("jwt-abc"));
        assert_eq!(loaded.require_student_id().unwrap(), "s-3");

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let store = temp_store();
        store.save(&Session::new("u-1", Role::Admin)).unwrap();
        store.save(&Session::new("u-2", Role::Teacher)).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user_id(), "u-2");
        assert_eq!(loaded.role(), Role::Teacher);
        assert_eq!(loaded.bearer(), None);
    }

    #[test]
    fn test_blank_token_ignored() {
        let session = Session::new("u-1", Role::Nurse).with_token("  ");
        assert_eq!(session.bearer(), None);
    }

    #[test]
    fn test_require_student_id_without_selection() {
        let session = Session::new("u-1", Role::Parent);
        assert!(matches!(
            session.require_student_id(),
            Err(SchoolHubError::Session(_))
        ));
    }
}
