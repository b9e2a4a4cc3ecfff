//! Admin session gate.
//!
//! A convenience gate, not access control: the shared secret is known to
//! every client and the store accepts any mutation regardless of role.
//! The gate decides which operations a client offers, and hands out the
//! resulting [`Role`] as an explicit value rather than a global flag.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;

use crate::error::CoreError;

/// Storage key holding the persisted admin flag.
pub const ADMIN_FLAG_KEY: &str = "ideaboard_admin";

/// The only stored value that restores an admin session.
pub const ADMIN_FLAG_MARKER: &str = "true";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Capability a client holds for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Visitor,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

// ---------------------------------------------------------------------------
// AdminSecret
// ---------------------------------------------------------------------------

/// The single shared admin code.
///
/// An unconfigured secret never matches, so a deployment without
/// `ADMIN_CODE` simply has no admin sessions.
#[derive(Debug, Clone, Default)]
pub struct AdminSecret(Option<String>);

impl AdminSecret {
    pub fn new(code: Option<String>) -> Self {
        Self(code.filter(|c| !c.is_empty()))
    }

    /// Read `ADMIN_CODE` from the environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var("ADMIN_CODE").ok())
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Case-sensitive exact comparison.
    pub fn verify(&self, code: &str) -> bool {
        self.0.as_deref() == Some(code)
    }
}

// ---------------------------------------------------------------------------
// Durable key-value storage
// ---------------------------------------------------------------------------

/// Durable client-local string storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Non-durable storage for tests and ephemeral clients.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Internal("key-value store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Storage persisted as a flat JSON object in a single file.
///
/// A missing file reads as empty. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(CoreError::Internal(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            CoreError::Internal(format!("Corrupt storage file {}: {e}", self.path.display()))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| {
            CoreError::Internal(format!("Failed to write {}: {e}", self.path.display()))
        })
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), CoreError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| CoreError::Internal("key-value store lock poisoned".into()))?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

// ---------------------------------------------------------------------------
// SessionGate
// ---------------------------------------------------------------------------

/// Tracks whether this client is in admin mode, persisting the choice.
pub struct SessionGate<S: KeyValueStore> {
    storage: S,
    secret: AdminSecret,
    role: Role,
}

impl<S: KeyValueStore> SessionGate<S> {
    /// A fresh gate starts as [`Role::Visitor`]; call [`restore`](Self::restore)
    /// to pick up a persisted session.
    pub fn new(storage: S, secret: AdminSecret) -> Self {
        Self {
            storage,
            secret,
            role: Role::Visitor,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Restore the persisted flag. Anything but the exact marker is a visitor.
    pub fn restore(&mut self) -> bool {
        let admin = match self.storage.get(ADMIN_FLAG_KEY) {
            Ok(value) => value.as_deref() == Some(ADMIN_FLAG_MARKER),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted admin flag");
                false
            }
        };
        self.role = if admin { Role::Admin } else { Role::Visitor };
        admin
    }

    /// Enter admin mode if `code` matches the secret. Nothing is persisted
    /// on a mismatch.
    pub fn login(&mut self, code: &str) -> bool {
        if !self.secret.is_configured() {
            tracing::warn!("Admin login attempted but ADMIN_CODE is not configured");
            return false;
        }
        if !self.secret.verify(code) {
            return false;
        }
        self.role = Role::Admin;
        if let Err(e) = self.storage.set(ADMIN_FLAG_KEY, ADMIN_FLAG_MARKER) {
            tracing::warn!(error = %e, "Admin session will not survive a restart");
        }
        true
    }

    /// Leave admin mode and forget the persisted flag.
    pub fn logout(&mut self) {
        self.role = Role::Visitor;
        if let Err(e) = self.storage.remove(ADMIN_FLAG_KEY) {
            tracing::warn!(error = %e, "Failed to clear persisted admin flag");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> SessionGate<MemoryKeyValueStore> {
        SessionGate::new(
            MemoryKeyValueStore::new(),
            AdminSecret::new(Some("s3cret".into())),
        )
    }

    #[test]
    fn login_with_matching_code_persists_flag() {
        let mut gate = gate();
        assert!(gate.login("s3cret"));
        assert_eq!(gate.role(), Role::Admin);
        assert_eq!(
            gate.storage.get(ADMIN_FLAG_KEY).unwrap().as_deref(),
            Some(ADMIN_FLAG_MARKER)
        );
    }

    #[test]
    fn login_is_case_sensitive_and_persists_nothing_on_mismatch() {
        let mut gate = gate();
        assert!(!gate.login("S3CRET"));
        assert!(!gate.login("s3cret "));
        assert_eq!(gate.role(), Role::Visitor);
        assert!(gate.storage.get(ADMIN_FLAG_KEY).unwrap().is_none());
    }

    #[test]
    fn unconfigured_secret_never_matches() {
        let mut gate = SessionGate::new(MemoryKeyValueStore::new(), AdminSecret::new(None));
        assert!(!gate.login(""));
        let mut gate = SessionGate::new(MemoryKeyValueStore::new(), AdminSecret::new(Some(String::new())));
        assert!(!gate.login(""));
    }

    #[test]
    fn logout_clears_flag() {
        let mut gate = gate();
        gate.login("s3cret");
        gate.logout();
        assert_eq!(gate.role(), Role::Visitor);
        assert!(!gate.restore());
    }

    #[test]
    fn restore_accepts_only_exact_marker() {
        let mut gate = gate();
        for value in ["TRUE", "1", "yes", "true "] {
            gate.storage.set(ADMIN_FLAG_KEY, value).unwrap();
            assert!(!gate.restore(), "{value:?} must not restore admin");
        }
        gate.storage.set(ADMIN_FLAG_KEY, "true").unwrap();
        assert!(gate.restore());
        assert!(gate.role().is_admin());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut first = SessionGate::new(
            FileKeyValueStore::new(&path),
            AdminSecret::new(Some("s3cret".into())),
        );
        assert!(first.login("s3cret"));

        let mut second = SessionGate::new(
            FileKeyValueStore::new(&path),
            AdminSecret::new(Some("s3cret".into())),
        );
        assert!(second.restore());
    }

    #[test]
    fn file_store_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("absent.json"));
        assert!(store.get(ADMIN_FLAG_KEY).unwrap().is_none());
        store.remove(ADMIN_FLAG_KEY).unwrap();
    }

    #[test]
    fn corrupt_file_restores_as_visitor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let mut gate = SessionGate::new(
            FileKeyValueStore::new(&path),
            AdminSecret::new(Some("s3cret".into())),
        );
        assert!(!gate.restore());
    }
}
