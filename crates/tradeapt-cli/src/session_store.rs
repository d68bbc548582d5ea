//! Remembered wallet session.
//!
//! A small JSON file records which wallet was connected last, so the next
//! launch can auto-connect it and skip the login screen. It only drives
//! those decisions; the wallet adapter stays the source of truth.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tradeapt_models::{Network, WalletAddress, WalletName};

const APP_DIR: &str = "tradeapt";
const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub wallet_address: WalletAddress,
    pub network: Network,
    pub wallet_name: WalletName,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store at `<config dir>/tradeapt/session.json`.
    pub fn default_location() -> Self {
        Self {
            path: dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SESSION_FILE)),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The stored session, or `None` when absent or unreadable.
    pub fn load(&self) -> Option<StoredSession> {
        let path = self.path.as_ref()?;
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed session file");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) {
        let Some(path) = &self.path else {
            warn!("no config directory, session not saved");
            return;
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = fs::create_dir_all(dir) {
                warn!(path = %dir.display(), error = %e, "failed to create config directory");
                return;
            }
        }
        let json = match serde_json::to_string_pretty(session) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialise session");
                return;
            }
        };
        match fs::write(path, json) {
            Ok(()) => debug!(path = %path.display(), "session saved"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write session file"),
        }
    }

    pub fn clear(&self) {
        let Some(path) = &self.path else { return };
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "session cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove session file"),
        }
    }
}

#[cfg(test)]
pub(crate) fn temp_store() -> SessionStore {
    let dir = std::env::temp_dir().join(format!("tradeapt-test-{}", uuid::Uuid::new_v4()));
    SessionStore::at(dir.join(SESSION_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            wallet_address: WalletAddress::new("0xbeef").unwrap(),
            network: Network::Devnet,
            wallet_name: WalletName::new("Petra"),
        }
    }

    #[test]
    fn missing_file_is_no_session() {
        assert!(temp_store().load().is_none());
    }

    #[test]
    fn save_load_clear() {
        let store = temp_store();
        store.save(&session());
        assert_eq!(store.load(), Some(session()));

        store.clear();
        assert!(store.load().is_none());
        assert!(!store.path().unwrap().exists());
        // clearing twice is harmless
        store.clear();
    }

    #[test]
    fn file_uses_browser_key_names() {
        let store = temp_store();
        store.save(&session());
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path().unwrap()).unwrap()).unwrap();
        assert_eq!(raw["wallet_address"], "0xbeef");
        assert_eq!(raw["network"], "devnet");
        assert_eq!(raw["wallet_name"], "Petra");
    }

    #[test]
    fn malformed_file_is_no_session() {
        let store = temp_store();
        let path = store.path().unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{ not json").unwrap();
        assert!(store.load().is_none());
    }
}
