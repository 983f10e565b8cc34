/*!
 * Credential storage.
 *
 * The backend token is kept in a small key/value store outside the main
 * database. `MemoryCredentialStore` serves tests and guest sessions;
 * `FileCredentialStore` persists a JSON map readable only by the owner.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::CredentialError;

/// Key under which the backend token is stored
pub const BACKEND_TOKEN_KEY: &str = "backend_token";

/// Default credentials filename
const DEFAULT_CREDENTIALS_FILENAME: &str = "credentials.json";

/// Key/value store for secrets
pub trait CredentialStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError>;

    /// Value stored under `key`
    fn load(&self, key: &str) -> Option<String>;

    /// Forget `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), CredentialError>;

    /// Store the backend token
    fn save_token(&self, token: &str) -> Result<(), CredentialError> {
        self.save(BACKEND_TOKEN_KEY, token)
    }

    /// Backend token, if signed in
    fn load_token(&self) -> Option<String> {
        self.load(BACKEND_TOKEN_KEY)
    }

    /// Forget the backend token
    fn remove_token(&self) -> Result<(), CredentialError> {
        self.remove(BACKEND_TOKEN_KEY)
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON file store with owner-only permissions
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Default location under the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lexicard").join(DEFAULT_CREDENTIALS_FILENAME))
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| CredentialError::Corrupted(e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| CredentialError::Corrupted(e.to_string()))?;

        // The file is only ever replaced by rename, never rewritten in place
        let temp_path = self.temp_path();
        if let Err(e) = Self::write_private(&temp_path, content.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!("Credentials written to {:?}", self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILENAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write `content` to a fresh file that only the owner can read
    fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path)?;
        // A leftover temp file keeps its old mode, so tighten it explicitly
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(content)?;
        file.sync_all()
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn load(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock();
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("Could not read credentials from {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
