//! Persistent storage for the access/refresh token pair.
//!
//! [`TokenStore`] is the capability handed to the HTTP client core and the
//! session. Two backends are provided:
//!
//! - [`MemoryTokenStore`] -- process-local, for tests and throwaway sessions.
//! - [`FileTokenStore`] -- a small JSON file that survives restarts.
//!
//! Neither backend tracks expiry; an expired access token is discovered
//! when the backend rejects it.

use std::path::{Path, PathBuf};

use civic_core::tokens::{TokenKind, TokenPair};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Key-value storage for the two bearer tokens.
///
/// Writes are whole-value replacements, so callers never observe a
/// half-written pair.
pub trait TokenStore: Send + Sync {
    /// Current value of one token, if stored.
    fn get(&self, kind: TokenKind) -> Option<String>;

    /// Replace both tokens.
    fn set(&self, tokens: &TokenPair) -> Result<(), StoreError>;

    /// Replace only the access token (after a refresh).
    fn set_access(&self, access: &str) -> Result<(), StoreError>;

    /// Remove both tokens.
    fn clear(&self) -> Result<(), StoreError>;

    /// `true` when neither token is stored.
    fn is_empty(&self) -> bool {
        self.get(TokenKind::Access).is_none() && self.get(TokenKind::Refresh).is_none()
    }
}

/// On-disk and in-memory representation, keyed by the fixed storage keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
}

impl StoredTokens {
    fn get(&self, kind: TokenKind) -> Option<String> {
        match kind {
            TokenKind::Access => self.access_token.clone(),
            TokenKind::Refresh => self.refresh_token.clone(),
        }
    }

    fn from_pair(tokens: &TokenPair) -> Self {
        Self {
            access_token: Some(tokens.access.clone()),
            refresh_token: Some(tokens.refresh.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `tokens`.
    pub fn with_tokens(tokens: &TokenPair) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens::from_pair(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().get(kind)
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        *self.tokens.write() = StoredTokens::from_pair(tokens);
        Ok(())
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        self.tokens.write().access_token = Some(access.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.tokens.write() = StoredTokens::default();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Token store persisted as a JSON file.
///
/// The file is read once on [`open`](Self::open) and rewritten on every
/// change via a temporary file plus rename. [`clear`](TokenStore::clear)
/// deletes it. Reads are served from memory.
///
/// Writes block: the file is written and synced while the write lock is
/// held, on whatever thread calls in, including async tasks inside
/// [`ApiClient::execute`](crate::ApiClient::execute) during a refresh.
/// A token file is a few hundred bytes and writes happen only on sign-in,
/// refresh, and sign-out, so this suits a CLI. A long-running service with
/// many concurrent sessions should wrap its own store around
/// `tokio::task::spawn_blocking` or keep tokens in memory.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    tokens: RwLock<StoredTokens>,
}

impl FileTokenStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store; an unreadable or malformed file
    /// is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tokens = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => StoredTokens::default(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredTokens::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(
            path = %path.display(),
            has_access = tokens.access_token.is_some(),
            has_refresh = tokens.refresh_token.is_some(),
            "Opened token store",
        );

        Ok(Self {
            path,
            tokens: RwLock::new(tokens),
        })
    }

    /// Location of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `tokens` to disk, replacing the previous file atomically.
    fn persist(&self, tokens: &StoredTokens) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(tokens)?;
        let tmp = self.path.with_extension("tmp");
        write_private(&tmp, content.as_bytes())?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.read().get(kind)
    }

    fn set(&self, tokens: &TokenPair) -> Result<(), StoreError> {
        let mut guard = self.tokens.write();
        let next = StoredTokens::from_pair(tokens);
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn set_access(&self, access: &str) -> Result<(), StoreError> {
        let mut guard = self.tokens.write();
        let next = StoredTokens {
            access_token: Some(access.to_string()),
            ..(*guard).clone()
        };
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.tokens.write();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *guard = StoredTokens::default();
        Ok(())
    }
}

/// Create/truncate `path` readable only by the owner where supported.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
