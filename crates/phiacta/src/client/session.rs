//! Persistent bearer-token storage.
//!
//! The token survives between invocations in a single file. Reads go through
//! an in-memory copy guarded by a `RwLock`; the file is the source of truth
//! only at [`TokenStore::load`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// File-backed store for the session token.
#[derive(Clone)]
pub struct TokenStore {
    path: PathBuf,
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// Create an empty store bound to `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), token: Arc::new(RwLock::new(None)) }
    }

    /// Read the token file into memory. A missing or blank file means no token.
    pub async fn load(&self) -> std::io::Result<Option<String>> {
        let token = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        tracing::debug!(path = %self.path.display(), present = token.is_some(), "Loaded token");
        *self.token.write().await = token.clone();
        Ok(token)
    }

    /// Current token, if any.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Persist `token`, creating parent directories as needed.
    pub async fn set(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        write_private(&self.path, token).await?;

        *self.token.write().await = Some(token.to_string());
        tracing::debug!(path = %self.path.display(), "Stored token");
        Ok(())
    }

    /// Forget the token in memory and on disk. Clearing twice is fine.
    pub async fn clear(&self) -> std::io::Result<()> {
        *self.token.write().await = None;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Cleared token");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Path of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("path", &self.path).finish()
    }
}

/// Write `contents` to a file only the owner can read.
///
/// A new file is created with mode 0600; an existing one is narrowed before
/// the token is written.
async fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
    }
    file.write_all(contents.as_bytes()).await?;
    file.flush().await
}

/// Ensures only one of several concurrently failing requests performs the
/// 401 logout.
#[derive(Debug, Default, Clone)]
pub struct LogoutCoordinator {
    in_progress: Arc<AtomicBool>,
}

impl LogoutCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the logout. Returns `false` if another caller already holds it.
    pub fn begin(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the logout so a later session can be expired again.
    pub fn finish(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}
