// src/credentials.rs
//! Durable storage for the access/refresh credential pair. Tokens survive
//! process restarts as two fixed-name files under the client home directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::types::TokenPair;

const ACCESS_TOKEN_FILE: &str = "access_token";
const REFRESH_TOKEN_FILE: &str = "refresh_token";

pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn access_path(&self) -> PathBuf {
        self.dir.join(ACCESS_TOKEN_FILE)
    }

    fn refresh_path(&self) -> PathBuf {
        self.dir.join(REFRESH_TOKEN_FILE)
    }

    /// Persist both tokens. The access token is written last so a readable
    /// access token always implies the refresh token landed too.
    pub fn save(&self, tokens: &TokenPair) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                warn!("Failed to restrict {}: {}", self.dir.display(), e);
            }
        }

        write_token(&self.refresh_path(), &tokens.refresh)?;
        write_token(&self.access_path(), &tokens.access)?;
        Ok(())
    }

    /// The persisted access token, if any. Whitespace-only files count as
    /// absent.
    pub fn access_token(&self) -> Option<String> {
        read_token(&self.access_path())
    }

    pub fn refresh_token(&self) -> Option<String> {
        read_token(&self.refresh_path())
    }

    /// Remove both tokens. Never fails: a missing file is already the
    /// desired state and anything else is only worth a warning.
    pub fn clear(&self) {
        for path in [self.access_path(), self.refresh_path()] {
            if path.exists() {
                if let Err(e) = fs::remove_file(&path) {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

fn write_token(path: &PathBuf, token: &str) -> Result<()> {
    fs::write(path, token).with_context(|| format!("Failed to write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict {}", path.display()))?;
    }
    Ok(())
}

fn read_token(path: &PathBuf) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
