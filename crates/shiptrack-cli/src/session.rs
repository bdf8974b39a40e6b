//! # Session File
//!
//! The signed-in user's tokens, persisted as JSON between invocations.
//! Default location is `.shiptrack-session.json` in the working directory;
//! override with `--session` or `SHIPTRACK_SESSION`.
//!
//! On Unix the file is written with mode `0600`. Tokens are wiped from memory
//! when a [`Session`] is dropped.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiptrack_supabase::AuthSession;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default session file name.
pub const DEFAULT_SESSION_FILE: &str = ".shiptrack-session.json";

/// A saved sign-in.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[zeroize(skip)]
    pub saved_at: DateTime<Utc>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}

impl Session {
    /// Capture the tokens of a provider session. `email` is used when the
    /// provider omits the user object.
    pub fn from_auth(auth: &AuthSession, email: &str) -> Self {
        let user = auth.user.as_ref();
        Self {
            access_token: auth.access_token.as_str().to_owned(),
            refresh_token: auth.refresh_token.as_ref().map(|t| t.as_str().to_owned()),
            user_id: user.and_then(|u| u.id.clone()),
            email: user
                .and_then(|u| u.email.clone())
                .or_else(|| Some(email.to_string())),
            saved_at: Utc::now(),
        }
    }

    /// Read the session file. `None` when it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session file {}", path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("session file {} is corrupt", path.display()))?;
        Ok(Some(session))
    }

    /// Write the session file, replacing any previous one.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        write_private(path, json.as_bytes())
            .with_context(|| format!("failed to write session file {}", path.display()))?;
        restrict_permissions(path)?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    /// Delete the session file. Returns whether one existed.
    pub fn remove(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)
            .with_context(|| format!("failed to remove session file {}", path.display()))?;
        Ok(true)
    }
}

/// Create or truncate `path`; a new file is owner-only from the start.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

/// Tighten a file that existed before with a wider mode.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
