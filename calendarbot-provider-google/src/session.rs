//! Cached OAuth tokens for the configured account.
//!
//! One TOML file per account under the session directory, readable by the
//! owner only.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::Credentials;

/// Refresh this long before the token actually expires.
const EXPIRY_LEEWAY: Duration = Duration::seconds(60);

pub struct Session {
    path: PathBuf,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
            expires_at: Utc::now() + Duration::seconds(tokens.expires_in),
        }
    }
}

/// `~/.config/calendarbot/session` on Linux.
pub fn default_session_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("calendarbot")
        .join("session"))
}

impl Session {
    pub fn path_for_account(dir: &Path, account_email: &str) -> PathBuf {
        let email_slug = account_email.replace(['/', '\\', ':'], "_");
        dir.join(format!("{}.toml", email_slug))
    }

    pub fn new(dir: &Path, account_email: &str, data: SessionData) -> Self {
        Session {
            path: Self::path_for_account(dir, account_email),
            data,
        }
    }

    /// `Ok(None)` when nothing has been cached for the account yet.
    pub fn load(dir: &Path, account_email: &str) -> Result<Option<Self>> {
        let path = Self::path_for_account(dir, account_email);

        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google OAuth session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google OAuth session from {}", path.display())
        })?;

        Ok(Some(Session { path, data }))
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write session to {}", self.path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", self.path.display()))?;
        }

        tracing::debug!("saved OAuth session to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() + EXPIRY_LEEWAY >= self.data.expires_at
    }

    pub fn client(&self, creds: &Credentials) -> Client {
        Client::new(
            creds.client_id.clone(),
            creds.client_secret.clone(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        )
    }

    pub async fn refresh_if_needed(&mut self, creds: &Credentials) -> Result<()> {
        if self.is_expired() {
            self.refresh(creds).await?;
        }
        Ok(())
    }

    async fn refresh(&mut self, creds: &Credentials) -> Result<()> {
        tracing::debug!("access token expired, refreshing");

        let mut tokens = self
            .client(creds)
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()
    }
}
