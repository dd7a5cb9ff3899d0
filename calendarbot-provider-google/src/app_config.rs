//! OAuth client credentials for the Google Calendar API.
//!
//! Read from the JSON file Google Cloud Console offers for download
//! (`client_credentials.json` by default).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Google wraps the credentials in `installed` for desktop apps and `web`
/// for web apps.
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<Credentials>,
    web: Option<Credentials>,
}

pub fn load(path: &Path) -> Result<Credentials> {
    if !path.exists() {
        anyhow::bail!(
            "Google client secret file not found at {}.\n\n\
            Create an OAuth client ID (type \"Desktop app\") at\n\
            https://console.cloud.google.com/apis/credentials\n\
            and download its JSON to that path.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Unable to read client secret file {}", path.display()))?;

    parse(&contents)
        .with_context(|| format!("Unable to parse client secret file {}", path.display()))
}

fn parse(contents: &str) -> Result<Credentials> {
    let file: ClientSecretFile = serde_json::from_str(contents)?;

    file.installed
        .or(file.web)
        .context("Expected an \"installed\" or \"web\" section")
}
