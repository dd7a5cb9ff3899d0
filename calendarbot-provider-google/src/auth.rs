//! Interactive OAuth consent flow.
//!
//! Prints (and tries to open) Google's consent URL, then waits for the
//! redirect on a loopback port to pick up the authorization code.

use std::path::Path;

use anyhow::{Context, Result};
use google_calendar::Client;
use google_calendar::types::MinAccessRole;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

use crate::app_config::Credentials;
use crate::session::{Session, SessionData};

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

const REDIRECT_PORT: u16 = 8085;

pub fn redirect_uri() -> String {
    format!("http://localhost:{}/callback", REDIRECT_PORT)
}

fn redirect_address() -> String {
    format!("127.0.0.1:{}", REDIRECT_PORT)
}

/// Run the consent flow for `account_email` and cache the resulting session.
pub async fn authenticate(
    creds: &Credentials,
    session_dir: &Path,
    account_email: &str,
) -> Result<Session> {
    let mut client = Client::new(
        creds.client_id.clone(),
        creds.client_secret.clone(),
        redirect_uri(),
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    eprintln!("\nGo to the following link in your browser to authorize calendarbot:\n");
    eprintln!("{}\n", auth_url);

    if open::that(&auth_url).is_err() {
        eprintln!("(Could not open browser automatically, please copy the URL above)");
    }

    let (code, state) = wait_for_callback().await?;

    tracing::info!("received authorization code, exchanging for tokens");

    let tokens = client
        .get_access_token(&code, &state)
        .await
        .context("Unable to retrieve token from web")?;

    let session = Session::new(session_dir, account_email, SessionData::from(&tokens));
    check_account(&session.client(creds), account_email).await;

    eprintln!("Saving credential file to: {}", session.path().display());
    session.save()?;

    Ok(session)
}

/// Warn when the user consented with a different Google account than the
/// one calendarbot answers for.
async fn check_account(client: &Client, account_email: &str) {
    let primary = match client
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
    {
        Ok(response) => response.body.into_iter().find(|cal| cal.primary),
        Err(e) => {
            tracing::warn!("could not verify authorized account: {}", e);
            return;
        }
    };

    if let Some(cal) = primary.filter(|cal| cal.id != account_email) {
        tracing::warn!(
            "authorized account {} differs from configured email {}",
            cal.id,
            account_email
        );
    }
}

/// Accept one connection on the redirect port and pull `code` and `state`
/// out of its request line.
async fn wait_for_callback() -> Result<(String, String)> {
    let listener = TcpListener::bind(redirect_address())
        .await
        .with_context(|| format!("Failed to bind to port {}", REDIRECT_PORT))?;

    eprintln!("Waiting for OAuth callback on port {}...", REDIRECT_PORT);

    let (mut stream, _) = listener
        .accept()
        .await
        .context("Failed to accept connection")?;

    let mut request_line = String::new();
    BufReader::new(&mut stream)
        .read_line(&mut request_line)
        .await?;

    let result = parse_callback(&request_line);

    let body = match result {
        Ok(_) => "<h1>Authentication successful!</h1>\
            <p>You can close this window and return to the terminal.</p>",
        Err(_) => "<h1>Authentication failed</h1><p>Check the terminal for details.</p>",
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>{}</body></html>",
        body
    );

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await?;

    result
}

fn parse_callback(request_line: &str) -> Result<(String, String)> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .context("Invalid request")?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    if let Some((_, error)) = url.query_pairs().find(|(k, _)| k == "error") {
        anyhow::bail!("Authorization was denied: {}", error);
    }

    let code = url
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
        .context("No code in callback")?;

    let state = url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .context("No state in callback")?;

    Ok((code, state))
}
