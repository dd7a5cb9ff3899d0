//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use calendarbot_core::DEFAULT_CALENDAR_ID;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "calendarbot", version)]
#[command(about = "Accept or decline pending calendar invitations based on conflicts")]
pub struct Cli {
    #[command(flatten)]
    pub options: Options,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Poll the calendar and answer pending invitations (default)
    Run,
    /// Authorize calendarbot with Google and cache the session
    Auth,
}

#[derive(Args, Debug, Clone)]
pub struct Options {
    /// Email that the bot answers invitations for
    #[arg(short, long, env = "GOOGLE_EMAIL")]
    pub email: String,

    /// Interval between checks, in seconds
    #[arg(
        short = 'c',
        long,
        env = "CHECK_INTERVAL",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub check_interval: u64,

    /// OAuth client secret file downloaded from Google Cloud Console
    #[arg(long, env = "GOOGLE_CREDENTIALS", default_value = "client_credentials.json")]
    pub credentials: PathBuf,

    /// Where cached OAuth sessions are stored
    #[arg(long, env = "CALENDARBOT_SESSION_DIR")]
    pub session_dir: Option<PathBuf>,

    /// Calendar to watch
    #[arg(long, env = "GOOGLE_CALENDAR_ID", default_value = DEFAULT_CALENDAR_ID)]
    pub calendar_id: String,

    /// Run a single check and exit
    #[arg(long)]
    pub once: bool,

    /// Debug logging
    #[arg(long, env = "DEBUG")]
    pub dbg: bool,
}

impl Options {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}
