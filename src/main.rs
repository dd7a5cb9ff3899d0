//! calendarbot - answers pending Google Calendar invitations.
//!
//! Every check interval, each upcoming event the user hasn't answered yet
//! is accepted, or declined if it overlaps an event the user already
//! accepted that day.

mod config;
mod logging;
mod scheduler;

use anyhow::Result;
use calendarbot_core::run_once;
use calendarbot_provider_google::{GoogleCalendar, Session, app_config, auth, default_session_dir};
use chrono::Utc;
use clap::Parser;
use config::{Cli, Command, Options};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.options.dbg);
    tracing::info!("calendarbot {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("options: {:?}", cli.options);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => cmd_run(&cli.options).await,
        Command::Auth => cmd_auth(&cli.options).await,
    }
}

async fn cmd_auth(options: &Options) -> Result<()> {
    let creds = app_config::load(&options.credentials)?;
    let session_dir = session_dir(options)?;

    auth::authenticate(&creds, &session_dir, &options.email).await?;

    println!("\nAuthorized as: {}", options.email);
    println!("Run `calendarbot -e {}` to start answering invitations.", options.email);

    Ok(())
}

async fn cmd_run(options: &Options) -> Result<()> {
    let creds = app_config::load(&options.credentials)?;
    let session_dir = session_dir(options)?;

    let session = match Session::load(&session_dir, &options.email)? {
        Some(session) => session,
        None => {
            tracing::info!("no cached session for {}, starting authorization", options.email);
            auth::authenticate(&creds, &session_dir, &options.email).await?
        }
    };

    let calendar = GoogleCalendar::connect(
        creds,
        session,
        options.calendar_id.as_str(),
        options.email.as_str(),
    )
    .await?;

    tracing::info!(
        "checking calendar {} as {} every {}s",
        options.calendar_id,
        options.email,
        options.check_interval
    );

    if options.once {
        let report = run_once(&calendar, &options.email, Utc::now()).await?;
        tracing::info!("{:?}", report);
        return Ok(());
    }

    scheduler::run(
        &calendar,
        &options.email,
        options.interval(),
        scheduler::shutdown_signal(),
    )
    .await;

    Ok(())
}

fn session_dir(options: &Options) -> Result<std::path::PathBuf> {
    match &options.session_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_session_dir(),
    }
}
