//! Runs the poll cycle on a fixed interval until shutdown.

use std::future::Future;
use std::time::Duration;

use calendarbot_core::{CalendarClient, run_once};
use chrono::Utc;
use tokio::time::MissedTickBehavior;

/// Run a cycle now and then every `every` until `shutdown` resolves.
///
/// Cycles never overlap: the next tick is only awaited once the previous
/// cycle finished. Shutdown also abandons a cycle that is still waiting on
/// the calendar.
pub async fn run<C, F>(client: &C, email: &str, every: Duration, shutdown: F)
where
    C: CalendarClient,
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("shutdown requested, stopping");
                return;
            }
            _ = ticker.tick() => {}
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("shutdown requested during a cycle, stopping");
                return;
            }
            _ = cycle(client, email) => {}
        }
    }
}

pub async fn cycle<C: CalendarClient>(client: &C, email: &str) {
    if let Err(e) = run_once(client, email, Utc::now()).await {
        tracing::error!("unable to retrieve upcoming events: {}", e);
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
