use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: &[&str] = &[
    "calendarbot",
    "calendarbot_core",
    "calendarbot_provider_google",
];

/// `RUST_LOG` wins when set; otherwise our crates log at info, or debug
/// with source locations when `debug` is on.
pub fn init(debug: bool) {
    let level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(level).into()),
        )
        .with(
            fmt::layer()
                .with_target(debug)
                .with_file(debug)
                .with_line_number(debug),
        )
        .init();
}

fn default_directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, level))
        .collect::<Vec<_>>()
        .join(",")
}
