//! Google Calendar provider for calendarbot.
//!
//! Credentials and tokens live on disk:
//!   ./client_credentials.json                      (OAuth client, user-provided)
//!   ~/.config/calendarbot/session/{account}.toml   (cached tokens)

pub mod app_config;
pub mod auth;
pub mod client;
pub mod convert;
pub mod session;

pub use app_config::Credentials;
pub use client::GoogleCalendar;
pub use session::{Session, default_session_dir};
