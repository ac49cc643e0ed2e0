//! Coach Launcher
//!
//! A small web app that starts a Tavus conversational video session on
//! demand and embeds it in the page.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving the page, `POST /start` and static assets
//! - **Tavus client**: creates conversations via the Tavus v2 API
//! - **Launch controller**: the click handler's state model and a CLI launcher
//!
//! # Modules
//!
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`server`]: router and handlers
//! - [`session`]: `/start` wire format and launch controller
//! - [`tavus`]: Tavus API client
//! - [`ui`]: server-rendered HTML

#![allow(clippy::missing_fields_in_debug)]

pub mod config;
pub mod server;
pub mod session;
pub mod tavus;
pub mod ui;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::tavus::TavusClient;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Tavus API client.
    pub tavus: Arc<TavusClient>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
