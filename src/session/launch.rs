//! Client-side launch controller.
//!
//! Mirrors the click handler in `static/main.js`: reset the page, POST
//! `/start`, then show either the conversation or an error.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use super::SessionResponse;

pub const STATUS_CREATING: &str = "Creating session...";
pub const STATUS_READY: &str = "Session ready.";
pub const STATUS_UNEXPECTED: &str = "Unexpected error.";
pub const ERROR_PREFIX: &str = "Error: ";

/// Transport or decode failure during a launch.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Connection failure or a body that is not a session response.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Page state touched by a launch: status text, frame target, open-link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchView {
    status: String,
    frame_src: String,
    link_href: String,
    link_visible: bool,
    phase: LaunchPhase,
}

impl LaunchView {
    /// Reset for a new launch.
    pub fn begin(&mut self) {
        self.status = STATUS_CREATING.to_string();
        self.frame_src.clear();
        self.link_visible = false;
        self.phase = LaunchPhase::Loading;
    }

    /// Apply the outcome of the `/start` request.
    ///
    /// Only the status text changes on failure.
    pub fn settle(&mut self, outcome: Result<SessionResponse, LaunchError>) {
        let response = match outcome {
            Ok(response) => response,
            Err(_) => {
                self.status = STATUS_UNEXPECTED.to_string();
                self.phase = LaunchPhase::Failed;
                return;
            }
        };

        if let Some(error) = response.error_message() {
            self.status = format!("{ERROR_PREFIX}{error}");
            self.phase = LaunchPhase::Failed;
            return;
        }

        // A ready body without a URL leaves the frame and link empty.
        let conversation_url = response.conversation_url.unwrap_or_default();
        self.status = STATUS_READY.to_string();
        self.frame_src.clone_from(&conversation_url);
        self.link_href = conversation_url;
        self.link_visible = true;
        self.phase = LaunchPhase::Ready;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn frame_src(&self) -> &str {
        &self.frame_src
    }

    pub fn link_href(&self) -> &str {
        &self.link_href
    }

    pub fn is_link_visible(&self) -> bool {
        self.link_visible
    }

    pub fn phase(&self) -> LaunchPhase {
        self.phase
    }
}

impl fmt::Display for LaunchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if self.link_visible {
            write!(f, "\nOpen in new tab: {}", self.link_href)?;
        }
        Ok(())
    }
}

/// Performs launches against a server exposing `POST /start`.
#[derive(Debug, Clone)]
pub struct SessionLauncher {
    start_url: Url,
    http: reqwest::Client,
}

impl SessionLauncher {
    /// `server` is the base URL, e.g. `http://127.0.0.1:3000`.
    pub fn new(server: &str) -> Result<Self, LaunchError> {
        Self::with_client(server, reqwest::Client::new())
    }

    pub fn with_client(server: &str, http: reqwest::Client) -> Result<Self, LaunchError> {
        let start_url = Url::parse(server)?.join("/start")?;
        Ok(Self { start_url, http })
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// POST `/start` and decode the body whatever the status code.
    pub async fn request(&self) -> Result<SessionResponse, LaunchError> {
        let response = self.http.post(self.start_url.clone()).send().await?;
        Ok(response.json().await?)
    }

    /// Run one full launch cycle against `view`.
    pub async fn launch(&self, view: &mut LaunchView) {
        view.begin();
        info!(name: "session.launch.requested", url = %self.start_url, "Creating session");

        let outcome = self.request().await;
        if let Err(e) = &outcome {
            warn!(name: "session.launch.failed", error = %e, "Launch request failed");
        }
        view.settle(outcome);
    }
}
