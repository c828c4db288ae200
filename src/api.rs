//! HTTP client for the assistant service.
//!
//! Two endpoints: `POST /api/process` answers a command, `GET /api/songs`
//! lists the playable song library. Transport failures where no connection
//! could be established map to [`WidgetError::Offline`] so callers can show
//! the offline message instead of the generic one.

use crate::error::{Result, WidgetError};
use serde::Deserialize;

/// Action marker on a reply that gates its URL behind a user click.
const ACTION_PENDING: &str = "pending_action";

/// Reply payload from `POST /api/process`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    /// Text to render and speak.
    pub response: String,
    /// Optional action marker (currently only `"pending_action"`).
    #[serde(default)]
    pub action: Option<String>,
    /// URL accompanying the action, when present.
    #[serde(default)]
    pub url: Option<String>,
}

impl AssistantReply {
    /// URL to gate behind a click, when the reply asks for one.
    #[must_use]
    pub fn pending_action_url(&self) -> Option<&str> {
        match (self.action.as_deref(), self.url.as_deref()) {
            (Some(ACTION_PENDING), Some(url)) => Some(url),
            _ => None,
        }
    }
}

/// Reply payload from `GET /api/songs`.
#[derive(Debug, Clone, Deserialize)]
struct SongsReply {
    songs: Vec<SongEntry>,
}

/// One entry of the playable song library.
#[derive(Debug, Clone, Deserialize)]
pub struct SongEntry {
    /// Normalized lookup key (lowercase, underscores for spaces).
    pub key: String,
    /// Display name.
    pub name: String,
    /// Playback URL.
    pub url: String,
}

/// Client for the assistant service endpoints.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    /// Create a client for a service rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Base URL the client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a command for processing and return the reply.
    pub async fn process(&self, command: &str) -> Result<AssistantReply> {
        let url = format!("{}/api/process", self.base_url);
        tracing::debug!(%url, command, "sending command");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "command": command }))
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(WidgetError::Api(format!(
                "service returned {}",
                response.status()
            )));
        }

        response
            .json::<AssistantReply>()
            .await
            .map_err(|e| WidgetError::Api(format!("invalid reply payload: {e}")))
    }

    /// Fetch the current song library.
    ///
    /// Fetched fresh on every lookup so library changes on the service side
    /// are picked up without a restart.
    pub async fn songs(&self) -> Result<Vec<SongEntry>> {
        let url = format!("{}/api/songs", self.base_url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            return Err(WidgetError::Api(format!(
                "service returned {}",
                response.status()
            )));
        }

        response
            .json::<SongsReply>()
            .await
            .map(|reply| reply.songs)
            .map_err(|e| WidgetError::Api(format!("invalid song list: {e}")))
    }
}

fn classify_transport_error(e: reqwest::Error) -> WidgetError {
    if e.is_connect() {
        WidgetError::Offline
    } else {
        WidgetError::Api(e.to_string())
    }
}
