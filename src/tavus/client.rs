//! HTTP client for `POST /conversations`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use super::error::{Result, TavusError};
use crate::config::DEFAULT_TAVUS_URL;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MIN_PARTICIPANTS: u32 = 2;

/// How the replica trades latency against retrieval depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    Speed,
    #[default]
    Balanced,
    Quality,
}

/// Body of a create-conversation call.
///
/// Required flags are always sent; optional fields are omitted when unset
/// or empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateConversationRequest {
    persona_id: String,
    replica_id: String,
    require_auth: bool,
    max_participants: u32,
    test_mode: bool,
    audio_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversational_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_greeting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    memory_stores: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    document_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_retrieval_strategy: Option<RetrievalStrategy>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    properties: serde_json::Map<String, serde_json::Value>,
}

impl CreateConversationRequest {
    pub fn new(persona_id: impl Into<String>, replica_id: impl Into<String>) -> Self {
        Self {
            persona_id: persona_id.into(),
            replica_id: replica_id.into(),
            require_auth: false,
            max_participants: MIN_PARTICIPANTS,
            test_mode: false,
            audio_only: false,
            conversation_name: None,
            conversational_context: None,
            custom_greeting: None,
            callback_url: None,
            memory_stores: Vec::new(),
            document_ids: Vec::new(),
            document_retrieval_strategy: None,
            properties: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn conversation_name(mut self, name: impl Into<String>) -> Self {
        self.conversation_name = non_empty(name.into());
        self
    }

    #[must_use]
    pub fn conversational_context(mut self, context: impl Into<String>) -> Self {
        self.conversational_context = non_empty(context.into());
        self
    }

    #[must_use]
    pub fn custom_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.custom_greeting = non_empty(greeting.into());
        self
    }

    #[must_use]
    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = non_empty(url.into());
        self
    }

    #[must_use]
    pub fn memory_stores(mut self, stores: Vec<String>) -> Self {
        self.memory_stores = stores;
        self
    }

    #[must_use]
    pub fn document_ids(mut self, ids: Vec<String>) -> Self {
        self.document_ids = ids;
        self
    }

    #[must_use]
    pub fn document_retrieval_strategy(mut self, strategy: RetrievalStrategy) -> Self {
        self.document_retrieval_strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn require_auth(mut self, require: bool) -> Self {
        self.require_auth = require;
        self
    }

    /// Clamped to at least two participants.
    #[must_use]
    pub fn max_participants(mut self, max: u32) -> Self {
        self.max_participants = max.max(MIN_PARTICIPANTS);
        self
    }

    #[must_use]
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    #[must_use]
    pub fn audio_only(mut self, enabled: bool) -> Self {
        self.audio_only = enabled;
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    pub fn replica_id(&self) -> &str {
        &self.replica_id
    }

    pub fn document_id_list(&self) -> &[String] {
        &self.document_ids
    }

    /// Pretty-printed JSON body, for logging.
    pub fn preview(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Fields of a created conversation the app cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateConversationResult {
    pub conversation_id: String,
    pub conversation_url: String,
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default)]
    pub meeting_token: Option<String>,
}

fn unknown_status() -> String {
    "unknown".to_string()
}

/// Tavus API client.
#[derive(Clone)]
pub struct TavusClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for TavusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavusClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TavusClient {
    /// Create a client against the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_TAVUS_URL)
    }

    /// Create a client against a custom base URL (trailing `/` is ignored).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TavusError::MissingApiKey);
        }

        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a conversation session.
    pub async fn create_conversation(
        &self,
        request: &CreateConversationRequest,
    ) -> Result<CreateConversationResult> {
        if request.persona_id.trim().is_empty() || request.replica_id.trim().is_empty() {
            return Err(TavusError::MissingIds);
        }

        let payload = request.preview();
        info!(name: "tavus.conversation.payload", "Create Conversation payload:\n{payload}");
        info!(
            persona = %request.persona_id,
            documents = ?request.document_ids,
            "Using persona"
        );

        let response = self
            .http
            .post(format!("{}/conversations", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        name: "tavus.conversation.body_unreadable",
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error body"
                    );
                    status.canonical_reason().unwrap_or_default().to_string()
                }
            };
            return Err(TavusError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
