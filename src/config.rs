use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::tavus::RetrievalStrategy;

/// Default base URL of the Tavus v2 API.
pub const DEFAULT_TAVUS_URL: &str = "https://tavusapi.com/v2";

const DEFAULT_CONVERSATION_NAME: &str = "Public Speaking Coach meets with Rod";

const DEFAULT_GREETING: &str = "Hey Rod! I'm Chuck, a public speaking coach. What are you \
     practicing today, and what kind of feedback would help most?";

const DEFAULT_CONTEXT: &str = "Run a structured two-take coaching session. \
     First, ask what the user is practicing and what feedback they want. \
     Then the user delivers a short intro; do not interrupt. \
     Give one round of feedback (max 2 notes: one visual, one vocal) with no labels. \
     Then the user retries; do not interrupt. \
     After the retry, highlight what improved and end with encouragement. \
     Do not ask for additional takes.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    /// Tavus API key
    #[arg(long, env = "TAVUS_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Persona used for new conversations
    #[arg(long, env = "PERSONA_ID", global = true)]
    pub persona_id: Option<String>,

    /// Replica used for new conversations
    #[arg(long, env = "REPLICA_ID", global = true)]
    pub replica_id: Option<String>,

    /// Comma-separated knowledge base document ids
    #[arg(long, env = "DOCUMENT_IDS", global = true)]
    pub document_ids: Option<String>,

    /// Require meeting auth ("true" enables it)
    #[arg(long, env = "REQUIRE_AUTH", global = true)]
    pub require_auth: Option<String>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED", global = true)]
    pub timeout_disabled: Option<bool>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create a session against a running server and print its URL
    Launch {
        /// Base URL of the server exposing `POST /start`
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tavus: TavusConfig,
    pub conversation: ConversationConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
}

#[derive(Deserialize, Clone)]
pub struct TavusConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub persona_id: Option<String>,
    #[serde(default)]
    pub replica_id: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<String>,
    pub require_auth: bool,
}

impl std::fmt::Debug for TavusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavusConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("persona_id", &self.persona_id)
            .field("replica_id", &self.replica_id)
            .field("document_ids", &self.document_ids)
            .field("require_auth", &self.require_auth)
            .finish()
    }
}

impl TavusConfig {
    /// Persona id, treating an empty value as unset.
    pub fn persona_id(&self) -> Option<&str> {
        non_empty(self.persona_id.as_deref())
    }

    /// Replica id, treating an empty value as unset.
    pub fn replica_id(&self) -> Option<&str> {
        non_empty(self.replica_id.as_deref())
    }
}

/// Fixed conversation parameters sent with every `/start`.
#[derive(Debug, Deserialize, Clone)]
pub struct ConversationConfig {
    pub name: String,
    pub custom_greeting: String,
    pub context: String,
    pub retrieval_strategy: RetrievalStrategy,
    pub max_participants: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub timeout_disabled: bool,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layer defaults, config file, `COACH_` env vars and CLI flags.
    ///
    /// Priority: CLI flag > CLI env var > `COACH_*` env > config file > defaults.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("tavus.base_url", DEFAULT_TAVUS_URL)?
            .set_default("tavus.document_ids", Vec::<String>::new())?
            .set_default("tavus.require_auth", false)?
            .set_default("conversation.name", DEFAULT_CONVERSATION_NAME)?
            .set_default("conversation.custom_greeting", DEFAULT_GREETING)?
            .set_default("conversation.context", DEFAULT_CONTEXT)?
            .set_default("conversation.retrieval_strategy", "balanced")?
            .set_default("conversation.max_participants", 2)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.request_timeout_secs", 60)?;

        // Explicit file wins; otherwise pick up ./config.yaml when present.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml").required(false));
        }

        // E.g. COACH_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("COACH")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("tavus.document_ids")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(key) = &cli.api_key {
            builder = builder.set_override("tavus.api_key", key.as_str())?;
        }
        if let Some(persona) = &cli.persona_id {
            builder = builder.set_override("tavus.persona_id", persona.as_str())?;
        }
        if let Some(replica) = &cli.replica_id {
            builder = builder.set_override("tavus.replica_id", replica.as_str())?;
        }
        if let Some(csv) = &cli.document_ids {
            builder = builder.set_override("tavus.document_ids", parse_csv(csv))?;
        }
        if let Some(flag) = &cli.require_auth {
            builder = builder.set_override("tavus.require_auth", parse_flag(flag))?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Split a comma-separated list, dropping blank entries.
pub fn parse_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
