// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when `gemini.api_key` is unset.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level Pathsetu configuration.
///
/// Every section is optional and defaults to values that run a local bot,
/// except for credentials which must come from a file or the environment.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathsetuConfig {
    /// Bot identity, prompts, and log level.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini generation backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// WhatsApp Cloud API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// History storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Webhook HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Diagram rendering settings.
    #[serde(default)]
    pub diagram: DiagramConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline system instruction. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the system instruction.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Reply sent when a user greets the bot or resets the conversation.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            welcome_message: default_welcome_message(),
        }
    }
}

fn default_agent_name() -> String {
    "pathsetu".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_welcome_message() -> String {
    "Namaste! 🙏 Pathsetu here.\nAsk me about careers!".to_string()
}

/// Gemini `generateContent` backend configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to the `GEMINI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Candidate model names, attempted in order until one succeeds.
    #[serde(default = "default_models")]
    pub models: Vec<String>,

    /// Sampling temperature applied to every candidate.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-candidate request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API base URL, without a trailing slash.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl GeminiConfig {
    /// Returns the configured key, or the environment fallback.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            models: default_models(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("models", &self.models)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_models() -> Vec<String> {
    [
        "gemini-flash-latest",
        "gemini-2.5-flash-lite",
        "gemini-flash-lite-latest",
        "gemini-2.5-flash-preview-09-2025",
        "gemini-2.5-flash-lite-preview-09-2025",
        "gemini-1.5-flash",
        "gemini-1.5-pro",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// WhatsApp Cloud API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Bearer token for the Graph API.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Sending phone number id. Accepts a string or a bare integer, since
    /// numeric environment values arrive as numbers.
    #[serde(default, deserialize_with = "string_or_number")]
    pub phone_number_id: Option<String>,

    /// App secret. When set, inbound webhook bodies must carry a valid
    /// `X-Hub-Signature-256` header.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Graph API version segment, e.g. `v17.0`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Graph API base URL, without a trailing slash.
    #[serde(default = "default_graph_base_url")]
    pub base_url: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            app_secret: None,
            api_version: default_api_version(),
            base_url: default_graph_base_url(),
        }
    }
}

impl fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("phone_number_id", &self.phone_number_id)
            .field("app_secret", &self.app_secret.as_ref().map(|_| "<redacted>"))
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

fn default_api_version() -> String {
    "v17.0".to_string()
}

fn default_graph_base_url() -> String {
    "https://graph.facebook.com".to_string()
}

/// History storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,

    /// Upper bound on records returned per history read (newest kept).
    /// `None` returns the full history.
    #[serde(default)]
    pub max_history_records: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
            max_history_records: None,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("pathsetu").join("pathsetu.db"))
        .unwrap_or_else(|| "pathsetu.db".into())
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Webhook HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Placeholder substituted with the encoded diagram in `render_url_template`.
pub const DIAGRAM_PAYLOAD_PLACEHOLDER: &str = "{payload}";

/// Diagram rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramConfig {
    /// Image URL template; `{payload}` receives the URL-safe base64 diagram.
    #[serde(default = "default_render_url_template")]
    pub render_url_template: String,

    /// Caption attached to diagram images.
    #[serde(default = "default_caption")]
    pub caption: String,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            render_url_template: default_render_url_template(),
            caption: default_caption(),
        }
    }
}

fn default_render_url_template() -> String {
    "https://mermaid.ink/img/{payload}".to_string()
}

fn default_caption() -> String {
    "Your Roadmap 📍".to_string()
}
