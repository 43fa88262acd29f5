//! Configuration data model.
//!
//! Struct/enum definitions plus default values. Loading and precedence live in
//! the sibling `loader`, `sources`, `env` and `resolve` modules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_EXIT_TOKEN, DEFAULT_EXPORT_TOKEN,
    DEFAULT_LOG_DIR, DEFAULT_MODEL_ID,
};

/// Which messages a chat exchange sends as context.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContextMode {
    /// Only the new user message; the service sees no earlier turns.
    #[default]
    Latest,
    /// The whole transcript followed by the new user message.
    Full,
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub chat: ChatConfig,
    pub network: NetworkConfig,
    pub display: DisplayConfig,
}

/// Resolved API connection settings used by the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Resolved bearer key; empty means "send no Authorization header".
    pub api_key: String,
    /// Chat model id.
    pub model: String,
    /// Base model for fine-tuning jobs.
    pub training_model: Option<String>,
    /// Optional model id for `/moderations`.
    pub moderation_model: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            model: DEFAULT_MODEL_ID.into(),
            training_model: None,
            moderation_model: None,
        }
    }
}

/// Chat loop settings stored under `[chat]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub exit_token: String,
    pub export_token: String,
    pub log_dir: PathBuf,
    pub context: ContextMode,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exit_token: DEFAULT_EXIT_TOKEN.into(),
            export_token: DEFAULT_EXPORT_TOKEN.into(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            context: ContextMode::Latest,
        }
    }
}

/// Network/HTTP timeout policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub api_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// On-disk `[api]` table before key resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(super) struct FileApiConfig {
    pub(super) base_url: String,
    pub(super) api_key: String,
    pub(super) api_key_env: Option<String>,
    pub(super) api_key_file: Option<String>,
    pub(super) model: String,
    pub(super) training_model: Option<String>,
    pub(super) moderation_model: Option<String>,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            api_key: String::new(),
            api_key_env: None,
            api_key_file: None,
            model: DEFAULT_MODEL_ID.into(),
            training_model: None,
            moderation_model: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct FileConfig {
    pub(super) api: FileApiConfig,
    pub(super) chat: ChatConfig,
    pub(super) network: NetworkConfig,
    pub(super) display: DisplayConfig,
}

/// Result of explicit global config initialization (`finetalk init`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}
