//! Default configuration constants.

/// Embedded default `finetalk.toml` template written by `finetalk init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/finetalk.toml");
/// File name searched for locally and under the global config directory.
pub(super) const CONFIG_FILE_NAME: &str = "finetalk.toml";
/// Subdirectory of the config root holding the global config file.
pub(super) const CONFIG_DIR_NAME: &str = "finetalk";
/// Default OpenAI-compatible API base URL.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model id.
pub(super) const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";
/// Default connect and per-read timeout for API requests.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 120;
/// Reserved input that ends the chat loop.
pub(super) const DEFAULT_EXIT_TOKEN: &str = "x";
/// Reserved input that exports the transcript.
pub(super) const DEFAULT_EXPORT_TOKEN: &str = "log";
/// Directory receiving `<unix-timestamp>.json` transcript exports.
pub(super) const DEFAULT_LOG_DIR: &str = "./log";
