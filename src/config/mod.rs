//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. CLI flags (`--model`, `--base-url`, `--log-dir`, `--no-color`), applied
//!    by the binary after loading.
//! 2. Environment variables (`FINETALK_*`, with `OPENAI_*` fallbacks).
//! 3. TOML file given via `--config`.
//! 4. `./finetalk.toml` in the current directory.
//! 5. `$XDG_CONFIG_HOME/finetalk/finetalk.toml` (or `~/.config/...`).
//! 6. Built-in defaults.

mod defaults;
mod env;
mod init;
mod loader;
mod resolve;
mod sources;
mod types;

pub use init::{config_root_dir, default_global_config_path, initialize_default_global_config};
pub use loader::load_config;
pub use sources::ConfigSource;
pub use types::{
    ApiConfig, ChatConfig, Config, ContextMode, DisplayConfig, GlobalConfigInitResult,
    NetworkConfig,
};

/// Configuration plus the source it was read from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
