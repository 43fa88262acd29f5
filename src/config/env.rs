//! Environment overrides.
//!
//! Canonical `FINETALK_*` variables take precedence. The plain `OPENAI_*`
//! names used by the OpenAI SDKs are accepted as fallbacks so an existing
//! shell setup works unchanged.

use std::path::PathBuf;

use crate::error::ConfigError;

use super::resolve::normalized_string;
use super::Config;

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = env_with_fallback(env_lookup, "FINETALK_BASE_URL", "OPENAI_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(model) = env_with_fallback(env_lookup, "FINETALK_MODEL", "OPENAI_MODEL") {
        config.api.model = model;
    }
    if let Some(model) = env_with_fallback(
        env_lookup,
        "FINETALK_TRAINING_MODEL",
        "OPENAI_TRAINING_MODEL",
    ) {
        config.api.training_model = Some(model);
    }
    if let Some(dir) = non_empty(env_lookup("FINETALK_LOG_DIR")) {
        config.chat.log_dir = PathBuf::from(dir);
    }
    if let Some(timeout) = non_empty(env_lookup("FINETALK_API_TIMEOUT_SECS")) {
        // Clamp to at least 1 second to avoid accidental "no timeout" behavior.
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid FINETALK_API_TIMEOUT_SECS value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        config.network.api_timeout_secs = parsed.max(1);
    }
    Ok(())
}

/// Resolve a value from the canonical env var or, if absent, its fallback.
pub(super) fn env_with_fallback<FEnv>(
    env_lookup: &FEnv,
    canonical: &str,
    fallback: &str,
) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    non_empty(env_lookup(canonical)).or_else(|| non_empty(env_lookup(fallback)))
}

/// Return the runtime API key override from env vars.
pub(super) fn api_key_override_with<FEnv>(env_lookup: &FEnv) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_with_fallback(env_lookup, "FINETALK_API_KEY", "OPENAI_API_KEY")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(normalized_string)
}
