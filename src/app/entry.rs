//! Top-level command dispatch.

use crate::app::init_flow::run_init_flow;
use crate::cli::{self, Command};
use finetalk::api::ApiClient;
use finetalk::build_info;
use finetalk::chat::{ChatOptions, ChatSession};
use finetalk::config::{load_config, Config};
use finetalk::training;
use finetalk::ui::{RenderSink, Renderer};
use std::time::Duration;
use tokio::io::BufReader;

/// Top-level CLI entrypoint; returns the process exit code.
pub(crate) async fn run(args: cli::Args) -> i32 {
    let bootstrap_renderer = Renderer::new(!args.no_color);
    if let Some(Command::Init { force }) = args.command.as_ref() {
        if let Err(msg) = run_init_flow(&bootstrap_renderer, *force) {
            bootstrap_renderer.error(&msg);
            return 1;
        }
        return 0;
    }

    let config = match load_config_state(&args) {
        Ok(config) => config,
        Err(msg) => {
            bootstrap_renderer.error(&msg);
            return 1;
        }
    };
    let renderer = Renderer::new(config.display.color);
    let client = ApiClient::new(
        &config.api,
        Duration::from_secs(config.network.api_timeout_secs),
    );

    let outcome = match args.command {
        None | Some(Command::Chat) => run_chat(&config, client, &renderer).await,
        Some(Command::Upload { path }) => training::upload(&client, &path, &renderer)
            .await
            .map(|_| ())
            .map_err(|e| format!("upload failed: {e}")),
        Some(Command::Tune { file_id }) => training::tune(&client, &config.api, &file_id, &renderer)
            .await
            .map(|_| ())
            .map_err(|e| format!("tune failed: {e}")),
        Some(Command::Status { job_id }) => training::status(&client, &job_id, &renderer)
            .await
            .map(|_| ())
            .map_err(|e| format!("status failed: {e}")),
        Some(Command::Moderate { text }) => {
            training::moderate(&client, &config.api, &text, &renderer)
                .await
                .map(|_| ())
                .map_err(|e| format!("moderation failed: {e}"))
        }
        Some(Command::Init { .. }) => Ok(()),
    };

    match outcome {
        Ok(()) => 0,
        Err(msg) => {
            renderer.error(&msg);
            1
        }
    }
}

/// Load config from disk/env and layer CLI flags on top.
fn load_config_state(args: &cli::Args) -> Result<Config, String> {
    let loaded = load_config(args.config.as_deref())
        .map_err(|e| format!("failed to load config: {e}"))?;
    tracing::info!(source = %loaded.source, "loaded configuration");
    let mut config = loaded.config;
    apply_cli_overrides(&mut config, args);
    Ok(config)
}

/// CLI flags take precedence over every config source.
fn apply_cli_overrides(config: &mut Config, args: &cli::Args) {
    if let Some(model) = args.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        config.api.model = model.to_string();
    }
    if let Some(base_url) = args
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
    {
        config.api.base_url = base_url.to_string();
    }
    if let Some(log_dir) = &args.log_dir {
        config.chat.log_dir = log_dir.clone();
    }
    if args.no_color {
        config.display.color = false;
    }
}

/// Run the interactive chat loop on stdin/stdout.
async fn run_chat(config: &Config, client: ApiClient, renderer: &Renderer) -> Result<(), String> {
    if config.api.model.trim().is_empty() {
        return Err(
            "no model configured: set api.model, FINETALK_MODEL/OPENAI_MODEL, or pass --model"
                .to_string(),
        );
    }
    if config.api.api_key.trim().is_empty() {
        renderer.warn("no API key configured; requests are sent without Authorization");
    }

    renderer.header(&config.api.model);
    tracing::info!(
        version = %build_info::startup_metadata_line(),
        base_url = %config.api.base_url,
        context = ?config.chat.context,
        "starting chat session"
    );

    let mut session = ChatSession::new(client, ChatOptions::from_config(config));
    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    let end = session
        .run(input, &mut output, renderer)
        .await
        .map_err(|e| format!("chat input failed: {e}"))?;
    tracing::info!(
        ?end,
        exchanges = session.transcript().exchange_count(),
        "chat session ended"
    );
    Ok(())
}
