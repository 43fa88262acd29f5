//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Streaming chat and fine-tuning helper for OpenAI-compatible APIs.
#[derive(Debug, Parser)]
#[command(
    name = "finetalk",
    version,
    long_version = finetalk::build_info::LONG_VERSION
)]
pub struct Args {
    /// Path to config file (default: ./finetalk.toml or ~/.config/finetalk/finetalk.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override model name.
    #[arg(short = 'm', long = "model", global = true)]
    pub model: Option<String>,

    /// Override API base URL.
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Directory for exported chat logs.
    #[arg(long = "log-dir", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive streaming chat (default).
    Chat,
    /// Upload a JSONL training file for fine-tuning.
    Upload {
        /// Path to the training file.
        path: PathBuf,
    },
    /// Start a fine-tuning job from an uploaded file id.
    Tune {
        /// File id returned by `upload`.
        file_id: String,
    },
    /// Show the status of a fine-tuning job.
    Status {
        /// Job id returned by `tune`.
        job_id: String,
    },
    /// Run a moderation check over some text.
    Moderate {
        /// Text to classify.
        text: String,
    },
    /// Write the default config to ~/.config/finetalk/finetalk.toml.
    Init {
        /// Overwrite an existing config after backing it up.
        #[arg(long)]
        force: bool,
    },
}
