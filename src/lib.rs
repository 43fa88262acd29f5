//! finetalk: streaming chat and fine-tuning glue for OpenAI-compatible APIs.
//!
//! The crate holds an interactive chat loop that streams replies to the
//! terminal, keeps a transcript of completed exchanges and exports it as
//! JSON. It also wraps the file upload, fine-tuning job, and moderation
//! endpoints used to train a custom model.
//!
//! # Quick start
//!
//! ```no_run
//! use finetalk::api::ApiClient;
//! use finetalk::chat::{ChatOptions, ChatSession};
//! use finetalk::config::load_config;
//! use finetalk::ui::Renderer;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap().config;
//! let client = ApiClient::new(&config.api, Duration::from_secs(120));
//! let mut session = ChatSession::new(client, ChatOptions::from_config(&config));
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! session
//!     .run(stdin, &mut std::io::stdout(), &Renderer::new(true))
//!     .await
//!     .unwrap();
//! # }
//! ```

pub mod api;
pub mod build_info;
pub mod chat;
pub mod config;
pub mod error;
#[cfg(test)]
pub mod testsupport;
pub mod training;
pub mod types;
pub mod ui;
