//! Binary-local application orchestration.
//!
//! `main.rs` only parses arguments and installs logging; command dispatch and
//! the `init` flow live here.

pub(crate) mod entry;
pub(crate) mod init_flow;
