//! Interactive streaming chat.
//!
//! - `session`: the read/dispatch loop and single-exchange logic
//! - `transcript`: the pair-only message log
//! - `export`: JSON export of the transcript

mod export;
mod session;
mod transcript;

pub use export::TranscriptExporter;
pub use session::{ChatOptions, ChatSession, InputAction, SessionEnd};
pub use transcript::{Exchange, Transcript};
