//! Terminal-facing UI: rendering contract, default renderer, and settings.

pub mod render;
pub mod settings;

pub use render::{RenderSink, Renderer};
