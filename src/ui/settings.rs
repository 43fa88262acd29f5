//! Centralized, hardcoded UI settings for the terminal interface.
//!
//! This is the single place to tweak prompt strings, labels, glyphs and
//! colors.

use crossterm::style::Color;

// ---------------------------------------------------------------------------
// Layout / indentation
// ---------------------------------------------------------------------------

pub const INDENT_1: &str = "  ";

// ---------------------------------------------------------------------------
// Prompt strings
// ---------------------------------------------------------------------------

pub const PROMPT_QUESTION: &str = "What would you like to know?";
pub const REPLY_SUFFIX: &str = "says:";

// ---------------------------------------------------------------------------
// Sections / labels
// ---------------------------------------------------------------------------

pub const LABEL_APP: &str = "finetalk";
pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";

pub const GLYPH_SECTION_BULLET: &str = "•";
pub const GLYPH_SUCCESS: &str = "✓";
pub const GLYPH_SUCCESS_PLAIN: &str = "ok:";

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

pub const COLOR_APP_LABEL: Color = Color::Green;
pub const COLOR_MODEL_NAME: Color = Color::Yellow;
pub const COLOR_PROMPT_QUESTION: Color = Color::Cyan;
pub const COLOR_PROMPT_HINT: Color = Color::Blue;
pub const COLOR_REPLY_HEADER: Color = Color::Cyan;

pub const COLOR_SUCCESS: Color = Color::Green;
pub const COLOR_WARNING: Color = Color::Yellow;
pub const COLOR_ERROR: Color = Color::Red;

pub const COLOR_SECTION_BULLET: Color = Color::DarkGrey;
pub const COLOR_SECTION_TITLE: Color = Color::Cyan;
pub const COLOR_FIELD_KEY: Color = Color::DarkGrey;
pub const COLOR_FIELD_VALUE: Color = Color::White;
pub const COLOR_DETAIL: Color = Color::DarkGrey;

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// Hint line listing the reserved chat tokens.
pub fn prompt_hint_text(exit_token: &str, export_token: &str) -> String {
    format!("('{exit_token}' to exit, '{export_token}' to export a chat log)")
}

/// Header printed above a streamed reply.
pub fn reply_header_text(model: &str) -> String {
    format!("{model} {REPLY_SUFFIX}")
}
