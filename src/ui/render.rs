//! Rendering contract and default terminal renderer.
//!
//! All status output goes to stderr so stdout carries only streamed replies
//! and can be piped.

use crate::ui::settings;
use crossterm::style::Stylize;

/// Injectable rendering interface used by orchestration code.
///
/// `Renderer` is the default terminal implementation, but consumers/tests
/// can substitute a recording sink without coupling to stderr output.
pub trait RenderSink: Send + Sync {
    /// Render the session/model header line.
    fn header(&self, model: &str);
    /// Render the input prompt with the reserved-token hint.
    fn prompt(&self, exit_token: &str, export_token: &str);
    /// Render the line introducing a streamed reply.
    fn reply_header(&self, model: &str);
    /// Render a success status line.
    fn success(&self, msg: &str);
    /// Render a warning line.
    fn warn(&self, msg: &str);
    /// Render an error line.
    fn error(&self, msg: &str);
    /// Render a titled section divider.
    fn section(&self, title: &str);
    /// Render one key/value field row.
    fn field(&self, key: &str, value: &str);
    /// Render additional detail text.
    fn detail(&self, text: &str);
}

/// Handles all terminal output formatting.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    /// Whether ANSI color/style output is enabled.
    color: bool,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl RenderSink for Renderer {
    fn header(&self, model: &str) {
        if self.color {
            eprintln!(
                "{} {} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                settings::LABEL_APP.with(settings::COLOR_APP_LABEL).bold(),
                model.with(settings::COLOR_MODEL_NAME).bold(),
            );
        } else {
            eprintln!(
                "{} {} {model}",
                settings::GLYPH_SECTION_BULLET,
                settings::LABEL_APP
            );
        }
        eprintln!();
    }

    fn prompt(&self, exit_token: &str, export_token: &str) {
        let hint = settings::prompt_hint_text(exit_token, export_token);
        if self.color {
            eprintln!(
                "{}\n{}",
                settings::PROMPT_QUESTION.with(settings::COLOR_PROMPT_QUESTION),
                hint.with(settings::COLOR_PROMPT_HINT),
            );
        } else {
            eprintln!("{}\n{hint}", settings::PROMPT_QUESTION);
        }
    }

    fn reply_header(&self, model: &str) {
        let text = settings::reply_header_text(model);
        eprintln!();
        if self.color {
            eprintln!("{}", text.with(settings::COLOR_REPLY_HEADER));
        } else {
            eprintln!("{text}");
        }
        eprintln!();
    }

    fn success(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SUCCESS.with(settings::COLOR_SUCCESS).bold(),
                msg.with(settings::COLOR_SUCCESS),
            );
        } else {
            eprintln!("{} {msg}", settings::GLYPH_SUCCESS_PLAIN);
        }
    }

    fn warn(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_WARNING.with(settings::COLOR_WARNING).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_WARNING);
        }
    }

    fn error(&self, msg: &str) {
        if self.color {
            eprintln!(
                "{} {msg}",
                settings::LABEL_ERROR.with(settings::COLOR_ERROR).bold()
            );
        } else {
            eprintln!("{} {msg}", settings::LABEL_ERROR);
        }
    }

    fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                settings::GLYPH_SECTION_BULLET.with(settings::COLOR_SECTION_BULLET),
                title.with(settings::COLOR_SECTION_TITLE).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "{}{} {}",
                settings::INDENT_1,
                format!("{key}:").with(settings::COLOR_FIELD_KEY),
                value.with(settings::COLOR_FIELD_VALUE),
            );
        } else {
            eprintln!("{}{key}: {value}", settings::INDENT_1);
        }
    }

    fn detail(&self, text: &str) {
        for line in text.lines() {
            if self.color {
                eprintln!("{}{}", settings::INDENT_1, line.with(settings::COLOR_DETAIL));
            } else {
                eprintln!("{}{line}", settings::INDENT_1);
            }
        }
    }
}
