//! Interactive chat session: read a line, dispatch, repeat.

use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;

use futures_util::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::export::TranscriptExporter;
use super::transcript::{Exchange, Transcript};
use crate::api::{ChatClient, FragmentStream};
use crate::config::{Config, ContextMode};
use crate::error::{ChatError, ExportError};
use crate::types::{ChatRequest, Message};
use crate::ui::RenderSink;

/// Per-session settings taken from configuration.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub exit_token: String,
    pub export_token: String,
    pub context: ContextMode,
    pub log_dir: PathBuf,
}

impl ChatOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.api.model.clone(),
            exit_token: config.chat.exit_token.clone(),
            export_token: config.chat.export_token.clone(),
            context: config.chat.context,
            log_dir: config.chat.log_dir.clone(),
        }
    }
}

/// What one input line asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction<'a> {
    Exit,
    Export,
    Prompt(&'a str),
}

/// Why [`ChatSession::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitToken,
    EndOfInput,
}

/// One chat conversation bound to a client, owning its transcript.
pub struct ChatSession<C> {
    client: C,
    options: ChatOptions,
    transcript: Transcript,
    exporter: TranscriptExporter,
}

impl<C: ChatClient> ChatSession<C> {
    pub fn new(client: C, options: ChatOptions) -> Self {
        let exporter = TranscriptExporter::new(options.log_dir.clone());
        Self {
            client,
            options,
            transcript: Transcript::new(),
            exporter,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Map a line (trailing newline already removed) to an action.
    ///
    /// Tokens match exactly; everything else, including the empty line, is
    /// a prompt.
    pub fn classify<'a>(&self, line: &'a str) -> InputAction<'a> {
        if line == self.options.exit_token {
            InputAction::Exit
        } else if line == self.options.export_token {
            InputAction::Export
        } else {
            InputAction::Prompt(line)
        }
    }

    /// Drive the loop until the exit token or end of input.
    ///
    /// Exchange and export failures are reported through `renderer` and the
    /// loop keeps going. Only a failure to read input ends it early.
    pub async fn run<R, W>(
        &mut self,
        mut input: R,
        output: &mut W,
        renderer: &dyn RenderSink,
    ) -> Result<SessionEnd, ChatError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut buf = Vec::new();
        loop {
            renderer.prompt(&self.options.exit_token, &self.options.export_token);
            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                tracing::debug!("input closed; ending chat session");
                return Ok(SessionEnd::EndOfInput);
            }
            let line = decode_line(&buf);

            match self.classify(&line) {
                InputAction::Exit => return Ok(SessionEnd::ExitToken),
                InputAction::Export => match self.export() {
                    Ok(path) => renderer
                        .success(&format!("Chat history exported to {}", path.display())),
                    Err(err) => {
                        tracing::warn!(error = %err, "transcript export failed");
                        renderer.error(&format!("export failed: {err}"));
                    }
                },
                InputAction::Prompt(prompt) => {
                    if let Err(err) = self.exchange(prompt, output, renderer).await {
                        tracing::warn!(error = %err, "chat exchange failed");
                        renderer.error(&format!("request failed: {err}"));
                    }
                }
            }
        }
    }

    /// Send one prompt, echo fragments as they arrive, record the pair.
    ///
    /// On failure the fragments already written stay on `output` and the
    /// transcript is left unchanged.
    pub async fn exchange<W: Write>(
        &mut self,
        prompt: &str,
        output: &mut W,
        renderer: &dyn RenderSink,
    ) -> Result<(), ChatError> {
        let request = ChatRequest {
            model: self.options.model.clone(),
            messages: self.context_messages(prompt),
            stream: true,
        };

        renderer.reply_header(&self.options.model);
        let mut stream = self.client.stream_chat(&request).await?;
        let mut reply = String::new();
        let streamed = pump_fragments(&mut stream, output, &mut reply).await;
        // End the reply line even when the stream failed part way.
        let closed = output.write_all(b"\n\n").and_then(|()| output.flush());
        streamed?;
        closed?;

        tracing::debug!(
            reply_chars = reply.chars().count(),
            exchanges = self.transcript.exchange_count() + 1,
            "exchange complete"
        );
        self.transcript.push_exchange(Exchange::new(prompt, reply));
        Ok(())
    }

    /// Write the transcript to a new timestamped file.
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        self.exporter.export(&self.transcript)
    }

    fn context_messages(&self, prompt: &str) -> Vec<Message> {
        match self.options.context {
            ContextMode::Latest => vec![Message::user(prompt)],
            ContextMode::Full => {
                let mut messages = Vec::with_capacity(self.transcript.len() + 1);
                messages.extend_from_slice(self.transcript.messages());
                messages.push(Message::user(prompt));
                messages
            }
        }
    }
}

/// Strip one trailing `\n` or `\r\n`; invalid UTF-8 becomes U+FFFD.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw)
}

async fn pump_fragments<W: Write>(
    stream: &mut FragmentStream,
    output: &mut W,
    reply: &mut String,
) -> Result<(), ChatError> {
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        output.write_all(fragment.as_bytes())?;
        output.flush()?;
        reply.push_str(&fragment);
    }
    Ok(())
}
