//! Read-eval-print loop over any async line source and sink.

use std::borrow::Cow;

use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{dispatcher::Dispatcher, error::ShellError};
use crate::utils::formatting::indent;

/// Prompt written before each line is read.
pub const DEFAULT_PROMPT: &str = "console> ";

/// Lines handled by the loop itself instead of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Help,
    Exit,
}

impl Builtin {
    fn parse(line: &str) -> Option<Self> {
        match line {
            "help" => Some(Builtin::Help),
            "exit" | "quit" => Some(Builtin::Exit),
            _ => None,
        }
    }
}

/// Interactive shell bound to a reader and a writer.
pub struct Repl<R, W> {
    dispatcher: Dispatcher,
    reader: R,
    writer: W,
    prompt: String,
    color: bool,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(dispatcher: Dispatcher, reader: R, writer: W) -> Self {
        Self {
            dispatcher,
            reader,
            writer,
            prompt: DEFAULT_PROMPT.to_string(),
            color: false,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Run until end of input or an `exit` line.
    ///
    /// Command errors are printed and the loop continues; only console IO
    /// failures end it with an error.
    pub async fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.writer.write_all(self.prompt.as_bytes()).await?;
            self.writer.flush().await?;

            let mut raw = Vec::new();
            if self.reader.read_until(b'\n', &mut raw).await? == 0 {
                tracing::debug!("end of input");
                break;
            }
            let buf = String::from_utf8_lossy(&raw);
            if let Cow::Owned(_) = buf {
                tracing::warn!("input line is not valid UTF-8; invalid bytes replaced");
            }
            let line = buf.trim();
            if line.is_empty() {
                continue;
            }

            let output = match Builtin::parse(line) {
                Some(Builtin::Exit) => break,
                Some(Builtin::Help) => self.help_text(),
                None => match self.dispatcher.execute_line(line) {
                    Ok(output) => output,
                    Err(err) => self.render_error(&err),
                },
            };
            self.write_line(&output).await?;
        }
        Ok(())
    }

    /// Write `message` followed by a newline; empty messages print nothing.
    pub async fn write_line(&mut self, message: &str) -> Result<(), ShellError> {
        if message.is_empty() {
            return Ok(());
        }
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    fn help_text(&self) -> String {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            self.dispatcher
                .registry()
                .signatures()
                .map(|signature| format!("{}{signature}", indent(2))),
        );
        lines.push(format!(
            "{}Unqualified commands run in {}. Type 'exit' to quit.",
            indent(2),
            self.dispatcher.default_library()
        ));
        lines.join("\n")
    }

    fn render_error(&self, err: &ShellError) -> String {
        if !err.is_user_error() {
            tracing::warn!(error = %err, "command registry fault");
        }
        let message = err.to_string();
        if self.color {
            message.red().to_string()
        } else {
            message
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}
