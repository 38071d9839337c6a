//! Async readline input handling for the chat loop.
//!
//! Wraps `rustyline_async::Readline`. A line ending in `\` continues the
//! message on the next line; the first line without one submits it.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

/// Events produced by the input handler.
#[derive(Debug, PartialEq)]
pub enum InputEvent {
    /// User submitted a (possibly multi-line) message.
    Message(String),
    /// End of file (Ctrl+D).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Accumulates continued lines into one message.
#[derive(Debug, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Feed one raw input line. Returns the full message once it is complete.
    pub fn push(&mut self, line: &str) -> Option<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.strip_suffix('\\') {
            Some(head) => {
                self.lines.push(head.to_string());
                None
            }
            None => {
                self.lines.push(line.to_string());
                Some(std::mem::take(&mut self.lines).join("\n"))
            }
        }
    }

    pub fn is_continuing(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Async input handler wrapping rustyline_async.
pub struct ChatInput {
    rl: Readline,
    prompt: String,
    continuation_prompt: String,
    buffer: LineBuffer,
}

impl ChatInput {
    /// Create the input handler.
    ///
    /// Returns the handler and a `SharedWriter` for printing without
    /// clobbering the prompt.
    pub fn new(
        prompt: String,
        continuation_prompt: String,
    ) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt.clone())?;
        Ok((
            Self {
                rl,
                prompt,
                continuation_prompt,
                buffer: LineBuffer::default(),
            },
            stdout,
        ))
    }

    /// Read one complete message, following `\` continuations.
    pub async fn read_message(&mut self) -> InputEvent {
        loop {
            let event = match self.rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => line,
                Ok(ReadlineEvent::Eof) | Err(_) => return InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => {
                    if self.buffer.is_continuing() {
                        self.buffer.clear();
                        let _ = self.rl.update_prompt(&self.prompt);
                    }
                    return InputEvent::Interrupted;
                }
            };

            self.rl.add_history_entry(event.clone());
            match self.buffer.push(&event) {
                Some(message) => {
                    let _ = self.rl.update_prompt(&self.prompt);
                    return InputEvent::Message(message);
                }
                None => {
                    let _ = self.rl.update_prompt(&self.continuation_prompt);
                }
            }
        }
    }

    /// Clear the terminal screen.
    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Flush pending output before exit.
    pub fn flush(&mut self) {
        let _ = self.rl.flush();
    }
}
