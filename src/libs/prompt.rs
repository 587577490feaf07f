//! Interactive input port.
//!
//! The installer is often run as `curl … | sh`-style pipelines, so standard
//! input carries installer bytes rather than keystrokes. Every question is
//! therefore asked through a [`Prompter`]; the real implementation talks to
//! the controlling terminal (`/dev/tty`) directly, and tests use
//! [`ScriptedPrompter`].

use crate::log_debug;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};

/// Controlling terminal device on Unix-like systems.
pub const TTY_PATH: &str = "/dev/tty";

/// Source of operator answers.
pub trait Prompter {
    /// Writes an informational line to the operator.
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Shows `question` (no newline) and reads one line of input.
    ///
    /// Returns `Ok(None)` on end of input. The trailing newline is stripped.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

/// Reads from and writes to the controlling terminal, regardless of how
/// stdin/stdout are wired. The device is opened on first use, so runs that
/// never prompt (forced mode plus `--force`) work without a terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    tty: Option<Tty>,
}

struct Tty {
    reader: BufReader<File>,
    writer: File,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn tty(&mut self) -> io::Result<&mut Tty> {
        if self.tty.is_none() {
            let device = OpenOptions::new().read(true).write(true).open(TTY_PATH).map_err(|e| {
                io::Error::new(e.kind(), format!("cannot open controlling terminal {TTY_PATH}: {e}"))
            })?;
            let writer = device.try_clone()?;
            log_debug!("[Prompt] Opened {} for interactive input", TTY_PATH);
            self.tty = Some(Tty {
                reader: BufReader::new(device),
                writer,
            });
        }
        // Populated just above.
        self.tty
            .as_mut()
            .ok_or_else(|| io::Error::other("controlling terminal not available"))
    }
}

impl Prompter for TerminalPrompter {
    fn say(&mut self, message: &str) -> io::Result<()> {
        let tty = self.tty()?;
        writeln!(tty.writer, "{message}")?;
        tty.writer.flush()
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let tty = self.tty()?;
        write!(tty.writer, "{question}")?;
        tty.writer.flush()?;

        let mut line = String::new();
        if tty.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Prompter fed from a fixed list of answers. Records everything it was
/// asked and told, in order.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    /// Every question passed to `ask`.
    pub questions: Vec<String>,
    /// Every line passed to `say`.
    pub messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn say(&mut self, message: &str) -> io::Result<()> {
        self.messages.push(message.to_string());
        Ok(())
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front())
    }
}
