//! Line input for the console

use std::io::{self, BufRead, Write};

/// Source of user input lines
pub trait Prompter {
    /// Show `prompt` and read one line, `None` at end of input
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads from the process stdin, prompting on stdout
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for StdinPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

#[cfg(test)]
pub use scripted::ScriptedPrompter;
