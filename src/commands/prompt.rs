use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Line-oriented questions on any `BufRead`, answered one line each.
pub struct Prompter<R> {
    input: R,
}

impl Prompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// The trimmed answer, or `None` at end of input.
    pub fn line(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }
        Ok(Some(answer.trim().to_string()))
    }

    /// Asks with `[default]` shown; an empty answer keeps the default.
    pub fn with_default(&mut self, label: &str, default: &str) -> Result<String> {
        let question = if default.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{default}]: ")
        };
        match self.line(&question)? {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Ok(default.to_string()),
        }
    }

    /// `[y/N]` question; anything but "y"/"yes" is a no.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.line(&format!("{question} [y/N] "))?.unwrap_or_default();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}
