use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use hostgroup_export::error::ExportError;

/// Answers accepted as "yes" at the overwrite prompt.
const AFFIRMATIVE: [&str; 4] = ["j", "ja", "y", "yes"];

/// Line-based operator dialogue.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Show `prompt` and block for one line of input.
    ///
    /// End of input counts as the operator cancelling the run.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ExportError::Interrupted.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

/// Whether an overwrite answer means yes (case-insensitive).
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}
