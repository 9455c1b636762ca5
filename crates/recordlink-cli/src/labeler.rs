//! A terminal [`Labeler`]: presents a `bilenko` block's uncertain pairs on
//! stdout and reads a one-letter label from stdin, the thin UI collaborator
//! that sits outside the matching engine's scope.

use recordlink_core::{Cancelled, Label, Labeler, UncertainPair};
use std::io::{self, BufRead, Write};

/// Reads `y`/`n`/`s`/`f` lines from `input`, prompting on `output`.
pub struct TerminalLabeler<R, W> {
    input: R,
    output: W,
}

impl TerminalLabeler<io::BufReader<io::Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: io::BufReader::new(io::stdin()),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> TerminalLabeler<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, pair: &UncertainPair) -> io::Result<Option<Label>> {
        writeln!(self.output, "--- candidate pair ---")?;
        for (key, v1) in &pair.fields1 {
            let v2 = pair.fields2.get(key).map(String::as_str).unwrap_or("");
            writeln!(self.output, "{key}: {v1:?} vs {v2:?}")?;
        }
        write!(self.output, "match? [y]es / [n]o / [s]kip / [f]inish: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Some(Label::Finish));
        }
        Ok(match line.trim().to_lowercase().as_str() {
            "y" | "yes" => Some(Label::Match),
            "n" | "no" => Some(Label::Distinct),
            "s" | "skip" => Some(Label::Skip),
            "f" | "finish" => Some(Label::Finish),
            _ => None,
        })
    }
}

impl<R: BufRead, W: Write> Labeler for TerminalLabeler<R, W> {
    fn label(&mut self, pair: &UncertainPair) -> Result<Label, Cancelled> {
        loop {
            match self.prompt(pair) {
                Ok(Some(label)) => return Ok(label),
                Ok(None) => continue,
                Err(_) => return Err(Cancelled),
            }
        }
    }
}
