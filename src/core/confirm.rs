//! Operator confirmation gate.
//!
//! Every additive or destructive action asks a [`Gate`] first. The
//! interactive implementation lives in the CLI layer; this module holds the
//! trait, the answer type and the non-interactive gates.

use std::collections::VecDeque;
use std::fmt;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::Result;

/// An operator's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Skip,
}

impl Answer {
    /// Parse typed input; `None` means "ask again".
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            "s" | "skip" => Some(Answer::Skip),
            _ => None,
        }
    }
}

/// Which answers a question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choices {
    YesNo,
    YesNoSkip,
}

impl Choices {
    /// Whether `answer` is a valid response.
    pub fn accepts(&self, answer: Answer) -> bool {
        match self {
            Choices::YesNo => answer != Answer::Skip,
            Choices::YesNoSkip => true,
        }
    }

    /// Parse input and reject answers this question does not offer.
    pub fn parse(&self, input: &str) -> Option<Answer> {
        Answer::parse(input).filter(|a| self.accepts(*a))
    }
}

impl fmt::Display for Choices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choices::YesNo => f.write_str("yes/no"),
            Choices::YesNoSkip => f.write_str("yes/no/skip"),
        }
    }
}

/// A blocking yes/no/skip prompt.
pub trait Gate {
    /// Ask the operator and block until a valid answer is given.
    fn ask(&mut self, prompt: &str, choices: Choices) -> Result<Answer>;
}

/// Answers yes to everything (`--yes`).
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Gate for AssumeYes {
    fn ask(&mut self, prompt: &str, _choices: Choices) -> Result<Answer> {
        debug!(prompt, "assuming yes");
        Ok(Answer::Yes)
    }
}

/// Reads answers line by line, e.g. from piped stdin.
///
/// Invalid lines ask again; end of input counts as "no".
#[derive(Debug)]
pub struct Lines<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Lines<R, W> {
    /// Gate reading from `input` and writing prompts to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Gate for Lines<R, W> {
    fn ask(&mut self, prompt: &str, choices: Choices) -> Result<Answer> {
        loop {
            write!(self.output, "{} [{}]: ", prompt, choices)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!(prompt, "end of input, declining");
                writeln!(self.output)?;
                return Ok(Answer::No);
            }
            if let Some(answer) = choices.parse(&line) {
                return Ok(answer);
            }
            writeln!(self.output, "please answer {}", choices)?;
        }
    }
}

/// Replays typed input, re-asking on invalid answers like a terminal would.
#[derive(Debug, Default)]
pub struct Scripted {
    inputs: VecDeque<String>,
    prompts: Vec<String>,
}

impl Scripted {
    /// Gate replaying `inputs` in order.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts asked so far, including re-prompts.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Gate for Scripted {
    fn ask(&mut self, prompt: &str, choices: Choices) -> Result<Answer> {
        loop {
            self.prompts.push(prompt.to_string());
            let input = self.inputs.pop_front().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no scripted input left")
            })?;
            if let Some(answer) = choices.parse(&input) {
                return Ok(answer);
            }
        }
    }
}
