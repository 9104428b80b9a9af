//! Interactive confirmation gate.

use std::io::{self, IsTerminal};

use dialoguer::Input;

use crate::core::confirm::{Answer, AssumeYes, Choices, Gate, Lines};
use crate::error::Result;

/// Terminal prompt; anything but a valid answer asks again.
#[derive(Debug, Default)]
pub struct Interactive;

impl Gate for Interactive {
    fn ask(&mut self, prompt: &str, choices: Choices) -> Result<Answer> {
        let input: String = Input::new()
            .with_prompt(format!("{} [{}]", prompt, choices))
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                choices
                    .parse(input)
                    .map(|_| ())
                    .ok_or_else(|| format!("please answer {}", choices))
            })
            .interact_text()?;

        // validated above
        Ok(choices.parse(&input).unwrap_or(Answer::No))
    }
}

/// Pick the gate for this run: `--yes`, a terminal prompt, or piped answers.
pub fn gate(assume_yes: bool) -> Box<dyn Gate> {
    if assume_yes {
        Box::new(AssumeYes)
    } else if io::stdin().is_terminal() {
        Box::new(Interactive)
    } else {
        Box::new(Lines::new(io::stdin().lock(), io::stderr()))
    }
}
