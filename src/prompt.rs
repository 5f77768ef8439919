//! Operator input.
//!
//! The workflows never read stdin directly; they ask an [`Operator`], which
//! the binary backs with the console and tests back with scripted input.

use crate::error::{InventoryError, Result};
use std::io::{BufRead, Write};

/// Someone answering questions at the terminal.
pub trait Operator {
    /// Asks a question and returns the raw answer without its line ending.
    fn prompt(&mut self, question: &str) -> Result<String>;

    /// Shows a message on its own line.
    fn say(&mut self, message: &str) -> Result<()>;

    /// Asks until `is_valid` accepts the answer.
    fn prompt_validated(&mut self, question: &str, is_valid: &dyn Fn(&str) -> bool) -> Result<String> {
        loop {
            let answer = self.prompt(question)?;
            if is_valid(&answer) {
                return Ok(answer);
            }
            self.say("Invalid value.")?;
        }
    }

    /// Asks until the answer is exactly `yes` or `no`.
    fn prompt_yes_no(&mut self, question: &str) -> Result<bool> {
        loop {
            match self.prompt(question)?.as_str() {
                "yes" => return Ok(true),
                "no" => return Ok(false),
                _ => self.say("Invalid answer.")?,
            }
        }
    }
}

/// Operator reading answers line by line from `input` and writing prompts
/// to `output`.
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InventoryError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

/// A product name must contain something besides whitespace.
pub fn is_product_name(answer: &str) -> bool {
    !answer.trim().is_empty()
}

/// Accepts whole numbers greater than zero, also when written as `3.0`.
pub fn is_positive_integer(answer: &str) -> bool {
    match answer.trim().parse::<f64>() {
        Ok(value) => {
            value.is_finite() && value.fract() == 0.0 && value > 0.0 && value <= f64::from(u32::MAX)
        }
        Err(_) => false,
    }
}

/// Accepts any finite number that is zero or more.
pub fn is_non_negative_price(answer: &str) -> bool {
    match answer.trim().parse::<f64>() {
        Ok(value) => value.is_finite() && value >= 0.0,
        Err(_) => false,
    }
}

/// Converts an answer accepted by [`is_positive_integer`].
pub fn parse_positive_integer(answer: &str) -> Result<u32> {
    if !is_positive_integer(answer) {
        return Err(InventoryError::InvalidNumber {
            field: "QUANTITY".to_string(),
            value: answer.to_string(),
        });
    }
    let value = answer.trim().parse::<f64>().map_err(|_| InventoryError::InvalidNumber {
        field: "QUANTITY".to_string(),
        value: answer.to_string(),
    })?;
    Ok(value as u32)
}

/// Converts an answer accepted by [`is_non_negative_price`].
pub fn parse_price(answer: &str) -> Result<f64> {
    answer
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| InventoryError::InvalidNumber {
            field: "PRICE".to_string(),
            value: answer.to_string(),
        })
}
