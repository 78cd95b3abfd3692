//! Console prompts
//!
//! Interactive input is read through [`Console`], which is generic over its
//! reader and writer so sessions can be driven from memory in tests.

use std::io::{self, BufRead, Write};

/// Yes/no decision capability handed to the splitter and renamer
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

/// Answers every question with the same decision (`--yes` style flags)
#[derive(Debug, Clone, Copy)]
pub struct AssumeAnswer(pub bool);

impl Confirm for AssumeAnswer {
    fn confirm(&mut self, _question: &str) -> bool {
        self.0
    }
}

/// Line-oriented prompt over a reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// Console bound to the process stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one trimmed line.
    ///
    /// Returns `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Writer used for prompts, for printing between questions
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Console<R, W> {
    /// Only `y` or `Y` accepts; end of input or an I/O error declines.
    fn confirm(&mut self, question: &str) -> bool {
        match self.ask(&format!("{} (y/n): ", question)) {
            Ok(Some(answer)) => answer.eq_ignore_ascii_case("y"),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}
