use crate::core::Confirm;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use tracing::warn;

/// Interactive yes/no prompt.
///
/// Asks until the answer is `y`, `yes`, `n` or `no` (any case). End of input
/// or a read error counts as no.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompt { input, output }
    }
}

impl Prompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Prompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, question: &str) -> bool {
        loop {
            if let Err(e) = write!(self.output, "{question} [y/n] ").and_then(|_| self.output.flush()) {
                warn!(error = %e, "could not write prompt");
            }

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return false,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "could not read answer");
                    return false;
                }
            }

            if let Some(answer) = parse_answer(&line) {
                return answer;
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = Prompt::new(input.as_bytes(), &mut output).confirm("Delete?");
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_and_no_any_case() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
        assert!(!ask("n\n").0);
        assert!(!ask("No\n").0);
    }

    #[test]
    fn test_reprompts_until_recognized() {
        let (answer, output) = ask("maybe\n\nY\n");
        assert!(answer);
        assert_eq!(output.matches("Delete? [y/n] ").count(), 3);
    }

    #[test]
    fn test_end_of_input_is_no() {
        let (answer, output) = ask("what\n");
        assert!(!answer);
        assert_eq!(output.matches("Delete? [y/n] ").count(), 2);
    }
}
