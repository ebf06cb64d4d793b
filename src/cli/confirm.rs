use std::io::{BufRead, Write};

use anyhow::Result;

#[cfg(test)]
use mockall::automock;

/// Capability for asking the user to type something back before a creating or
/// destructive operation goes through. Kept behind a trait so that command
/// flows stay testable without simulating a terminal.
#[cfg_attr(test, automock)]
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on stdout and blocks on a single line from stdin.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}
