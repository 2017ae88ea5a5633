//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure display functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use crate::error::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_branch_versions, display_changelog, display_error, display_repository_summary,
    display_status, display_success, display_warning,
};

/// Boundary for the questions the release workflow asks the operator.
///
/// The workflow only ever needs a yes/no answer or a single line of text;
/// everything else is plain output.
pub trait Prompter {
    /// Yes/no question; `default` is returned on empty input.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Free-form question answered with `default` on empty input.
    fn ask(&mut self, question: &str, default: &str) -> Result<String>;
}

/// [Prompter] reading answers from stdin.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        print!("\n{} {}: ", question, hint);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let response = input.trim().to_lowercase();
        Ok(match response.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        print!("\n{} [{}]: ", question, default);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        let response = input.trim();
        Ok(if response.is_empty() {
            default.to_string()
        } else {
            response.to_string()
        })
    }
}

/// [Prompter] that accepts every default without asking; backs `--force`.
pub struct AssumeDefaults;

impl Prompter for AssumeDefaults {
    fn confirm(&mut self, _question: &str, _default: bool) -> Result<bool> {
        Ok(true)
    }

    fn ask(&mut self, _question: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }
}
