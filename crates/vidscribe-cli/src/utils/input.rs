//! User input utilities for interactive command-line prompts.

use std::io::{self, Write};

/// Prompts the user for a string input.
///
/// The input is read from stdin and returned with whitespace trimmed.
pub fn prompt_string(prompt: &str) -> io::Result<String> {
    print!("{prompt}: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Interpret a yes/no answer. Empty input picks `default`; anything
/// unrecognised yields `None`.
pub fn parse_confirmation(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        "" => Some(default),
        _ => None,
    }
}

/// Prompts the user for a yes/no confirmation, re-asking on bad input.
pub fn prompt_confirmation(prompt: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "Y/n" } else { "y/N" };
    loop {
        let input = prompt_string(&format!("{prompt} ({hint})"))?;
        if let Some(answer) = parse_confirmation(&input, default) {
            return Ok(answer);
        }
        eprintln!("Please enter 'y' for yes or 'n' for no.");
    }
}
