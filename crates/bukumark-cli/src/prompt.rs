//! Interactive prompts
//!
//! Confirmation and field-editing prompts used by `rm` and `edit`.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Input that clears a field instead of keeping it
pub const CLEAR_TOKEN: &str = "-";

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let input = read_line(&mut io::stdin().lock())?;
    Ok(is_yes(&input))
}

/// Prompt with the current value
///
/// Returns None if the user keeps it (empty input or EOF) and `Some("")`
/// for [`CLEAR_TOKEN`].
pub fn prompt_with_default(prompt: &str, current: &str) -> Result<Option<String>> {
    if current.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, current);
    }
    io::stdout().flush()?;

    let input = read_line(&mut io::stdin().lock())?;
    Ok(edited_value(&input))
}

fn read_line(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(input)
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

fn edited_value(input: &str) -> Option<String> {
    match input.trim() {
        "" => None,
        CLEAR_TOKEN => Some(String::new()),
        value => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn test_read_line_keeps_default_on_empty_input() {
        let mut reader = io::Cursor::new("\n");
        let line = read_line(&mut reader).unwrap();
        assert_eq!(edited_value(&line), None);

        let mut reader = io::Cursor::new("  New Title \nignored\n");
        let line = read_line(&mut reader).unwrap();
        assert_eq!(edited_value(&line), Some("New Title".to_string()));
    }

    #[test]
    fn test_eof_keeps_default() {
        let mut reader = io::Cursor::new("");
        let line = read_line(&mut reader).unwrap();
        assert_eq!(edited_value(&line), None);
    }

    #[test]
    fn test_clear_token_clears_field() {
        assert_eq!(edited_value("-\n"), Some(String::new()));
        assert_eq!(edited_value(" - "), Some(String::new()));
        // Only the bare token clears
        assert_eq!(edited_value("-x"), Some("-x".to_string()));
    }
}
