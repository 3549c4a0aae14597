//! Line-oriented questions asked outside the main editor
//!
//! The save and duplicate prompts read a single answer from stdin and
//! re-ask until the answer parses. End of input counts as no answer.

use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Ask `question` until `parse` accepts the answer.
///
/// Returns `Ok(None)` when the input is exhausted.
pub fn ask_until_valid<R, W, T>(
    input: &mut R,
    output: &mut W,
    question: &str,
    hint: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> io::Result<Option<T>>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{}", question)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim().to_lowercase();
        if let Some(value) = parse(&answer) {
            return Ok(Some(value));
        }
        writeln!(output, "{}", hint.yellow())?;
    }
}

/// `y`, `yes` or an empty answer mean yes
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask whether to save a proposed note, on the terminal.
pub fn confirm_save() -> io::Result<bool> {
    let stdin = io::stdin();
    let answer = ask_until_valid(
        &mut stdin.lock(),
        &mut io::stdout(),
        "Save this note? (y/n): ",
        "Please enter 'y' or 'n'.",
        parse_yes_no,
    )?;
    Ok(answer.unwrap_or(false))
}

/// Wait for Enter; returns `true` if the user typed `q`/`quit` instead.
///
/// End of input counts as quitting.
pub fn pause_on<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<bool> {
    let answer = ask_until_valid(input, output, message, "", |a| {
        Some(matches!(a, "q" | "quit"))
    })?;
    Ok(answer.unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Option<bool>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let hint = "Please enter 'y' or 'n'.";
        let answer = ask_until_valid(&mut reader, &mut out, "Save? ", hint, parse_yes_no).unwrap();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no(""), Some(true));
        assert_eq!(parse_yes_no("y"), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn test_empty_answer_is_yes() {
        let (answer, _) = run("\n");
        assert_eq!(answer, Some(true));
    }

    #[test]
    fn test_answer_is_trimmed_and_lowercased() {
        let (answer, _) = run("  N \n");
        assert_eq!(answer, Some(false));
    }

    #[test]
    fn test_invalid_answer_reprompts() {
        let (answer, out) = run("x\nmaybe\ny\n");
        assert_eq!(answer, Some(true));
        assert_eq!(out.matches("Save? ").count(), 3);
        assert!(out.contains("Please enter 'y' or 'n'."));
    }

    #[test]
    fn test_pause_quit_and_eof() {
        let mut out = Vec::new();
        assert!(!pause_on(&mut Cursor::new(b"\n".to_vec()), &mut out, "> ").unwrap());
        assert!(pause_on(&mut Cursor::new(b" Q \n".to_vec()), &mut out, "> ").unwrap());
        assert!(pause_on(&mut Cursor::new(Vec::new()), &mut out, "> ").unwrap());
    }

    #[test]
    fn test_eof_is_none() {
        let (answer, _) = run("x\n");
        assert_eq!(answer, None);
    }
}
