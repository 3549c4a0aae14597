//! Conversion between light markup and flashcard display markup.
//!
//! Tutor answers use a Markdown-like *light markup* (`**bold**`, `*italic*`,
//! `-` list items, indentation). The flashcard backend stores a flat,
//! HTML-like *display markup* (`<b>`, `<i>`, `<br>`, `&nbsp;`).
//!
//! | Function | Direction | Lossless |
//! |----------|-----------|----------|
//! | [`to_display_markup`] | light → display | n/a |
//! | [`to_light_markup`] | display → light | emphasis only |
//!
//! [`to_light_markup`] only exists to render stored notes on the console:
//! indentation and list markers are not reconstructed.

use regex::Regex;
use std::sync::LazyLock;

/// Line break marker in display markup.
pub const LINE_BREAK: &str = "<br>";

/// Non-breaking space marker used for indentation.
pub const NBSP: &str = "&nbsp;";

/// Maximum number of `&nbsp;` markers emitted for one line.
pub const MAX_INDENT: usize = 8;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[*-]\s+").expect("valid regex"));

static BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<br>){3,}").expect("valid regex"));

/// Convert light markup into display markup.
///
/// Works line by line: blank lines become [`LINE_BREAK`], bold is converted
/// before italic, indentation is measured on the original line and emitted
/// as `min(indent, 8)` [`NBSP`] markers, and a leading list marker is
/// stripped. Lines are joined with [`LINE_BREAK`]; runs of three or more
/// breaks collapse to two.
///
/// # Examples
///
/// ```
/// use tutor_domain::markup::to_display_markup;
///
/// assert_eq!(to_display_markup("**der Wal**"), "<b>der Wal</b>");
/// assert_eq!(to_display_markup("- *a whale*"), "<i>a whale</i>");
/// assert_eq!(to_display_markup(""), "");
/// ```
pub fn to_display_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let lines: Vec<String> = text.split('\n').map(convert_line).collect();
    let joined = lines.join(LINE_BREAK);
    let collapsed = BREAK_RUN.replace_all(&joined, "<br><br>");

    collapsed.trim().to_string()
}

/// Convert display markup back to light markup for console rendering.
///
/// # Examples
///
/// ```
/// use tutor_domain::markup::to_light_markup;
///
/// assert_eq!(
///     to_light_markup("<b>der Wal</b><br>&nbsp;&nbsp;<i>Beispiel</i>"),
///     "**der Wal**\n  *Beispiel*"
/// );
/// ```
pub fn to_light_markup(display: &str) -> String {
    if display.is_empty() {
        return String::new();
    }

    display
        .replace(LINE_BREAK, "\n")
        .replace(NBSP, " ")
        .replace("<b>", "**")
        .replace("</b>", "**")
        .replace("<i>", "*")
        .replace("</i>", "*")
}

fn convert_line(line: &str) -> String {
    if line.trim().is_empty() {
        return LINE_BREAK.to_string();
    }

    let indent = line.chars().take_while(|c| c.is_whitespace()).count();

    let bolded = BOLD.replace_all(line, "<b>$1</b>");
    let emphasized = convert_italic(&bolded);
    let content = LIST_MARKER.replace(&emphasized, "");

    if indent > 0 {
        format!("{}{}", NBSP.repeat(indent.min(MAX_INDENT)), content)
    } else {
        content.into_owned()
    }
}

/// Wrap `*X*` spans in `<i>` tags.
///
/// A span opens on an asterisk not preceded by another asterisk, contains at
/// least one non-asterisk character, and closes on the next asterisk provided
/// that one is not followed by another asterisk.
fn convert_italic(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '*' && (i == 0 || chars[i - 1] != '*') {
            let close = chars[i + 1..]
                .iter()
                .position(|&c| c == '*' || c == '\n')
                .map(|offset| i + 1 + offset);

            if let Some(close) = close
                && chars[close] == '*'
                && close > i + 1
                && chars.get(close + 1) != Some(&'*')
            {
                out.push_str("<i>");
                out.extend(&chars[i + 1..close]);
                out.push_str("</i>");
                i = close + 1;
                continue;
            }
        }

        out.push(chars[i]);
        i += 1;
    }

    out
}
