use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended when text is cut off
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Builds a one-line preview of feed-controlled text for terminal output:
/// control characters stripped, then truncated to `max_width` display
/// columns.
pub fn preview(s: &str, max_width: usize) -> String {
    truncate_to_width(&strip_control_chars(s), max_width).into_owned()
}

/// Truncates a string to fit within a maximum display width, appending
/// "..." when text was cut off.
///
/// Width is measured in terminal columns (CJK characters and emoji count
/// as 2), so the result never overflows the column budget. Returns
/// `Cow::Borrowed` when the string already fits.
///
/// Widths of 3 or less have no room for "char + ellipsis"; those return
/// as many characters as fit, without an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, ellipsis) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut width = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width > budget {
            break;
        }
        width += char_width;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], ellipsis))
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Feed text ends up on the user's terminal verbatim, so anything that
/// could manipulate the terminal is dropped: C0 controls (except tab,
/// newline, carriage return), DEL, CSI sequences (`ESC [` ... final
/// byte), and OSC sequences (`ESC ]` ... BEL or `ESC \`).
///
/// Returns `Cow::Borrowed` when the input is already clean (the common
/// case).
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.peek() {
                Some('[') => {
                    // CSI: parameter/intermediate bytes until a final
                    // byte in 0x40..=0x7e
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    // OSC: everything until BEL or ST (ESC \)
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\u{07}' {
                            break;
                        }
                        if c == '\u{1b}' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {} // bare ESC, dropped
            }
        } else if !is_stripped(c) {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    c.is_control() && c != '\t' && c != '\n' && c != '\r'
}
