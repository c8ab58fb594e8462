//! Template whitespace cleaning
//!
//! Templates are usually written as indented multi-line JSON. Before
//! compilation the outer text is compacted:
//! - Line breaks are dropped everywhere outside placeholders
//! - Spaces and tabs are dropped outside double-quoted literals
//! - A backslash keeps the byte after it verbatim, so `\"` does not toggle quoting
//! - Placeholder text is copied as written

use super::scanner::{PlaceholderEnd, Scanner};

/// Compact insignificant whitespace in template text
pub fn clean_template(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut scanner = Scanner::new(bytes);
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == b'$' && bytes.get(i + 1) == Some(&b'(') {
            scanner.set_position(i);
            match scanner.find_placeholder_end() {
                PlaceholderEnd::Closed(end) => {
                    out.extend_from_slice(&bytes[i..=end]);
                    i = end + 1;
                    continue;
                }
                // Malformed; compilation reports it, keep the rest untouched
                PlaceholderEnd::Nested(_) | PlaceholderEnd::Unclosed => {
                    out.extend_from_slice(&bytes[i..]);
                    break;
                }
            }
        }

        match b {
            b'\r' | b'\n' => {}
            b'\\' => {
                out.push(b);
                if let Some(&next) = bytes.get(i + 1) {
                    out.push(next);
                    i += 1;
                }
            }
            b'"' => {
                in_quotes = !in_quotes;
                out.push(b);
            }
            b' ' | b'\t' if !in_quotes => {}
            _ => out.push(b),
        }
        i += 1;
    }

    // Only ASCII bytes are removed, so this is always valid UTF-8
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
