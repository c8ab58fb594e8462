//! Scalar formatting
//!
//! Leaf renderings shared by the encoder and map-key ordering:
//! - Floats: shortest round-trip digits, `%g` layout
//! - Complex: `(re+imi)`
//! - Strings: double-quoted with backslash escapes

use std::fmt::Write;

use crate::value::Key;

/// Decimal exponents at or above this switch floats to exponent form.
const EXPONENT_FROM: i32 = 6;
/// Decimal exponents below this switch floats to exponent form.
const EXPONENT_BELOW: i32 = -4;

/// Append a float in shortest round-trip form.
///
/// Small and moderate magnitudes print as plain decimals (`0.0001`, `123456`);
/// others use an exponent with at least two digits (`1e+06`, `1e-05`).
pub fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        out.push_str(if f > 0.0 { "+Inf" } else { "-Inf" });
        return;
    }
    if f == 0.0 {
        out.push_str(if f.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "-1.25e-7"
    let sci = format!("{:e}", f);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let mantissa = match mantissa.strip_prefix('-') {
        Some(m) => {
            out.push('-');
            m
        }
        None => mantissa,
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if !(EXPONENT_BELOW..EXPONENT_FROM).contains(&exp) {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        let _ = write!(out, "{:02}", exp.unsigned_abs());
    } else if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        out.push_str(&digits);
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            out.push_str(&digits);
            for _ in digits.len()..int_len {
                out.push('0');
            }
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    }
}

pub fn format_float(f: f64) -> String {
    let mut out = String::new();
    write_float(&mut out, f);
    out
}

/// Append a complex number as `(re+imi)`; the imaginary part always carries a sign.
pub fn write_complex(out: &mut String, re: f64, im: f64) {
    out.push('(');
    write_float(out, re);
    let imag = format_float(im);
    if !imag.starts_with(['+', '-']) {
        out.push('+');
    }
    out.push_str(&imag);
    out.push_str("i)");
}

/// Append `s` as a double-quoted string literal.
pub fn write_quoted(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if c < ' ' || c == '\u{7F}' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if !is_printable(c) => {
                if (c as u32) < 0x10000 {
                    let _ = write!(out, "\\u{:04x}", c as u32);
                } else {
                    let _ = write!(out, "\\U{:08x}", c as u32);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Non-ASCII ranges written as escapes: separators other than the ASCII space,
/// format characters, private use, and the noncharacters U+FFFE/U+FFFF.
const UNPRINTABLE: &[(u32, u32)] = &[
    (0x00A0, 0x00A0),
    (0x00AD, 0x00AD),
    (0x0600, 0x0605),
    (0x061C, 0x061C),
    (0x06DD, 0x06DD),
    (0x070F, 0x070F),
    (0x0890, 0x0891),
    (0x08E2, 0x08E2),
    (0x1680, 0x1680),
    (0x180E, 0x180E),
    (0x2000, 0x200F),
    (0x2028, 0x202F),
    (0x205F, 0x2064),
    (0x2066, 0x206F),
    (0x3000, 0x3000),
    (0xE000, 0xF8FF),
    (0xFEFF, 0xFEFF),
    (0xFFF9, 0xFFFB),
    (0xFFFE, 0xFFFF),
    (0x110BD, 0x110BD),
    (0x110CD, 0x110CD),
    (0x13430, 0x1343F),
    (0x1BCA0, 0x1BCA3),
    (0x1D173, 0x1D17A),
    (0xE0001, 0xE0001),
    (0xE0020, 0xE007F),
    (0xF0000, 0x10FFFF),
];

fn is_printable(c: char) -> bool {
    if c.is_control() {
        return false;
    }
    if c.is_ascii() {
        return true;
    }
    let cp = c as u32;
    UNPRINTABLE
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                std::cmp::Ordering::Less
            } else if lo > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_err()
}

pub fn quote(s: &str) -> String {
    let mut out = String::new();
    write_quoted(&mut out, s);
    out
}

/// Quoted textual form of a map key; this is also the map ordering key.
pub fn key_text(key: &Key) -> String {
    match key {
        Key::String(s) => quote(s),
        Key::Bool(b) => format!("\"{}\"", b),
        Key::Int(i) => format!("\"{}\"", i),
        Key::Uint(u) => format!("\"{}\"", u),
    }
}
