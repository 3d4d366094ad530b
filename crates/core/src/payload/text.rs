//! Lexical JSON reshaping.
//!
//! Payloads are never decoded into values. Numbers, string escapes and
//! duplicate keys reach the artifact and the stored record exactly as the
//! client sent them; only insignificant whitespace changes.

use serde::Deserialize;
use serde_json::value::RawValue;

/// Indentation unit used for artifacts.
pub const INDENT: &str = "  ";

/// Check that `input` holds exactly one JSON value.
///
/// Nesting depth is unlimited and numbers are not range-checked.
pub fn parse_raw(input: &[u8]) -> Result<&RawValue, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(input);
    de.disable_recursion_limit();
    let raw = <&RawValue>::deserialize(&mut de)?;
    de.end()?;
    Ok(raw)
}

/// Tracks whether the scanner is inside a string literal.
#[derive(Default)]
struct Lexer {
    in_string: bool,
    escaped: bool,
}

impl Lexer {
    /// Feed one character. Returns true when it belongs to a string literal
    /// (including the closing quote) and must be copied through untouched.
    fn literal(&mut self, c: char) -> bool {
        if !self.in_string {
            return false;
        }
        if self.escaped {
            self.escaped = false;
        } else if c == '\\' {
            self.escaped = true;
        } else if c == '"' {
            self.in_string = false;
        }
        true
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Remove whitespace outside string literals.
pub fn compact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lexer = Lexer::default();

    for c in text.chars() {
        if lexer.literal(c) {
            out.push(c);
        } else if !is_space(c) {
            lexer.in_string = c == '"';
            out.push(c);
        }
    }
    out
}

/// Re-lay `text` one element per line, `unit` per nesting level, with
/// `": "` after keys. Empty objects and arrays stay on one line.
pub fn indent(text: &str, unit: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut lexer = Lexer::default();
    let mut depth = 0usize;
    // Set right after an opening bracket until we know whether it is empty
    let mut opened = false;

    for c in text.chars() {
        if lexer.literal(c) {
            out.push(c);
            continue;
        }
        if is_space(c) {
            continue;
        }

        if opened {
            opened = false;
            if c == '}' || c == ']' {
                depth = depth.saturating_sub(1);
                out.push(c);
                continue;
            }
            newline(&mut out, unit, depth);
        }

        match c {
            '"' => {
                lexer.in_string = true;
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                depth += 1;
                opened = true;
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                newline(&mut out, unit, depth);
                out.push(c);
            }
            ',' => {
                out.push(c);
                newline(&mut out, unit, depth);
            }
            ':' => out.push_str(": "),
            _ => out.push(c),
        }
    }
    out
}

fn newline(out: &mut String, unit: &str, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(unit);
    }
}
