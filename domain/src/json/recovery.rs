//! Recovery pipeline for unreliable JSON text.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::util::truncate_str;

/// Maximum number of bytes of the raw text kept on a [`RecoveryError`].
const PREVIEW_BYTES: usize = 200;

/// No plausible JSON value could be extracted from the text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No JSON object found")]
pub struct RecoveryError {
    /// Leading portion of the text that failed to parse.
    pub preview: String,
}

/// A recovered value did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{label} must be a JSON object, got {found}")]
pub struct ShapeError {
    pub label: String,
    pub found: &'static str,
}

/// Recover a JSON value from raw model text.
///
/// Steps run in order and the first success wins:
///
/// 1. Strip a single enclosing markdown code fence (optionally tagged `json`).
/// 2. Strict JSON parse.
/// 3. Heuristic syntax repair ([`repair_syntax`]) followed by a parse.
/// 4. Extract the first balanced `{...}` substring, repair it, then parse.
pub fn recover(raw: &str) -> Result<Value, RecoveryError> {
    let text = strip_code_fence(raw.trim());

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    if let Some(value) = parse_repaired(text) {
        return Ok(value);
    }

    if let Some(candidate) = first_balanced_object(text)
        && let Some(value) = parse_repaired(candidate)
    {
        return Ok(value);
    }

    Err(RecoveryError {
        preview: truncate_str(raw, PREVIEW_BYTES).to_string(),
    })
}

/// Narrow a recovered value to a JSON object.
///
/// Arrays, primitives and `null` are rejected with a [`ShapeError`] naming
/// `label`.
pub fn as_json_object(value: Value, label: &str) -> Result<Map<String, Value>, ShapeError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ShapeError {
            label: label.to_string(),
            found: type_name(&other),
        }),
    }
}

/// Heuristic syntax repair.
///
/// Drops commas that directly precede a closing `}` or `]` and rewrites
/// typographic quotes that delimit a string as ASCII quotes. String literals
/// opened by `"` or `'` are copied untouched. Unquoted keys, single-quoted
/// strings and `//` commentary are handled by the JSON5 parse that follows
/// the repair.
pub fn repair_syntax(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut open: Option<Quote> = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(quote) = open {
            if escaped {
                escaped = false;
                out.push(c);
            } else if c == '\\' {
                escaped = true;
                out.push(c);
            } else if quote.closes(c) {
                open = None;
                out.push(quote.ascii());
            } else if matches!(quote, Quote::Typographic(q) if q == c) {
                out.push('\\');
                out.push(c);
            } else {
                out.push(c);
            }
            continue;
        }

        if let Some(quote) = Quote::open(c) {
            open = Some(quote);
            out.push(quote.ascii());
            continue;
        }

        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }

    out
}

/// String delimiter seen while scanning model text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    /// `"` or `'`, closed by the same character
    Straight(char),
    /// A curly quote pair, closed by either curly quote of the same family
    Typographic(char),
}

impl Quote {
    fn open(c: char) -> Option<Self> {
        match c {
            '"' | '\'' => Some(Quote::Straight(c)),
            _ => typographic_family(c).map(Quote::Typographic),
        }
    }

    fn closes(self, c: char) -> bool {
        match self {
            Quote::Straight(q) => c == q,
            Quote::Typographic(q) => typographic_family(c) == Some(q),
        }
    }

    fn ascii(self) -> char {
        match self {
            Quote::Straight(q) | Quote::Typographic(q) => q,
        }
    }
}

fn typographic_family(c: char) -> Option<char> {
    match c {
        '\u{201C}' | '\u{201D}' => Some('"'),
        '\u{2018}' | '\u{2019}' => Some('\''),
        _ => None,
    }
}

fn parse_repaired(text: &str) -> Option<Value> {
    let repaired = repair_syntax(text);
    serde_json::from_str::<Value>(&repaired)
        .or_else(|_| json5::from_str::<Value>(&repaired))
        .ok()
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    let body = body
        .strip_prefix("json")
        .or_else(|| body.strip_prefix("JSON"))
        .unwrap_or(body);
    body.trim()
}

/// Find the first balanced `{...}` substring, tracking brace depth.
///
/// Braces inside quoted strings do not count toward the depth.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut open: Option<Quote> = None;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if let Some(quote) = open {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if quote.closes(c) {
                open = None;
            }
            continue;
        }

        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => open = Quote::open(c),
        }
    }

    None
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
