//! Literal bodies: escape sequences and numeric literals.
//!
//! The lexer uses these to *validate* literals while scanning; the parser
//! uses them again to *cook* the token text into values. Both sides share
//! the same rules so a token that lexed cleanly always cooks cleanly.

use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeError {
    /// Unknown escape character (or malformed `\u{...}`).
    Invalid(char),
    /// Input ended right after the backslash.
    Truncated,
}

/// Reads one escape sequence; `chars` is positioned right after the backslash.
pub(crate) fn read_escape(chars: &mut Chars<'_>) -> Result<char, EscapeError> {
    let ch = chars.next().ok_or(EscapeError::Truncated)?;
    match ch {
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        '0' => Ok('\0'),
        '\\' | '"' | '\'' => Ok(ch),
        'u' => read_unicode_escape(chars).ok_or(EscapeError::Invalid('u')),
        other => Err(EscapeError::Invalid(other)),
    }
}

/// `\u{1F600}`: one to six hex digits in braces.
fn read_unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    if chars.next()? != '{' {
        return None;
    }
    let mut code = 0u32;
    let mut digits = 0;
    loop {
        let ch = chars.next()?;
        if ch == '}' {
            break;
        }
        code = code * 16 + ch.to_digit(16)?;
        digits += 1;
        if digits > 6 {
            return None;
        }
    }
    if digits == 0 {
        return None;
    }
    char::from_u32(code)
}

/// Value of a quoted string token (quotes included in `text`).
///
/// Invalid escapes are kept verbatim; the lexer has already rejected them,
/// so that branch only matters for hand-built tokens.
pub fn string_value(text: &str) -> String {
    let body = strip_delimiters(text);
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let rest = chars.clone();
        match read_escape(&mut chars) {
            Ok(cooked) => out.push(cooked),
            Err(_) => {
                out.push('\\');
                chars = rest;
            }
        }
    }
    out
}

/// Body of a backtick raw string; no escape processing.
pub fn raw_string_value(text: &str) -> &str {
    strip_delimiters(text)
}

fn strip_delimiters(text: &str) -> &str {
    let mut chars = text.chars();
    let open = chars.next();
    let inner = chars.as_str();
    match (open, inner.chars().last()) {
        (Some(open), Some(close)) if open == close => &inner[..inner.len() - close.len_utf8()],
        _ => inner,
    }
}

/// Shape of a numeric literal that starts with `first` and continues in `rest`.
///
/// Returns how many bytes of `rest` belong to the literal, or `Err` with that
/// same length when the literal is malformed (no digits after a radix prefix,
/// a digit outside the radix, or letters glued to the end).
pub(crate) fn scan_number(first: char, rest: &str) -> Result<usize, usize> {
    let bytes = rest.as_bytes();
    let radix = if first == '0' {
        match bytes.first() {
            Some(b'x' | b'X') => Some(16),
            Some(b'o' | b'O') => Some(8),
            Some(b'b' | b'B') => Some(2),
            _ => None,
        }
    } else {
        None
    };

    if let Some(radix) = radix {
        let len = 1 + take_while(&rest[1..], |c| c.is_ascii_alphanumeric() || c == '_');
        let digits = &rest[1..len];
        let valid = digits.chars().any(|c| c != '_')
            && digits.chars().all(|c| c == '_' || c.is_digit(radix));
        return if valid { Ok(len) } else { Err(len) };
    }

    let mut len = take_while(rest, is_decimal_char);

    if rest[len..].starts_with('.')
        && rest[len + 1..].starts_with(|c: char| c.is_ascii_digit())
    {
        len += 1;
        len += take_while(&rest[len..], is_decimal_char);
    }

    if rest[len..].starts_with(['e', 'E']) {
        let after = &rest[len + 1..];
        let sign = usize::from(after.starts_with(['+', '-']));
        if after[sign..].starts_with(|c: char| c.is_ascii_digit()) {
            len += 1 + sign;
            len += take_while(&rest[len..], is_decimal_char);
        }
    }

    let glued = take_while(&rest[len..], |c| c.is_alphanumeric() || c == '_');
    if glued > 0 {
        return Err(len + glued);
    }
    Ok(len)
}

fn is_decimal_char(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(s.len(), |(i, _)| i)
}

/// A cooked numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum NumberValue {
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberError {
    OutOfRange,
    Malformed,
}

/// Converts the text of a `Number` token into a value.
pub(crate) fn number_value(text: &str) -> Result<NumberValue, NumberError> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();

    let radix = match lower.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return i64::from_str_radix(&clean[2..], radix)
            .map(NumberValue::Int)
            .map_err(|_| NumberError::OutOfRange);
    }

    if lower.contains(['.', 'e']) {
        return clean
            .parse::<f64>()
            .map(NumberValue::Float)
            .map_err(|_| NumberError::Malformed);
    }

    clean
        .parse::<i64>()
        .map(NumberValue::Int)
        .map_err(|_| NumberError::OutOfRange)
}
