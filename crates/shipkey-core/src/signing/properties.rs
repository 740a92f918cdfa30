//! Reader and writer for flat `key=value` property files.
//!
//! Supports the subset of the Java properties format used by
//! `key.properties`:
//!
//! ```text
//! # comment
//! ! also a comment
//! storeFile=upload-keystore.jks
//! keyAlias: upload
//! storePassword=very\
//!     long
//! keyPassword=semi\:colon\\
//! ```
//!
//! The key ends at the first unescaped `=`, `:` or whitespace; an `=` or `:`
//! must follow it. Leading whitespace of the value is skipped, trailing
//! whitespace is kept. A line ending in an odd number of backslashes
//! continues on the next line. Escapes (`\t`, `\n`, `\r`, `\f`, `\uXXXX`,
//! and `\` before any other character) are decoded in keys and values.
//! When a key repeats, the last assignment wins.

use std::collections::BTreeMap;
use std::str::Chars;

use thiserror::Error;
use zeroize::Zeroizing;

/// A line that could not be read as a key/value assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct PropertiesParseError {
    pub line: usize,
    pub message: String,
}

impl PropertiesParseError {
    fn new(line: usize, message: &str) -> Self {
        Self {
            line,
            message: message.to_string(),
        }
    }
}

/// Parsed property entries.
///
/// Values may hold passwords, so they are zeroized when dropped.
#[derive(Default)]
pub struct Properties {
    entries: BTreeMap<String, Zeroizing<String>>,
}

impl Properties {
    /// Returns the value for `key`, or `None` if it is absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Properties")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Parses property file content into key/value entries.
pub fn parse_properties(content: &str) -> Result<Properties, PropertiesParseError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = BTreeMap::new();
    let mut lines = content.lines().enumerate();

    while let Some((index, raw)) = lines.next() {
        let line = index + 1;
        let trimmed = raw.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = Zeroizing::new(trimmed.to_string());
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        let Some((raw_key, raw_value)) = split_assignment(&logical) else {
            return Err(PropertiesParseError::new(line, "expected `key=value` assignment"));
        };
        if raw_key.is_empty() {
            return Err(PropertiesParseError::new(line, "assignment has an empty key"));
        }

        let key = unescape(raw_key, line)?;
        let value = unescape(raw_value, line)?;
        entries.insert(key.as_str().to_owned(), value);
    }

    Ok(Properties { entries })
}

/// Appends `value` to `out`, escaped so that [`parse_properties`] reads it
/// back unchanged.
///
/// Characters outside printable ASCII are written as `\uXXXX`, since Gradle
/// loads key.properties as ISO-8859-1.
pub fn escape_property_value(value: &str, out: &mut String) {
    for (index, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if index == 0 => out.push_str("\\ "),
            ' '..='~' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// An odd run of trailing backslashes joins the next line.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// Splits a logical line into its raw (still escaped) key and value.
fn split_assignment(logical: &str) -> Option<(&str, &str)> {
    let mut key_end = logical.len();
    let mut escaped = false;
    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let rest = logical[key_end..].trim_start_matches(is_blank);
    let value = rest.strip_prefix(['=', ':'])?;
    Some((&logical[..key_end], value.trim_start_matches(is_blank)))
}

fn unescape(raw: &str, line: usize) -> Result<Zeroizing<String>, PropertiesParseError> {
    let mut out = Zeroizing::new(String::with_capacity(raw.len()));
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            break;
        };
        match escaped {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => out.push(unicode_escape(&mut chars, line)?),
            other => out.push(other),
        }
    }

    Ok(out)
}

/// Decodes the `XXXX` of a `\uXXXX` escape, pairing UTF-16 surrogates.
fn unicode_escape(chars: &mut Chars<'_>, line: usize) -> Result<char, PropertiesParseError> {
    let malformed = || PropertiesParseError::new(line, "malformed \\uXXXX escape");

    let unit = hex4(chars).ok_or_else(malformed)?;
    if let Some(c) = char::from_u32(unit) {
        return Ok(c);
    }

    let low = match (chars.next(), chars.next()) {
        (Some('\\'), Some('u')) => hex4(chars).ok_or_else(malformed)?,
        _ => return Err(malformed()),
    };
    char::decode_utf16([unit as u16, low as u16])
        .next()
        .and_then(|c| c.ok())
        .ok_or_else(malformed)
}

fn hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    Some(value)
}
