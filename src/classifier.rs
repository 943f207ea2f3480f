//! Cheap discriminant probe for RTCM2 JSON objects.
//!
//! Picks the schema for a message by scanning the raw text for the top-level
//! `"type"` attribute, without building a JSON tree. The scan only tracks
//! string-literal state and nesting depth, so it stays a single linear pass
//! that is much cheaper than the structural decode that follows it.

use crate::registry::SchemaId;
use tracing::trace;

/// Longest digit run accepted as a discriminant (`u32::MAX` has 10 digits).
const MAX_DIGITS: usize = 10;

/// Returns the apparent value of the top-level `"type"` attribute.
///
/// Tolerates whitespace around the colon and a quoted value. The digits must
/// end at a field boundary, so `16` is never read as `1` and `1.5` or `1e3`
/// are not read at all. `None` means no usable discriminant was found.
pub fn probe_type(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i + 1;
                let end = string_end(bytes, start)?;
                if depth == 1 && &bytes[start..end] == b"type" {
                    if let Some(after_colon) = key_value_start(bytes, end + 1) {
                        return read_discriminant(bytes, after_colon);
                    }
                }
                i = end;
            }
            b'{' | b'[' => depth += 1,
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }

    None
}

/// Selects the schema for `text` from its probed discriminant.
pub fn classify(text: &str) -> SchemaId {
    let probed = probe_type(text);
    let id = probed.map_or(SchemaId::Fallback, SchemaId::for_type);
    trace!(?probed, schema = id.name(), "classified message");
    id
}

/// Index of the closing quote of a string starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// If a colon follows (a key, not a value), the index where the value starts.
fn key_value_start(bytes: &[u8], i: usize) -> Option<usize> {
    let i = skip_whitespace(bytes, i);
    (bytes.get(i) == Some(&b':')).then(|| skip_whitespace(bytes, i + 1))
}

fn read_discriminant(bytes: &[u8], mut i: usize) -> Option<u32> {
    let quoted = bytes.get(i) == Some(&b'"');
    if quoted {
        i += 1;
    }

    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let digits = &bytes[start..i];
    if digits.is_empty() || digits.len() > MAX_DIGITS {
        return None;
    }

    let boundary = match bytes.get(i) {
        None => !quoted,
        Some(b'"') => quoted,
        Some(&b) => !quoted && (b == b',' || b == b'}' || b.is_ascii_whitespace()),
    };
    if !boundary {
        return None;
    }

    std::str::from_utf8(digits).ok()?.parse().ok()
}
