//! JSONP envelope handling
//!
//! The public feed answers `format=json` requests with a JavaScript call such
//! as `jsonFlickrFeed({...})`, or `JSON_CALLBACK({...})` when a callback is
//! named. The feed also escapes single quotes as `\'`, which JSON rejects.

use std::borrow::Cow;

/// Strip a `callback(...)` envelope, returning the inner JSON text
///
/// Bodies that already start like JSON, or that do not look like a call
/// to a plain identifier, are returned trimmed but otherwise unchanged.
pub fn unwrap(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }

    let Some(open) = trimmed.find('(') else {
        return trimmed;
    };
    if !is_callback_name(trimmed[..open].trim()) {
        return trimmed;
    }

    let rest = trimmed[open + 1..].trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    match rest.strip_suffix(')') {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// Replace `\'` escapes with a bare `'`, leaving every other escape intact
pub fn unescape_single_quotes(json: &str) -> Cow<'_, str> {
    if !json.contains("\\'") {
        return Cow::Borrowed(json);
    }

    let mut out = String::with_capacity(json.len());
    let mut chars = json.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\'') => out.push('\''),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    Cow::Owned(out)
}

fn is_callback_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
