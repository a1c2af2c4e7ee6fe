//! Rule-group key derivation.
//!
//! A group key is `<rule_path>/<user>/<escaped namespace>;<group name>`,
//! with the path portion lexically cleaned. The same scheme names the
//! live rule files the evaluation engine loads, so backup metrics line
//! up with live group identities. The escaping must stay stable across
//! releases: changing it renames every backed-up series.

use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Separator between the rule file path and the group name.
const KEY_SEPARATOR: char = ';';

/// Bytes escaped in a URL path segment: everything except ASCII
/// alphanumerics, `-_.~` and the sub-delimiters `$&+:=@`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Derive the identity key for a rule group.
pub fn group_key(rule_path: &Path, user: &str, namespace: &str, name: &str) -> String {
    let base = rule_path.to_string_lossy();
    let escaped = path_escape(namespace);
    let file = join_path(&[base.as_ref(), user, &escaped]);
    format!("{file}{KEY_SEPARATOR}{name}")
}

/// Escape `s` for use as a single URL path segment.
///
/// Escaped bytes are written as `%XX` (uppercase hex), so a namespace
/// can never introduce a `/` into the rule path.
pub fn path_escape(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

/// Join non-empty elements with `/` and clean the result.
///
/// Returns an empty string when every element is empty.
fn join_path(elems: &[&str]) -> String {
    let parts: Vec<&str> = elems.iter().copied().filter(|e| !e.is_empty()).collect();
    if parts.is_empty() {
        return String::new();
    }
    clean_path(&parts.join("/"))
}

/// Lexically normalize a slash-separated path.
///
/// Repeated and trailing slashes collapse, `.` elements are dropped and
/// `..` removes the preceding name (or is discarded at the root). An
/// empty result becomes `.`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                _ if rooted => {}
                _ => out.push(".."),
            },
            name => out.push(name),
        }
    }

    let joined = out.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
