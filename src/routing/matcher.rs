//! Route pattern matching.
//!
//! # Responsibilities
//! - Validate pattern and request path shape
//! - Split both on `/` and compare segment by segment
//! - Percent-decode each path segment before comparing
//! - Capture `:name` segments into [`Params`]
//!
//! # Design Decisions
//! - Segment counts must be equal, so no backtracking is ever needed
//! - Only two segment kinds: literal and single named capture (no wildcards, no regex)
//! - Literal comparison is case-sensitive and uses the decoded path segment
//! - Structural mismatch is `Ok(None)`, never an error
//! - Duplicate parameter names are detected here, at match time

use std::collections::HashMap;

use thiserror::Error;

/// Errors raised while matching a pattern against a path.
///
/// Every variant is a client error: the router answers 400 and stops scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Pattern is empty, lacks a leading slash, has a trailing slash or an empty `:` name.
    #[error("invalid pattern")]
    InvalidPattern,

    /// Path is empty, lacks a leading slash or has a trailing slash.
    #[error("invalid path")]
    InvalidPath,

    /// A path segment holds a malformed `%XX` escape or is not UTF-8 once decoded.
    #[error("invalid URL encoding")]
    BadEncoding,

    /// A captured value contains `/` (it came from an encoded `%2F`).
    #[error("encoded slash not allowed")]
    EncodedSlash,

    /// The same parameter name appears twice in one pattern.
    #[error("duplicate param name")]
    DuplicateParam,
}

/// Named values captured from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Match `path` against `pattern`.
///
/// Returns `Ok(Some(params))` on a match, `Ok(None)` when the path simply
/// does not fit the pattern, and `Err(_)` when either side is malformed.
///
/// ```
/// use todo_api::routing::matcher::match_path;
///
/// let params = match_path("/todos/:id", "/todos/123").unwrap().unwrap();
/// assert_eq!(params.get("id"), Some("123"));
/// ```
pub fn match_path(pattern: &str, path: &str) -> Result<Option<Params>, MatchError> {
    if !is_well_formed(pattern) {
        return Err(MatchError::InvalidPattern);
    }
    if !path.starts_with('/') {
        return Err(MatchError::InvalidPath);
    }

    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        if !is_well_formed(path) {
            return Err(MatchError::InvalidPath);
        }
        return Ok(None);
    }
    // Equal counts with a trailing slash leave an empty last segment, which
    // can never match a non-empty pattern segment: it falls through as a
    // plain no-match below.

    let mut params = Params::new();

    for (pat, raw) in pattern_segments.iter().zip(path_segments.iter()) {
        let decoded = percent_decode(raw)?;

        match pat.strip_prefix(':') {
            Some(name) => {
                if name.is_empty() {
                    return Err(MatchError::InvalidPattern);
                }
                if params.contains(name) {
                    return Err(MatchError::DuplicateParam);
                }
                if decoded.is_empty() {
                    return Ok(None);
                }
                if decoded.contains('/') {
                    return Err(MatchError::EncodedSlash);
                }
                params.insert(name, decoded);
            }
            None => {
                if *pat != decoded {
                    return Ok(None);
                }
            }
        }
    }

    Ok(Some(params))
}

/// Non-empty, leading slash, no trailing slash unless exactly `/`.
fn is_well_formed(s: &str) -> bool {
    s.starts_with('/') && (s.len() == 1 || !s.ends_with('/'))
}

/// Strict percent-decoding of a single path segment.
///
/// Every `%` must be followed by two hex digits; `+` is left as is.
fn percent_decode(segment: &str) -> Result<String, MatchError> {
    if !segment.contains('%') {
        return Ok(segment.to_string());
    }

    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| hex_value(*b));
            let lo = bytes.get(i + 2).and_then(|b| hex_value(*b));
            match (hi, lo) {
                (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                _ => return Err(MatchError::BadEncoding),
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).map_err(|_| MatchError::BadEncoding)
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
