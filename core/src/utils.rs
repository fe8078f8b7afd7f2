//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret so it can appear in `Debug` output and logs.
///
/// - Empty values print as `EMPTY`.
/// - Values shorter than 12 characters are fully hidden.
/// - Longer values keep the first and last three characters so two different
///   keys can still be told apart.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.0;
        let length = value.chars().count();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 {
            f.write_str("***")
        } else {
            let head: String = value.chars().take(3).collect();
            let tail: String = value.chars().skip(length - 3).collect();
            write!(f, "{head}***{tail}")
        }
    }
}
