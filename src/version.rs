//! Target PHP version handling

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Error parsing a PHP version string
#[derive(Debug, Error, PartialEq, Eq)]
#[error("`{0}` is an invalid PHP version. Please specify the correct version such as `7.1.8`.")]
pub struct VersionError(pub String);

/// A three-component PHP version, compared numerically.
///
/// Ordering is derived component-wise, so `7.10.0 > 7.9.0` rather than a
/// lexical string comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PhpVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PhpVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The newest PHP version the rule catalogue targets by default.
    pub const LATEST: PhpVersion = PhpVersion::new(8, 3, 0);

    /// Version floor that activates every rule.
    pub const ANY: PhpVersion = PhpVersion::new(0, 0, 0);
}

impl FromStr for PhpVersion {
    type Err = VersionError;

    /// Parse a "PHP-standardized" version string.
    ///
    /// `_`, `-` and `+` are treated as component separators, any other
    /// non-digit character is split into its own component, and the first
    /// three components must be plain numbers. `7.1.8`, `7_1_8` and
    /// `7.1.8-beta.2` all parse to `(7, 1, 8)`; `7.1` and `7.x.0` do not.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        static SHAPE: OnceLock<Regex> = OnceLock::new();
        let shape = SHAPE.get_or_init(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

        let separated = value.replace(['_', '-', '+'], ".");
        let mut normalized = String::with_capacity(separated.len());
        for ch in separated.chars() {
            if ch == '.' || ch.is_ascii_digit() {
                normalized.push(ch);
            } else {
                normalized.push('.');
                normalized.push(ch);
                normalized.push('.');
            }
        }

        let leading: Vec<&str> = normalized.split('.').take(3).collect();
        let candidate = leading.join(".");
        if leading.len() != 3 || !shape.is_match(&candidate) {
            return Err(VersionError(value.to_string()));
        }

        let parse = |s: &str| s.parse::<u32>().map_err(|_| VersionError(value.to_string()));
        Ok(Self {
            major: parse(leading[0])?,
            minor: parse(leading[1])?,
            patch: parse(leading[2])?,
        })
    }
}

impl TryFrom<String> for PhpVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PhpVersion> for String {
    fn from(v: PhpVersion) -> Self {
        v.to_string()
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
