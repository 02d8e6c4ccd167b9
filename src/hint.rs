//! Hint values emitted by the analysis

use serde::Serialize;

/// Base URL of the per-rule documentation pages.
pub const DOCUMENT_LINK: &str = "https://github.com/phint-dev/phint/blob/master/docs";

/// A single advisory finding tied to a file and line.
///
/// Hints are immutable values with structural equality; they carry no
/// behavior of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// Identifier of the rule that produced this hint
    pub rule_id: String,
    /// Human-readable advisory message
    pub message: String,
    /// File the hint belongs to (opaque caller-supplied identifier)
    pub file: String,
    /// 1-based source line
    pub line: usize,
    /// Link to the rule documentation
    pub link: String,
}

impl Hint {
    pub fn new(rule_id: &str, message: &str, file: &str, line: usize, link: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            link: link.to_string(),
        }
    }
}
