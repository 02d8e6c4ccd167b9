//! JSON output formatter

use super::Formatter;
use crate::engine::AnalysisResult;
use crate::hint::Hint;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    hints: &'a [Hint],
    errors: Vec<JsonError<'a>>,
    failures: Vec<JsonFailure<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonError<'a> {
    file: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    rule_id: &'a str,
    file: &'a str,
    line: usize,
    message: String,
}

#[derive(Serialize)]
struct JsonSummary {
    files_processed: usize,
    hint_count: usize,
    error_count: usize,
    duration_ms: u128,
}

impl Formatter for JsonFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let output = JsonOutput {
            hints: &result.hints,
            errors: result
                .errors
                .iter()
                .map(|e| JsonError {
                    file: &e.file,
                    message: &e.message,
                })
                .collect(),
            failures: result
                .failures
                .iter()
                .map(|f| JsonFailure {
                    rule_id: &f.rule_id,
                    file: &f.file,
                    line: f.line,
                    message: f.error.to_string(),
                })
                .collect(),
            summary: JsonSummary {
                files_processed: result.files_processed,
                hint_count: result.hints.len(),
                error_count: result.errors.len(),
                duration_ms: result.duration.as_millis(),
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_default()
        } else {
            serde_json::to_string(&output).unwrap_or_default()
        }
    }

    fn format_hint(&self, hint: &Hint) -> String {
        if self.pretty {
            serde_json::to_string_pretty(hint).unwrap_or_default()
        } else {
            serde_json::to_string(hint).unwrap_or_default()
        }
    }
}
