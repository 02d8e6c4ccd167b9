//! Human-readable output formatter

use super::Formatter;
use crate::engine::AnalysisResult;
use crate::hint::Hint;
use colored::*;
use std::collections::BTreeMap;

/// Pretty formatter with optional color support
pub struct PrettyFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_stats: true,
        }
    }
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint(&self, s: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.colored {
            style(s.normal()).to_string()
        } else {
            s.to_string()
        }
    }
}

impl Formatter for PrettyFormatter {
    fn format(&self, result: &AnalysisResult) -> String {
        let mut output = String::new();

        // Group hints by file; files are emitted in sorted path order.
        let mut by_file: BTreeMap<&str, Vec<&Hint>> = BTreeMap::new();
        for hint in &result.hints {
            by_file.entry(&hint.file).or_default().push(hint);
        }

        for (file, hints) in &by_file {
            output.push_str(&format!("{}\n", self.paint(file, |s| s.underline())));
            for hint in hints {
                output.push_str(&self.format_hint(hint));
                output.push('\n');
            }
            output.push('\n');
        }

        for error in &result.errors {
            output.push_str(&format!(
                "{}: {}: {}\n",
                self.paint("error", |s| s.red().bold()),
                error.file,
                error.message
            ));
        }

        for failure in &result.failures {
            output.push_str(&format!(
                "{}: {} failed on {}:{}: {}\n",
                self.paint("warning", |s| s.yellow().bold()),
                failure.rule_id,
                failure.file,
                failure.line,
                failure.error
            ));
        }

        if self.show_stats {
            let hint_count = result.hints.len();
            let error_count = result.errors.len();
            output.push_str(&format!(
                "\n{} {} checked, ",
                result.files_processed,
                if result.files_processed == 1 {
                    "file"
                } else {
                    "files"
                }
            ));

            let hints = format!(
                "{} {} detected",
                hint_count,
                if hint_count == 1 { "hint" } else { "hints" }
            );
            output.push_str(&if hint_count > 0 {
                self.paint(&hints, |s| s.yellow())
            } else {
                self.paint(&hints, |s| s.green())
            });

            if error_count > 0 {
                let errors = format!(
                    ", {} {}",
                    error_count,
                    if error_count == 1 { "error" } else { "errors" }
                );
                output.push_str(&self.paint(&errors, |s| s.red()));
            }
            output.push('\n');

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                result.duration.as_secs_f64()
            ));
        }

        output
    }

    fn format_hint(&self, hint: &Hint) -> String {
        format!(
            "  {}: {}: {} ({})",
            self.paint(&hint.line.to_string(), |s| s.blue()),
            self.paint(&hint.rule_id, |s| s.cyan()),
            hint.message,
            self.paint(&hint.link, |s| s.dimmed())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FileError;

    fn sample_hint() -> Hint {
        Hint::new(
            "SquareBracketSyntax",
            "Since `array_push()` has the function call overhead, let's use `$array[] =`.",
            "./app.php",
            4,
            "https://example.invalid/SquareBracketSyntax.md",
        )
    }

    #[test]
    fn test_format_hint() {
        let formatter = PrettyFormatter::new().without_color();
        let output = formatter.format_hint(&sample_hint());

        assert!(output.contains("4: SquareBracketSyntax:"));
        assert!(output.contains("function call overhead"));
        assert!(output.contains("SquareBracketSyntax.md"));
    }

    #[test]
    fn test_format_groups_by_file_and_counts() {
        let formatter = PrettyFormatter::new().without_color();
        let result = AnalysisResult {
            hints: vec![sample_hint()],
            files_processed: 3,
            ..Default::default()
        };

        let output = formatter.format(&result);
        assert!(output.contains("./app.php\n"));
        assert!(output.contains("3 files checked"));
        assert!(output.contains("1 hint detected"));
    }

    #[test]
    fn test_format_errors() {
        let formatter = PrettyFormatter::new().without_color();
        let result = AnalysisResult {
            errors: vec![FileError {
                file: "./broken.php".to_string(),
                message: "PHP syntax error at line 2".to_string(),
            }],
            files_processed: 1,
            ..Default::default()
        };

        let output = formatter.format(&result);
        assert!(output.contains("error: ./broken.php: PHP syntax error at line 2"));
        assert!(output.contains("1 error"));
    }
}
