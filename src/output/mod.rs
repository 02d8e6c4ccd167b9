//! Output formatters for analysis results

mod json;
mod pretty;

pub use json::JsonFormatter;
pub use pretty::PrettyFormatter;

use crate::engine::AnalysisResult;
use crate::hint::Hint;

/// Output formatter trait
pub trait Formatter: Send + Sync {
    /// Format the entire analysis result
    fn format(&self, result: &AnalysisResult) -> String;

    /// Format a single hint
    fn format_hint(&self, hint: &Hint) -> String;
}
