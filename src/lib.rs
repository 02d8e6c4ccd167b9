//! Phint - PHP syntax hint engine
//!
//! A pair-programming style linter for PHP: it walks a syntax tree and
//! points out places where a newer or shorter language construct would do
//! the same job, filtered by the PHP version the project targets.
//!
//! # Architecture
//!
//! ```text
//! CLI/API -> Engine -> Loader -> Parser -> traverse -> Rules -> Hints
//! ```
//!
//! The engine loads configuration, resolves the active rule set for the
//! target PHP version, parses each file into a uniform node tree, and
//! dispatches tree nodes to the rules registered for their kind.

pub mod ast;
pub mod config;
pub mod engine;
pub mod equality;
pub mod hint;
pub mod loader;
pub mod output;
pub mod parser;
pub mod registry;
pub mod rules;
pub mod version;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export main types
pub use ast::{Children, Kind, Node, Value};
pub use config::{Config, ConfigError, OutputFormat};
pub use engine::{
    traverse, AnalysisResult, Engine, FileError, FileReport, RuleFailure, TraverseError,
};
pub use equality::{is_function_call, structurally_equal};
pub use hint::Hint;
pub use loader::{LoadError, Loader};
pub use output::{Formatter, JsonFormatter, PrettyFormatter};
pub use parser::{parse, ParseError};
pub use registry::Activation;
pub use rules::{Detector, Rule, RuleError};
pub use version::{PhpVersion, VersionError};
