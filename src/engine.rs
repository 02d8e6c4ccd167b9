//! Core analysis engine: tree traversal, rule dispatch and the multi-file
//! façade

use crate::ast::{Children, Kind, Node, Value};
use crate::config::Config;
use crate::hint::Hint;
use crate::parser;
use crate::registry::Activation;
use crate::rules::RuleError;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Structural defect in an input tree, fatal for that file only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraverseError {
    #[error("duplicate key `{key}` in keyed children of {kind} node at line {line}")]
    DuplicateKey {
        kind: Kind,
        key: String,
        line: usize,
    },
}

/// A rule failure surfaced as a non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule_id: String,
    pub file: String,
    pub line: usize,
    pub error: RuleError,
}

/// Outcome of walking one file's tree.
#[derive(Debug, Default)]
pub struct FileReport {
    /// Hints in traversal order (pre-order, top-to-bottom, left-to-right).
    /// This is close to ascending line order for typical source but not
    /// guaranteed to be; callers wanting line-sorted output sort themselves.
    pub hints: Vec<Hint>,
    /// Per-rule failures collected along the way
    pub failures: Vec<RuleFailure>,
}

/// Walk `root` once, depth-first pre-order, invoking every active rule
/// registered for each visited node's kind.
///
/// The walk uses an explicit work stack, so tree depth is bounded by memory
/// rather than the call stack. Sequence children are visited in stored
/// order; keyed children in sorted key order, making hint order reproducible
/// across runs on identical input. Primitive children are not recursed into.
/// A failing rule is recorded and skipped, never aborting the walk; a
/// duplicate key among keyed children aborts this file's walk with a
/// [`TraverseError`].
pub fn traverse(
    file: &str,
    root: &Node,
    activation: &Activation,
) -> Result<FileReport, TraverseError> {
    let mut report = FileReport::default();
    let mut stack: Vec<&Node> = vec![root];

    while let Some(node) = stack.pop() {
        for rule in activation.rules_for(node.kind) {
            match rule.run(file, node) {
                Ok(hints) => report.hints.extend(hints),
                Err(error) => {
                    log::warn!(
                        "rule {} failed on {}:{}: {}",
                        rule.id(),
                        file,
                        node.line,
                        error
                    );
                    report.failures.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        file: file.to_string(),
                        line: node.line,
                        error,
                    });
                }
            }
        }

        match &node.children {
            Children::Sequence(items) => {
                for value in items.iter().rev() {
                    if let Value::Node(child) = value {
                        stack.push(child);
                    }
                }
            }
            Children::Keyed(pairs) => {
                let mut sorted: Vec<&(String, Value)> = pairs.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                for pair in sorted.windows(2) {
                    if pair[0].0 == pair[1].0 {
                        return Err(TraverseError::DuplicateKey {
                            kind: node.kind,
                            key: pair[0].0.clone(),
                            line: node.line,
                        });
                    }
                }
                for (_, value) in sorted.into_iter().rev() {
                    if let Value::Node(child) = value {
                        stack.push(child);
                    }
                }
            }
        }
    }

    Ok(report)
}

/// A file that could not be analyzed at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub file: String,
    pub message: String,
}

/// Result of an analysis run over one or more files.
#[derive(Debug, Default)]
pub struct AnalysisResult {
    /// All hints; per-file traversal order, files in input order
    pub hints: Vec<Hint>,

    /// Non-fatal rule failures
    pub failures: Vec<RuleFailure>,

    /// Files that failed to read, parse or traverse
    pub errors: Vec<FileError>,

    /// Files processed
    pub files_processed: usize,

    /// Processing duration
    pub duration: Duration,
}

impl AnalysisResult {
    /// Check if result is clean (no hints and no file errors)
    pub fn is_clean(&self) -> bool {
        self.hints.is_empty() && self.errors.is_empty()
    }

    /// Get exit code (0 = clean, 1 = hints found, 2 = file errors)
    pub fn exit_code(&self) -> i32 {
        if !self.errors.is_empty() {
            2
        } else if !self.hints.is_empty() {
            1
        } else {
            0
        }
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: AnalysisResult) {
        self.hints.extend(other.hints);
        self.failures.extend(other.failures);
        self.errors.extend(other.errors);
        self.files_processed += other.files_processed;
    }
}

/// The main analysis engine: configuration plus the frozen activation.
pub struct Engine {
    config: Config,
    activation: Activation,
}

impl Engine {
    /// Create an engine, activating the built-in catalogue against the
    /// configuration's target version and tool filters.
    pub fn new(config: Config) -> Self {
        let activation = Activation::with_catalogue(
            &config.ignored_ids(),
            &config.allowed_ids(),
            config.php_version,
        );
        Self { config, activation }
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// Analyze multiple files, in parallel when more than one is given.
    ///
    /// The activation is read-only and shared across workers; hints from
    /// different files never interact, so per-file reports are merged in
    /// input order.
    pub fn analyze(&self, files: &[PathBuf]) -> AnalysisResult {
        let start = Instant::now();

        let results: Vec<AnalysisResult> = if files.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(if self.config.jobs > 0 {
                    self.config.jobs
                } else {
                    num_cpus::get()
                })
                .build()
                .unwrap_or_else(|_| rayon::ThreadPoolBuilder::new().build().unwrap());

            pool.install(|| files.par_iter().map(|f| self.analyze_file(f)).collect())
        } else {
            files.iter().map(|f| self.analyze_file(f)).collect()
        };

        let mut combined = AnalysisResult::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        combined
    }

    /// Analyze a single file.
    pub fn analyze_file(&self, path: &Path) -> AnalysisResult {
        let mut result = AnalysisResult {
            files_processed: 1,
            ..AnalysisResult::default()
        };
        let file = path.display().to_string();

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                result.errors.push(FileError {
                    file,
                    message: format!("failed to read file: {e}"),
                });
                return result;
            }
        };

        let root = match parser::parse(&content) {
            Ok(root) => root,
            Err(e) => {
                result.errors.push(FileError {
                    file,
                    message: e.to_string(),
                });
                return result;
            }
        };

        match traverse(&file, &root, &self.activation) {
            Ok(report) => {
                result.hints = report.hints;
                result.failures = report.failures;
            }
            Err(e) => {
                result.errors.push(FileError {
                    file,
                    message: e.to_string(),
                });
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::flag;
    use crate::version::PhpVersion;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn full_activation() -> Activation {
        Activation::with_catalogue(&HashSet::new(), &HashSet::new(), PhpVersion::LATEST)
    }

    fn long_array(line: usize) -> Node {
        Node::sequence(Kind::Array, line, vec![]).with_flags(flag::ARRAY_SYNTAX_LONG)
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let root = Node::sequence(
            Kind::StmtList,
            1,
            vec![long_array(2).into(), long_array(3).into()],
        );
        let activation = full_activation();

        let first = traverse("a.php", &root, &activation).unwrap();
        let second = traverse("a.php", &root, &activation).unwrap();
        assert_eq!(first.hints, second.hints);
        assert_eq!(first.hints.len(), 2);
    }

    #[test]
    fn test_hints_in_preorder() {
        let inner = long_array(5);
        let outer = Node::sequence(Kind::Array, 2, vec![inner.into()])
            .with_flags(flag::ARRAY_SYNTAX_LONG);
        let root = Node::sequence(Kind::StmtList, 1, vec![outer.into()]);

        let report = traverse("a.php", &root, &full_activation()).unwrap();
        let lines: Vec<usize> = report.hints.iter().map(|h| h.line).collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn test_rule_failure_is_isolated() {
        // A Call node with no children makes SquareBracketSyntax fail, but
        // the long array later in the tree must still produce its hint.
        let broken_call = Node::keyed(Kind::Call, 2, vec![]);
        let root = Node::sequence(
            Kind::StmtList,
            1,
            vec![broken_call.into(), long_array(3).into()],
        );

        let report = traverse("a.php", &root, &full_activation()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].rule_id, "SquareBracketSyntax");
        assert_eq!(report.failures[0].line, 2);
        assert_eq!(report.hints.len(), 1);
        assert_eq!(report.hints[0].rule_id, "ArraySyntaxLong");
    }

    #[test]
    fn test_duplicate_keyed_children_are_fatal() {
        let node = Node {
            kind: Kind::Other,
            flags: 0,
            children: Children::Keyed(vec![
                ("expr".to_string(), Value::Int(1)),
                ("expr".to_string(), Value::Int(2)),
            ]),
            line: 7,
        };

        let err = traverse("a.php", &node, &full_activation()).unwrap_err();
        assert_eq!(
            err,
            TraverseError::DuplicateKey {
                kind: Kind::Other,
                key: "expr".to_string(),
                line: 7,
            }
        );
    }

    #[test]
    fn test_deep_tree_does_not_exhaust_stack() {
        let mut node = long_array(10_000);
        for depth in (1..10_000).rev() {
            node = Node::sequence(Kind::StmtList, depth, vec![node.into()]);
        }

        let report = traverse("deep.php", &node, &full_activation()).unwrap();
        assert_eq!(report.hints.len(), 1);
    }

    #[test]
    fn test_unknown_kinds_dispatch_nothing() {
        let root = Node::sequence(
            Kind::StmtList,
            1,
            vec![Node::sequence(Kind::Echo, 2, vec!["hi".into()]).into()],
        );
        let report = traverse("a.php", &root, &full_activation()).unwrap();
        assert!(report.hints.is_empty());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_result_exit_code() {
        let mut result = AnalysisResult::default();
        assert_eq!(result.exit_code(), 0);
        assert!(result.is_clean());

        result.hints.push(Hint::new("x", "m", "f", 1, "l"));
        assert_eq!(result.exit_code(), 1);

        result.errors.push(FileError {
            file: "f".to_string(),
            message: "boom".to_string(),
        });
        assert_eq!(result.exit_code(), 2);
    }

    #[test]
    fn test_result_merge() {
        let mut a = AnalysisResult {
            files_processed: 1,
            hints: vec![Hint::new("x", "m", "a.php", 1, "l")],
            ..AnalysisResult::default()
        };
        let b = AnalysisResult {
            files_processed: 2,
            hints: vec![Hint::new("y", "m", "b.php", 1, "l")],
            ..AnalysisResult::default()
        };

        a.merge(b);
        assert_eq!(a.files_processed, 3);
        assert_eq!(a.hints.len(), 2);
        assert_eq!(a.hints[1].rule_id, "y");
    }
}
