//! Detect adjacent catch clauses that could be merged.
//!
//! Since PHP 7.1 a catch block may specify multiple exception types with a
//! union (`catch (A | B $exn)`). When two neighbouring clauses have bodies
//! that are identical except for line numbers, they are candidates for a
//! merge. Only adjacent pairs are compared; duplicated bodies further apart
//! are left alone because the intent is ambiguous.
//!
//! ## Before
//!
//! ```php
//! try {
//!     hoge();
//! } catch (A $exn) {
//!     fuga();
//! } catch (B $exn) {
//!     fuga();
//! }
//! ```
//!
//! ## After
//!
//! ```php
//! try {
//!     hoge();
//! } catch (A | B $exn) {
//!     fuga();
//! }
//! ```

use super::{doc_link, Detector, RuleError};
use crate::ast::{Kind, Node};
use crate::equality::structurally_equal;
use crate::hint::Hint;
use crate::version::PhpVersion;

#[derive(Debug, Clone, Copy)]
pub struct MultipleCatch;

impl MultipleCatch {
    pub const ID: &'static str = "MultipleCatch";
    const MESSAGE: &'static str = "A catch block may specify multiple exceptions.";
}

impl Detector for MultipleCatch {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn entry_kind(&self) -> Kind {
        Kind::Try
    }

    fn min_version(&self) -> PhpVersion {
        PhpVersion::new(7, 1, 0)
    }

    fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError> {
        let catches = node
            .child_node("catches")
            .ok_or(RuleError::MissingChild { key: "catches" })?;
        let clauses = catches
            .items()
            .ok_or(RuleError::UnexpectedShape { key: "catches" })?;

        let mut hints = Vec::new();
        for pair in clauses.windows(2) {
            let (first, second) = match (pair[0].as_node(), pair[1].as_node()) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(RuleError::UnexpectedShape { key: "catches" }),
            };

            let first_body = first
                .child("stmts")
                .ok_or(RuleError::MissingChild { key: "stmts" })?;
            let second_body = second
                .child("stmts")
                .ok_or(RuleError::MissingChild { key: "stmts" })?;

            if structurally_equal(first_body, second_body) {
                hints.push(Hint::new(
                    Self::ID,
                    Self::MESSAGE,
                    file,
                    first.line,
                    &doc_link(Self::ID),
                ));
            }
        }

        Ok(hints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::test_util::run_single;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catch_single_exceptions_with_equal_bodies() {
        let code = r#"<?php
try {
    hoge();
} catch (A $exn) {
    echo "catch!";
    fuga();
} catch (B $exn) {
    echo "catch!";
    fuga();
} catch (C $exn) {
    echo "catch!";
} catch (D $exn) {
    echo "catch!";
}
"#;
        let root = parse(code).unwrap();
        let hints = run_single(&MultipleCatch, &root);

        assert_eq!(
            hints,
            vec![
                Hint::new(
                    "MultipleCatch",
                    "A catch block may specify multiple exceptions.",
                    "./test.php",
                    4,
                    &doc_link("MultipleCatch"),
                ),
                Hint::new(
                    "MultipleCatch",
                    "A catch block may specify multiple exceptions.",
                    "./test.php",
                    10,
                    &doc_link("MultipleCatch"),
                ),
            ]
        );
    }

    #[test]
    fn test_catch_multiple_exceptions_already_merged() {
        let code = r#"<?php
try {
    hoge();
} catch (A | B $exn) {
    echo "catch!";
    fuga();
} catch (C | D $exn) {
    echo "catch!";
}
"#;
        let root = parse(code).unwrap();
        assert!(run_single(&MultipleCatch, &root).is_empty());
    }

    #[test]
    fn test_catch_bodies_differ_in_one_statement() {
        let code = r#"<?php
try {
    hoge();
} catch (A $exn) {
    echo "catch!";
    fuga();
} catch (B $exn) {
    echo "catch!";
}
"#;
        let root = parse(code).unwrap();
        assert!(run_single(&MultipleCatch, &root).is_empty());
    }

    #[test]
    fn test_non_adjacent_duplicates_not_flagged() {
        let code = r#"<?php
try {
    hoge();
} catch (A $exn) {
    fuga();
} catch (B $exn) {
    piyo();
} catch (C $exn) {
    fuga();
}
"#;
        let root = parse(code).unwrap();
        assert!(run_single(&MultipleCatch, &root).is_empty());
    }
}
