//! Detect `array_push()` calls with wasteful function call overhead.
//!
//! Appending a single element through `array_push()` pays for a function
//! call that `$array[] =` avoids.
//!
//! ## Before
//!
//! ```php
//! array_push($array, 1);
//! ```
//!
//! ## After
//!
//! ```php
//! $array[] = 1;
//! ```

use super::{doc_link, Detector, RuleError};
use crate::ast::{Kind, Node, Value};
use crate::hint::Hint;
use crate::version::PhpVersion;

#[derive(Debug, Clone, Copy)]
pub struct SquareBracketSyntax;

impl SquareBracketSyntax {
    pub const ID: &'static str = "SquareBracketSyntax";
    const MESSAGE: &'static str =
        "Since `array_push()` has the function call overhead, let's use `$array[] =`.";
}

impl Detector for SquareBracketSyntax {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn entry_kind(&self) -> Kind {
        Kind::Call
    }

    fn min_version(&self) -> PhpVersion {
        PhpVersion::ANY
    }

    fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError> {
        let expr = node
            .child_node("expr")
            .ok_or(RuleError::MissingChild { key: "expr" })?;

        if expr.kind != Kind::Name {
            log::debug!("ignore callee kind: {}", expr.kind);
            return Ok(Vec::new());
        }

        let name = expr
            .child("name")
            .and_then(Value::as_str)
            .ok_or(RuleError::MissingChild { key: "name" })?;
        if name != "array_push" {
            log::debug!("ignore function name: {name}");
            return Ok(Vec::new());
        }

        let args = node
            .child_node("args")
            .ok_or(RuleError::MissingChild { key: "args" })?;
        let items = args
            .items()
            .ok_or(RuleError::UnexpectedShape { key: "args" })?;

        // `array_push($array, ...$list)` cannot be rewritten as an index
        // assignment, so the unpack form never fires.
        if let Some(second) = items.get(1) {
            if second.as_node().is_some_and(|n| n.kind == Kind::Unpack) {
                return Ok(Vec::new());
            }
        }

        if items.len() != 2 {
            return Ok(Vec::new());
        }

        Ok(vec![Hint::new(
            Self::ID,
            Self::MESSAGE,
            file,
            node.line,
            &doc_link(Self::ID),
        )])
    }
}
