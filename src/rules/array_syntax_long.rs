//! Detect array literals written with the long `array(...)` spelling.
//!
//! PHP 5.4 introduced the short `[...]` syntax, which reads better and is
//! the prevailing style.

use super::{doc_link, Detector, RuleError};
use crate::ast::{flag, Kind, Node};
use crate::hint::Hint;
use crate::version::PhpVersion;

#[derive(Debug, Clone, Copy)]
pub struct ArraySyntaxLong;

impl ArraySyntaxLong {
    pub const ID: &'static str = "ArraySyntaxLong";
    const MESSAGE: &'static str = "Use `[...]` syntax instead of `array(...)` syntax.";
}

impl Detector for ArraySyntaxLong {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn entry_kind(&self) -> Kind {
        Kind::Array
    }

    fn min_version(&self) -> PhpVersion {
        PhpVersion::new(5, 4, 0)
    }

    fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError> {
        if node.flags & flag::ARRAY_SYNTAX_LONG == 0 {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::test_util::run_single;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_long_array_syntax() {
        let root = parse("<?php\n$list = array(1, 2, 3);\n").unwrap();
        let hints = run_single(&ArraySyntaxLong, &root);

        assert_eq!(
            hints,
            vec![Hint::new(
                "ArraySyntaxLong",
                "Use `[...]` syntax instead of `array(...)` syntax.",
                "./test.php",
                2,
                &doc_link("ArraySyntaxLong"),
            )]
        );
    }

    #[test]
    fn test_short_array_syntax() {
        let root = parse("<?php\n$list = [1, 2, 3];\n").unwrap();
        assert!(run_single(&ArraySyntaxLong, &root).is_empty());
    }

    #[test]
    fn test_nested_long_arrays_each_reported() {
        let root = parse("<?php\n$list = array(array(1));\n").unwrap();
        assert_eq!(run_single(&ArraySyntaxLong, &root).len(), 2);
    }
}
