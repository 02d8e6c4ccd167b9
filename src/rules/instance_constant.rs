//! Detect `get_class($instance)::CONSTANT` round-trips.
//!
//! Since PHP 5.5, class constants can be read straight from an instance, so
//! going through `get_class()` first is needless indirection.
//!
//! ## Before
//!
//! ```php
//! get_class($instance)::CONSTANT;
//! ```
//!
//! ## After
//!
//! ```php
//! $instance::CONSTANT;
//! ```

use super::{doc_link, Detector, RuleError};
use crate::ast::{Kind, Node};
use crate::equality::is_function_call;
use crate::hint::Hint;
use crate::version::PhpVersion;

#[derive(Debug, Clone, Copy)]
pub struct InstanceConstant;

impl InstanceConstant {
    pub const ID: &'static str = "InstanceConstant";
    const MESSAGE: &'static str = "You can access class constants from instances.";
}

impl Detector for InstanceConstant {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn entry_kind(&self) -> Kind {
        Kind::ClassConst
    }

    fn min_version(&self) -> PhpVersion {
        PhpVersion::new(5, 5, 0)
    }

    fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError> {
        let class = node
            .child("class")
            .ok_or(RuleError::MissingChild { key: "class" })?;

        if !is_function_call(class, "get_class") {
            return Ok(Vec::new());
        }

        // `get_class()` without an argument resolves to the enclosing class,
        // which has no instance to read the constant from.
        let takes_one_arg = class
            .as_node()
            .and_then(|call| call.child_node("args"))
            .and_then(Node::items)
            .is_some_and(|items| items.len() == 1);
        if !takes_one_arg {
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
    fn test_get_class_with_constants() {
        let code = "<?php\n$instance = new Hoge();\nget_class($instance)::CONSTANT;\n";
        let root = parse(code).unwrap();
        let hints = run_single(&InstanceConstant, &root);

        assert_eq!(
            hints,
            vec![Hint::new(
                "InstanceConstant",
                "You can access class constants from instances.",
                "./test.php",
                3,
                &doc_link("InstanceConstant"),
            )]
        );
    }

    #[test]
    fn test_instance_constants_already_direct() {
        let code = "<?php\n$instance = new Hoge();\n$instance::CONSTANT;\n";
        let root = parse(code).unwrap();
        assert!(run_single(&InstanceConstant, &root).is_empty());
    }

    #[test]
    fn test_plain_class_constant() {
        let root = parse("<?php\nHoge::CONSTANT;\n").unwrap();
        assert!(run_single(&InstanceConstant, &root).is_empty());
    }

    #[test]
    fn test_get_class_without_argument() {
        let root = parse("<?php\nget_class()::CONSTANT;\n").unwrap();
        assert!(run_single(&InstanceConstant, &root).is_empty());
    }
}
