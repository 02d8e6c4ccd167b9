//! The rule catalogue
//!
//! Every detector is a unit struct implementing [`Detector`], wrapped in the
//! closed [`Rule`] sum type. New rules are added by extending the enum and
//! [`Rule::catalogue`]; there is no runtime plugin loading. Catalogue order
//! is the registration order and decides hint emission order when several
//! rules fire on the same node.

mod array_syntax_long;
mod instance_constant;
mod multiple_catch;
mod square_bracket_syntax;

pub use array_syntax_long::ArraySyntaxLong;
pub use instance_constant::InstanceConstant;
pub use multiple_catch::MultipleCatch;
pub use square_bracket_syntax::SquareBracketSyntax;

use crate::ast::{Kind, Node};
use crate::hint::Hint;
use crate::version::PhpVersion;
use thiserror::Error;

/// Failure of one rule on one node.
///
/// These never abort a traversal; the engine records them and moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("node is missing expected child `{key}`")]
    MissingChild { key: &'static str },

    #[error("node child `{key}` has an unexpected shape")]
    UnexpectedShape { key: &'static str },
}

/// Capability contract every detector implements.
pub trait Detector {
    /// Stable identifier, used for ignore/only filtering and as the hint
    /// category.
    fn id(&self) -> &'static str;

    /// The single node kind this detector wants to be dispatched on.
    fn entry_kind(&self) -> Kind;

    /// Minimum target PHP version for the suggested syntax to exist.
    fn min_version(&self) -> PhpVersion;

    /// Inspect one matched node. Pure: no side effects beyond logging.
    fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError>;
}

/// The closed set of shipped rules.
#[derive(Debug, Clone)]
pub enum Rule {
    ArraySyntaxLong(ArraySyntaxLong),
    InstanceConstant(InstanceConstant),
    MultipleCatch(MultipleCatch),
    SquareBracketSyntax(SquareBracketSyntax),
}

impl Rule {
    /// All known rule identifiers, in catalogue order.
    pub const VALID_IDS: &'static [&'static str] = &[
        ArraySyntaxLong::ID,
        InstanceConstant::ID,
        MultipleCatch::ID,
        SquareBracketSyntax::ID,
    ];

    /// The full catalogue, in registration order.
    pub fn catalogue() -> Vec<Rule> {
        vec![
            Rule::ArraySyntaxLong(ArraySyntaxLong),
            Rule::InstanceConstant(InstanceConstant),
            Rule::MultipleCatch(MultipleCatch),
            Rule::SquareBracketSyntax(SquareBracketSyntax),
        ]
    }

    fn detector(&self) -> &dyn Detector {
        match self {
            Rule::ArraySyntaxLong(d) => d,
            Rule::InstanceConstant(d) => d,
            Rule::MultipleCatch(d) => d,
            Rule::SquareBracketSyntax(d) => d,
        }
    }

    pub fn id(&self) -> &'static str {
        self.detector().id()
    }

    pub fn entry_kind(&self) -> Kind {
        self.detector().entry_kind()
    }

    pub fn min_version(&self) -> PhpVersion {
        self.detector().min_version()
    }

    pub fn run(&self, file: &str, node: &Node) -> Result<Vec<Hint>, RuleError> {
        self.detector().run(file, node)
    }
}

/// Documentation link for a rule id.
pub(crate) fn doc_link(id: &str) -> String {
    format!("{}/{}.md", crate::hint::DOCUMENT_LINK, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_matches_valid_ids() {
        let ids: Vec<&str> = Rule::catalogue().iter().map(|r| r.id()).collect();
        assert_eq!(ids, Rule::VALID_IDS);
    }

    #[test]
    fn test_entry_kinds() {
        for rule in Rule::catalogue() {
            match rule.id() {
                "ArraySyntaxLong" => assert_eq!(rule.entry_kind(), Kind::Array),
                "InstanceConstant" => assert_eq!(rule.entry_kind(), Kind::ClassConst),
                "MultipleCatch" => assert_eq!(rule.entry_kind(), Kind::Try),
                "SquareBracketSyntax" => assert_eq!(rule.entry_kind(), Kind::Call),
                other => panic!("unexpected rule id {other}"),
            }
        }
    }
}
