//! Generic syntax tree model the rules and the traversal operate on

use std::fmt;

/// Syntactic category of a node.
///
/// Closed for the target language: every construct the parser emits maps to
/// one of these tags, unmapped constructs fall back to [`Kind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Ordered list of statements (also the tree root)
    StmtList,
    /// Function call expression
    Call,
    /// Method call on an object
    MethodCall,
    /// Static method call
    StaticCall,
    /// Bare name (function or class name)
    Name,
    /// List of names (e.g. the exception types of a catch clause)
    NameList,
    /// Variable
    Var,
    /// Call argument list
    ArgList,
    /// Variadic unpack argument (`...$list`)
    Unpack,
    /// Try statement
    Try,
    /// List of catch clauses
    CatchList,
    /// Single catch clause
    Catch,
    /// Finally clause
    Finally,
    /// Array literal
    Array,
    /// Single `key => value` array element
    ArrayElem,
    /// Class constant access (`Foo::BAR`)
    ClassConst,
    /// Assignment expression
    Assign,
    /// Binary expression
    Binary,
    /// Unary expression
    Unary,
    /// Echo statement
    Echo,
    /// If statement
    If,
    /// While statement
    While,
    /// For statement
    For,
    /// Foreach statement
    Foreach,
    /// Return statement
    Return,
    /// Object instantiation (`new Foo()`)
    New,
    /// Member access (`$foo->bar`)
    Member,
    /// Any construct without a dedicated tag
    Other,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Opaque bit field disambiguating sub-variants of a [`Kind`].
pub type Flags = u32;

/// Named flag bits.
pub mod flag {
    use super::Flags;

    /// Array literal written with the long `array(...)` spelling
    pub const ARRAY_SYNTAX_LONG: Flags = 1;
}

/// A child slot: either a nested node or a primitive leaf.
///
/// Primitives carry no source position and are never recursed into.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Node(Node),
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// View this value as a node, if it is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// View this value as a string primitive, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

/// Child storage of a node.
///
/// A node either holds an ordered sequence (statement lists, argument lists)
/// or a keyed mapping (structured constructs such as calls and catch
/// clauses). Keyed children keep insertion order; consumers that need a
/// deterministic order sort by key.
#[derive(Debug, Clone, PartialEq)]
pub enum Children {
    Sequence(Vec<Value>),
    Keyed(Vec<(String, Value)>),
}

impl Children {
    /// Number of direct children.
    pub fn len(&self) -> usize {
        match self {
            Children::Sequence(items) => items.len(),
            Children::Keyed(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One syntactic construct.
///
/// `kind` never changes after creation and trees are read-only during
/// traversal. `line` is display metadata only: it takes no part in
/// structural equality.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Kind,
    pub flags: Flags,
    pub children: Children,
    /// 1-based source line
    pub line: usize,
}

impl Node {
    /// Create a node with sequence-shaped children.
    pub fn sequence(kind: Kind, line: usize, items: Vec<Value>) -> Self {
        Self {
            kind,
            flags: 0,
            children: Children::Sequence(items),
            line,
        }
    }

    /// Create a node with keyed children.
    pub fn keyed(kind: Kind, line: usize, pairs: Vec<(&str, Value)>) -> Self {
        Self {
            kind,
            flags: 0,
            children: Children::Keyed(
                pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            ),
            line,
        }
    }

    /// Set the flag bits.
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Look up a keyed child. Returns `None` for sequence-shaped nodes.
    pub fn child(&self, key: &str) -> Option<&Value> {
        match &self.children {
            Children::Keyed(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Children::Sequence(_) => None,
        }
    }

    /// Look up a keyed child that is itself a node.
    pub fn child_node(&self, key: &str) -> Option<&Node> {
        self.child(key).and_then(Value::as_node)
    }

    /// The ordered items of a sequence-shaped node.
    pub fn items(&self) -> Option<&[Value]> {
        match &self.children {
            Children::Sequence(items) => Some(items),
            Children::Keyed(_) => None,
        }
    }
}

/// Iterative destruction: the derived drop glue recurses once per tree
/// level (Node → Children → Vec → Value → Node), so a tree deep enough to
/// traverse could not be freed without exhausting the call stack. Draining
/// child nodes into a worklist keeps drop depth constant, matching the
/// engine's guarantee that tree depth is bounded by memory rather than the
/// call stack.
impl Drop for Node {
    fn drop(&mut self) {
        fn drain_into(children: &mut Children, stack: &mut Vec<Node>) {
            match std::mem::replace(children, Children::Sequence(Vec::new())) {
                Children::Sequence(items) => {
                    for value in items {
                        if let Value::Node(node) = value {
                            stack.push(node);
                        }
                    }
                }
                Children::Keyed(pairs) => {
                    for (_, value) in pairs {
                        if let Value::Node(node) = value {
                            stack.push(node);
                        }
                    }
                }
            }
        }

        let mut stack = Vec::new();
        drain_into(&mut self.children, &mut stack);
        while let Some(mut node) = stack.pop() {
            drain_into(&mut node.children, &mut stack);
        }
    }
}
