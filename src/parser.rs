//! PHP front end: tree-sitter CST to the engine's [`Node`] model
//!
//! The conversion targets the shape the rules inspect: calls become keyed
//! `{expr, args}` nodes, try statements keyed `{try, catches, finally}`
//! nodes, and so on. Constructs without a dedicated shape convert
//! generically, keeping every token (anonymous ones as string primitives) so
//! structural comparison of arbitrary statements stays meaningful.

use crate::ast::{flag, Kind, Node, Value};
use thiserror::Error;
use tree_sitter::Node as TsNode;

/// Error turning source text into a tree
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("PHP syntax error at line {line}")]
    Syntax { line: usize },

    #[error("failed to load PHP grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree")]
    NoTree,
}

/// Parse PHP source text into a tree rooted at a `StmtList` node.
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_php::LANGUAGE_PHP.into())?;

    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(ParseError::Syntax {
            line: first_error_line(root),
        });
    }

    let line = root.start_position().row + 1;
    let items = convert_children(root, source);
    Ok(Node::sequence(Kind::StmtList, line, items))
}

fn first_error_line(root: TsNode) -> usize {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                if child.has_error() {
                    stack.push(child);
                }
            }
        }
    }
    1
}

fn text<'a>(node: TsNode, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

fn line_of(node: TsNode) -> usize {
    node.start_position().row + 1
}

fn named_children(node: TsNode) -> Vec<TsNode> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .collect()
}

/// Convert the named children of `node`, dropping non-semantic ones.
fn convert_children(node: TsNode, source: &str) -> Vec<Value> {
    named_children(node)
        .into_iter()
        .filter_map(|child| convert(child, source))
        .collect()
}

/// Convert one CST node. Returns `None` for nodes with no semantic content
/// (open tags, inline HTML, comments).
fn convert(node: TsNode, source: &str) -> Option<Value> {
    let line = line_of(node);
    match node.kind() {
        "php_tag" | "text" | "text_interpolation" | "comment" => None,

        "program" | "compound_statement" => Some(
            Node::sequence(Kind::StmtList, line, convert_children(node, source)).into(),
        ),

        // Statement wrappers contribute nothing beyond their expression.
        "expression_statement" => named_children(node)
            .into_iter()
            .next()
            .and_then(|child| convert(child, source)),

        "function_call_expression" => Some(convert_call(node, source).into()),

        "arguments" => Some(convert_arguments(node, source).into()),

        "variadic_unpacking" => Some(convert_unpack(node, source).into()),

        "name" | "qualified_name" => Some(
            Node::keyed(Kind::Name, line, vec![("name", text(node, source).into())]).into(),
        ),

        "variable_name" => {
            let name = text(node, source).trim_start_matches('$');
            Some(Node::keyed(Kind::Var, line, vec![("name", name.into())]).into())
        }

        "integer" => {
            let raw = text(node, source).replace('_', "");
            Some(match raw.parse::<i64>() {
                Ok(i) => Value::Int(i),
                Err(_) => Value::Str(raw),
            })
        }

        "float" => {
            let raw = text(node, source).replace('_', "");
            Some(match raw.parse::<f64>() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::Str(raw),
            })
        }

        "string" | "encapsed_string" | "heredoc" | "shell_command_expression" => {
            Some(Value::Str(text(node, source).to_string()))
        }

        "boolean" => Some(Value::Bool(text(node, source).eq_ignore_ascii_case("true"))),

        "null" => Some(Value::Null),

        "try_statement" => Some(convert_try(node, source).into()),

        "catch_clause" => Some(convert_catch(node, source).into()),

        "type_list" => Some(
            Node::sequence(Kind::NameList, line, convert_children(node, source)).into(),
        ),

        "array_creation_expression" => Some(convert_array(node, source).into()),

        "class_constant_access_expression" => convert_class_const(node, source).map(Value::Node),

        _ => Some(convert_generic(node, source)),
    }
}

fn convert_call(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let callee = node
        .child_by_field_name("function")
        .and_then(|n| convert(n, source))
        .unwrap_or(Value::Null);
    let args = node
        .child_by_field_name("arguments")
        .map(|n| convert_arguments(n, source))
        .unwrap_or_else(|| Node::sequence(Kind::ArgList, line, Vec::new()));

    Node::keyed(
        Kind::Call,
        line,
        vec![("expr", callee), ("args", args.into())],
    )
}

fn convert_arguments(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let items = named_children(node)
        .into_iter()
        .filter_map(|child| match child.kind() {
            "argument" => convert_argument(child, source),
            "variadic_unpacking" => Some(convert_unpack(child, source).into()),
            _ => convert(child, source),
        })
        .collect();
    Node::sequence(Kind::ArgList, line, items)
}

/// Unwrap an `argument` wrapper down to its expression. The spread form
/// shows up either as a `variadic_unpacking` child or as the argument node
/// itself, depending on grammar version, so both spellings are handled.
fn convert_argument(node: TsNode, source: &str) -> Option<Value> {
    let expr = named_children(node).into_iter().last()?;
    if expr.kind() == "variadic_unpacking" {
        return Some(convert_unpack(expr, source).into());
    }
    convert(expr, source)
}

fn convert_unpack(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let inner = named_children(node)
        .into_iter()
        .next()
        .and_then(|child| convert(child, source))
        .unwrap_or(Value::Null);
    Node::keyed(Kind::Unpack, line, vec![("expr", inner)])
}

fn convert_try(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let body = node
        .child_by_field_name("body")
        .and_then(|n| convert(n, source))
        .unwrap_or_else(|| Node::sequence(Kind::StmtList, line, Vec::new()).into());

    let clauses: Vec<Value> = named_children(node)
        .into_iter()
        .filter(|child| child.kind() == "catch_clause")
        .map(|child| convert_catch(child, source).into())
        .collect();
    let catches_line = clauses
        .first()
        .and_then(Value::as_node)
        .map(|n| n.line)
        .unwrap_or(line);

    let mut pairs = vec![
        ("try", body),
        (
            "catches",
            Node::sequence(Kind::CatchList, catches_line, clauses).into(),
        ),
    ];

    if let Some(finally) = named_children(node)
        .into_iter()
        .find(|child| child.kind() == "finally_clause")
    {
        pairs.push(("finally", convert_generic(finally, source)));
    }

    Node::keyed(Kind::Try, line, pairs)
}

fn convert_catch(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let types = node
        .child_by_field_name("type")
        .and_then(|n| convert(n, source))
        .unwrap_or_else(|| Node::sequence(Kind::NameList, line, Vec::new()).into());
    let body = node
        .child_by_field_name("body")
        .and_then(|n| convert(n, source))
        .unwrap_or_else(|| Node::sequence(Kind::StmtList, line, Vec::new()).into());

    let mut pairs = vec![("class", types)];
    if let Some(var) = node
        .child_by_field_name("name")
        .and_then(|n| convert(n, source))
    {
        pairs.push(("var", var));
    }
    pairs.push(("stmts", body));

    Node::keyed(Kind::Catch, line, pairs)
}

fn convert_array(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    // the `array` keyword is case-insensitive in PHP
    let long_form = text(node, source)
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("array"));
    let flags = if long_form { flag::ARRAY_SYNTAX_LONG } else { 0 };

    let elems = named_children(node)
        .into_iter()
        .filter_map(|child| match child.kind() {
            "array_element_initializer" => Some(convert_array_element(child, source).into()),
            _ => convert(child, source),
        })
        .collect();

    Node::sequence(Kind::Array, line, elems).with_flags(flags)
}

fn convert_array_element(node: TsNode, source: &str) -> Node {
    let line = line_of(node);
    let mut exprs: Vec<Value> = convert_children(node, source);

    let (key, value) = if exprs.len() >= 2 {
        let value = exprs.pop().unwrap_or(Value::Null);
        let key = exprs.pop().unwrap_or(Value::Null);
        (key, value)
    } else {
        (Value::Null, exprs.pop().unwrap_or(Value::Null))
    };

    Node::keyed(Kind::ArrayElem, line, vec![("value", value), ("key", key)])
}

fn convert_class_const(node: TsNode, source: &str) -> Option<Node> {
    let line = line_of(node);
    let children = named_children(node);
    let qualifier = children.first().copied()?;
    let constant = children.last().copied()?;

    Some(Node::keyed(
        Kind::ClassConst,
        line,
        vec![
            ("class", convert(qualifier, source).unwrap_or(Value::Null)),
            ("const", text(constant, source).into()),
        ],
    ))
}

/// Fallback conversion: mapped kind where one exists, all children kept,
/// anonymous tokens preserved as string primitives.
fn convert_generic(node: TsNode, source: &str) -> Value {
    let line = line_of(node);
    let kind = map_kind(node.kind());

    if node.child_count() == 0 {
        return Value::Str(text(node, source).to_string());
    }

    let items = (0..node.child_count())
        .filter_map(|i| node.child(i))
        .filter_map(|child| {
            if child.is_named() {
                convert(child, source)
            } else {
                Some(Value::Str(text(child, source).to_string()))
            }
        })
        .collect();

    Node::sequence(kind, line, items).into()
}

fn map_kind(ts_kind: &str) -> Kind {
    match ts_kind {
        "assignment_expression" | "augmented_assignment_expression" => Kind::Assign,
        "binary_expression" => Kind::Binary,
        "unary_op_expression" => Kind::Unary,
        "echo_statement" => Kind::Echo,
        "if_statement" | "else_clause" | "else_if_clause" => Kind::If,
        "while_statement" | "do_statement" => Kind::While,
        "for_statement" => Kind::For,
        "foreach_statement" => Kind::Foreach,
        "return_statement" => Kind::Return,
        "object_creation_expression" => Kind::New,
        "member_access_expression" | "nullsafe_member_access_expression" => Kind::Member,
        "member_call_expression" | "nullsafe_member_call_expression" => Kind::MethodCall,
        "scoped_call_expression" => Kind::StaticCall,
        "finally_clause" => Kind::Finally,
        _ => Kind::Other,
    }
}
