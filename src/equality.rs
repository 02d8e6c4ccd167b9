//! Structural comparison helpers shared by rule implementations

use crate::ast::{Children, Kind, Node, Value};

/// Compare two values structurally, ignoring source line numbers everywhere.
///
/// Sequences are equal iff they have the same length and are pairwise equal.
/// Nodes are equal iff kind, flags and children match, with both sides using
/// the same child shape. Primitives compare by value. Any shape mismatch is
/// unequal. The relation is symmetric.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Node(a), Value::Node(b)) => nodes_equal(a, b),
        (Value::Node(_), _) | (_, Value::Node(_)) => false,
        _ => a == b,
    }
}

fn nodes_equal(a: &Node, b: &Node) -> bool {
    if a.kind != b.kind || a.flags != b.flags {
        return false;
    }
    children_equal(&a.children, &b.children)
}

fn children_equal(a: &Children, b: &Children) -> bool {
    match (a, b) {
        (Children::Sequence(a), Children::Sequence(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
        }
        // Checked in both directions so the relation stays symmetric even
        // for defective inputs with duplicate keys (those are rejected by
        // traversal, but this function is exported standalone).
        (Children::Keyed(a), Children::Keyed(b)) => {
            a.len() == b.len() && keys_subsumed(a, b) && keys_subsumed(b, a)
        }
        _ => false,
    }
}

fn keys_subsumed(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    a.iter().all(|(key, value)| {
        b.iter()
            .find(|(k, _)| k == key)
            .is_some_and(|(_, other)| structurally_equal(value, other))
    })
}

/// Check whether `value` is a call expression of the given function name.
pub fn is_function_call(value: &Value, function: &str) -> bool {
    let Some(node) = value.as_node() else {
        return false;
    };
    if node.kind != Kind::Call {
        return false;
    }
    node.child_node("expr")
        .filter(|expr| expr.kind == Kind::Name)
        .and_then(|expr| expr.child("name"))
        .and_then(Value::as_str)
        == Some(function)
}
