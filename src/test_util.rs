//! Shared helpers for rule tests

use crate::ast::{Children, Node, Value};
use crate::hint::Hint;
use crate::rules::Detector;

/// Run one detector over a whole tree the way the engine dispatches it:
/// pre-order, sequence children in order, keyed children in key order.
pub(crate) fn run_single(detector: &dyn Detector, root: &Node) -> Vec<Hint> {
    let mut hints = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.kind == detector.entry_kind() {
            hints.extend(detector.run("./test.php", node).unwrap());
        }

        match &node.children {
            Children::Sequence(items) => {
                for item in items.iter().rev() {
                    if let Value::Node(child) = item {
                        stack.push(child);
                    }
                }
            }
            Children::Keyed(pairs) => {
                let mut sorted: Vec<&(String, Value)> = pairs.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                for (_, value) in sorted.into_iter().rev() {
                    if let Value::Node(child) = value {
                        stack.push(child);
                    }
                }
            }
        }
    }

    hints
}
