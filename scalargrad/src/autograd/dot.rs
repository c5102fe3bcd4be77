//! GraphViz rendering of a computation graph.
//!
//! Each node becomes a record `label|op|grad: g|data: d|#id` where `id` is its
//! position in topological order. The terminal is filled yellow, leaves green;
//! edges point from a consumer to each of its operands.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::autograd::node::Value;
use crate::autograd::{topological_order, ScalarNode};
use crate::scalar::Scalar;

/// Renders the graph below `root` as a `digraph` named `name`.
#[must_use]
pub fn render<T: Scalar>(root: &Value<T>, name: &str) -> String {
    let order = topological_order(root);
    let ids: HashMap<_, usize> = order
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_ptr(), i))
        .collect();

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "digraph \"{}\" {{", escape(name));
    let _ = writeln!(out, "node [shape=record];");
    out.push('\n');

    for (id, node) in order.iter().enumerate() {
        let record = format!(
            "{}|{}|grad: {}|data: {}|#{}",
            escape(&node.label().unwrap_or_default()),
            escape(node.op_name()),
            node.grad(),
            node.data(),
            id
        );
        let style = if node.ptr_eq(root) {
            ", style=filled, fillcolor=yellow"
        } else if node.is_leaf() {
            ", style=filled, fillcolor=green"
        } else {
            ""
        };
        let _ = writeln!(out, "{id} [label = \"{record}\"{style}];");
    }

    out.push('\n');
    for (id, node) in order.iter().enumerate() {
        for operand in node.operands() {
            let _ = writeln!(out, "{id}->{};", ids[&operand.as_ptr()]);
        }
    }
    out.push_str("}\n");
    out
}

/// Escapes characters that are structural inside a record label.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '"' | '|' | '{' | '}' | '<' | '>' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
