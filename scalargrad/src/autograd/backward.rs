//! Reverse-mode sweep and the graph-wide reset/re-evaluation passes.
//!
//! All passes share one traversal: an iterative depth-first post-order over
//! operands, so every node appears exactly once and after all of its operands.
//! The walk uses an explicit stack; graphs grown by long `+=` chains would
//! otherwise overflow the call stack.

use std::collections::HashSet;

use crate::autograd::node::Value;
use crate::scalar::Scalar;

/// Appends every node reachable from `root` to `order`, operands before
/// consumers, `root` last. Operands are visited in declaration order.
fn build_order<T: Scalar>(root: &Value<T>, order: &mut Vec<Value<T>>) {
    let mut visited = HashSet::new();
    let mut stack = vec![(root.clone(), false)];
    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !visited.insert(node.as_ptr()) {
            continue;
        }
        let [lhs, rhs] = node.operand_pair();
        stack.push((node, true));
        for operand in [rhs, lhs].into_iter().flatten() {
            if !visited.contains(&operand.as_ptr()) {
                stack.push((operand, false));
            }
        }
    }
}

/// Nodes reachable from `root` in topological order (leaves first, `root` last).
#[must_use]
pub fn topological_order<T: Scalar>(root: &Value<T>) -> Vec<Value<T>> {
    let mut order = Vec::new();
    build_order(root, &mut order);
    order
}

fn sweep<T: Scalar>(order: &[Value<T>]) {
    let Some((root, rest)) = order.split_last() else {
        return;
    };
    root.set_grad(T::ONE);
    root.propagate();
    for node in rest.iter().rev() {
        node.propagate();
    }
}

/// Runs one reverse-mode sweep from `root`.
///
/// Seeds `root.grad = 1` (overwrite) and adds every other reachable node's
/// contribution into its operands. Gradients already present on the other
/// nodes are accumulated into, not cleared; call [`zero_grads`] first when
/// rerunning on the same graph.
pub fn backward<T: Scalar>(root: &Value<T>) {
    sweep(&topological_order(root));
}

/// Resets the gradient of every node reachable from `root` to zero.
pub fn zero_grads<T: Scalar>(root: &Value<T>) {
    for node in topological_order(root) {
        node.set_grad(T::ZERO);
    }
}

/// Re-evaluates every internal node reachable from `root` from its operands.
///
/// Leaves keep their datum; use after [`Value::set_data`] on reused leaves.
pub fn forward<T: Scalar>(root: &Value<T>) {
    for node in topological_order(root) {
        node.reevaluate();
    }
}

/// Prepares a reused graph for the next iteration in a single traversal:
/// overwrites the given leaf datums, re-evaluates the graph and zeroes every
/// reachable gradient.
pub fn reset<T: Scalar>(root: &Value<T>, leaf_data: &[(&Value<T>, T)]) {
    for (leaf, data) in leaf_data {
        leaf.set_data(*data);
    }
    for node in topological_order(root) {
        node.reevaluate();
        node.set_grad(T::ZERO);
    }
}

/// Recorded topological order of one graph, reusable across sweeps.
///
/// [`Tape::record`] refills the same buffer, so repeated sweeps over a graph
/// of stable shape do not reallocate the order. The tape holds handles to
/// every recorded node and keeps the graph alive until re-recorded or
/// cleared.
pub struct Tape<T: Scalar = f64> {
    order: Vec<Value<T>>,
}

impl<T: Scalar> Default for Tape<T> {
    fn default() -> Self {
        Self { order: Vec::new() }
    }
}

impl<T: Scalar> Tape<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the graph below `root`, replacing any previous recording.
    pub fn record(&mut self, root: &Value<T>) {
        self.order.clear();
        build_order(root, &mut self.order);
    }

    /// Drops the recorded handles.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Reverse sweep from the recorded root. No-op on an empty tape.
    pub fn backward(&self) {
        sweep(&self.order);
    }

    pub fn zero_grads(&self) {
        for node in &self.order {
            node.set_grad(T::ZERO);
        }
    }

    pub fn forward(&self) {
        for node in &self.order {
            node.reevaluate();
        }
    }

    #[must_use]
    pub fn root(&self) -> Option<&Value<T>> {
        self.order.last()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Value<T>] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::ScalarNode;

    fn position<T: Scalar>(order: &[Value<T>], node: &Value<T>) -> usize {
        order
            .iter()
            .position(|v| v.ptr_eq(node))
            .expect("node missing from order")
    }

    #[test]
    fn order_places_shared_node_once_before_consumers() {
        let a = Value::new(2.0);
        let c = &a + 1.0;
        let d = &c * &a;
        let e = &c - &d;
        let order = topological_order(&e);
        let shared = order.iter().filter(|v| v.ptr_eq(&c)).count();
        assert_eq!(shared, 1);
        assert!(position(&order, &c) < position(&order, &d));
        assert!(position(&order, &d) < position(&order, &e));
        assert!(position(&order, &a) < position(&order, &c));
        assert!(order.last().unwrap().ptr_eq(&e));
        // a, 1.0, c, d, e
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn deep_chain_does_not_overflow_stack() {
        let x = Value::new(1.0);
        let mut acc = x.clone();
        for _ in 0..200_000 {
            acc += &x;
        }
        backward(&acc);
        assert_eq!(acc.data(), 200_001.0);
        assert_eq!(x.grad(), 200_001.0);
        drop(acc);
        assert_eq!(x.data(), 1.0);
    }

    #[test]
    fn backward_twice_without_reset_accumulates() {
        let a = Value::new(3.0);
        let b = &a * 2.0;
        backward(&b);
        backward(&b);
        assert_eq!(a.grad(), 4.0);
        zero_grads(&b);
        assert_eq!(a.grad(), 0.0);
        assert_eq!(b.grad(), 0.0);
        backward(&b);
        assert_eq!(a.grad(), 2.0);
    }

    #[test]
    fn forward_propagates_new_leaf_data() {
        let a = Value::new(1.0);
        let b = Value::new(2.0);
        let c = &(&a * &b) + &b;
        assert_eq!(c.data(), 4.0);
        a.set_data(5.0);
        assert_eq!(c.data(), 4.0);
        forward(&c);
        assert_eq!(c.data(), 12.0);
        assert_eq!(a.data(), 5.0);
    }

    #[test]
    fn reset_overwrites_leaves_and_clears_grads() {
        let a = Value::new(1.0);
        let b = Value::new(2.0);
        let c = &a * &b;
        backward(&c);
        reset(&c, &[(&a, 3.0), (&b, 4.0)]);
        assert_eq!(c.data(), 12.0);
        assert_eq!(a.grad(), 0.0);
        assert_eq!(c.grad(), 0.0);
        backward(&c);
        assert_eq!(a.grad(), 4.0);
        assert_eq!(b.grad(), 3.0);
    }

    #[test]
    fn tape_reuses_recorded_order() {
        let a = Value::new(2.0);
        let b = (&a).cube();
        let mut tape = Tape::new();
        assert!(tape.is_empty());
        tape.backward();
        tape.record(&b);
        assert_eq!(tape.len(), 2);
        assert!(tape.root().unwrap().ptr_eq(&b));
        tape.backward();
        assert_eq!(a.grad(), 12.0);
        a.set_data(1.0);
        tape.forward();
        tape.zero_grads();
        tape.backward();
        assert_eq!(b.data(), 1.0);
        assert_eq!(a.grad(), 3.0);
        tape.clear();
        assert!(tape.nodes().is_empty());
    }
}
