//! Graph nodes: forward datum, accumulated gradient and the operation tag that
//! produced them.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::autograd::ScalarNode;
use crate::scalar::Scalar;

/// Operation that produced a node, carrying its operands.
///
/// The tag doubles as the backward rule: [`Op::propagate`] distributes an
/// output gradient to the operands using their current datums.
pub(crate) enum Op<T: Scalar> {
    /// User-supplied input.
    Leaf,
    /// Bare scalar lifted into a mixed expression; never receives gradient.
    Const,
    Add(Value<T>, Value<T>),
    Sub(Value<T>, Value<T>),
    Neg(Value<T>),
    Mul(Value<T>, Value<T>),
    Div(Value<T>, Value<T>),
    /// Power with a constant exponent.
    Pow(Value<T>, T),
    Relu(Value<T>),
}

impl<T: Scalar> Op<T> {
    /// Short name used in debug output and graph rendering.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Const => "const",
            Op::Add(..) => "+",
            Op::Sub(..) => "-",
            Op::Neg(_) => "neg",
            Op::Mul(..) => "*",
            Op::Div(..) => "/",
            Op::Pow(..) => "pow",
            Op::Relu(_) => "relu",
        }
    }

    /// Operands in declaration order; unused slots are `None`.
    pub(crate) fn operands(&self) -> [Option<&Value<T>>; 2] {
        match self {
            Op::Leaf | Op::Const => [None, None],
            Op::Neg(a) | Op::Pow(a, _) | Op::Relu(a) => [Some(a), None],
            Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) | Op::Div(a, b) => [Some(a), Some(b)],
        }
    }

    /// Forward datum from the operands' current datums, or `None` for inputs.
    pub(crate) fn evaluate(&self) -> Option<T> {
        let out = match self {
            Op::Leaf | Op::Const => return None,
            Op::Add(a, b) => a.data() + b.data(),
            Op::Sub(a, b) => a.data() - b.data(),
            Op::Neg(a) => -a.data(),
            Op::Mul(a, b) => a.data() * b.data(),
            Op::Div(a, b) => a.data() / b.data(),
            Op::Pow(a, k) => a.data().powf(*k),
            Op::Relu(a) => {
                let x = a.data();
                if x > T::ZERO {
                    x
                } else {
                    T::ZERO
                }
            }
        };
        Some(out)
    }

    /// Adds this node's contribution `g` (its own gradient) into each operand.
    pub(crate) fn propagate(&self, g: T) {
        match self {
            Op::Leaf | Op::Const => {}
            Op::Add(a, b) => {
                a.add_grad(g);
                b.add_grad(g);
            }
            Op::Sub(a, b) => {
                a.add_grad(g);
                b.add_grad(-g);
            }
            Op::Neg(a) => a.add_grad(-g),
            Op::Mul(a, b) => {
                let (x, y) = (a.data(), b.data());
                a.add_grad(g * y);
                b.add_grad(g * x);
            }
            Op::Div(a, b) => {
                let (x, y) = (a.data(), b.data());
                a.add_grad(g / y);
                b.add_grad(-(g * x / (y * y)));
            }
            Op::Pow(a, k) => {
                let x = a.data();
                a.add_grad(g * *k * x.powf(*k - T::ONE));
            }
            // relu(0) sits on the non-positive branch.
            Op::Relu(a) => {
                if a.data() > T::ZERO {
                    a.add_grad(g);
                }
            }
        }
    }
}

pub(crate) struct Node<T: Scalar> {
    pub(crate) data: T,
    pub(crate) grad: T,
    pub(crate) op: Op<T>,
    pub(crate) label: Option<String>,
}

// Unlinks uniquely owned operands iteratively; dropping the terminal of a long
// chain would otherwise recurse once per node.
impl<T: Scalar> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_unique_operands(&mut self.op, &mut pending);
        while let Some(value) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(value.0) {
                let mut node = cell.into_inner();
                detach_unique_operands(&mut node.op, &mut pending);
            }
        }
    }
}

fn detach_unique_operands<T: Scalar>(op: &mut Op<T>, pending: &mut Vec<Value<T>>) {
    let mut keep = |value: Value<T>| {
        if Rc::strong_count(&value.0) == 1 {
            pending.push(value);
        }
    };
    match std::mem::replace(op, Op::Leaf) {
        Op::Leaf | Op::Const => {}
        Op::Neg(a) | Op::Pow(a, _) | Op::Relu(a) => keep(a),
        Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) | Op::Div(a, b) => {
            keep(a);
            keep(b);
        }
    }
}

/// Handle to a scalar node in the computation graph.
///
/// Wraps the node state in `Rc<RefCell<_>>` so that sub-expressions can be
/// shared by several consumers and gradients accumulated during backward.
/// Cloning a `Value` clones the handle, not the node.
pub struct Value<T: Scalar = f64>(Rc<RefCell<Node<T>>>);

impl<T: Scalar> Clone for Value<T> {
    fn clone(&self) -> Self {
        Value(Rc::clone(&self.0))
    }
}

impl<T: Scalar> Value<T> {
    /// Creates a leaf node with the given datum and zero gradient.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self::with_op(data, Op::Leaf)
    }

    /// Creates a constant leaf. Gradient contributions to it are dropped.
    #[must_use]
    pub fn constant(data: T) -> Self {
        Self::with_op(data, Op::Const)
    }

    /// Creates the output node of `op`, evaluating its datum eagerly.
    pub(crate) fn from_op(op: Op<T>) -> Self {
        let data = op.evaluate().unwrap_or(T::ZERO);
        Self::with_op(data, op)
    }

    fn with_op(data: T, op: Op<T>) -> Self {
        Value(Rc::new(RefCell::new(Node {
            data,
            grad: T::ZERO,
            op,
            label: None,
        })))
    }

    /// Attaches a label and returns the handle (builder style).
    #[must_use]
    pub fn with_label(self, label: &str) -> Self {
        self.set_label(label);
        self
    }

    pub fn set_label(&self, label: &str) {
        self.0.borrow_mut().label = Some(label.to_string());
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.0.borrow().label.clone()
    }

    /// Overwrites the datum in place.
    ///
    /// Meant for leaves reused across iterations; downstream datums are stale
    /// until [`forward`](crate::autograd::forward) re-evaluates the graph.
    pub fn set_data(&self, data: T) {
        self.0.borrow_mut().data = data;
    }

    /// Overwrites the gradient.
    pub fn set_grad(&self, grad: T) {
        self.0.borrow_mut().grad = grad;
    }

    /// Adds to the gradient unless this node is a constant.
    pub(crate) fn add_grad(&self, g: T) {
        let mut node = self.0.borrow_mut();
        if !matches!(node.op, Op::Const) {
            node.grad += g;
        }
    }

    /// `true` for user inputs and constants (no operands).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.0.borrow().op, Op::Leaf | Op::Const)
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self.0.borrow().op, Op::Const)
    }

    /// Name of the producing operation ("leaf", "+", "pow", ...).
    #[must_use]
    pub fn op_name(&self) -> &'static str {
        self.0.borrow().op.name()
    }

    /// Cloned handles to the operands, in declaration order.
    #[must_use]
    pub fn operands(&self) -> Vec<Value<T>> {
        self.0.borrow().op.operands().into_iter().flatten().cloned().collect()
    }

    /// Operand handles without allocating; used by graph traversals.
    pub(crate) fn operand_pair(&self) -> [Option<Value<T>>; 2] {
        let node = self.0.borrow();
        let [a, b] = node.op.operands();
        [a.cloned(), b.cloned()]
    }

    /// `true` when both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Node identity for visited sets.
    pub(crate) fn as_ptr(&self) -> *const RefCell<Node<T>> {
        Rc::as_ptr(&self.0)
    }

    /// Runs this node's backward rule with its current gradient.
    pub(crate) fn propagate(&self) {
        let node = self.0.borrow();
        node.op.propagate(node.grad);
    }

    /// Recomputes the datum from the operands. Inputs are left untouched.
    pub(crate) fn reevaluate(&self) {
        let data = self.0.borrow().op.evaluate();
        if let Some(data) = data {
            self.0.borrow_mut().data = data;
        }
    }
}

impl<T: Scalar> ScalarNode for Value<T> {
    type Elem = T;

    fn data(&self) -> T {
        self.0.borrow().data
    }

    fn grad(&self) -> T {
        self.0.borrow().grad
    }

    fn backward(&self) {
        crate::autograd::backward(self);
    }

    fn zero_grad(&self) {
        self.set_grad(T::ZERO);
    }
}

impl<T: Scalar> From<T> for Value<T> {
    fn from(data: T) -> Self {
        Value::new(data)
    }
}

// Shallow: operands are not followed, which keeps output bounded on deep graphs.
impl<T: Scalar> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Value")
            .field("data", &node.data)
            .field("grad", &node.grad)
            .field("op", &node.op.name())
            .field("label", &node.label)
            .finish()
    }
}
