//! Autograd: scalar computation graphs with reverse-mode differentiation.
//!
//! The graph is built during forward operations; every operator evaluates its
//! output eagerly and records its operands. [`ScalarNode::backward`] seeds the
//! terminal with 1 and propagates gradients to all ancestors in reverse
//! topological order, summing contributions through shared sub-expressions.
//!
//! Two usage modes are supported:
//!
//! - **rebuild**: construct a fresh graph per iteration and drop it afterwards;
//! - **reuse**: keep the graph, overwrite leaf data with [`Value::set_data`] and
//!   call [`reset`] (or [`forward`] + [`zero_grads`]) before the next sweep.

mod backward;
pub mod dot;
mod node;
mod ops;

pub use backward::{backward, forward, reset, topological_order, zero_grads, Tape};
pub use node::Value;

use crate::scalar::Scalar;

/// Trait for raising a node to a constant power (e.g. `(&a).pow(3.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`]
/// after [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Element type of the datum and gradient.
    type Elem: Scalar;

    /// Returns the forward pass value.
    fn data(&self) -> Self::Elem;

    /// Returns the gradient of the terminal with respect to this node.
    fn grad(&self) -> Self::Elem;

    /// Runs one reverse-mode sweep with this node as the terminal.
    fn backward(&self);

    /// Zeros the gradient at this node only. See [`zero_grads`] for the whole graph.
    fn zero_grad(&self);
}
