//! # scalargrad
//!
//! Scalar reverse-mode automatic differentiation over `Rc`-linked graph nodes,
//! with a raw little-endian dump of selected node values and gradients.
//!
//! - [`autograd`]: nodes, operators, the backward sweep and graph reuse.
//! - [`state`]: fixed-arity binary codec and stores.
//! - [`workload`] and [`harness`]: the reference expressions and the timing loop.

pub mod autograd;
pub mod config;
pub mod error;
pub mod harness;
pub mod scalar;
pub mod state;
pub mod workload;

pub use error::{Error, Result};
pub use scalar::Scalar;
