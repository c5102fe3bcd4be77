//! Raw binary state dumps of selected graph nodes.
//!
//! A dump is the concatenation of each node's value (and optionally its
//! gradient) as little-endian IEEE-754 elements: all values first, then all
//! grads. There is no header, count or checksum; writer and reader agree on
//! a [`StateSchema`] out of band.
//!
//! This module defines the **trait** ([`StateStore`]), **models** ([`StateLayout`],
//! [`StateSchema`]), the tuple **codec** ([`encode`], [`decode`]) and the **error**
//! ([`StateError`]). Stores ([`FileStore`], [`MemoryStore`]) are in the `impls` submodule.

mod codec;
mod error;
mod impls;
mod types;

pub use codec::{decode, encode};
pub use error::StateError;
pub use impls::{load_from_file, save_to_file, FileStore, MemoryStore};
pub use types::{StateLayout, StateSchema};

use crate::autograd::{ScalarNode, Value};
use crate::scalar::Scalar;

/// Destination for encoded dumps.
pub trait StateStore {
    /// Replaces the stored dump with `bytes`.
    fn save(&self, bytes: &[u8]) -> Result<(), StateError>;

    /// Returns the stored dump, which must be exactly `byte_len` bytes.
    fn load(&self, byte_len: usize) -> Result<Vec<u8>, StateError>;
}

/// Encodes `nodes` per `schema`: values block, then grads block.
///
/// # Errors
///
/// - [`StateError::Arity`] when `nodes.len()` differs from the schema arity.
pub fn save_nodes<T: Scalar>(
    nodes: &[&Value<T>],
    schema: &StateSchema<T>,
) -> Result<Vec<u8>, StateError> {
    check_arity(nodes, schema)?;
    let layout = schema.layout();
    let mut tuple = Vec::with_capacity(schema.elements());
    if layout.values {
        tuple.extend(nodes.iter().map(|v| v.data()));
    }
    if layout.grads {
        tuple.extend(nodes.iter().map(|v| v.grad()));
    }
    schema.encode(&tuple)
}

/// Writes a dump back into `nodes`: values via `set_data`, grads via `set_grad`.
///
/// Dependent nodes are not recomputed; call [`forward`](crate::autograd::forward)
/// when restored leaves should flow downstream.
///
/// # Errors
///
/// - [`StateError::Arity`] when `nodes.len()` differs from the schema arity.
/// - [`StateError::Length`] when `bytes` is shorter than the schema requires.
pub fn restore_nodes<T: Scalar>(
    nodes: &[&Value<T>],
    bytes: &[u8],
    schema: &StateSchema<T>,
) -> Result<(), StateError> {
    check_arity(nodes, schema)?;
    let tuple = schema.decode(bytes)?;
    let mut blocks = tuple.chunks_exact(schema.arity().max(1));
    let layout = schema.layout();
    if layout.values {
        if let Some(values) = blocks.next() {
            for (node, &v) in nodes.iter().zip(values) {
                node.set_data(v);
            }
        }
    }
    if layout.grads {
        if let Some(grads) = blocks.next() {
            for (node, &g) in nodes.iter().zip(grads) {
                node.set_grad(g);
            }
        }
    }
    Ok(())
}

fn check_arity<T: Scalar>(nodes: &[&Value<T>], schema: &StateSchema<T>) -> Result<(), StateError> {
    if nodes.len() != schema.arity() {
        return Err(StateError::Arity {
            expected: schema.arity(),
            got: nodes.len(),
        });
    }
    Ok(())
}
