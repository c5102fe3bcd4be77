//! Errors produced when encoding, decoding or storing a state dump.
//!
//! All errors from the state module use [`StateError`]; the crate-level
//! [`Error`](crate::Error) wraps it.

use thiserror::Error;

/// Errors produced by the state codec and stores.
///
/// # Variants
///
/// - **Arity**: The tuple handed to `encode` does not have the schema's element count.
///   *When*: [`StateSchema::encode`](super::StateSchema::encode) or [`save_nodes`](super::save_nodes) with the wrong number of nodes.
///   *Recovery*: Pass exactly the agreed tuple; writer and reader must share the schema.
///
/// - **Length**: A buffer is shorter than the schema requires, or a file's size differs from it.
///   *When*: Decoding a truncated buffer, or loading a file written with another schema.
///   *Recovery*: Check that the file was produced with the same arity, layout and element width.
///
/// - **Io**: The file could not be written or read.
///   *When*: [`FileStore`](super::FileStore) save or load.
///   *Recovery*: Check the path and permissions; see the source error.
#[derive(Debug, Error)]
pub enum StateError {
    /// Tuple arity does not match the schema.
    #[error("state arity: expected {expected} elements, got {got}")]
    Arity {
        /// Element count declared by the schema.
        expected: usize,
        /// Element count supplied.
        got: usize,
    },

    /// Buffer or file length does not fit the schema.
    #[error("state length: expected {expected} bytes, got {got}")]
    Length {
        /// Byte count the schema requires.
        expected: usize,
        /// Byte count available.
        got: usize,
    },

    /// I/O error while writing or reading a state file.
    #[error("state io: {0}")]
    Io(#[from] std::io::Error),
}
