//! [`StateStore`](super::super::StateStore) backed by a file path.

use std::fs;
use std::path::Path;

use crate::autograd::Value;
use crate::scalar::Scalar;

use super::super::{restore_nodes, save_nodes, StateError, StateLayout, StateSchema, StateStore};

/// Stores a dump at a file path, replacing any previous contents.
///
/// The file is exactly the encoded bytes; a load whose size differs from the
/// expected byte length is rejected.
#[derive(Clone, Debug)]
pub struct FileStore<P>(pub P);

impl<P> FileStore<P>
where
    P: AsRef<Path>,
{
    #[must_use]
    pub fn new(path: P) -> Self {
        FileStore(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.0.as_ref()
    }
}

impl<P> StateStore for FileStore<P>
where
    P: AsRef<Path>,
{
    fn save(&self, bytes: &[u8]) -> Result<(), StateError> {
        fs::write(self.0.as_ref(), bytes)?;
        Ok(())
    }

    fn load(&self, byte_len: usize) -> Result<Vec<u8>, StateError> {
        let bytes = fs::read(self.0.as_ref())?;
        if bytes.len() != byte_len {
            return Err(StateError::Length {
                expected: byte_len,
                got: bytes.len(),
            });
        }
        Ok(bytes)
    }
}

/// Convenience: dump `nodes` to `path` with [`FileStore`].
///
/// # Errors
///
/// - [`StateError::Io`] when the file cannot be written.
pub fn save_to_file<T: Scalar>(
    path: impl AsRef<Path>,
    nodes: &[&Value<T>],
    layout: StateLayout,
) -> Result<(), StateError> {
    let schema = StateSchema::new(nodes.len(), layout);
    FileStore::new(path).save(&save_nodes(nodes, &schema)?)
}

/// Convenience: restore `nodes` from a dump at `path` written with the same layout.
///
/// # Errors
///
/// - [`StateError::Io`] when the file cannot be read.
/// - [`StateError::Length`] when the file size does not match `nodes` and `layout`.
pub fn load_from_file<T: Scalar>(
    path: impl AsRef<Path>,
    nodes: &[&Value<T>],
    layout: StateLayout,
) -> Result<(), StateError> {
    let schema = StateSchema::new(nodes.len(), layout);
    let bytes = FileStore::new(path).load(schema.byte_len())?;
    restore_nodes(nodes, &bytes, &schema)
}
