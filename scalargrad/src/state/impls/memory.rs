//! [`StateStore`](super::super::StateStore) backed by an in-memory buffer.

use std::cell::RefCell;

use super::super::{StateError, StateStore};

/// Keeps the last saved dump in memory. Same size rule as a file load.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buf: RefCell<Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the stored bytes.
    #[must_use]
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }
}

impl StateStore for MemoryStore {
    fn save(&self, bytes: &[u8]) -> Result<(), StateError> {
        let mut buf = self.buf.borrow_mut();
        buf.clear();
        buf.extend_from_slice(bytes);
        Ok(())
    }

    fn load(&self, byte_len: usize) -> Result<Vec<u8>, StateError> {
        let buf = self.buf.borrow();
        if buf.len() != byte_len {
            return Err(StateError::Length {
                expected: byte_len,
                got: buf.len(),
            });
        }
        Ok(buf.clone())
    }
}
