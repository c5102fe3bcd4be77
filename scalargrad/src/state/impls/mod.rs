//! Implementations of [`StateStore`](super::StateStore).
//!
//! [`file`] writes a dump to a path; [`memory`] keeps it in a buffer.

mod file;
mod memory;

pub use file::{load_from_file, save_to_file, FileStore};
pub use memory::MemoryStore;
