//! Raw tuple codec: little-endian IEEE-754 elements, concatenated, no header.

use crate::scalar::Scalar;

use super::StateError;

/// Encodes `values` in order. The output is exactly `T::WIDTH * values.len()` bytes.
#[must_use]
pub fn encode<T: Scalar>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(T::WIDTH * values.len());
    for &v in values {
        v.write_le(&mut out);
    }
    out
}

/// Decodes the first `count` elements of `bytes`.
///
/// Trailing bytes past `T::WIDTH * count` are ignored.
///
/// # Errors
///
/// - [`StateError::Length`] when `bytes` holds fewer than `count` elements,
///   including a `count` whose byte size does not fit in `usize`.
pub fn decode<T: Scalar>(bytes: &[u8], count: usize) -> Result<Vec<T>, StateError> {
    let expected = T::WIDTH.checked_mul(count).unwrap_or(usize::MAX);
    if bytes.len() < expected {
        return Err(StateError::Length {
            expected,
            got: bytes.len(),
        });
    }
    Ok(bytes[..expected]
        .chunks_exact(T::WIDTH)
        .map(T::read_le)
        .collect())
}
