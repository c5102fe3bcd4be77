//! Shapes of a state dump: which blocks are written and how many elements each holds.

use std::marker::PhantomData;

use crate::scalar::Scalar;

use super::{codec, StateError};

/// Which per-node blocks a dump carries.
///
/// The values block, when present, always precedes the grads block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateLayout {
    pub values: bool,
    pub grads: bool,
}

impl StateLayout {
    /// Values only. The default dump.
    pub const VALUES: Self = Self {
        values: true,
        grads: false,
    };
    pub const GRADS: Self = Self {
        values: false,
        grads: true,
    };
    pub const VALUES_AND_GRADS: Self = Self {
        values: true,
        grads: true,
    };

    /// Number of blocks written per node (0, 1 or 2).
    #[must_use]
    pub fn blocks(self) -> usize {
        usize::from(self.values) + usize::from(self.grads)
    }
}

impl Default for StateLayout {
    fn default() -> Self {
        Self::VALUES
    }
}

/// Agreement between writer and reader: tuple arity, layout and element type.
///
/// Nothing of this is stored in the dump itself.
#[derive(Clone, Copy, Debug)]
pub struct StateSchema<T: Scalar = f64> {
    arity: usize,
    layout: StateLayout,
    _elem: PhantomData<T>,
}

impl<T: Scalar> StateSchema<T> {
    #[must_use]
    pub fn new(arity: usize, layout: StateLayout) -> Self {
        Self {
            arity,
            layout,
            _elem: PhantomData,
        }
    }

    /// Values-only schema over `arity` nodes.
    #[must_use]
    pub fn values(arity: usize) -> Self {
        Self::new(arity, StateLayout::VALUES)
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[must_use]
    pub fn layout(&self) -> StateLayout {
        self.layout
    }

    /// Elements in the flat tuple: `arity` per block. Saturates at `usize::MAX`.
    #[must_use]
    pub fn elements(&self) -> usize {
        self.arity.saturating_mul(self.layout.blocks())
    }

    /// Exact size of an encoded dump in bytes. Saturates at `usize::MAX`,
    /// which no buffer can satisfy.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.elements().saturating_mul(T::WIDTH)
    }

    /// Encodes a flat tuple (values block then grads block, per the layout).
    ///
    /// # Errors
    ///
    /// - [`StateError::Arity`] when `tuple.len()` differs from [`elements`](Self::elements).
    pub fn encode(&self, tuple: &[T]) -> Result<Vec<u8>, StateError> {
        if tuple.len() != self.elements() {
            return Err(StateError::Arity {
                expected: self.elements(),
                got: tuple.len(),
            });
        }
        Ok(codec::encode(tuple))
    }

    /// Decodes a flat tuple from the front of `bytes`.
    ///
    /// # Errors
    ///
    /// - [`StateError::Length`] when `bytes` is shorter than [`byte_len`](Self::byte_len).
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<T>, StateError> {
        codec::decode(bytes, self.elements())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_blocks() {
        assert_eq!(StateLayout::default(), StateLayout::VALUES);
        assert_eq!(StateLayout::VALUES.blocks(), 1);
        assert_eq!(StateLayout::GRADS.blocks(), 1);
        assert_eq!(StateLayout::VALUES_AND_GRADS.blocks(), 2);
        assert_eq!(StateLayout { values: false, grads: false }.blocks(), 0);
    }

    #[test]
    fn schema_byte_len_follows_width_and_layout() {
        assert_eq!(StateSchema::<f64>::values(7).byte_len(), 56);
        assert_eq!(StateSchema::<f32>::values(7).byte_len(), 28);
        let both = StateSchema::<f64>::new(7, StateLayout::VALUES_AND_GRADS);
        assert_eq!(both.elements(), 14);
        assert_eq!(both.byte_len(), 112);
    }

    #[test]
    fn schema_sizes_saturate_on_huge_arity() {
        let schema = StateSchema::<f64>::new(usize::MAX / 2 + 1, StateLayout::VALUES_AND_GRADS);
        assert_eq!(schema.elements(), usize::MAX);
        assert_eq!(schema.byte_len(), usize::MAX);
        assert!(matches!(schema.decode(&[0u8; 64]), Err(StateError::Length { got: 64, .. })));
        assert!(matches!(schema.encode(&[1.0]), Err(StateError::Arity { got: 1, .. })));

        let schema = StateSchema::<f64>::values(usize::MAX / 8 + 1);
        assert_eq!(schema.byte_len(), usize::MAX);
        assert!(matches!(schema.decode(&[]), Err(StateError::Length { .. })));
    }

    #[test]
    fn schema_encode_rejects_wrong_arity() {
        let schema = StateSchema::<f64>::values(3);
        let err = schema.encode(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, StateError::Arity { expected: 3, got: 2 }));
        assert_eq!(schema.encode(&[1.0, 2.0, 3.0]).unwrap().len(), 24);
    }

    #[test]
    fn schema_decode_reads_exact_tuple() {
        let schema = StateSchema::<f64>::values(2);
        let bytes = schema.encode(&[-0.0, f64::INFINITY]).unwrap();
        let tuple = schema.decode(&bytes).unwrap();
        assert_eq!(tuple[0].to_bits(), (-0.0f64).to_bits());
        assert_eq!(tuple[1], f64::INFINITY);
        assert!(schema.decode(&bytes[..8]).is_err());
    }
}
