//! Scalar trait for node element types.

use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Floating-point element type a [`Value`](crate::autograd::Value) can hold.
///
/// Implemented for `f64` (the default width) and `f32`. The byte helpers define
/// the on-disk representation used by the [`state`](crate::state) codec:
/// little-endian IEEE-754, [`Scalar::WIDTH`] bytes per element.
pub trait Scalar:
    Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Encoded size in bytes.
    const WIDTH: usize;
    /// Short name used in reports ("f64" / "f32").
    const NAME: &'static str;

    /// Real power `self^exp`.
    fn powf(self, exp: Self) -> Self;

    /// Lossy conversion from `f64` (exact for `f64`).
    fn from_f64(v: f64) -> Self;

    /// Widening conversion to `f64`.
    fn to_f64(self) -> f64;

    /// Appends the little-endian bytes of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one element from the first [`Scalar::WIDTH`] bytes of `bytes`.
    ///
    /// Callers guarantee `bytes.len() >= Self::WIDTH`.
    fn read_le(bytes: &[u8]) -> Self;
}

impl Scalar for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const WIDTH: usize = 8;
    const NAME: &'static str = "f64";

    fn powf(self, exp: Self) -> Self {
        f64::powf(self, exp)
    }

    fn from_f64(v: f64) -> Self {
        v
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        f64::from_le_bytes(raw)
    }
}

impl Scalar for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const WIDTH: usize = 4;
    const NAME: &'static str = "f32";

    fn powf(self, exp: Self) -> Self {
        f32::powf(self, exp)
    }

    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&bytes[..4]);
        f32::from_le_bytes(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_one() {
        assert_eq!(f64::ZERO, 0.0);
        assert_eq!(f64::ONE, 1.0);
        assert_eq!(f32::ZERO, 0.0);
        assert_eq!(f32::ONE, 1.0);
    }

    #[test]
    fn test_widths() {
        assert_eq!(<f64 as Scalar>::WIDTH, std::mem::size_of::<f64>());
        assert_eq!(<f32 as Scalar>::WIDTH, std::mem::size_of::<f32>());
    }

    #[test]
    fn test_le_bytes_layout() {
        let mut out = Vec::new();
        1.0f64.write_le(&mut out);
        assert_eq!(out, [0, 0, 0, 0, 0, 0, 0xf0, 0x3f]);
        assert_eq!(f64::read_le(&out), 1.0);

        let mut out = Vec::new();
        (-2.0f32).write_le(&mut out);
        assert_eq!(out, [0, 0, 0, 0xc0]);
        assert_eq!(f32::read_le(&out), -2.0);
    }

    #[test]
    fn test_powf_negative_base_fractional_exponent_is_nan() {
        assert!(Scalar::powf(-8.0f64, 0.5).is_nan());
        assert_eq!(Scalar::powf(-2.0f64, 3.0), -8.0);
    }
}
