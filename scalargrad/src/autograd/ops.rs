//! Expression builder: operator overloads and unary node constructors.
//!
//! Every call allocates exactly one output node. Mixed forms lift the bare
//! scalar into a [`Value::constant`] leaf first, so `&a + 1.0` allocates two.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::autograd::node::{Op, Value};
use crate::autograd::Pow;
use crate::scalar::Scalar;

impl<T: Scalar> Value<T> {
    /// ReLU: `max(0, self)`. Gradient passes only when `self > 0`.
    #[must_use]
    pub fn relu(&self) -> Value<T> {
        Value::from_op(Op::Relu(self.clone()))
    }

    /// `self^2`.
    #[must_use]
    pub fn sqr(&self) -> Value<T> {
        self.pow(T::from_f64(2.0))
    }

    /// `self^3`.
    #[must_use]
    pub fn cube(&self) -> Value<T> {
        self.pow(T::from_f64(3.0))
    }
}

impl<T: Scalar> Pow<T> for &Value<T> {
    type Output = Value<T>;

    fn pow(self, exp: T) -> Value<T> {
        Value::from_op(Op::Pow(self.clone(), exp))
    }
}

impl<T: Scalar> Neg for &Value<T> {
    type Output = Value<T>;

    fn neg(self) -> Value<T> {
        Value::from_op(Op::Neg(self.clone()))
    }
}

impl<T: Scalar> Neg for Value<T> {
    type Output = Value<T>;

    fn neg(self) -> Value<T> {
        -&self
    }
}

// -----------------------------------------------------------------------------
// Binary ops: every owned/borrowed pairing, Value-with-scalar on either side,
// and the compound-assign forms (`c += &c + 1.0` rebinds `c` to a new node).
// -----------------------------------------------------------------------------

macro_rules! impl_binary_op {
    (@scalar_lhs $S:ty, $Trait:ident, $method:ident, $Variant:ident) => {
        impl $Trait<&Value<$S>> for $S {
            type Output = Value<$S>;

            fn $method(self, rhs: &Value<$S>) -> Value<$S> {
                Value::from_op(Op::$Variant(Value::constant(self), rhs.clone()))
            }
        }

        impl $Trait<Value<$S>> for $S {
            type Output = Value<$S>;

            fn $method(self, rhs: Value<$S>) -> Value<$S> {
                Value::from_op(Op::$Variant(Value::constant(self), rhs))
            }
        }
    };
    ($Trait:ident, $method:ident, $Variant:ident, $AssignTrait:ident, $assign_method:ident) => {
        impl<T: Scalar> $Trait<&Value<T>> for &Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: &Value<T>) -> Value<T> {
                Value::from_op(Op::$Variant(self.clone(), rhs.clone()))
            }
        }

        impl<T: Scalar> $Trait<Value<T>> for Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: Value<T>) -> Value<T> {
                Value::from_op(Op::$Variant(self, rhs))
            }
        }

        impl<T: Scalar> $Trait<&Value<T>> for Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: &Value<T>) -> Value<T> {
                Value::from_op(Op::$Variant(self, rhs.clone()))
            }
        }

        impl<T: Scalar> $Trait<Value<T>> for &Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: Value<T>) -> Value<T> {
                Value::from_op(Op::$Variant(self.clone(), rhs))
            }
        }

        impl<T: Scalar> $Trait<T> for &Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: T) -> Value<T> {
                Value::from_op(Op::$Variant(self.clone(), Value::constant(rhs)))
            }
        }

        impl<T: Scalar> $Trait<T> for Value<T> {
            type Output = Value<T>;

            fn $method(self, rhs: T) -> Value<T> {
                Value::from_op(Op::$Variant(self, Value::constant(rhs)))
            }
        }

        impl<T: Scalar> $AssignTrait<&Value<T>> for Value<T> {
            fn $assign_method(&mut self, rhs: &Value<T>) {
                *self = Value::from_op(Op::$Variant(self.clone(), rhs.clone()));
            }
        }

        impl<T: Scalar> $AssignTrait<Value<T>> for Value<T> {
            fn $assign_method(&mut self, rhs: Value<T>) {
                *self = Value::from_op(Op::$Variant(self.clone(), rhs));
            }
        }

        impl<T: Scalar> $AssignTrait<T> for Value<T> {
            fn $assign_method(&mut self, rhs: T) {
                *self = Value::from_op(Op::$Variant(self.clone(), Value::constant(rhs)));
            }
        }

        impl_binary_op!(@scalar_lhs f64, $Trait, $method, $Variant);
        impl_binary_op!(@scalar_lhs f32, $Trait, $method, $Variant);
    };
}

impl_binary_op!(Add, add, Add, AddAssign, add_assign);
impl_binary_op!(Sub, sub, Sub, SubAssign, sub_assign);
impl_binary_op!(Mul, mul, Mul, MulAssign, mul_assign);
impl_binary_op!(Div, div, Div, DivAssign, div_assign);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::ScalarNode;

    #[test]
    fn each_call_allocates_one_node_without_touching_operands() {
        let a = Value::new(3.0);
        let b = Value::new(4.0);
        let c = &a * &b;
        assert_eq!(c.op_name(), "*");
        assert_eq!(c.operands().len(), 2);
        assert!(c.operands()[0].ptr_eq(&a));
        assert!(c.operands()[1].ptr_eq(&b));
        assert_eq!(a.data(), 3.0);
        assert_eq!(b.data(), 4.0);
    }

    #[test]
    fn scalar_on_either_side_becomes_constant_leaf() {
        let a: Value = Value::new(2.0);
        let right = &a - 5.0;
        let left = 5.0 - &a;
        assert_eq!(right.data(), -3.0);
        assert_eq!(left.data(), 3.0);
        assert!(right.operands()[1].is_constant());
        assert!(left.operands()[0].is_constant());
    }

    #[test]
    fn compound_assign_rebinds_to_new_node() {
        let a = Value::new(1.0);
        let mut c = a.clone();
        let rhs = &c + 1.0;
        c += rhs;
        assert!(!c.ptr_eq(&a));
        assert_eq!(c.data(), 3.0);
        c *= 2.0;
        assert_eq!(c.data(), 6.0);
        c -= &a;
        assert_eq!(c.data(), 5.0);
        c /= Value::new(5.0);
        assert_eq!(c.data(), 1.0);
    }

    #[test]
    fn unary_ops_record_single_operand() {
        let a = Value::new(-2.0);
        for (node, name) in [(-&a, "neg"), (a.relu(), "relu"), (a.sqr(), "pow")] {
            assert_eq!(node.op_name(), name);
            assert_eq!(node.operands().len(), 1);
        }
        assert_eq!(a.relu().data(), 0.0);
        assert_eq!(a.sqr().data(), 4.0);
        assert_eq!(a.cube().data(), -8.0);
    }

    #[test]
    fn division_by_zero_is_not_guarded() {
        let a: Value = Value::new(1.0);
        let z: Value = Value::new(0.0);
        let q = &a / &z;
        assert!(q.data().is_infinite());
        q.backward();
        assert_eq!(a.grad(), f64::INFINITY);
        assert!(z.grad().is_infinite() || z.grad().is_nan());
    }

    #[test]
    fn f32_values_use_f32_arithmetic() {
        let a: Value<f32> = Value::new(1.5);
        let b = 2.0f32 * &a;
        assert_eq!(b.data(), 3.0f32);
        b.backward();
        assert_eq!(a.grad(), 2.0f32);
    }
}
