//! Reference expressions driven by the benchmark.
//!
//! Both take two leaf inputs `a`, `b` and keep every intermediate of interest
//! (`c` through `g`) so the harness can persist the seven-element state tuple
//! `(a, b, c, d, e, f, g)`.

use std::fmt;
use std::str::FromStr;

use crate::autograd::Value;
use crate::scalar::Scalar;

/// Which expression to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Workload {
    /// `g = ((a + b) - (a*b + b^3))^2 / 2`
    Tiny,
    /// The micrograd README expression, with reused sub-expressions and relu.
    #[default]
    Small,
}

impl Workload {
    /// Leaf inputs used by the reference runs.
    #[must_use]
    pub fn default_inputs(self) -> (f64, f64) {
        match self {
            Workload::Tiny => (-41.0, 2.0),
            Workload::Small => (-4.0, 2.0),
        }
    }

    /// Builds the expression over fresh leaves `a` and `b`.
    #[must_use]
    pub fn build<T: Scalar>(self, a: T, b: T) -> Expression<T> {
        match self {
            Workload::Tiny => tiny(a, b),
            Workload::Small => small(a, b),
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workload::Tiny => f.write_str("tiny"),
            Workload::Small => f.write_str("small"),
        }
    }
}

impl FromStr for Workload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Workload::Tiny),
            "small" => Ok(Workload::Small),
            other => Err(format!("unknown workload {other:?} (expected tiny or small)")),
        }
    }
}

/// Named nodes of a built expression; `g` is the terminal.
#[derive(Clone, Debug)]
pub struct Expression<T: Scalar = f64> {
    pub a: Value<T>,
    pub b: Value<T>,
    pub c: Value<T>,
    pub d: Value<T>,
    pub e: Value<T>,
    pub f: Value<T>,
    pub g: Value<T>,
}

impl<T: Scalar> Expression<T> {
    /// The seven named nodes in declaration order.
    #[must_use]
    pub fn nodes(&self) -> [&Value<T>; 7] {
        [&self.a, &self.b, &self.c, &self.d, &self.e, &self.f, &self.g]
    }

    #[must_use]
    pub fn terminal(&self) -> &Value<T> {
        &self.g
    }

    /// Labels the named nodes `a`..`g` (for graph rendering).
    pub fn label_nodes(&self) {
        for (node, name) in self.nodes().into_iter().zip(["a", "b", "c", "d", "e", "f", "g"]) {
            node.set_label(name);
        }
    }
}

/// `c = a + b; d = a*b + b^3; e = c - d; f = e^2; g = f / 2`.
#[must_use]
pub fn tiny<T: Scalar>(a: T, b: T) -> Expression<T> {
    let a = Value::new(a);
    let b = Value::new(b);
    let c = &a + &b;
    let d = &a * &b + b.cube();
    let e = &c - &d;
    let f = e.sqr();
    let g = &f / T::from_f64(2.0);
    Expression { a, b, c, d, e, f, g }
}

/// The micrograd README expression:
///
/// ```text
/// c = a + b
/// d = a*b + b^3
/// c += c + 1
/// c += 1 + c - a
/// d += d*2 + relu(b + a)
/// d += 3*d + relu(b - a)
/// e = c - d
/// f = e^2
/// g = f / 2
/// g += 10 / f
/// ```
#[must_use]
pub fn small<T: Scalar>(a: T, b: T) -> Expression<T> {
    let one = T::ONE;
    let two = T::from_f64(2.0);
    let three = T::from_f64(3.0);
    let ten = T::from_f64(10.0);

    let a = Value::new(a);
    let b = Value::new(b);
    let mut c = &a + &b;
    let mut d = &a * &b + b.cube();

    let t = &c + one;
    c += t;
    let t = Value::constant(one) + &c - &a;
    c += t;

    let t = &d * two + (&b + &a).relu();
    d += t;
    let t = Value::constant(three) * &d + (&b - &a).relu();
    d += t;

    let e = &c - &d;
    let f = e.sqr();
    let mut g = &f / two;
    let t = Value::constant(ten) / &f;
    g += t;

    Expression { a, b, c, d, e, f, g }
}
