// src/core/scalar.rs

//! Element types accepted by the containers.
//!
//! Eigenvectors are complex in general but real for time-reversal symmetric
//! Hamiltonians at Γ, and eigenvalues are real. [`Scalar`] abstracts over
//! `f32`, `f64`, `Complex<f32>` and `Complex<f64>` so the same container code
//! handles all four.

use ndarray::{LinalgScalar, ScalarOperand};
use num_complex::Complex;
use num_traits::float::TotalOrder;
use num_traits::{Float, FloatConst, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{AddAssign, MulAssign, Neg};

/// Coarse category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// Real floating point (`f`)
    Real,
    /// Complex floating point (`c`)
    Complex,
}

impl DataKind {
    /// Single-character code, `f` for real and `c` for complex.
    pub fn code(&self) -> char {
        match self {
            DataKind::Real => 'f',
            DataKind::Complex => 'c',
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A real or complex floating point element.
pub trait Scalar:
    LinalgScalar
    + ScalarOperand
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + PartialEq
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
{
    /// The real type underlying this element (`Self` for real types).
    type Real: RealScalar;

    /// Category of this element type.
    const KIND: DataKind;

    /// Name of the element type, e.g. `complex128`.
    const DTYPE: &'static str;

    /// Complex conjugate.
    fn conj(self) -> Self;

    /// Magnitude `|z|`.
    fn modulus(self) -> Self::Real;

    /// Squared magnitude `|z|^2`.
    fn modulus_sqr(self) -> Self::Real;

    /// Angle in `(-π, π]`; real values give `0` or `π`.
    fn arg(self) -> Self::Real;

    /// Real part.
    fn re(self) -> Self::Real;

    /// Imaginary part, zero for real types.
    fn im(self) -> Self::Real;

    /// Embeds a real number.
    fn from_real(value: Self::Real) -> Self;

    /// Multiplies by a complex phase factor.
    ///
    /// Real types keep the real part of the product.
    fn scale_by_phase(self, phase: Complex<Self::Real>) -> Self;
}

/// A real floating point element.
pub trait RealScalar: Scalar<Real = Self> + Float + FloatConst + TotalOrder {
    /// Lossy conversion from `f64`.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widening conversion to `f64`.
    fn into_f64(self) -> f64;
}

macro_rules! impl_real_scalar {
    ($t:ty, $dtype:expr) => {
        impl Scalar for $t {
            type Real = $t;
            const KIND: DataKind = DataKind::Real;
            const DTYPE: &'static str = $dtype;

            fn conj(self) -> Self {
                self
            }

            fn modulus(self) -> Self::Real {
                <$t>::abs(self)
            }

            fn modulus_sqr(self) -> Self::Real {
                self * self
            }

            fn arg(self) -> Self::Real {
                <$t>::atan2(0.0, self)
            }

            fn re(self) -> Self::Real {
                self
            }

            fn im(self) -> Self::Real {
                0.0
            }

            fn from_real(value: Self::Real) -> Self {
                value
            }

            fn scale_by_phase(self, phase: Complex<Self::Real>) -> Self {
                self * phase.re
            }
        }

        impl RealScalar for $t {
            fn from_f64_lossy(value: f64) -> Self {
                value as $t
            }

            fn into_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

macro_rules! impl_complex_scalar {
    ($t:ty, $dtype:expr) => {
        impl Scalar for Complex<$t> {
            type Real = $t;
            const KIND: DataKind = DataKind::Complex;
            const DTYPE: &'static str = $dtype;

            fn conj(self) -> Self {
                Complex::conj(&self)
            }

            fn modulus(self) -> Self::Real {
                Complex::norm(self)
            }

            fn modulus_sqr(self) -> Self::Real {
                Complex::norm_sqr(&self)
            }

            fn arg(self) -> Self::Real {
                Complex::arg(self)
            }

            fn re(self) -> Self::Real {
                self.re
            }

            fn im(self) -> Self::Real {
                self.im
            }

            fn from_real(value: Self::Real) -> Self {
                Complex::new(value, 0.0)
            }

            fn scale_by_phase(self, phase: Complex<Self::Real>) -> Self {
                self * phase
            }
        }
    };
}

impl_real_scalar!(f32, "float32");
impl_real_scalar!(f64, "float64");
impl_complex_scalar!(f32, "complex64");
impl_complex_scalar!(f64, "complex128");

/// Whether either part of `value` is NaN.
pub(crate) fn has_nan<T: Scalar>(value: T) -> bool {
    value.re().is_nan() || value.im().is_nan()
}

/// Lexicographic total order on `(re, im)` with every NaN value last.
pub(crate) fn lexical_cmp<T: Scalar>(a: T, b: T) -> Ordering {
    has_nan(a)
        .cmp(&has_nan(b))
        .then_with(|| a.re().total_cmp(&b.re()))
        .then_with(|| a.im().total_cmp(&b.im()))
}

/// Lexicographic `value < bound` against a real bound.
pub(crate) fn lexical_lt<T: Scalar>(value: T, bound: T::Real) -> bool {
    let re = value.re();
    re < bound || (re == bound && value.im() < T::Real::zero())
}

/// Index of the largest-magnitude element, first occurrence on ties.
pub(crate) fn argmax_modulus<'a, T, I>(values: I) -> Option<usize>
where
    T: Scalar,
    I: IntoIterator<Item = &'a T>,
{
    let mut best: Option<(usize, T::Real)> = None;
    for (i, v) in values.into_iter().enumerate() {
        let m = v.modulus();
        if best.is_none_or(|(_, current)| m > current) {
            best = Some((i, m));
        }
    }
    best.map(|(i, _)| i)
}
