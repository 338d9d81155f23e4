// src/state/products.rs

//! Inner and outer products between state sets.
//!
//! None of these account for an overlap matrix; with a non-orthogonal basis
//! the results are the plain Euclidean products of the coefficient vectors.

use super::State;
use crate::core::{Scalar, StateError};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::borrow::Cow;

/// Result of [`State::inner`].
#[derive(Debug, Clone, PartialEq)]
pub enum InnerProduct<T: Scalar> {
    /// `⟨ψ_i|ψ'_i⟩` for every state `i`.
    Diagonal(Array1<T>),
    /// `⟨ψ_i|ψ'_j⟩` for every pair of states.
    Matrix(Array2<T>),
}

impl<T: Scalar> InnerProduct<T> {
    /// The diagonal products, if that is what was computed.
    pub fn into_diagonal(self) -> Option<Array1<T>> {
        match self {
            InnerProduct::Diagonal(d) => Some(d),
            InnerProduct::Matrix(_) => None,
        }
    }

    /// The full product matrix, if that is what was computed.
    pub fn into_matrix(self) -> Option<Array2<T>> {
        match self {
            InnerProduct::Diagonal(_) => None,
            InnerProduct::Matrix(m) => Some(m),
        }
    }
}

/// Adds `weight * |left⟩⟨right|` to `m`.
pub(crate) fn accumulate_outer<T: Scalar>(
    m: &mut Array2<T>,
    left: ArrayView1<'_, T>,
    right: ArrayView1<'_, T>,
    weight: T,
) {
    for (mut row, &l) in m.rows_mut().into_iter().zip(left.iter()) {
        let l = l * weight;
        row.zip_mut_with(&right, |mab, &r| *mab += l * r.conj());
    }
}

impl<T: Scalar> State<T> {
    /// Checks `other` has the same shape and, if requested, aligns it onto `self`.
    fn right_operand<'a>(
        &self,
        other: &'a State<T>,
        align: bool,
        operation: &str,
    ) -> Result<Cow<'a, State<T>>, StateError> {
        if self.vectors.shape() != other.vectors.shape() {
            return Err(StateError::shape_mismatch(
                operation,
                self.vectors.shape(),
                other.vectors.shape(),
            ));
        }
        if align {
            self.align(other, false)
        } else {
            Ok(Cow::Borrowed(other))
        }
    }

    /// Returns the outer product `Σ_i |ψ_i⟩⟨ψ'_i|`.
    ///
    /// # Arguments
    /// * `other` - The right states `ψ'`; `None` uses `self`.
    /// * `align` - First align `other` onto `self` (see [`State::align`]).
    ///
    /// # Returns
    /// * An `M x M` matrix accumulated from the first state onwards.
    /// * `Err(StateError::ShapeMismatch)` if `other` differs in shape.
    pub fn outer(&self, other: Option<&State<T>>, align: bool) -> Result<Array2<T>, StateError> {
        let m = self.vectors.ncols();
        let mut out = Array2::zeros((m, m));
        match other {
            None => {
                for row in self.vectors.rows() {
                    accumulate_outer(&mut out, row, row, T::one());
                }
            }
            Some(other) => {
                let aligned = self.right_operand(other, align, "State.outer")?;
                for (left, right) in self.vectors.rows().into_iter().zip(aligned.vectors.rows()) {
                    accumulate_outer(&mut out, left, right, T::one());
                }
            }
        }
        Ok(out)
    }

    /// Returns the inner product `⟨ψ_i|ψ'_j⟩`.
    ///
    /// # Arguments
    /// * `other` - The right states `ψ'`; `None` uses `self`.
    /// * `diagonal` - Only compute the `i == j` products.
    /// * `align` - First align `other` onto `self` (see [`State::align`]).
    pub fn inner(
        &self,
        other: Option<&State<T>>,
        diagonal: bool,
        align: bool,
    ) -> Result<InnerProduct<T>, StateError> {
        if diagonal {
            self.inner_diagonal(other, align).map(InnerProduct::Diagonal)
        } else {
            self.inner_matrix(other, align).map(InnerProduct::Matrix)
        }
    }

    /// Returns `⟨ψ_i|ψ'_i⟩` for every state, length `N`.
    ///
    /// Without `other` this is the squared norm of each state, with a zero
    /// imaginary part.
    pub fn inner_diagonal(&self, other: Option<&State<T>>, align: bool) -> Result<Array1<T>, StateError> {
        let right = match other {
            None => Cow::Borrowed(self),
            Some(other) => self.right_operand(other, align, "State.inner")?,
        };
        let mut products = self.vectors.mapv(|v| v.conj());
        products *= &right.vectors;
        Ok(products.sum_axis(Axis(1)))
    }

    /// Returns the `N x N` matrix `⟨ψ_i|ψ'_j⟩`.
    pub fn inner_matrix(&self, other: Option<&State<T>>, align: bool) -> Result<Array2<T>, StateError> {
        let right = match other {
            None => Cow::Borrowed(self),
            Some(other) => self.right_operand(other, align, "State.inner")?,
        };
        Ok(self.vectors.mapv(|v| v.conj()).dot(&right.vectors.t()))
    }
}
