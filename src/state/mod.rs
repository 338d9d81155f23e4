// src/state/mod.rs

//! Sets of state vectors.
//!
//! A [`State`] stores `N` vectors of length `M` as the rows of an `N x M`
//! matrix, e.g. the eigenvectors of a Hamiltonian at a single k-point.
//! Row `i` is "the i'th state"; the row order is whatever the producer
//! chose and is never rearranged here.
//!
//! All transformations return new objects. The only exception is
//! [`State::rotate`], which rewrites the vectors in place and therefore
//! requires exclusive access.

mod phase;
mod products;

pub use phase::{PhaseMethod, Phases};
pub use products::InnerProduct;
pub(crate) use products::accumulate_outer;

use crate::core::{DataKind, Origin, ParentContainer, RealScalar, Scalar, Selection, StateError};
use crate::StateC;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use num_traits::{Float, Zero};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An object handling a set of vectors describing a given *state*.
#[derive(Debug, Clone)]
pub struct State<T: Scalar> {
    vectors: Array2<T>,
    parent: ParentContainer,
}

impl<T: Scalar> State<T> {
    /// Creates a state set from a matrix whose rows are the state vectors.
    pub fn new(vectors: Array2<T>) -> Self {
        Self { vectors, parent: ParentContainer::new() }
    }

    /// Creates a set holding the single state `vector`, shape `(1, M)`.
    pub fn from_vector(vector: Array1<T>) -> Self {
        Self::new(vector.insert_axis(Axis(0)))
    }

    /// Creates a `(1, 1)` state set.
    pub fn from_scalar(value: T) -> Self {
        Self::new(Array2::from_elem((1, 1), value))
    }

    /// Creates a state set from nested rows.
    ///
    /// # Returns
    /// * `Err(StateError::InvalidLength)` if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, StateError> {
        let n = rows.len();
        let m = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != m) {
            return Err(StateError::InvalidLength {
                message: format!("state {} has {} components, expected {}", i, row.len(), m),
            });
        }
        let flat: Vec<T> = rows.into_iter().flatten().collect();
        let vectors = Array2::from_shape_vec((n, m), flat).map_err(|e| StateError::InvalidLength {
            message: e.to_string(),
        })?;
        Ok(Self::new(vectors))
    }

    /// Replaces the provenance of this set.
    pub fn with_parent(mut self, parent: ParentContainer) -> Self {
        self.parent = parent;
        self
    }

    /// Points this set at the object it was calculated from.
    pub fn with_origin<P: Origin>(mut self, origin: &Arc<P>) -> Self {
        self.parent = self.parent.with_origin(origin);
        self
    }

    /// Attaches one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parent = self.parent.with_metadata(key, value);
        self
    }

    /// Number of states (rows).
    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    /// Whether the set holds no states.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape `(states, components)`.
    pub fn shape(&self) -> (usize, usize) {
        self.vectors.dim()
    }

    /// Name of the element type, e.g. `complex128`.
    pub fn dtype(&self) -> &'static str {
        T::DTYPE
    }

    /// Whether the vectors are real or complex.
    pub fn kind(&self) -> DataKind {
        T::KIND
    }

    /// Read-only access to the state vectors, one per row.
    pub fn vectors(&self) -> &Array2<T> {
        &self.vectors
    }

    /// Consumes the set and returns the state matrix.
    pub fn into_vectors(self) -> Array2<T> {
        self.vectors
    }

    /// Provenance of these states.
    pub fn parent(&self) -> &ParentContainer {
        &self.parent
    }

    /// Returns a copy; only the vectors are copied, origin and metadata are
    /// shared with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns a new state set with only the selected states.
    ///
    /// # Arguments
    /// * `selection` - An index, list of indices, range or boolean mask.
    ///   A single index still produces a two dimensional result.
    pub fn subset<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        let indices = selection.resolve(self.len())?;
        Ok(self.select_rows(&indices))
    }

    /// Indexing alias for [`State::subset`].
    pub fn get<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        self.subset(selection)
    }

    pub(crate) fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            vectors: self.vectors.select(Axis(0), indices),
            parent: self.parent.clone(),
        }
    }

    /// Same provenance, new vectors.
    pub(crate) fn with_vectors(&self, vectors: Array2<T>) -> Self {
        Self { vectors, parent: self.parent.clone() }
    }

    /// Iterates the states as single-row sets.
    pub fn iter(&self) -> impl Iterator<Item = State<T>> + '_ {
        (0..self.len()).map(move |i| self.select_rows(&[i]))
    }

    /// Iterates the raw state vectors.
    pub fn iter_raw(&self) -> impl Iterator<Item = ArrayView1<'_, T>> + '_ {
        self.vectors.rows().into_iter()
    }

    /// Norm of each state, `sqrt(⟨ψ|ψ⟩)`.
    pub fn norm(&self) -> Array1<T::Real> {
        self.norm_squared().mapv(|n| n.sqrt())
    }

    /// Squared norm of each state, `⟨ψ|ψ⟩`.
    ///
    /// This does *not* take into account a possible overlap matrix when
    /// non-orthogonal basis sets are used.
    pub fn norm_squared(&self) -> Array1<T::Real> {
        self.norm_squared_components().sum_axis(Axis(1))
    }

    /// Squared magnitude of every component, without summing over a state.
    pub fn norm_squared_components(&self) -> Array2<T::Real> {
        self.vectors.mapv(|v| v.modulus_sqr())
    }

    /// Returns a new state set where every state has unit norm.
    ///
    /// # Returns
    /// * `Err(StateError::ZeroNorm)` naming the first zero state.
    pub fn normalize(&self) -> Result<Self, StateError> {
        let norms = self.norm();
        let vectors = scale_rows(&self.vectors, &norms)?;
        Ok(self.with_vectors(vectors))
    }

    /// Renormalizes every state to `norm` and keeps the scale as coefficient.
    ///
    /// `c_i = sqrt(⟨ψ_i|ψ_i⟩ / norm_i)` and `ψ'_i = ψ_i / c_i`, so that
    /// `⟨ψ'_i|ψ'_i⟩ = norm_i`.
    ///
    /// # Arguments
    /// * `norm` - One target for all states, or one per state.
    ///
    /// # Returns
    /// * `Err(StateError::InvalidLength)` for any other number of targets.
    /// * `Err(StateError::InvalidArgument)` for a target that is not positive.
    /// * `Err(StateError::ZeroNorm)` for a state with zero norm.
    pub fn to_state_c(&self, norm: &[T::Real]) -> Result<StateC<T, T::Real>, StateError> {
        let n = self.len();
        let targets: Vec<T::Real> = match norm.len() {
            1 => vec![norm[0]; n],
            len if len == n => norm.to_vec(),
            len => {
                return Err(StateError::InvalidLength {
                    message: format!("State.to_state_c requires 1 or {} norms, got {}", n, len),
                });
            }
        };
        if let Some(target) = targets.iter().find(|&&target| target.is_nan() || target <= T::Real::zero()) {
            return Err(StateError::InvalidArgument {
                message: format!("State.to_state_c requires positive norms, got {}", target),
            });
        }
        let coeffs: Array1<T::Real> = self
            .norm_squared()
            .iter()
            .zip(targets.iter())
            .map(|(&n2, &target)| (n2 / target).sqrt())
            .collect();
        let vectors = scale_rows(&self.vectors, &coeffs)?;
        StateC::from_parts(
            self.with_vectors(vectors),
            crate::Coefficient::new(coeffs).with_parent(self.parent.clone()),
        )
    }
}

/// Divides every row by its scale; zero scales are rejected.
fn scale_rows<T: Scalar>(vectors: &Array2<T>, scales: &Array1<T::Real>) -> Result<Array2<T>, StateError> {
    if let Some(row) = scales.iter().position(|s| s.is_zero()) {
        return Err(StateError::ZeroNorm { row });
    }
    let mut scaled = vectors.clone();
    for (mut row, &s) in scaled.rows_mut().into_iter().zip(scales.iter()) {
        let s = T::from_real(s);
        row.mapv_inplace(|v| v / s);
    }
    Ok(scaled)
}

impl<T: Scalar> From<Array2<T>> for State<T> {
    fn from(vectors: Array2<T>) -> Self {
        Self::new(vectors)
    }
}

impl<T: Scalar> From<Array1<T>> for State<T> {
    fn from(vector: Array1<T>) -> Self {
        Self::from_vector(vector)
    }
}

impl<T: Scalar> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("State{{states: {}, kind: {}", self.len(), self.kind());
        self.parent.fmt_with_header(f, &header)
    }
}

/// Wraps `((Δ + π) mod 2π) - π` with a floored modulo, result in `[-π, π)`.
pub(crate) fn wrap_phase<R: RealScalar>(delta: R) -> R {
    let pi = R::PI();
    let two_pi = pi + pi;
    let shifted = delta + pi;
    shifted - two_pi * (shifted / two_pi).floor() - pi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use num_complex::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_always_two_dimensional() {
        let s = State::from_vector(array![c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)]);
        assert_eq!(s.shape(), (1, 3));
        assert_eq!(s.vectors().ndim(), 2);

        let s = State::from_scalar(2.0);
        assert_eq!(s.shape(), (1, 1));
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let ok = State::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert!(ok.is_ok());
        let ragged = State::from_rows(vec![vec![1.0, 0.0], vec![0.0]]);
        assert!(matches!(ragged, Err(StateError::InvalidLength { .. })));
    }

    #[test]
    fn test_norms() {
        let s = State::new(array![[c(3.0, 4.0), c(0.0, 0.0)], [c(1.0, 0.0), c(0.0, -1.0)]]);
        let n2 = s.norm_squared();
        assert_abs_diff_eq!(n2[0], 25.0, epsilon = 1e-12);
        assert_abs_diff_eq!(n2[1], 2.0, epsilon = 1e-12);
        let n = s.norm();
        assert_abs_diff_eq!(n[0], 5.0, epsilon = 1e-12);
        let components = s.norm_squared_components();
        assert_eq!(components.dim(), (2, 2));
        assert_abs_diff_eq!(components[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize() -> Result<(), StateError> {
        let s = State::new(array![[3.0, 4.0], [0.0, -2.0]]);
        let normalized = s.normalize()?;
        assert_abs_diff_eq!(normalized.vectors()[[0, 0]], 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(normalized.vectors()[[1, 1]], -1.0, epsilon = 1e-12);
        // The original is untouched
        assert_eq!(s.vectors()[[0, 0]], 3.0);
        Ok(())
    }

    #[test]
    fn test_normalize_zero_state_fails() {
        let s = State::new(array![[1.0, 0.0], [0.0, 0.0]]);
        assert_eq!(s.normalize().unwrap_err(), StateError::ZeroNorm { row: 1 });
    }

    #[test]
    fn test_to_state_c() -> Result<(), StateError> {
        let s = State::new(array![[c(3.0, 0.0), c(0.0, 4.0)], [c(0.0, 0.0), c(2.0, 0.0)]]);
        let sc = s.to_state_c(&[1.0])?;
        assert_abs_diff_eq!(sc.coeffs()[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sc.coeffs()[1], 2.0, epsilon = 1e-12);
        for n in sc.norm().iter() {
            assert_abs_diff_eq!(*n, 1.0, epsilon = 1e-12);
        }

        let sc = s.to_state_c(&[25.0, 1.0])?;
        assert_abs_diff_eq!(sc.coeffs()[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sc.norm_squared()[0], 25.0, epsilon = 1e-12);

        assert!(matches!(s.to_state_c(&[1.0, 1.0, 1.0]), Err(StateError::InvalidLength { .. })));
        Ok(())
    }

    #[test]
    fn test_to_state_c_rejects_non_positive_norms() {
        let s = State::new(array![[3.0, 4.0], [0.0, 2.0]]);
        for norm in [[0.0], [-1.0], [f64::NAN]] {
            assert!(matches!(s.to_state_c(&norm), Err(StateError::InvalidArgument { .. })));
        }
        assert!(matches!(s.to_state_c(&[1.0, 0.0]), Err(StateError::InvalidArgument { .. })));
        assert!(s.to_state_c(&[1.0, 4.0]).is_ok());
    }

    #[test]
    fn test_wrap_phase() {
        use std::f64::consts::PI;
        assert_abs_diff_eq!(wrap_phase(0.0_f64), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_phase(1.5 * PI), -0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_phase(-1.5 * PI), 0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_phase(PI), -PI, epsilon = 1e-12);
    }

    #[test]
    fn test_display_with_origin() {
        struct Source;
        impl fmt::Display for Source {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "Hamiltonian{{\n orbitals: 2\n}}")
            }
        }
        let origin = Arc::new(Source);
        let s = State::new(array![[c(1.0, 0.0)]]).with_origin(&origin);
        assert_eq!(s.to_string(), "State{states: 1, kind: c,\n Hamiltonian{\n  orbitals: 2\n }\n}");
        let plain = State::new(array![[1.0]]);
        assert_eq!(plain.to_string(), "State{states: 1, kind: f}");
    }
}
