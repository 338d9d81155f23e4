// src/state_c/mod.rs

//! States paired with one coefficient each.
//!
//! A [`StateC`] is the usual result of a diagonalization: eigenvectors with
//! their eigenvalues, or normalized states with the scale factor that was
//! divided out. Row `i` of the vectors and `coeffs[i]` always travel
//! together through subsetting and sorting.

use crate::coefficient::{argsort, degenerate_groups};
use crate::core::{DataKind, Origin, ParentContainer, Scalar, Selection, StateError};
use crate::state::{accumulate_outer, InnerProduct, Phases, State};
use crate::Coefficient;
use ndarray::{Array1, Array2, ArrayView1};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// An object handling a set of vectors describing a given *state* with associated coefficients.
#[derive(Debug, Clone)]
pub struct StateC<T: Scalar, C: Scalar = <T as Scalar>::Real> {
    state: State<T>,
    coeffs: Coefficient<C>,
}

impl<T: Scalar, C: Scalar> StateC<T, C> {
    /// Creates a state set with one coefficient per state.
    ///
    /// # Returns
    /// * `Err(StateError::InvalidLength)` if there are not exactly as many
    ///   coefficients as states.
    pub fn new(vectors: Array2<T>, coeffs: Array1<C>) -> Result<Self, StateError> {
        Self::from_parts(State::new(vectors), Coefficient::new(coeffs))
    }

    /// Pairs an existing state set with its coefficients.
    ///
    /// Both halves end up sharing the provenance of `state`.
    pub fn from_parts(state: State<T>, coeffs: Coefficient<C>) -> Result<Self, StateError> {
        if state.len() != coeffs.len() {
            return Err(StateError::InvalidLength {
                message: format!(
                    "StateC requires one coefficient per state, got {} states and {} coefficients",
                    state.len(),
                    coeffs.len()
                ),
            });
        }
        let coeffs = coeffs.with_parent(state.parent().clone());
        Ok(Self { state, coeffs })
    }

    /// Replaces the provenance of the states and the coefficients.
    pub fn with_parent(self, parent: ParentContainer) -> Self {
        Self {
            state: self.state.with_parent(parent.clone()),
            coeffs: self.coeffs.with_parent(parent),
        }
    }

    /// Points this set at the object it was calculated from.
    pub fn with_origin<P: Origin>(self, origin: &Arc<P>) -> Self {
        let parent = self.state.parent().clone().with_origin(origin);
        self.with_parent(parent)
    }

    /// Attaches one metadata entry.
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let parent = self.state.parent().clone().with_metadata(key, value);
        self.with_parent(parent)
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the set holds no states.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Shape `(states, components)` of the vectors.
    pub fn shape(&self) -> (usize, usize) {
        self.state.shape()
    }

    /// Name of the vector element type.
    pub fn dtype(&self) -> &'static str {
        self.state.dtype()
    }

    /// Whether the vectors are real or complex.
    pub fn kind(&self) -> DataKind {
        self.state.kind()
    }

    /// Read-only access to the state vectors, one per row.
    pub fn vectors(&self) -> &Array2<T> {
        self.state.vectors()
    }

    /// Read-only access to the coefficients, one per state.
    pub fn coeffs(&self) -> &Array1<C> {
        self.coeffs.values()
    }

    /// The states without their coefficients.
    pub fn state(&self) -> &State<T> {
        &self.state
    }

    /// The coefficients without their states.
    pub fn coefficient(&self) -> &Coefficient<C> {
        &self.coeffs
    }

    /// Provenance shared by the states and their coefficients.
    pub fn parent(&self) -> &ParentContainer {
        self.state.parent()
    }

    /// Returns a copy; vectors and coefficients are copied, origin and
    /// metadata are shared with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns a new object with only the selected states and their coefficients.
    pub fn subset<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        let indices = selection.resolve(self.len())?;
        Ok(self.select_rows(&indices))
    }

    /// Indexing alias for [`StateC::subset`].
    pub fn get<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        self.subset(selection)
    }

    fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            state: self.state.select_rows(indices),
            coeffs: self.coeffs.select_rows(indices),
        }
    }

    /// Iterates the states as single-row objects.
    pub fn iter(&self) -> impl Iterator<Item = StateC<T, C>> + '_ {
        (0..self.len()).map(move |i| self.select_rows(&[i]))
    }

    /// Iterates `(vector, coefficient)` pairs.
    pub fn iter_raw(&self) -> impl Iterator<Item = (ArrayView1<'_, T>, C)> + '_ {
        self.state.iter_raw().zip(self.coeffs.iter_raw())
    }

    /// Norm of each state.
    pub fn norm(&self) -> Array1<T::Real> {
        self.state.norm()
    }

    /// Squared norm of each state.
    pub fn norm_squared(&self) -> Array1<T::Real> {
        self.state.norm_squared()
    }

    /// Squared magnitude of every component.
    pub fn norm_squared_components(&self) -> Array2<T::Real> {
        self.state.norm_squared_components()
    }

    /// Normalizes the states; the coefficients are kept as they are.
    pub fn normalize(&self) -> Result<Self, StateError> {
        Ok(Self {
            state: self.state.normalize()?,
            coeffs: self.coeffs.clone(),
        })
    }

    /// See [`State::inner`].
    pub fn inner(
        &self,
        other: Option<&StateC<T, C>>,
        diagonal: bool,
        align: bool,
    ) -> Result<InnerProduct<T>, StateError> {
        self.state.inner(other.map(StateC::state), diagonal, align)
    }

    /// See [`State::inner_diagonal`].
    pub fn inner_diagonal(&self, other: Option<&StateC<T, C>>, align: bool) -> Result<Array1<T>, StateError> {
        self.state.inner_diagonal(other.map(StateC::state), align)
    }

    /// See [`State::inner_matrix`].
    pub fn inner_matrix(&self, other: Option<&StateC<T, C>>, align: bool) -> Result<Array2<T>, StateError> {
        self.state.inner_matrix(other.map(StateC::state), align)
    }

    /// See [`State::phase`].
    pub fn phase(&self, method: &str, return_indices: bool) -> Result<Phases<T::Real>, StateError> {
        self.state.phase(method, return_indices)
    }

    /// Phase of the largest-magnitude element of each state.
    pub fn phase_max(&self) -> Array1<T::Real> {
        self.state.phase_max()
    }

    /// Phase of the largest-magnitude element of each state, and its column.
    pub fn phase_max_with_indices(&self) -> (Array1<T::Real>, Vec<usize>) {
        self.state.phase_max_with_indices()
    }

    /// Phase of every element.
    pub fn phase_all(&self) -> Array2<T::Real> {
        self.state.phase_all()
    }

    /// Aligns the states of `other` onto this set, see [`State::align`].
    ///
    /// The coefficients of `other` are kept; they are invariant under a
    /// global phase of their state.
    pub fn align<'a>(&self, other: &'a StateC<T, C>, copy: bool) -> Result<Cow<'a, StateC<T, C>>, StateError> {
        Ok(match self.state.align(&other.state, copy)? {
            Cow::Borrowed(_) => Cow::Borrowed(other),
            Cow::Owned(state) => Cow::Owned(Self { state, coeffs: other.coeffs.clone() }),
        })
    }

    /// Rotates the states in place, see [`State::rotate`].
    pub fn rotate(&mut self, angle: T::Real, individual: bool) {
        self.state.rotate(angle, individual);
    }

    /// Returns a new object with the states ordered by their coefficients.
    ///
    /// The sort is stable in both directions: equal coefficients keep their
    /// relative order.
    pub fn sort(&self, ascending: bool) -> Self {
        let order = argsort(self.coeffs.values().view(), ascending);
        log::debug!(
            "StateC.sort: {} states, {}",
            self.len(),
            if ascending { "ascending" } else { "descending" }
        );
        self.select_rows(&order)
    }

    /// Finds degenerate states by comparing their coefficients.
    ///
    /// See [`Coefficient::find_degenerate`]; the groups index states.
    pub fn find_degenerate(&self, tolerance: C::Real) -> Vec<Vec<usize>> {
        degenerate_groups(self.coeffs.values().view(), tolerance)
    }

    /// An independent [`State`] with the same vectors and provenance.
    pub fn to_state(&self) -> State<T> {
        self.state.clone()
    }

    /// An independent [`Coefficient`] with the same values and provenance.
    pub fn to_coefficient(&self) -> Coefficient<C> {
        self.coeffs.clone()
    }
}

impl<T: Scalar + From<C>, C: Scalar> StateC<T, C> {
    /// Returns `Σ_i c_i |ψ_i⟩⟨ψ_i|` over all states.
    ///
    /// For eigenvectors and eigenvalues this reconstructs the matrix that
    /// was diagonalized; an empty set gives an `M x M` zero matrix.
    pub fn outer(&self) -> Array2<T> {
        let indices: Vec<usize> = (0..self.len()).collect();
        self.weighted_outer(&indices)
    }

    /// Returns `Σ_i c_i |ψ_i⟩⟨ψ_i|` over the selected states only.
    pub fn outer_of<S: Selection + ?Sized>(&self, selection: &S) -> Result<Array2<T>, StateError> {
        let indices = selection.resolve(self.len())?;
        Ok(self.weighted_outer(&indices))
    }

    fn weighted_outer(&self, indices: &[usize]) -> Array2<T> {
        let m = self.shape().1;
        let mut out = Array2::zeros((m, m));
        for &i in indices {
            let row = self.state.vectors().row(i);
            accumulate_outer(&mut out, row, row, <T as From<C>>::from(self.coeffs.values()[i]));
        }
        out
    }
}

impl<T: Scalar, C: Scalar> fmt::Display for StateC<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("StateC{{states: {}, kind: {}", self.len(), self.kind());
        self.parent().fmt_with_header(f, &header)
    }
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
    fn test_length_mismatch() {
        let err = StateC::new(array![[1.0, 0.0], [0.0, 1.0]], array![1.0]).unwrap_err();
        assert!(matches!(err, StateError::InvalidLength { .. }));
        let err = StateC::from_parts(State::new(array![[1.0]]), Coefficient::new(array![1.0, 2.0]));
        assert!(err.is_err());
    }

    #[test]
    fn test_sort_carries_rows() -> Result<(), StateError> {
        let sc = StateC::new(array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]], array![3.0, 1.0, 2.0])?;
        let sorted = sc.sort(true);
        assert_eq!(sorted.coeffs(), &array![1.0, 2.0, 3.0]);
        assert_eq!(sorted.vectors(), &array![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0]]);

        let descending = sc.sort(false);
        assert_eq!(descending.coeffs(), &array![3.0, 2.0, 1.0]);
        assert_eq!(descending.vectors().row(0), array![1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_subset_keeps_pairs() -> Result<(), StateError> {
        let sc = StateC::new(array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]], array![3.0, 1.0, 2.0])?;
        let picked = sc.subset(&[2usize, 0])?;
        assert_eq!(picked.coeffs(), &array![2.0, 3.0]);
        assert_eq!(picked.vectors(), &array![[1.0, 1.0], [1.0, 0.0]]);

        let single = sc.get(&1usize)?;
        assert_eq!(single.shape(), (1, 2));
        assert_eq!(single.coeffs(), &array![1.0]);
        Ok(())
    }

    #[test]
    fn test_outer_reconstructs_matrix() -> Result<(), StateError> {
        let sc = StateC::new(array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]], array![2.0, 3.0])?;
        let m = sc.outer();
        assert_eq!(m, array![[c(2.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(3.0, 0.0)]]);

        let partial = sc.outer_of(&[1usize])?;
        assert_eq!(partial[[0, 0]], c(0.0, 0.0));
        assert_eq!(partial[[1, 1]], c(3.0, 0.0));
        assert!(sc.outer_of(&[2usize]).is_err());
        Ok(())
    }

    #[test]
    fn test_outer_of_empty_set_is_zero() -> Result<(), StateError> {
        let sc = StateC::new(Array2::<f64>::zeros((0, 3)), Array1::<f64>::zeros(0))?;
        assert_eq!(sc.outer(), Array2::<f64>::zeros((3, 3)));
        Ok(())
    }

    #[test]
    fn test_align_keeps_other_coefficients() -> Result<(), StateError> {
        let reference = StateC::new(array![[1.0, 0.0], [0.0, 1.0]], array![-1.0, 1.0])?;
        let other = StateC::new(array![[-1.0, 0.0], [0.0, 1.0]], array![-1.5, 1.5])?;
        let aligned = reference.align(&other, false)?;
        assert_eq!(aligned.vectors(), &array![[1.0, 0.0], [0.0, 1.0]]);
        assert_eq!(aligned.coeffs(), &array![-1.5, 1.5]);

        let unchanged = reference.align(&reference, false)?;
        assert!(matches!(unchanged, Cow::Borrowed(_)));
        Ok(())
    }

    #[test]
    fn test_normalize_keeps_coefficients() -> Result<(), StateError> {
        let sc = StateC::new(array![[3.0, 4.0]], array![7.0])?;
        let normalized = sc.normalize()?;
        assert_abs_diff_eq!(normalized.norm()[0], 1.0, epsilon = 1e-12);
        assert_eq!(normalized.coeffs(), &array![7.0]);
        Ok(())
    }

    #[test]
    fn test_degenerate_and_iteration() -> Result<(), StateError> {
        let sc = StateC::new(
            array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
            array![0.1, -2.0, 0.1 + 1e-8],
        )?;
        assert_eq!(sc.find_degenerate(1e-6), vec![vec![0, 2]]);

        let pairs: Vec<(Vec<f64>, f64)> = sc.iter_raw().map(|(v, e)| (v.to_vec(), e)).collect();
        assert_eq!(pairs[1], (vec![0.0, 1.0], -2.0));
        assert_eq!(sc.iter().count(), 3);
        Ok(())
    }

    #[test]
    fn test_conversions_share_provenance() -> Result<(), StateError> {
        let sc = StateC::new(array![[1.0]], array![2.0])?.with_metadata("spin", 0);
        let state = sc.to_state();
        let coeffs = sc.to_coefficient();
        assert!(state.parent().shares_metadata(sc.parent()));
        assert!(coeffs.parent().shares_metadata(sc.parent()));
        assert_eq!(sc.to_string(), "StateC{states: 1, kind: f}");
        Ok(())
    }
}
