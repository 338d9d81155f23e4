// src/coefficient/mod.rs

//! Coefficients tied to the object they were calculated from.
//!
//! A [`Coefficient`] is a one dimensional set of real or complex values,
//! typically the eigenvalues of a Hamiltonian at a single k-point. The
//! degeneracy search in this module is shared with [`crate::StateC`].

use crate::core::scalar::{has_nan, lexical_cmp, lexical_lt};
use crate::core::{DataKind, Origin, ParentContainer, Scalar, Selection, StateError};
use ndarray::{Array1, ArrayView1, Axis};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An object holding coefficients for a parent with info.
#[derive(Debug, Clone)]
pub struct Coefficient<T: Scalar> {
    values: Array1<T>,
    parent: ParentContainer,
}

impl<T: Scalar> Coefficient<T> {
    /// Creates a new coefficient set with no origin and empty metadata.
    pub fn new(values: Array1<T>) -> Self {
        Self { values, parent: ParentContainer::new() }
    }

    /// Creates a set holding a single coefficient.
    pub fn from_scalar(value: T) -> Self {
        Self::new(Array1::from_elem(1, value))
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

    /// Number of coefficients.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set holds no coefficients.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shape of the coefficient array.
    pub fn shape(&self) -> usize {
        self.values.len()
    }

    /// Name of the element type, e.g. `float64`.
    pub fn dtype(&self) -> &'static str {
        T::DTYPE
    }

    /// Whether the coefficients are real or complex.
    pub fn kind(&self) -> DataKind {
        T::KIND
    }

    /// Read-only access to the coefficients.
    pub fn values(&self) -> &Array1<T> {
        &self.values
    }

    /// Consumes the set and returns the coefficient array.
    pub fn into_values(self) -> Array1<T> {
        self.values
    }

    /// Provenance of these coefficients.
    pub fn parent(&self) -> &ParentContainer {
        &self.parent
    }

    /// Returns a copy; only the coefficients are copied, origin and
    /// metadata are shared with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns a new coefficient set with only the selected coefficients.
    ///
    /// # Arguments
    /// * `selection` - An index, list of indices, range or boolean mask.
    ///
    /// # Returns
    /// * `Ok(Coefficient)` holding `values[selection]`, always one dimensional.
    /// * `Err(StateError::IndexOutOfBounds)` / `Err(StateError::InvalidLength)`
    ///   for an invalid selection.
    pub fn subset<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        let indices = selection.resolve(self.len())?;
        Ok(self.select_rows(&indices))
    }

    /// Indexing alias for [`Coefficient::subset`].
    pub fn get<S: Selection + ?Sized>(&self, selection: &S) -> Result<Self, StateError> {
        self.subset(selection)
    }

    pub(crate) fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            values: self.values.select(Axis(0), indices),
            parent: self.parent.clone(),
        }
    }

    /// Iterates the coefficients as single-element sets.
    pub fn iter(&self) -> impl Iterator<Item = Coefficient<T>> + '_ {
        (0..self.len()).map(move |i| self.select_rows(&[i]))
    }

    /// Iterates the raw coefficient values.
    pub fn iter_raw(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }

    /// Finds degenerate coefficients.
    ///
    /// Two coefficients are degenerate when they differ by strictly less
    /// than `tolerance`. Each group lists original indices in ascending
    /// order of value.
    pub fn find_degenerate(&self, tolerance: T::Real) -> Vec<Vec<usize>> {
        degenerate_groups(self.values.view(), tolerance)
    }
}

impl<T: Scalar> From<Array1<T>> for Coefficient<T> {
    fn from(values: Array1<T>) -> Self {
        Self::new(values)
    }
}

impl<T: Scalar> From<Vec<T>> for Coefficient<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(Array1::from(values))
    }
}

impl<T: Scalar> fmt::Display for Coefficient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("Coefficient{{coefficients: {}, kind: {}", self.len(), self.kind());
        self.parent.fmt_with_header(f, &header)
    }
}

/// Stable argsort; descending keeps the original order of equal values.
///
/// NaN values end up last in both directions.
pub(crate) fn argsort<T: Scalar>(values: ArrayView1<'_, T>, ascending: bool) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    if ascending {
        indices.sort_by(|&a, &b| lexical_cmp(values[a], values[b]));
    } else {
        indices.sort_by(|&a, &b| {
            has_nan(values[a])
                .cmp(&has_nan(values[b]))
                .then_with(|| lexical_cmp(values[b], values[a]))
        });
    }
    indices
}

/// Groups of indices whose sorted neighbours differ by less than `tolerance`.
///
/// The consecutive differences only mark the lower member of each close
/// pair, so every run of marks is extended by the element following it.
pub(crate) fn degenerate_groups<T: Scalar>(values: ArrayView1<'_, T>, tolerance: T::Real) -> Vec<Vec<usize>> {
    let sorted = argsort(values, true);
    let marked: Vec<usize> = sorted
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| lexical_lt(values[pair[1]] - values[pair[0]], tolerance))
        .map(|(k, _)| k)
        .collect();

    let mut groups = Vec::new();
    let mut runs = marked.iter().copied().peekable();
    while let Some(start) = runs.next() {
        let mut end = start;
        while let Some(&next) = runs.peek() {
            if next != end + 1 {
                break;
            }
            end = next;
            runs.next();
        }
        groups.push(sorted[start..=end + 1].to_vec());
    }

    log::debug!("found {} degenerate groups among {} coefficients", groups.len(), values.len());
    groups
}
