// src/state/phase.rs

//! Phases of state vectors and the removal of their gauge freedom.
//!
//! A diagonalization routine returns every eigenvector up to an arbitrary
//! global phase. [`State::align`] picks the sign that best matches a
//! reference set and [`State::rotate`] fixes the phase of the dominant
//! component, so that two calculations of the same states can be compared
//! row by row.

use super::{wrap_phase, State};
use crate::core::scalar::argmax_modulus;
use crate::core::{RealScalar, Scalar, StateError};
use ndarray::{Array1, Array2};
use num_complex::Complex;
use num_traits::{Float, FloatConst, One, Zero};
use std::borrow::Cow;
use std::str::FromStr;

/// How [`State::phase`] reduces the component phases of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseMethod {
    /// The phase of the largest-magnitude component of each state.
    Max,
    /// The phase of every component.
    All,
}

impl FromStr for PhaseMethod {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "max" => Ok(PhaseMethod::Max),
            "all" => Ok(PhaseMethod::All),
            _ => Err(StateError::InvalidArgument {
                message: format!("State.phase only accepts method in [\"max\", \"all\"], got \"{}\"", s),
            }),
        }
    }
}

/// Result of [`State::phase`].
#[derive(Debug, Clone, PartialEq)]
pub enum Phases<R: RealScalar> {
    /// One angle per state, optionally with the column it was taken from.
    Max {
        /// Angle of the dominant component of each state
        angles: Array1<R>,
        /// Column of the dominant component, when requested
        indices: Option<Vec<usize>>,
    },
    /// Angle of every component, same shape as the vectors.
    All(Array2<R>),
}

impl<T: Scalar> State<T> {
    /// Calculates the phase of the state elements, in the range `(-π, π]`.
    ///
    /// # Arguments
    /// * `method` - `"max"` for the phase of the largest-magnitude element
    ///   of each state, `"all"` for every element (case-insensitive).
    /// * `return_indices` - Also return the columns used by `"max"`.
    ///
    /// # Returns
    /// * `Err(StateError::InvalidArgument)` for any other method.
    pub fn phase(&self, method: &str, return_indices: bool) -> Result<Phases<T::Real>, StateError> {
        Ok(match method.parse::<PhaseMethod>()? {
            PhaseMethod::Max if return_indices => {
                let (angles, indices) = self.phase_max_with_indices();
                Phases::Max { angles, indices: Some(indices) }
            }
            PhaseMethod::Max => Phases::Max { angles: self.phase_max(), indices: None },
            PhaseMethod::All => Phases::All(self.phase_all()),
        })
    }

    /// Phase of the largest-magnitude element of each state.
    pub fn phase_max(&self) -> Array1<T::Real> {
        self.phase_max_with_indices().0
    }

    /// Phase of the largest-magnitude element of each state, and its column.
    ///
    /// Ties go to the first column. States without components report
    /// column 0 and phase 0.
    pub fn phase_max_with_indices(&self) -> (Array1<T::Real>, Vec<usize>) {
        let indices: Vec<usize> = self
            .vectors
            .rows()
            .into_iter()
            .map(|row| argmax_modulus(row.iter()).unwrap_or(0))
            .collect();
        let angles = self
            .vectors
            .rows()
            .into_iter()
            .zip(indices.iter())
            .map(|(row, &i)| row.get(i).map_or(T::Real::zero(), |v| v.arg()))
            .collect();
        (angles, indices)
    }

    /// Phase of every element.
    pub fn phase_all(&self) -> Array2<T::Real> {
        self.vectors.mapv(|v| v.arg())
    }

    /// Aligns `other` with the phases of this state set.
    ///
    /// For every state the phase of `self`'s dominant component is compared
    /// with the phase of `other` at the same column. States whose phase
    /// difference exceeds `π/2` are rotated by `π` in a copy of `other`;
    /// `other` itself is never modified.
    ///
    /// # Arguments
    /// * `other` - The states to align onto this set.
    /// * `copy` - When nothing needs rotating, return an owned copy of
    ///   `other` instead of borrowing it.
    ///
    /// # Returns
    /// * `Err(StateError::ShapeMismatch)` if `other` holds a different
    ///   number of states.
    pub fn align<'a>(&self, other: &'a State<T>, copy: bool) -> Result<Cow<'a, State<T>>, StateError> {
        if self.len() != other.len() || other.vectors.ncols() < self.vectors.ncols() {
            return Err(StateError::shape_mismatch(
                "State.align",
                self.vectors.shape(),
                other.vectors.shape(),
            ));
        }

        let (phases, indices) = self.phase_max_with_indices();
        let half_pi = T::Real::FRAC_PI_2();
        let flips: Vec<usize> = (0..self.len())
            .filter(|&i| {
                let other_phase = other.vectors.get((i, indices[i])).map_or(T::Real::zero(), |v| v.arg());
                wrap_phase(phases[i] - other_phase).abs() > half_pi
            })
            .collect();

        if flips.is_empty() {
            log::trace!("State.align: all {} states already aligned", self.len());
            return Ok(if copy { Cow::Owned(other.clone()) } else { Cow::Borrowed(other) });
        }

        log::debug!("State.align: rotating {} of {} states by π", flips.len(), self.len());
        let mut aligned = other.clone();
        for &i in &flips {
            aligned.vectors.row_mut(i).mapv_inplace(|v| -v);
        }
        Ok(Cow::Owned(aligned))
    }

    /// Rotates the states **in place** so the largest component lies along `angle`.
    ///
    /// The vectors are scaled by `exp(i angle) * conj(c / |c|)` where `c`
    /// is the largest-magnitude element: of the whole matrix when
    /// `individual` is false, of each state separately otherwise.
    /// Real states keep the real part of that factor, i.e. a sign change
    /// when `angle` is a multiple of `π`. States whose largest element is
    /// zero are left untouched.
    pub fn rotate(&mut self, angle: T::Real, individual: bool) {
        if individual {
            for mut row in self.vectors.rows_mut() {
                if let Some(i) = argmax_modulus(row.iter()) {
                    let factor = rotation_factor(row[i], angle);
                    row.mapv_inplace(|v| v.scale_by_phase(factor));
                }
            }
            return;
        }

        let Some(flat) = argmax_modulus(self.vectors.iter()) else {
            return;
        };
        let ncols = self.vectors.ncols();
        let peak = self.vectors[(flat / ncols, flat % ncols)];
        log::debug!(
            "State.rotate: peak at ({}, {}), rotating {} states",
            flat / ncols,
            flat % ncols,
            self.len()
        );
        let factor = rotation_factor(peak, angle);
        self.vectors.mapv_inplace(|v| v.scale_by_phase(factor));
    }
}

/// `exp(i angle) * conj(peak / |peak|)`, identity for a zero peak.
fn rotation_factor<T: Scalar>(peak: T, angle: T::Real) -> Complex<T::Real> {
    if peak.modulus().is_zero() {
        return Complex::new(T::Real::one(), T::Real::zero());
    }
    Complex::from_polar(T::Real::one(), angle - peak.arg())
}
