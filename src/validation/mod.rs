// src/validation/mod.rs

//! Provides functions to validate state sets before they are handed on.

use crate::core::{
    RealScalar, Scalar, StateError, DEFAULT_AMPLITUDE_TOLERANCE, DEFAULT_COHERENCE_THRESHOLD,
    DEFAULT_NORM_TOLERANCE,
};
use crate::state::State;

/// Checks if every state is normalized (`⟨ψ_i|ψ_i⟩ ≈ 1.0`).
///
/// # Arguments
/// * `state` - The `State` to check.
/// * `tolerance` - Allowed deviation from 1.0 (e.g., 1e-9). Defaults are available.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(StateError::Validation)` naming the first state that is not.
pub fn check_normalization<T: Scalar>(state: &State<T>, tolerance: Option<f64>) -> Result<(), StateError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    for (i, norm_sq) in state.norm_squared().iter().enumerate() {
        let norm_sq = norm_sq.into_f64();
        if (norm_sq - 1.0).abs() > effective_tolerance {
            return Err(StateError::Validation {
                message: format!(
                    "State {} normalization failed. <psi|psi> = {} (Deviation > {})",
                    i, norm_sq, effective_tolerance
                ),
            });
        }
    }
    Ok(())
}

/// Checks that the states are mutually orthogonal and normalized.
///
/// Compares `⟨ψ_i|ψ_j⟩` against the identity; no overlap matrix is taken
/// into account.
///
/// # Returns
/// * `Err(StateError::Validation)` naming the first offending pair.
pub fn check_orthonormality<T: Scalar>(state: &State<T>, tolerance: Option<f64>) -> Result<(), StateError> {
    let effective_tolerance = tolerance.unwrap_or(DEFAULT_NORM_TOLERANCE);
    let overlaps = state.inner_matrix(None, false)?;
    for ((i, j), &overlap) in overlaps.indexed_iter() {
        let expected = if i == j { T::one() } else { T::zero() };
        let deviation = (overlap - expected).modulus().into_f64();
        if deviation > effective_tolerance {
            return Err(StateError::Validation {
                message: format!(
                    "Orthonormality failed for states ({}, {}): <psi_i|psi_j> = {} (Deviation {} > {})",
                    i, j, overlap, deviation, effective_tolerance
                ),
            });
        }
    }
    Ok(())
}

/// Calculates how well the phases of `other` agree with `reference`.
///
/// For each state the phase of the reference's largest component is compared
/// with the phase of `other` at the same component, scoring `(1 + cos Δ) / 2`.
/// The scores are averaged with the squared magnitude of the reference
/// component as weight. States whose reference component is negligible are
/// skipped; a negligible component in `other` scores 0.
///
/// # Arguments
/// * `reference` - The states providing the dominant components.
/// * `other` - The states to compare, same shape as `reference`.
/// * `amplitude_tolerance` - Optional threshold below which squared amplitudes are negligible.
///
/// # Returns
/// * A coherence score between 0.0 and 1.0; 1.0 when no state is significant.
/// * `Err(StateError::ShapeMismatch)` if the shapes differ.
pub fn calculate_phase_coherence<T: Scalar>(
    reference: &State<T>,
    other: &State<T>,
    amplitude_tolerance: Option<f64>,
) -> Result<f64, StateError> {
    if reference.shape() != other.shape() {
        return Err(StateError::shape_mismatch(
            "calculate_phase_coherence",
            reference.vectors().shape(),
            other.vectors().shape(),
        ));
    }
    let effective_amp_tolerance = amplitude_tolerance.unwrap_or(DEFAULT_AMPLITUDE_TOLERANCE);
    let (phases, indices) = reference.phase_max_with_indices();

    let mut total_weighted_coherence = 0.0;
    let mut total_weight = 0.0;
    for (i, &k) in indices.iter().enumerate() {
        let Some(&peak) = reference.vectors().get((i, k)) else {
            continue;
        };
        let weight = peak.modulus_sqr().into_f64();
        if weight <= effective_amp_tolerance {
            continue;
        }
        let counterpart = other.vectors()[(i, k)];
        let score = if counterpart.modulus_sqr().into_f64() <= effective_amp_tolerance {
            0.0
        } else {
            let delta = phases[i].into_f64() - counterpart.arg().into_f64();
            (1.0 + delta.cos()) / 2.0
        };
        total_weighted_coherence += weight * score;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return Ok(1.0);
    }
    Ok((total_weighted_coherence / total_weight).clamp(0.0, 1.0))
}

/// Checks if `other` meets the phase coherence threshold (>= threshold) against `reference`.
///
/// # Arguments
/// * `threshold` - Optional minimum required coherence score (defaults to 0.5).
/// * `amplitude_tolerance` - Optional threshold for negligible amplitudes.
///
/// # Returns
/// * `Ok(())` if the coherence threshold is met.
/// * `Err(StateError::Validation)` if the threshold is not met.
pub fn check_phase_coherence<T: Scalar>(
    reference: &State<T>,
    other: &State<T>,
    threshold: Option<f64>,
    amplitude_tolerance: Option<f64>,
) -> Result<(), StateError> {
    let effective_threshold = threshold.unwrap_or(DEFAULT_COHERENCE_THRESHOLD);
    let coherence = calculate_phase_coherence(reference, other, amplitude_tolerance)?;
    if coherence >= effective_threshold {
        Ok(())
    } else {
        log::debug!("phase coherence {:.4} below threshold {:.4}", coherence, effective_threshold);
        Err(StateError::Validation {
            message: format!(
                "Phase Coherence check failed. Score {:.4} < Threshold {:.4}",
                coherence, effective_threshold
            ),
        })
    }
}

/// Performs basic validation checks on a state set.
///
/// Currently only checks normalization; orthonormality is not required of
/// every producer and is checked separately.
pub fn validate_state<T: Scalar>(state: &State<T>, norm_tolerance: Option<f64>) -> Result<(), StateError> {
    check_normalization(state, norm_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_normalization() {
        let good = State::new(array![[FRAC_1_SQRT_2, FRAC_1_SQRT_2], [1.0, 0.0]]);
        assert!(check_normalization(&good, None).is_ok());
        assert!(validate_state(&good, None).is_ok());

        let bad = State::new(array![[1.0, 0.0], [1.0, 1.0]]);
        let err = check_normalization(&bad, None).unwrap_err();
        assert!(matches!(err, StateError::Validation { .. }));
        assert!(err.to_string().contains("State 1"));
        // A loose tolerance lets it through
        assert!(check_normalization(&bad, Some(1.5)).is_ok());
    }

    #[test]
    fn test_orthonormality() {
        let basis = State::new(array![
            [c(FRAC_1_SQRT_2, 0.0), c(0.0, FRAC_1_SQRT_2)],
            [c(FRAC_1_SQRT_2, 0.0), c(0.0, -FRAC_1_SQRT_2)]
        ]);
        assert!(check_orthonormality(&basis, Some(1e-12)).is_ok());

        let skewed = State::new(array![[1.0, 0.0], [FRAC_1_SQRT_2, FRAC_1_SQRT_2]]);
        assert!(check_orthonormality(&skewed, None).is_err());
        assert!(check_normalization(&skewed, Some(1e-12)).is_ok());
    }

    #[test]
    fn test_phase_coherence_scores() -> Result<(), StateError> {
        let reference = State::new(array![[c(1.0, 0.0), c(0.1, 0.0)], [c(0.0, 0.0), c(0.0, 2.0)]]);
        assert!((calculate_phase_coherence(&reference, &reference, None)? - 1.0).abs() < 1e-12);

        let negated = State::new(reference.vectors().mapv(|v| -v));
        assert!(calculate_phase_coherence(&reference, &negated, None)?.abs() < 1e-12);
        assert!(check_phase_coherence(&reference, &negated, None, None).is_err());

        let aligned = reference.align(&negated, false)?;
        assert!(check_phase_coherence(&reference, &*aligned, None, None).is_ok());
        Ok(())
    }

    #[test]
    fn test_phase_coherence_weights_and_edges() -> Result<(), StateError> {
        // Row 0 (weight 1) agrees, row 1 (weight 4) is rotated by π/2
        let reference = State::new(array![[c(1.0, 0.0)], [c(2.0, 0.0)]]);
        let other = State::new(array![[c(1.0, 0.0)], [c(0.0, 2.0)]]);
        let score = calculate_phase_coherence(&reference, &other, None)?;
        assert!((score - (1.0 * 1.0 + 4.0 * 0.5) / 5.0).abs() < 1e-12);

        let empty = State::new(array![[0.0, 0.0]]);
        assert_eq!(calculate_phase_coherence(&empty, &empty, None)?, 1.0);

        let short = State::new(array![[1.0, 0.0]]);
        let long = State::new(array![[1.0, 0.0], [0.0, 1.0]]);
        assert!(matches!(
            calculate_phase_coherence(&short, &long, None),
            Err(StateError::ShapeMismatch { .. })
        ));
        Ok(())
    }
}
