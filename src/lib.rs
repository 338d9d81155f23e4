// src/lib.rs

//! `eigenstates` - Containers for eigenstates and their eigenvalues
//!
//! This library provides the state, coefficient and eigenpair objects handed
//! from a diagonalization routine to post-processing. Every object remembers
//! where it was calculated from and carries arbitrary metadata.

pub mod core;
pub mod coefficient;
pub mod state;
pub mod state_c;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use coefficient::Coefficient;
pub use crate::core::{DataKind, Origin, ParentContainer, RealScalar, Scalar, Selection, StateError};
pub use state::{InnerProduct, PhaseMethod, Phases, State};
pub use state_c::StateC;
pub use validation::{
    calculate_phase_coherence,
    check_normalization,
    check_orthonormality,
    check_phase_coherence,
    validate_state,
};

// Example 1: Eigenpairs of a 2x2 Hamiltonian
// Builds the eigenvectors and eigenvalues of [[0, 1], [1, 0]], sorts them and
// reconstructs the Hamiltonian from its spectral decomposition.
/// ```
/// use eigenstates::{StateC, StateError};
/// use ndarray::array;
/// use std::f64::consts::FRAC_1_SQRT_2;
///
/// # fn main() -> Result<(), StateError> {
/// let s = FRAC_1_SQRT_2;
/// let eig = StateC::new(array![[s, -s], [s, s]], array![-1.0, 1.0])?
///     .with_metadata("k", vec![0.0, 0.0, 0.0]);
///
/// let sorted = eig.sort(false);
/// assert_eq!(sorted.coeffs(), &array![1.0, -1.0]);
///
/// // H = Σ_i e_i |ψ_i⟩⟨ψ_i|
/// let h = eig.outer();
/// assert!((h[[0, 1]] - 1.0).abs() < 1e-12);
/// assert!(h[[0, 0]].abs() < 1e-12);
///
/// assert!(eig.find_degenerate(1e-6).is_empty());
/// assert_eq!(eig.to_string(), "StateC{states: 2, kind: f}");
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Removing the gauge freedom of two calculations
// The second calculation returned the same states with arbitrary signs;
// `align` undoes them so the two sets can be compared row by row.
/// ```
/// use eigenstates::{State, StateError, check_phase_coherence};
/// use ndarray::array;
///
/// # fn main() -> Result<(), StateError> {
/// let first = State::new(array![[0.6_f64, 0.8], [0.8, -0.6]]);
/// let second = State::new(array![[-0.6_f64, -0.8], [-0.8, 0.6]]);
/// assert!(check_phase_coherence(&first, &second, None, None).is_err());
///
/// let aligned = first.align(&second, false)?;
/// assert_eq!(aligned.vectors(), first.vectors());
/// check_phase_coherence(&first, &aligned, None, None)?;
///
/// let overlaps = first.inner_diagonal(Some(&second), true)?;
/// assert!((overlaps[0] - 1.0).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
