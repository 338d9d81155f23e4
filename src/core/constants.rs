//! Numerical defaults used when a caller does not supply a tolerance.

/// Default tolerances for validating and comparing states
pub mod state_constants {
    /// Allowed deviation of `⟨ψ|ψ⟩` from one in normalization checks.
    pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;
    /// Amplitudes with `|c|^2` below this are treated as absent.
    pub const DEFAULT_AMPLITUDE_TOLERANCE: f64 = 1e-12;
    /// Minimum phase coherence score for two aligned state sets.
    /// A single row flipped by π scores 0, an aligned row scores at least 0.5.
    pub const DEFAULT_COHERENCE_THRESHOLD: f64 = 0.5;
}
