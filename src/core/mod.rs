// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod parent;
pub mod scalar;
pub mod selection;

// Re-export public types for convenient access via `eigenstates::core::TypeName`
pub use error::StateError;
pub use parent::{Metadata, Origin, ParentContainer};
pub use scalar::{DataKind, RealScalar, Scalar};
pub use selection::Selection;

pub mod constants;
pub use constants::state_constants::{
    DEFAULT_AMPLITUDE_TOLERANCE, DEFAULT_COHERENCE_THRESHOLD, DEFAULT_NORM_TOLERANCE,
}; // Re-export
