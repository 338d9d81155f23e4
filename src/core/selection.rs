// src/core/selection.rs

//! Row selectors accepted by `subset`.
//!
//! A selection always resolves to a flat list of row indices, so a single
//! index still selects along the first dimension and keeps the container's
//! dimensionality.

use super::error::StateError;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

/// Something that picks rows out of a container with `len` rows.
pub trait Selection {
    /// Resolves the selection to row indices, in output order.
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError>;
}

fn checked(indices: impl IntoIterator<Item = usize>, len: usize) -> Result<Vec<usize>, StateError> {
    indices
        .into_iter()
        .map(|index| {
            if index < len {
                Ok(index)
            } else {
                Err(StateError::IndexOutOfBounds { index, len })
            }
        })
        .collect()
}

fn masked(mask: &[bool], len: usize) -> Result<Vec<usize>, StateError> {
    if mask.len() != len {
        return Err(StateError::InvalidLength {
            message: format!("boolean mask of length {} cannot select from {} entries", mask.len(), len),
        });
    }
    Ok(mask.iter().enumerate().filter(|(_, keep)| **keep).map(|(i, _)| i).collect())
}

impl Selection for usize {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked([*self], len)
    }
}

impl Selection for [usize] {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked(self.iter().copied(), len)
    }
}

impl<const N: usize> Selection for [usize; N] {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        self.as_slice().resolve(len)
    }
}

impl Selection for Vec<usize> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        self.as_slice().resolve(len)
    }
}

impl Selection for [bool] {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        masked(self, len)
    }
}

impl<const N: usize> Selection for [bool; N] {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        masked(self.as_slice(), len)
    }
}

impl Selection for Vec<bool> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        masked(self.as_slice(), len)
    }
}

impl Selection for Range<usize> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked(self.clone(), len)
    }
}

impl Selection for RangeInclusive<usize> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked(self.clone(), len)
    }
}

impl Selection for RangeFrom<usize> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked(self.start..len.max(self.start), len)
    }
}

impl Selection for RangeTo<usize> {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        checked(0..self.end, len)
    }
}

impl Selection for RangeFull {
    fn resolve(&self, len: usize) -> Result<Vec<usize>, StateError> {
        Ok((0..len).collect())
    }
}
