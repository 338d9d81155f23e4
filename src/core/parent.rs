// src/core/parent.rs

//! Provenance shared by every container: where the data came from and
//! free-form information about how it was produced.

use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Free-form information attached to a container.
pub type Metadata = HashMap<String, Value>;

/// An object that produced a container, e.g. a Hamiltonian.
///
/// Implemented for every `Display + Send + Sync + 'static` type.
pub trait Origin: fmt::Display + Send + Sync + 'static {
    /// Access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: fmt::Display + Send + Sync + 'static> Origin for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Holds the origin of some data and an information mapping.
///
/// The origin is held through a [`Weak`] handle: a container never keeps its
/// origin alive, and reads back `None` once the caller drops it. Cloning a
/// `ParentContainer` shares both the origin handle and the metadata map.
#[derive(Clone, Default)]
pub struct ParentContainer {
    origin: Option<Weak<dyn Origin>>,
    metadata: Arc<Metadata>,
}

impl ParentContainer {
    /// Creates a container with no origin and empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this container pointing at `origin`.
    pub fn with_origin<P: Origin>(mut self, origin: &Arc<P>) -> Self {
        let origin: Arc<dyn Origin> = origin.clone();
        self.origin = Some(Arc::downgrade(&origin));
        self
    }

    /// Returns this container pointing at an already type-erased origin.
    pub fn with_dyn_origin(mut self, origin: &Arc<dyn Origin>) -> Self {
        self.origin = Some(Arc::downgrade(origin));
        self
    }

    /// Returns this container with `key` set in its metadata.
    ///
    /// Containers cloned before this call keep the previous map.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.metadata).insert(key.into(), value.into());
        self
    }

    /// Returns this container with its metadata replaced by `metadata`.
    pub fn with_metadata_map(mut self, metadata: Metadata) -> Self {
        self.metadata = Arc::new(metadata);
        self
    }

    /// The origin, if one was attached and it is still alive.
    pub fn origin(&self) -> Option<Arc<dyn Origin>> {
        self.origin.as_ref().and_then(Weak::upgrade)
    }

    /// Whether the origin is alive and of type `P`.
    pub fn origin_is<P: Origin>(&self) -> bool {
        self.with_origin_as::<P, _>(|_| ()).is_some()
    }

    /// Runs `f` on the origin when it is alive and of type `P`.
    pub fn with_origin_as<P: Origin, R>(&self, f: impl FnOnce(&P) -> R) -> Option<R> {
        let origin = self.origin()?;
        let origin: &dyn Origin = &*origin;
        origin.as_any().downcast_ref::<P>().map(f)
    }

    /// The metadata map.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Whether two containers share the same metadata map.
    pub fn shares_metadata(&self, other: &ParentContainer) -> bool {
        Arc::ptr_eq(&self.metadata, &other.metadata)
    }

    /// Appends the origin's `Display` output to a container header.
    pub(crate) fn fmt_with_header(&self, f: &mut fmt::Formatter<'_>, header: &str) -> fmt::Result {
        match self.origin() {
            None => write!(f, "{}}}", header),
            Some(origin) => {
                let origin = origin.to_string().replace('\n', "\n ");
                write!(f, "{},\n {}\n}}", header, origin)
            }
        }
    }
}

impl fmt::Debug for ParentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentContainer")
            .field("origin", &self.origin().map(|o| o.to_string()))
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Hamiltonian {
        orbitals: usize,
    }

    impl fmt::Display for Hamiltonian {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Hamiltonian{{orbitals: {}}}", self.orbitals)
        }
    }

    #[test]
    fn test_origin_is_not_kept_alive() {
        let h = Arc::new(Hamiltonian { orbitals: 4 });
        let parent = ParentContainer::new().with_origin(&h);
        assert!(parent.origin_is::<Hamiltonian>());
        assert!(!parent.origin_is::<String>());
        assert_eq!(parent.with_origin_as(|h: &Hamiltonian| h.orbitals), Some(4));

        drop(h);
        assert!(parent.origin().is_none());
        assert!(!parent.origin_is::<Hamiltonian>());
    }

    #[test]
    fn test_clone_shares_metadata() {
        let parent = ParentContainer::new().with_metadata("k", json!([0.0, 0.5, 0.0]));
        let copy = parent.clone();
        assert!(copy.shares_metadata(&parent));
        assert_eq!(copy.metadata()["k"], json!([0.0, 0.5, 0.0]));

        // Adding a key afterwards detaches only the modified container
        let extended = copy.with_metadata("spin", 0);
        assert!(!extended.shares_metadata(&parent));
        assert!(parent.metadata().get("spin").is_none());
    }
}
