//! # Descriptor Registry
//!
//! Maps type names to descriptors. Keys are either user-declared top-level
//! type names, used as-is, or composite names generated for nested map and
//! list types (`person.address`, `city.library.books`).
//!
//! The registry is filled by the schema compiler and is read-only once the
//! compiled schema is handed out. Aliases share the `Arc` of their target,
//! so an alias and the type it names are the same descriptor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::descriptor::{Descriptor, PrimitiveKind};

/// Resolution target for names that are not bound to a finished descriptor.
static UNRESOLVED: Descriptor = Descriptor::Incomplete;

/// Mapping from type name to descriptor.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: HashMap<String, Arc<Descriptor>>,
}

impl Registry {
    /// A registry holding only the four primitive kinds, each under its
    /// kind name.
    pub fn new() -> Self {
        let descriptors = PrimitiveKind::ALL
            .into_iter()
            .map(|kind| (kind.name().to_string(), Arc::new(Descriptor::Primitive(kind))))
            .collect();
        Self { descriptors }
    }

    /// Look up a descriptor by type name.
    pub fn get(&self, name: &str) -> Option<&Arc<Descriptor>> {
        self.descriptors.get(name)
    }

    /// Whether `name` is bound, including to a placeholder.
    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Whether `name` is bound to a finished descriptor.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.get(name).is_some_and(|d| !d.is_incomplete())
    }

    /// Number of bound names, primitives included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All bound names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over `(name, descriptor)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Descriptor>)> {
        self.descriptors.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// The descriptor bound to `name`, or a placeholder that rejects every
    /// value when the name is unbound.
    pub fn resolve(&self, name: &str) -> &Descriptor {
        self.descriptors
            .get(name)
            .map(Arc::as_ref)
            .unwrap_or(&UNRESOLVED)
    }

    pub(crate) fn bind(&mut self, name: impl Into<String>, descriptor: Arc<Descriptor>) {
        self.descriptors.insert(name.into(), descriptor);
    }

    /// Bind `name` to the in-progress placeholder.
    pub(crate) fn reserve(&mut self, name: &str) {
        self.bind(name, Arc::new(Descriptor::Incomplete));
    }

    /// Drop the binding of `name` if it is still the in-progress placeholder.
    pub(crate) fn release(&mut self, name: &str) {
        if self.get(name).is_some_and(|d| d.is_incomplete()) {
            self.descriptors.remove(name);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
