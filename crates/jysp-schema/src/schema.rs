//! # Compiled Schema
//!
//! The read-only result of compilation: the synthesized root map and the
//! registry of every type it can reach.
//!
//! ## Thread Safety
//!
//! `CompiledSchema` is `Send + Sync`. Validation never mutates the schema
//! and keeps its location path on the call stack, so one compiled schema can
//! serve any number of concurrent [`CompiledSchema::validate`] calls.

use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::descriptor::{Descriptor, MapDescriptor};
use crate::error::{SchemaError, ValidationError};
use crate::location::Location;
use crate::registry::Registry;

/// A schema definition compiled into a type graph.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    root: Descriptor,
    registry: Registry,
}

impl CompiledSchema {
    pub(crate) fn new(root: MapDescriptor, registry: Registry) -> Self {
        Self {
            root: Descriptor::Map(root),
            registry,
        }
    }

    /// Compile a schema definition. See [`crate::compile`].
    pub fn compile(definition: &Value) -> Result<Self, SchemaError> {
        crate::compiler::compile(definition)
    }

    /// Validate a document against the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in a depth-first walk of
    /// the document, in document key order.
    pub fn validate(&self, document: &Value) -> Result<(), ValidationError> {
        trace!(types = self.registry.len(), "validating document");
        let root = Location::ROOT;
        self.root.validate(Some(document), &self.registry, &root)
    }

    /// The synthesized root map. Its items are the top-level types in
    /// declaration order.
    pub fn root(&self) -> &Descriptor {
        &self.root
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Look up a registered type by name or composite name.
    pub fn descriptor(&self, name: &str) -> Option<&Arc<Descriptor>> {
        self.registry.get(name)
    }

    /// Number of registry entries, the four primitive kinds included.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// All registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        self.registry.type_names()
    }
}
