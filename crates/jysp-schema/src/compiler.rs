//! # Schema Compiler
//!
//! Turns a schema definition tree into a [`CompiledSchema`].
//!
//! ## Definition Grammar
//!
//! The top level maps type names to component definitions. A definition is
//! a mapping with a `type` (`bool`, `string`, `int`, `float`, `map`, `list`
//! or another top-level type name) and an optional boolean `required`
//! (default `true`). `map` definitions carry `items`, a sequence of
//! single-key mappings `{item_name: definition}`. `list` definitions carry
//! `item_types`, a non-empty sequence of type names, and optional
//! non-negative `min`/`max` bounds.
//!
//! ## Registration
//!
//! All top-level definitions become the items of a synthesized root map,
//! so the document itself is checked by the ordinary map algorithm.
//! Registering a component binds its registry key:
//!
//! - Top-level primitives alias the shared primitive descriptor.
//! - Maps and lists are keyed by their composite name (ancestor path plus
//!   own name, dot-joined) so nested anonymous types never collide.
//! - A reference to another top-level type registers that type first.
//!
//! A key that is already bound is never registered again. Before a body is
//! built its key is bound to [`Descriptor::Incomplete`], so a reference
//! reached while the body is still under construction (self-recursion,
//! mutual recursion, forward references back into the current chain) finds
//! the key bound and returns immediately. The placeholder is replaced when
//! the body is finished and dropped if the build fails; a final pass
//! rejects any reference that never resolved.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::descriptor::{Descriptor, ListDescriptor, MapDescriptor, MapItem, PrimitiveKind};
use crate::error::{Bound, SchemaError, SchemaErrorKind};
use crate::registry::Registry;
use crate::schema::CompiledSchema;

/// Compile a schema definition.
///
/// # Errors
///
/// Returns the first [`SchemaError`] encountered. The path is the dotted
/// ancestor path of the offending component.
pub fn compile(definition: &Value) -> Result<CompiledSchema, SchemaError> {
    let definitions = match definition {
        Value::Null => return Err(SchemaError::root(SchemaErrorKind::NoComponentDefinitions)),
        Value::Object(definitions) if definitions.is_empty() => {
            return Err(SchemaError::root(SchemaErrorKind::NoComponentDefinitions))
        }
        Value::Object(definitions) => definitions,
        _ => return Err(SchemaError::root(SchemaErrorKind::IncorrectSchemaType)),
    };

    let mut compiler = Compiler {
        definitions,
        registry: Registry::new(),
    };

    let mut items = Vec::with_capacity(definitions.len());
    for (name, component) in definitions {
        compiler.add_item(&mut items, name, component, &[])?;
    }
    let root = MapDescriptor::new(items);
    compiler.link(&root)?;

    debug!(types = compiler.registry.len(), "compiled schema");
    Ok(CompiledSchema::new(root, compiler.registry))
}

struct Compiler<'d> {
    definitions: &'d Map<String, Value>,
    registry: Registry,
}

impl<'d> Compiler<'d> {
    /// Register one component and return its resolved type key and whether
    /// it is required.
    fn register(
        &mut self,
        name: &str,
        definition: Option<&Value>,
        path: &[String],
    ) -> Result<(String, bool), SchemaError> {
        let fields = match definition {
            None | Some(Value::Null) => {
                return Err(SchemaError::at(path, SchemaErrorKind::NoDefinition))
            }
            Some(Value::Object(fields)) => fields,
            Some(_) => return Err(SchemaError::at(path, SchemaErrorKind::DefinitionNotMap)),
        };
        let type_name = match fields.get("type") {
            None => return Err(SchemaError::at(path, SchemaErrorKind::NoType)),
            Some(Value::String(type_name)) => type_name.as_str(),
            Some(_) => return Err(SchemaError::at(path, SchemaErrorKind::TypeNotName)),
        };
        let required = match fields.get("required") {
            None => true,
            Some(Value::Bool(required)) => *required,
            Some(_) => return Err(SchemaError::at(path, SchemaErrorKind::RequiredNotBool)),
        };

        if let Some(kind) = PrimitiveKind::from_name(type_name) {
            // Nested primitives are referenced by kind name; only top-level
            // components get an alias entry.
            if path.is_empty() && !self.registry.contains(name) {
                if let Some(primitive) = self.registry.get(kind.name()).cloned() {
                    debug!(type_name = name, kind = kind.name(), "registered primitive alias");
                    self.registry.bind(name, primitive);
                }
            }
            return Ok((kind.name().to_string(), required));
        }

        match type_name {
            "map" => {
                let key = composite_name(path, name);
                if !self.registry.contains(&key) {
                    self.define(&key, |compiler| {
                        compiler
                            .build_map(name, fields, path)
                            .map(Descriptor::Map)
                    })?;
                }
                Ok((key, required))
            }
            "list" => {
                let key = composite_name(path, name);
                if !self.registry.contains(&key) {
                    self.define(&key, |compiler| {
                        compiler.build_list(fields, path).map(Descriptor::List)
                    })?;
                }
                Ok((key, required))
            }
            target if self.definitions.contains_key(target) => {
                self.register_reference(name, target, path)?;
                Ok((target.to_string(), required))
            }
            unknown => Err(SchemaError::at(
                path,
                SchemaErrorKind::UnknownType(unknown.to_string()),
            )),
        }
    }

    /// Bind `key` to a placeholder, build its descriptor, then bind the
    /// result. The placeholder never outlives this call.
    fn define<F>(&mut self, key: &str, build: F) -> Result<(), SchemaError>
    where
        F: FnOnce(&mut Self) -> Result<Descriptor, SchemaError>,
    {
        self.registry.reserve(key);
        match build(self) {
            Ok(descriptor) => {
                debug!(type_name = key, kind = descriptor.kind_name(), "registered component type");
                self.registry.bind(key, Arc::new(descriptor));
                Ok(())
            }
            Err(err) => {
                self.registry.release(key);
                Err(err)
            }
        }
    }

    /// Register a component whose type is another top-level type.
    fn register_reference(
        &mut self,
        name: &str,
        target: &str,
        path: &[String],
    ) -> Result<(), SchemaError> {
        if !path.is_empty() {
            return self.ensure_registered(target);
        }
        if self.registry.contains(name) {
            return Ok(());
        }

        self.registry.reserve(name);
        let outcome = self.ensure_registered(target);
        if outcome.is_ok() {
            let resolved = self
                .registry
                .get(target)
                .filter(|d| !d.is_incomplete())
                .cloned();
            if let Some(resolved) = resolved {
                debug!(type_name = name, aliased = target, "registered type alias");
                self.registry.bind(name, resolved);
            }
        }
        // Still a placeholder when the target is itself mid-registration;
        // the top-level pass binds it once the target is finished.
        self.registry.release(name);
        outcome
    }

    /// Register the top-level type `name` unless its key is already bound.
    fn ensure_registered(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.registry.contains(name) {
            return Ok(());
        }
        let definitions = self.definitions;
        self.register(name, definitions.get(name), &[]).map(|_| ())
    }

    fn build_map(
        &mut self,
        owner: &str,
        fields: &Map<String, Value>,
        path: &[String],
    ) -> Result<MapDescriptor, SchemaError> {
        let entries = match fields.get("items") {
            None | Some(Value::Null) => {
                return Err(SchemaError::at(path, SchemaErrorKind::NoComponentDefinitions))
            }
            Some(Value::Array(entries)) if entries.is_empty() => {
                return Err(SchemaError::at(path, SchemaErrorKind::NoComponentDefinitions))
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(SchemaError::at(path, SchemaErrorKind::ItemsNotList)),
        };

        let mut item_path = path.to_vec();
        item_path.push(owner.to_string());

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let components = match entry {
                Value::Null => return Err(SchemaError::at(path, SchemaErrorKind::ComponentIsNone)),
                Value::Object(components) if components.is_empty() => {
                    return Err(SchemaError::at(path, SchemaErrorKind::ComponentIsEmpty))
                }
                Value::Object(components) => components,
                _ => return Err(SchemaError::at(path, SchemaErrorKind::DefinitionNotMap)),
            };
            for (name, component) in components {
                self.add_item(&mut items, name, component, &item_path)?;
            }
        }
        Ok(MapDescriptor::new(items))
    }

    fn add_item(
        &mut self,
        items: &mut Vec<MapItem>,
        name: &str,
        component: &Value,
        path: &[String],
    ) -> Result<(), SchemaError> {
        if items.iter().any(|item| item.name == name) {
            return Err(SchemaError::at(
                path,
                SchemaErrorKind::DuplicateItem(name.to_string()),
            ));
        }
        let (item_type, required) = self.register(name, Some(component), path)?;
        items.push(MapItem {
            name: name.to_string(),
            item_type,
            required,
        });
        Ok(())
    }

    fn build_list(
        &mut self,
        fields: &Map<String, Value>,
        path: &[String],
    ) -> Result<ListDescriptor, SchemaError> {
        let entries = match fields.get("item_types") {
            None | Some(Value::Null) => {
                return Err(SchemaError::at(path, SchemaErrorKind::NoItemTypes))
            }
            Some(Value::Array(entries)) if entries.is_empty() => {
                return Err(SchemaError::at(path, SchemaErrorKind::EmptyItemTypes))
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(SchemaError::at(path, SchemaErrorKind::ItemTypesNotList)),
        };

        let mut item_types = Vec::with_capacity(entries.len());
        for entry in entries {
            let Value::String(type_name) = entry else {
                return Err(SchemaError::at(path, SchemaErrorKind::ItemTypeNotName));
            };
            if !self.registry.contains(type_name) {
                if !self.definitions.contains_key(type_name) {
                    return Err(SchemaError::at(
                        path,
                        SchemaErrorKind::UnknownType(type_name.clone()),
                    ));
                }
                self.ensure_registered(type_name)?;
            }
            item_types.push(type_name.clone());
        }

        let min = bound(fields, Bound::Min, path)?;
        let max = bound(fields, Bound::Max, path)?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(SchemaError::at(path, SchemaErrorKind::MinGreaterThanMax));
            }
        }
        Ok(ListDescriptor::new(item_types, min, max))
    }

    /// Reject any type reference that does not resolve to a finished
    /// descriptor. Errors are reported at the registry key of the owner.
    fn link(&self, root: &MapDescriptor) -> Result<(), SchemaError> {
        self.check_map("", root)?;
        for name in self.registry.type_names() {
            match self.registry.resolve(name) {
                Descriptor::Map(map) => self.check_map(name, map)?,
                Descriptor::List(list) => {
                    for item_type in list.item_types() {
                        self.check_reference(name, item_type)?;
                    }
                }
                Descriptor::Incomplete => {
                    return Err(SchemaError::root(SchemaErrorKind::UnresolvedType(
                        name.to_string(),
                    )))
                }
                Descriptor::Primitive(_) => {}
            }
        }
        Ok(())
    }

    fn check_map(&self, owner: &str, map: &MapDescriptor) -> Result<(), SchemaError> {
        for item in map.items() {
            self.check_reference(owner, &item.item_type)?;
        }
        Ok(())
    }

    fn check_reference(&self, owner: &str, type_name: &str) -> Result<(), SchemaError> {
        if self.registry.is_resolved(type_name) {
            return Ok(());
        }
        Err(SchemaError {
            path: owner.to_string(),
            kind: SchemaErrorKind::UnresolvedType(type_name.to_string()),
        })
    }
}

/// Registry key for a map or list component: the ancestor path and the
/// component's own name, dot-joined.
fn composite_name(path: &[String], name: &str) -> String {
    if path.is_empty() {
        return name.to_string();
    }
    format!("{}.{name}", path.join("."))
}

fn bound(
    fields: &Map<String, Value>,
    which: Bound,
    path: &[String],
) -> Result<Option<u64>, SchemaError> {
    match fields.get(which.attribute()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(value) = n.as_u64() {
                Ok(Some(value))
            } else if n.is_i64() {
                Err(SchemaError::at(path, SchemaErrorKind::BoundNegative(which)))
            } else {
                Err(SchemaError::at(path, SchemaErrorKind::BoundNotInt(which)))
            }
        }
        Some(_) => Err(SchemaError::at(path, SchemaErrorKind::BoundNotInt(which))),
    }
}
