//! # Descriptors
//!
//! A [`Descriptor`] is the compiled form of one component type. Every kind
//! shares the same contract: [`Descriptor::validate`] accepts a document
//! value or fails with the first [`ValidationError`] found below it.
//!
//! ## Absent Values
//!
//! A missing value and an explicit `null` are the same thing. Primitives
//! never accept an absent value; whether a component may be left out is a
//! property of the map item that contains it, not of its type.
//!
//! ## Type References
//!
//! Map items and list element tags refer to other descriptors by registry
//! key. They are resolved against the [`Registry`] passed into `validate`,
//! which is what lets a descriptor refer to itself or to a type that refers
//! back to it without forming an ownership cycle.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::location::Location;
use crate::registry::Registry;

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    String,
    Int,
    Float,
}

impl PrimitiveKind {
    /// All kinds, in registration order.
    pub const ALL: [PrimitiveKind; 4] = [Self::Bool, Self::String, Self::Int, Self::Float];

    /// The type name used for this kind in schema definitions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
        }
    }

    /// Look up a kind by its type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether `value` is a scalar of exactly this kind. There is no
    /// coercion between integers and floats.
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_)) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Float, Value::Number(n)) => n.is_f64(),
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named component of a map type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapItem {
    /// Key of the component in a conforming document.
    pub name: String,
    /// Registry key of the component's type.
    pub item_type: String,
    /// Whether a conforming document must contain the component.
    pub required: bool,
}

impl fmt::Display for MapItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MapItem(name={},type={},required={})",
            self.name, self.item_type, self.required
        )
    }
}

/// A mapping type with a fixed set of named components.
#[derive(Debug, Clone)]
pub struct MapDescriptor {
    items: Vec<MapItem>,
    index: HashMap<String, usize>,
}

impl MapDescriptor {
    /// Create a map type from items in declaration order. Item names are
    /// expected to be unique; a repeated name shadows the earlier entry on
    /// lookup.
    pub fn new(items: Vec<MapItem>) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.name.clone(), position))
            .collect();
        Self { items, index }
    }

    /// Items in declaration order.
    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Option<&MapItem> {
        self.index.get(name).map(|&position| &self.items[position])
    }

    /// Names of the required items, in declaration order.
    pub fn required_items(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|item| item.required)
            .map(|item| item.name.as_str())
    }

    fn validate(
        &self,
        value: Option<&Value>,
        registry: &Registry,
        at: &Location<'_>,
    ) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return match self.required_items().next() {
                None => Ok(()),
                Some(_) => Err(fail(at, ValidationErrorKind::NoComponents)),
            };
        };
        let Value::Object(entries) = value else {
            return Err(fail(at, ValidationErrorKind::ExpectedType("map")));
        };

        let mut seen = vec![false; self.items.len()];
        for (key, item_value) in entries {
            let Some(&position) = self.index.get(key) else {
                return Err(fail(
                    at,
                    ValidationErrorKind::UnexpectedItem(key.clone()),
                ));
            };
            let item_at = at.key(key);
            registry
                .resolve(&self.items[position].item_type)
                .validate(Some(item_value), registry, &item_at)?;
            seen[position] = true;
        }

        let missing = self
            .items
            .iter()
            .zip(&seen)
            .find(|(item, seen)| item.required && !**seen);
        match missing {
            Some((item, _)) => Err(fail(
                at,
                ValidationErrorKind::MissingRequiredItem(item.name.clone()),
            )),
            None => Ok(()),
        }
    }
}

impl fmt::Display for MapDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MapDescriptor(")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str(")")
    }
}

/// A sequence type whose elements are tagged with their declared type.
///
/// A conforming element is a single-key mapping `{type_name: value}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDescriptor {
    item_types: Vec<String>,
    min: Option<u64>,
    max: Option<u64>,
}

impl ListDescriptor {
    /// Create a list type. Repeated entries in `item_types` are collapsed.
    pub fn new(item_types: Vec<String>, min: Option<u64>, max: Option<u64>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(item_types.len());
        for item_type in item_types {
            if !unique.contains(&item_type) {
                unique.push(item_type);
            }
        }
        Self {
            item_types: unique,
            min,
            max,
        }
    }

    /// Registry keys of the element types the list accepts.
    pub fn item_types(&self) -> &[String] {
        &self.item_types
    }

    /// Whether elements tagged `type_name` are accepted.
    pub fn allows(&self, type_name: &str) -> bool {
        self.item_types.iter().any(|t| t == type_name)
    }

    /// Minimum number of elements, if bounded.
    pub fn min(&self) -> Option<u64> {
        self.min
    }

    /// Maximum number of elements, if bounded.
    pub fn max(&self) -> Option<u64> {
        self.max
    }

    fn validate(
        &self,
        value: Option<&Value>,
        registry: &Registry,
        at: &Location<'_>,
    ) -> Result<(), ValidationError> {
        let Some(value) = value else {
            return match self.min {
                Some(min) if min > 0 => Err(fail(at, ValidationErrorKind::TooFewItems(min))),
                _ => Ok(()),
            };
        };
        let Value::Array(elements) = value else {
            return Err(fail(at, ValidationErrorKind::ExpectedType("list")));
        };

        let mut count: u64 = 0;
        for (index, element) in elements.iter().enumerate() {
            let element_at = at.index(index);
            let Value::Object(tagged) = element else {
                return Err(fail(&element_at, ValidationErrorKind::ExpectedType("map")));
            };
            for (tag, tagged_value) in tagged {
                if !self.allows(tag) {
                    return Err(fail(at, ValidationErrorKind::UnexpectedType(tag.clone())));
                }
                registry
                    .resolve(tag)
                    .validate(Some(tagged_value), registry, &element_at)?;
            }

            count += 1;
            if let Some(max) = self.max {
                if count > max {
                    return Err(fail(at, ValidationErrorKind::TooManyItems(max)));
                }
            }
        }

        match self.min {
            Some(min) if count < min => Err(fail(at, ValidationErrorKind::TooFewItems(min))),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ListDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListDescriptor({})", self.item_types.join(","))
    }
}

/// Compiled representation of a component type.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// A built-in scalar.
    Primitive(PrimitiveKind),
    /// A mapping with named components.
    Map(MapDescriptor),
    /// A sequence of type-tagged elements.
    List(ListDescriptor),
    /// Registration in progress. Only exists while a schema is being
    /// compiled and rejects every value.
    Incomplete,
}

impl Descriptor {
    /// Check `value` against this type. `None` and `Some(Value::Null)` both
    /// mean the value is absent. `registry` resolves the type names this
    /// descriptor refers to, and `at` is the value's position, used only
    /// for error reporting.
    pub fn validate(
        &self,
        value: Option<&Value>,
        registry: &Registry,
        at: &Location<'_>,
    ) -> Result<(), ValidationError> {
        let value = value.filter(|v| !v.is_null());
        match self {
            Self::Primitive(kind) => match value {
                Some(v) if kind.matches(v) => Ok(()),
                _ => Err(fail(at, ValidationErrorKind::ExpectedType(kind.name()))),
            },
            Self::Map(map) => map.validate(value, registry, at),
            Self::List(list) => list.validate(value, registry, at),
            Self::Incomplete => Err(fail(at, ValidationErrorKind::IncompleteDefinition)),
        }
    }

    /// The scalar kind, if this is a primitive.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapDescriptor> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListDescriptor> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete)
    }

    /// Short kind label used in log events.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Incomplete => "incomplete",
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(PrimitiveKind::Bool) => f.write_str("BoolDescriptor"),
            Self::Primitive(PrimitiveKind::String) => f.write_str("StringDescriptor"),
            Self::Primitive(PrimitiveKind::Int) => f.write_str("IntDescriptor"),
            Self::Primitive(PrimitiveKind::Float) => f.write_str("FloatDescriptor"),
            Self::Map(map) => write!(f, "{map}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Incomplete => f.write_str("IncompleteTypeDescriptor"),
        }
    }
}

fn fail(at: &Location<'_>, kind: ValidationErrorKind) -> ValidationError {
    ValidationError {
        path: at.render(),
        kind,
    }
}
