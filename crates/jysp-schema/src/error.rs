//! # Error Types
//!
//! The two disjoint failure kinds of the crate: [`SchemaError`] raised while
//! compiling a schema definition, and [`ValidationError`] raised while
//! checking a document against a compiled schema.
//!
//! ## Design
//!
//! - Both carry a dotted, root-relative location path. Root-level failures
//!   have an empty path.
//! - The message text is fixed per condition and is produced by the
//!   `Display` impl of the `*Kind` enum, so callers can match on the variant
//!   and consumers comparing message strings see stable wording.
//! - Errors are fail-fast: the first violation aborts the whole call.

use thiserror::Error;

/// Error raised while compiling a schema definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("SchemaError - Path: {path} - {kind}")]
pub struct SchemaError {
    /// Dotted ancestor path of the offending component, empty at top level.
    pub path: String,
    /// The condition that was violated.
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    /// Create an error at the location formed by joining `path` with `.`.
    pub fn at(path: &[String], kind: SchemaErrorKind) -> Self {
        Self {
            path: path.join("."),
            kind,
        }
    }

    /// Create an error at the schema root.
    pub fn root(kind: SchemaErrorKind) -> Self {
        Self {
            path: String::new(),
            kind,
        }
    }

    /// The fixed message text for this error.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Build-phase conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// The schema, a map body, or its `items` list is absent or empty.
    #[error("No component definitions found")]
    NoComponentDefinitions,

    /// The schema document is not a mapping.
    #[error("Incorrect schema type")]
    IncorrectSchemaType,

    /// A component name is bound to nothing.
    #[error("The component has no definition")]
    NoDefinition,

    /// A component definition (or an `items` entry) is not a mapping.
    #[error("The component definition is not of type \"map\"")]
    DefinitionNotMap,

    /// A component definition lacks the `type` attribute.
    #[error("The component has no type")]
    NoType,

    /// The `type` attribute is not a string.
    #[error("The component type attribute is not a type name")]
    TypeNotName,

    /// The `required` attribute is present but not a boolean.
    #[error("The required attribute is not of type \"bool\"")]
    RequiredNotBool,

    /// The `type` attribute names neither a built-in kind nor a declared type.
    #[error("Unknown type: \"{0}\"")]
    UnknownType(String),

    /// A map's `items` attribute is not a sequence.
    #[error("Component items definition list is not of type \"list\"")]
    ItemsNotList,

    /// An `items` entry is null.
    #[error("Component is None")]
    ComponentIsNone,

    /// An `items` entry is an empty mapping.
    #[error("Component is empty")]
    ComponentIsEmpty,

    /// The same item name is declared twice in one map body.
    #[error("Duplicate item: \"{0}\"")]
    DuplicateItem(String),

    /// A list definition lacks `item_types`, or it is null.
    #[error("The component has no \"item_types\" list")]
    NoItemTypes,

    /// A list's `item_types` attribute is not a sequence.
    #[error("The item types definition is not of type \"list\"")]
    ItemTypesNotList,

    /// A list's `item_types` sequence is empty.
    #[error("The component has empty \"item_types\" list")]
    EmptyItemTypes,

    /// An `item_types` entry is not a string.
    #[error("The item type is not a type name")]
    ItemTypeNotName,

    /// A `min`/`max` bound is not an integer.
    #[error("The {0} attribute is not of type \"int\"")]
    BoundNotInt(Bound),

    /// A `min`/`max` bound is negative.
    #[error("The {0} attribute is not a non-negative integer")]
    BoundNegative(Bound),

    /// `min` exceeds `max`. The wording is kept as existing consumers match on it.
    #[error("The min attribute is greatr than max")]
    MinGreaterThanMax,

    /// A referenced type never resolved to a finished descriptor.
    #[error("Unresolved type: \"{0}\"")]
    UnresolvedType(String),
}

/// Which list cardinality bound an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

impl Bound {
    /// Attribute name in the schema definition.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Error raised while validating a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ValidationError - Path: {path} - {kind}")]
pub struct ValidationError {
    /// Dotted location of the offending value, empty at the document root.
    pub path: String,
    /// The condition that was violated.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// The fixed message text for this error.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Validate-phase conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A scalar of the wrong kind, or no value, where a primitive was expected.
    #[error("Expected type: {0}")]
    ExpectedType(&'static str),

    /// A map with required items is absent.
    #[error("No components found")]
    NoComponents,

    /// A key not declared by the map type.
    #[error("Unexpected item: \"{0}\"")]
    UnexpectedItem(String),

    /// A required map item is absent.
    #[error("Missing required item: \"{0}\"")]
    MissingRequiredItem(String),

    /// A list element tagged with a type the list does not allow.
    #[error("Unexpected type: \"{0}\"")]
    UnexpectedType(String),

    /// Fewer list elements than `min`.
    #[error("Too few list items: min={0}")]
    TooFewItems(u64),

    /// More list elements than `max`.
    #[error("Too many list items: max={0}")]
    TooManyItems(u64),

    /// The value reached a placeholder left over from compilation.
    #[error("Incomplete component definition")]
    IncompleteDefinition,
}
