//! # jysp-schema — Component Schema Compiler & Validator
//!
//! Compiles a declarative schema definition (named component types built
//! from booleans, strings, integers, floats, maps and lists) into a type
//! graph, then checks document trees against it.
//!
//! Both inputs are already-parsed [`serde_json::Value`] trees; this crate
//! never reads files or parses text. `null` stands for an absent value.
//!
//! ## Compilation (`compiler`)
//!
//! [`compile`] registers every component in a [`Registry`], resolving
//! primitive aliases, nested map and list literals, references to other
//! top-level types, and self- or mutually-recursive types in a single pass.
//!
//! ## Validation (`schema`, `descriptor`)
//!
//! [`CompiledSchema::validate`] walks a document against the root
//! descriptor. Every [`Descriptor`] kind implements the same contract and
//! the first violation is returned with its dotted [`Location`].
//!
//! ```
//! use serde_json::json;
//!
//! let schema = jysp_schema::compile(&json!({
//!     "person": {"type": "map", "items": [
//!         {"name": {"type": "string"}},
//!         {"age": {"type": "int"}},
//!     ]}
//! }))
//! .unwrap();
//!
//! assert!(schema.validate(&json!({"person": {"name": "Bob", "age": 30}})).is_ok());
//!
//! let err = schema.validate(&json!({"person": {"name": "Bob"}})).unwrap_err();
//! assert_eq!(err.path, "person");
//! assert_eq!(err.message(), r#"Missing required item: "age""#);
//! ```

pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod location;
pub mod registry;
pub mod schema;

pub use compiler::compile;
pub use descriptor::{Descriptor, ListDescriptor, MapDescriptor, MapItem, PrimitiveKind};
pub use error::{Bound, SchemaError, SchemaErrorKind, ValidationError, ValidationErrorKind};
pub use location::Location;
pub use registry::Registry;
pub use schema::CompiledSchema;
