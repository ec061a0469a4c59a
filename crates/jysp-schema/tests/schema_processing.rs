//! Integration tests: compiling schema definitions.
//!
//! Each case is a YAML schema document; the tests check the registry the
//! compiler produces or the exact build error it raises.

use std::sync::Arc;

use jysp_schema::{compile, Bound, CompiledSchema, PrimitiveKind, SchemaError, SchemaErrorKind};
use serde_json::Value;

fn yaml(source: &str) -> Value {
    serde_yaml::from_str(source).expect("fixture should be valid YAML")
}

fn compiles(source: &str) -> CompiledSchema {
    compile(&yaml(source)).unwrap_or_else(|e| panic!("schema should compile: {e}"))
}

fn rejects(source: &str) -> SchemaError {
    match compile(&yaml(source)) {
        Ok(schema) => panic!("schema should be rejected, compiled {:?}", schema.type_names()),
        Err(e) => e,
    }
}

const COMPLEX: &str = include_str!("fixtures/complex_schema.yml");

// ─── Top-level structure ────────────────────────────────────────────

#[test]
fn test_empty_schema() {
    let err = compile(&Value::Null).unwrap_err();
    assert_eq!(err.message(), "No component definitions found");
    let err = rejects("~");
    assert_eq!(err.message(), "No component definitions found");
    let err = rejects("{}");
    assert_eq!(err.message(), "No component definitions found");
}

#[test]
fn test_definitions_part_is_not_a_map() {
    let err = rejects("- person\n- dog\n");
    assert_eq!(err.message(), "Incorrect schema type");
    assert_eq!(err.path, "");
}

#[test]
fn test_component_has_no_definition() {
    let err = rejects("person:\n");
    assert_eq!(err.message(), "The component has no definition");
}

#[test]
fn test_component_definition_is_not_a_map() {
    let err = rejects("person: 5\n");
    assert_eq!(err.message(), "The component definition is not of type \"map\"");
}

#[test]
fn test_component_has_no_type() {
    let err = rejects("person:\n  required: true\n");
    assert_eq!(err.message(), "The component has no type");
}

#[test]
fn test_component_type_is_not_a_string() {
    let err = rejects("person:\n  type: [map]\n");
    assert_eq!(err.message(), "The component type attribute is not a type name");
}

#[test]
fn test_component_type_unknown() {
    let err = rejects("greeting:\n  type: hello\n");
    assert_eq!(err.kind, SchemaErrorKind::UnknownType("hello".into()));
    assert_eq!(err.message(), "Unknown type: \"hello\"");
    assert_eq!(err.path, "");
}

#[test]
fn test_component_required_is_not_a_bool() {
    let err = rejects("flag:\n  type: bool\n  required: maybe\n");
    assert_eq!(err.message(), "The required attribute is not of type \"bool\"");
}

// ─── Primitive aliases ──────────────────────────────────────────────

#[test]
fn test_primitive_aliases() {
    let cases = [
        ("logical", "bool", PrimitiveKind::Bool),
        ("text", "string", PrimitiveKind::String),
        ("number", "int", PrimitiveKind::Int),
        ("ratio", "float", PrimitiveKind::Float),
    ];
    for (name, type_name, kind) in cases {
        let schema = compiles(&format!("{name}:\n  type: {type_name}\n"));
        assert_eq!(
            schema.descriptor(name).unwrap().primitive_kind(),
            Some(kind),
            "{name}"
        );
        assert_eq!(schema.len(), 5);
    }
}

#[test]
fn test_alias_of_alias_shares_descriptor() {
    let schema = compiles("text:\n  type: string\nname:\n  type: text\n");
    let registry = schema.registry();
    assert!(Arc::ptr_eq(registry.get("name").unwrap(), registry.get("string").unwrap()));
    assert!(Arc::ptr_eq(registry.get("text").unwrap(), registry.get("string").unwrap()));
    assert_eq!(schema.len(), 6);
}

// ─── Map bodies ─────────────────────────────────────────────────────

#[test]
fn test_map_has_no_items_component() {
    let err = rejects("person:\n  type: map\n");
    assert_eq!(err.message(), "No component definitions found");
}

#[test]
fn test_map_has_none_items_component() {
    let err = rejects("person:\n  type: map\n  items:\n");
    assert_eq!(err.message(), "No component definitions found");
}

#[test]
fn test_map_items_component_is_not_a_list() {
    let err = rejects("person:\n  type: map\n  items: name\n");
    assert_eq!(
        err.message(),
        "Component items definition list is not of type \"list\""
    );
}

#[test]
fn test_map_has_empty_items_component() {
    let err = rejects("person:\n  type: map\n  items: []\n");
    assert_eq!(err.message(), "No component definitions found");
}

#[test]
fn test_map_item_is_none() {
    let err = rejects("person:\n  type: map\n  items:\n    - ~\n");
    assert_eq!(err.message(), "Component is None");
}

#[test]
fn test_map_item_is_not_a_map() {
    let err = rejects("person:\n  type: map\n  items:\n    - name\n");
    assert_eq!(err.message(), "The component definition is not of type \"map\"");
}

#[test]
fn test_map_item_is_empty() {
    let err = rejects("person:\n  type: map\n  items:\n    - {}\n");
    assert_eq!(err.message(), "Component is empty");
}

#[test]
fn test_map_item_has_no_definition() {
    let err = rejects("person:\n  type: map\n  items:\n    - name:\n");
    assert_eq!(err.message(), "The component has no definition");
    assert_eq!(err.path, "person");
}

#[test]
fn test_map_item_has_no_type() {
    let err = rejects("person:\n  type: map\n  items:\n    - name: {required: false}\n");
    assert_eq!(err.message(), "The component has no type");
    assert_eq!(err.path, "person");
}

#[test]
fn test_map_item_has_unknown_type() {
    let err = rejects("person:\n  type: map\n  items:\n    - name: {type: text}\n");
    assert_eq!(err.message(), "Unknown type: \"text\"");
    assert_eq!(err.path, "person");
}

#[test]
fn test_map_item_required_is_not_a_bool() {
    let err = rejects("person:\n  type: map\n  items:\n    - name: {type: string, required: 1}\n");
    assert_eq!(err.message(), "The required attribute is not of type \"bool\"");
}

#[test]
fn test_simple_map_type() {
    let schema = compiles(
        "person:\n  type: map\n  items:\n    - name: {type: string}\n    - age: {type: int}\n",
    );
    let person = schema.descriptor("person").unwrap();
    let map = person.as_map().unwrap();
    assert_eq!(map.items().len(), 2);
    assert_eq!(map.item("age").unwrap().item_type, "int");
    assert_eq!(schema.len(), 5);
}

#[test]
fn test_alias_map_type() {
    let schema = compiles(
        "person:\n  type: map\n  items:\n    - name: {type: string}\nhuman:\n  type: person\n",
    );
    let registry = schema.registry();
    assert!(registry.get("human").unwrap().is_map());
    assert!(Arc::ptr_eq(registry.get("human").unwrap(), registry.get("person").unwrap()));
    assert_eq!(schema.len(), 6);
}

#[test]
fn test_alias_declared_before_target() {
    let schema = compiles(
        "human:\n  type: person\nperson:\n  type: map\n  items:\n    - name: {type: string}\n",
    );
    let registry = schema.registry();
    assert!(Arc::ptr_eq(registry.get("human").unwrap(), registry.get("person").unwrap()));
    assert_eq!(schema.len(), 6);
}

#[test]
fn test_map_item_has_map_type() {
    let schema = compiles(
        r#"
person:
  type: map
  items:
    - name:
        type: map
        items:
          - first: {type: string}
          - last: {type: string}
"#,
    );
    assert!(schema.descriptor("person").unwrap().is_map());
    assert!(schema.descriptor("person.name").unwrap().is_map());
    let person = schema.descriptor("person").unwrap();
    assert_eq!(
        person.as_map().unwrap().item("name").unwrap().item_type,
        "person.name"
    );
    assert_eq!(schema.len(), 6);
}

#[test]
fn test_map_contains_unknown_type() {
    let err = rejects("person:\n  type: map\n  items:\n    - car: {type: vehicle}\n");
    assert_eq!(err.kind, SchemaErrorKind::UnknownType("vehicle".into()));
}

#[test]
fn test_deep_map() {
    let schema = compiles(
        r#"
person:
  type: map
  items:
    - name:
        type: map
        items:
          - hello:
              type: map
              items:
                - world: {type: string}
"#,
    );
    assert!(schema.descriptor("person").unwrap().is_map());
    assert!(schema.descriptor("person.name").unwrap().is_map());
    assert!(schema.descriptor("person.name.hello").unwrap().is_map());
    assert_eq!(schema.len(), 7);
}

#[test]
fn test_deep_map_error_path() {
    let err = rejects(
        r#"
person:
  type: map
  items:
    - name:
        type: map
        items:
          - hello: {type: nothing}
"#,
    );
    assert_eq!(err.path, "person.name");
    assert_eq!(err.message(), "Unknown type: \"nothing\"");
}

#[test]
fn test_nested_maps_with_same_local_name_are_distinct() {
    let schema = compiles(
        r#"
person:
  type: map
  items:
    - name:
        type: map
        items:
          - first: {type: string}
company:
  type: map
  items:
    - name:
        type: map
        items:
          - legal: {type: string}
"#,
    );
    let person_name = schema.descriptor("person.name").unwrap();
    let company_name = schema.descriptor("company.name").unwrap();
    assert!(!Arc::ptr_eq(person_name, company_name));
    assert!(person_name.as_map().unwrap().item("first").is_some());
    assert!(company_name.as_map().unwrap().item("legal").is_some());
}

#[test]
fn test_map_item_has_predefined_type() {
    let schema = compiles(
        r#"
person:
  type: map
  items:
    - pet: {type: animal}
animal:
  type: map
  items:
    - species: {type: string}
"#,
    );
    assert!(schema.descriptor("person").unwrap().is_map());
    assert!(schema.descriptor("animal").unwrap().is_map());
    let person = schema.descriptor("person").unwrap();
    assert_eq!(person.as_map().unwrap().item("pet").unwrap().item_type, "animal");
    assert_eq!(schema.len(), 6);
}

#[test]
fn test_map_is_recursive() {
    let schema = compiles(
        r#"
node:
  type: map
  items:
    - value: {type: int}
    - next: {type: node, required: false}
"#,
    );
    let node = schema.descriptor("node").unwrap();
    let next = node.as_map().unwrap().item("next").unwrap();
    assert_eq!(next.item_type, "node");
    assert!(!next.required);
    assert_eq!(schema.len(), 5);
}

#[test]
fn test_mutually_recursive_maps() {
    let schema = compiles(
        r#"
a:
  type: map
  items:
    - b: {type: b, required: false}
b:
  type: map
  items:
    - a: {type: a, required: false}
"#,
    );
    assert!(schema.descriptor("a").unwrap().is_map());
    assert!(schema.descriptor("b").unwrap().is_map());
    assert_eq!(schema.len(), 6);
}

#[test]
fn test_duplicate_item_names() {
    let err = rejects(
        "person:\n  type: map\n  items:\n    - name: {type: string}\n    - name: {type: int}\n",
    );
    assert_eq!(err.kind, SchemaErrorKind::DuplicateItem("name".into()));
}

// ─── List bodies ────────────────────────────────────────────────────

#[test]
fn test_list_has_no_item_types_component() {
    let err = rejects("sequence:\n  type: list\n");
    assert_eq!(err.message(), "The component has no \"item_types\" list");
}

#[test]
fn test_list_has_none_item_types_component() {
    let err = rejects("sequence:\n  type: list\n  item_types:\n");
    assert_eq!(err.message(), "The component has no \"item_types\" list");
}

#[test]
fn test_list_item_types_component_is_not_a_list() {
    let err = rejects("sequence:\n  type: list\n  item_types: int\n");
    assert_eq!(err.message(), "The item types definition is not of type \"list\"");
}

#[test]
fn test_list_item_types_component_is_empty_list() {
    let err = rejects("sequence:\n  type: list\n  item_types: []\n");
    assert_eq!(err.message(), "The component has empty \"item_types\" list");
}

#[test]
fn test_list_item_type_is_not_a_name() {
    let err = rejects("sequence:\n  type: list\n  item_types: [[int]]\n");
    assert_eq!(err.kind, SchemaErrorKind::ItemTypeNotName);
}

#[test]
fn test_simple_list() {
    let schema = compiles("sequence:\n  type: list\n  item_types: [int]\n");
    let list = schema.descriptor("sequence").unwrap();
    let list = list.as_list().unwrap();
    assert_eq!(list.item_types(), ["int".to_string()]);
    assert_eq!(list.min(), None);
    assert_eq!(list.max(), None);
    assert_eq!(schema.len(), 5);
}

#[test]
fn test_multitype_list() {
    let schema = compiles("sequence:\n  type: list\n  item_types: [int, string, float]\n");
    let list = schema.descriptor("sequence").unwrap();
    assert_eq!(list.as_list().unwrap().item_types().len(), 3);
    assert_eq!(schema.len(), 5);
}

#[test]
fn test_list_bounds() {
    let bound_errors = [
        ("min: ten", SchemaErrorKind::BoundNotInt(Bound::Min)),
        ("min: -1", SchemaErrorKind::BoundNegative(Bound::Min)),
        ("max: 2.5", SchemaErrorKind::BoundNotInt(Bound::Max)),
        ("max: -3", SchemaErrorKind::BoundNegative(Bound::Max)),
        ("min: 3\n  max: 2", SchemaErrorKind::MinGreaterThanMax),
    ];
    for (bounds, expected) in bound_errors {
        let err = rejects(&format!(
            "sequence:\n  type: list\n  item_types: [int]\n  {bounds}\n"
        ));
        assert_eq!(err.kind, expected, "{bounds}");
    }

    let err = rejects("sequence:\n  type: list\n  item_types: [int]\n  min: 3\n  max: 2\n");
    assert_eq!(err.message(), "The min attribute is greatr than max");
}

#[test]
fn test_list_min_max() {
    let schema = compiles("sequence:\n  type: list\n  item_types: [int]\n  min: 1\n  max: 3\n");
    let list = schema.descriptor("sequence").unwrap();
    let list = list.as_list().unwrap();
    assert_eq!(list.min(), Some(1));
    assert_eq!(list.max(), Some(3));

    let schema = compiles("sequence:\n  type: list\n  item_types: [int]\n  min: 2\n  max: 2\n");
    assert!(schema.descriptor("sequence").unwrap().is_list());
}

#[test]
fn test_list_contains_unknown_type() {
    let err = rejects("sequence:\n  type: list\n  item_types: [person]\n");
    assert_eq!(err.message(), "Unknown type: \"person\"");
    assert_eq!(err.path, "");
}

#[test]
fn test_nested_list_unknown_type_path() {
    let err = rejects(
        "person:\n  type: map\n  items:\n    - pets: {type: list, item_types: [dog]}\n",
    );
    assert_eq!(err.message(), "Unknown type: \"dog\"");
    assert_eq!(err.path, "person");
}

#[test]
fn test_list_contains_predefined_type() {
    let schema = compiles(
        r#"
sequence:
  type: list
  item_types: [person]
person:
  type: map
  items:
    - name: {type: string}
"#,
    );
    assert!(schema.descriptor("sequence").unwrap().is_list());
    assert!(schema.descriptor("person").unwrap().is_map());
    assert_eq!(schema.len(), 6);
}

// ─── Whole-schema shapes ────────────────────────────────────────────

#[test]
fn test_complex() {
    let schema = compiles(COMPLEX);
    let maps = [
        "dog",
        "person",
        "node",
        "book",
        "outermap",
        "outermap.innermap",
        "student",
        "school",
    ];
    for name in maps {
        assert!(schema.descriptor(name).unwrap().is_map(), "{name}");
    }
    let lists = ["library", "person.pets", "school.students", "student.schools"];
    for name in lists {
        assert!(schema.descriptor(name).unwrap().is_list(), "{name}");
    }
    assert_eq!(
        schema.descriptor("text").unwrap().primitive_kind(),
        Some(PrimitiveKind::String)
    );
    assert_eq!(
        schema.descriptor("number").unwrap().primitive_kind(),
        Some(PrimitiveKind::Int)
    );
    assert_eq!(
        schema.descriptor("logical").unwrap().primitive_kind(),
        Some(PrimitiveKind::Bool)
    );
    assert_eq!(schema.len(), 19);
}

#[test]
fn test_complex2() {
    let schema = compiles(
        r#"
book:
  type: map
  items:
    - title: {type: string}
city:
  type: map
  items:
    - name: {type: string}
    - library:
        type: map
        items:
          - books: {type: list, item_types: [book], max: 1000}
"#,
    );
    assert!(schema.descriptor("book").unwrap().is_map());
    assert!(schema.descriptor("city").unwrap().is_map());
    assert!(schema.descriptor("city.library").unwrap().is_map());
    assert!(schema.descriptor("city.library.books").unwrap().is_list());
    assert_eq!(schema.len(), 8);
}

#[test]
fn test_finished_graph_has_no_placeholders() {
    let schema = compiles(COMPLEX);
    assert!(schema.registry().iter().all(|(_, d)| !d.is_incomplete()));
}

#[test]
fn test_compile_is_deterministic() {
    let a = compiles(COMPLEX);
    let b = compiles(COMPLEX);
    assert_eq!(a.type_names(), b.type_names());
    for name in a.type_names() {
        assert_eq!(
            a.descriptor(name).unwrap().to_string(),
            b.descriptor(name).unwrap().to_string()
        );
    }
}

#[test]
fn test_descriptor_rendering() {
    let schema = compiles(COMPLEX);
    assert_eq!(
        schema.descriptor("node").unwrap().to_string(),
        "MapDescriptor(MapItem(name=value,type=number,required=true),\
         MapItem(name=next,type=node,required=false))"
    );
    assert_eq!(
        schema.descriptor("person.pets").unwrap().to_string(),
        "ListDescriptor(dog)"
    );
    assert_eq!(schema.descriptor("text").unwrap().to_string(), "StringDescriptor");
}
