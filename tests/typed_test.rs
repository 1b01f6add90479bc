//! Tests for typed modules over serde records.

use serde::{Deserialize, Serialize};
use typist::{factors, optional, FactorRegistry, RecordError, TypeModule, TypedModule, Validator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fruit {
    name: String,
    colour: String,
    country_of_origin: String,
    tree: Option<String>,
}

fn fruit_module() -> TypedModule<Fruit> {
    let registry = FactorRegistry::standard();
    registry
        .register_as(
            "country",
            Validator::predicate(|v| {
                v.as_str()
                    .is_some_and(|s| ["UK", "IRELAND", "ENGLAND"].contains(&s.to_uppercase().as_str()))
            }),
            "string",
        )
        .unwrap();

    TypeModule::builder()
        .field("name", factors::string())
        .field("colour", factors::string())
        .field("countryOfOrigin", registry.factor("country").unwrap())
        .field("tree", optional(&factors::string()).unwrap())
        .build()
        .unwrap()
        .typed()
}

fn apple(country: &str) -> Fruit {
    Fruit {
        name: "apple".to_string(),
        colour: "green".to_string(),
        country_of_origin: country.to_string(),
        tree: None,
    }
}

#[test]
fn test_create_accepts_and_returns_record() {
    let created = fruit_module()
        .create(apple("england"))
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(created, apple("england"));
}

#[test]
fn test_create_rejects_bad_country() {
    let errors = fruit_module()
        .create(apple("spain"))
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["countryOfOrigin"]);
}

#[test]
fn test_stringify_omits_absent_optional_field() {
    let text = fruit_module()
        .stringify(&apple("UK"))
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(
        text,
        r#"{"name":"apple","colour":"green","countryOfOrigin":"UK"}"#
    );
}

#[test]
fn test_parse_round_trip_with_tree() {
    let module = fruit_module();
    let fruit = Fruit {
        tree: Some("Bramley".to_string()),
        ..apple("Ireland")
    };

    let text = module.stringify(&fruit).unwrap().into_result().unwrap();
    let back = module.parse(&text).unwrap().into_result().unwrap();
    assert_eq!(back, fruit);
}

#[test]
fn test_parse_shape_fault() {
    // Passes every factor but `colour` cannot be decoded as a String.
    let module = TypeModule::builder()
        .field("name", factors::string())
        .build()
        .unwrap()
        .typed::<Fruit>();

    let result = module.parse(r#"{"name":"apple","colour":3}"#);
    assert!(matches!(result, Err(RecordError::Shape(_))));
}

#[test]
fn test_parse_malformed_text() {
    let result = fruit_module().parse("not json");
    assert!(matches!(result, Err(RecordError::Parse(_))));
}

#[test]
fn test_non_object_record_is_a_fault() {
    let module = TypeModule::builder()
        .field("name", factors::string())
        .build()
        .unwrap()
        .typed::<Vec<String>>();

    let result = module.validate(&vec!["apple".to_string()]);
    assert!(matches!(result, Err(RecordError::NotAnObject { got: "array" })));
}
