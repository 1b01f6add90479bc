//! The validation pipeline.
//!
//! [`validate_record`] runs every factor of a [`Schema`] against a [`Record`]
//! and gathers one [`Rejection`] per failing field. It never stops at the first
//! bad field: a rejected record always reports its complete set of failures.
//!
//! [`Rejection`]: crate::Rejection

use serde_json::{Map, Value};
use stillwater::prelude::*;
use stillwater::Validation;

use crate::error::{Rejection, ValidationErrors};
use crate::schema::Schema;

/// Accept/reject result used by every validation-domain operation.
///
/// `Validation::Success` is acceptance, `Validation::Failure` carries the
/// reason. A single factor rejects with a [`Rejection`]; a whole record
/// rejects with [`ValidationErrors`].
pub type Outcome<T, E = Rejection> = Validation<T, E>;

/// A record: field name to field value. Absent fields are missing keys.
pub type Record = Map<String, Value>;

/// Validates a record against every field of a schema.
///
/// Fields present in `record` but not in `schema` are ignored.
pub fn validate_record(schema: &Schema, record: &Record) -> Outcome<(), ValidationErrors> {
    let mut errors: Option<ValidationErrors> = None;

    for (name, factor) in schema.iter() {
        if let Validation::Failure(rejection) = factor.apply(record.get(name)) {
            tracing::trace!(
                field = %name,
                tag = factor.tag(),
                code = %rejection.code,
                "field rejected"
            );
            let failed = ValidationErrors::single(name, rejection);
            errors = Some(match errors {
                Some(acc) => acc.combine(failed),
                None => failed,
            });
        }
    }

    match errors {
        None => Validation::Success(()),
        Some(errors) => Validation::Failure(errors),
    }
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::{builtin, optional};
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn schema() -> Schema {
        Schema::builder()
            .field("name", builtin::string())
            .field("age", builtin::uint8())
            .field("nickname", optional(&builtin::string()).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_record() {
        let result = validate_record(&schema(), &record(json!({"name": "Ann", "age": 30})));
        assert!(result.is_success());
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let result = validate_record(
            &schema(),
            &record(json!({"name": 1, "age": 300, "nickname": false})),
        );
        let errors = result.into_result().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "age", "nickname"]);
        assert_eq!(errors.get("age").unwrap().code, "out_of_range");
    }

    #[test]
    fn test_missing_required_field() {
        let result = validate_record(&schema(), &record(json!({"name": "Ann"})));
        let errors = result.into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("age").unwrap().code, "required");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let result = validate_record(
            &schema(),
            &record(json!({"name": "Ann", "age": 30, "shoe_size": "huge"})),
        );
        assert!(result.is_success());
    }

    #[test]
    fn test_empty_schema_accepts_anything() {
        let empty = Schema::builder().build().unwrap();
        assert!(validate_record(&empty, &record(json!({"a": 1}))).is_success());
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(1)), "number");
        assert_eq!(value_type_name(&json!("s")), "string");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }
}
