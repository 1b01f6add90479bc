//! JSON Schema interoperability.
//!
//! This module renders type descriptors as JSON Schema (draft 2020-12)
//! objects, so schema registries that only speak JSON Schema can consume them.

use serde_json::{json, Map, Value};

use crate::schema::{PropertyType, TypeDescriptor, TypeModule};

/// Draft identifier placed in `$schema`.
pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

/// Trait for converting descriptions to JSON Schema format.
pub trait ToJsonSchema {
    /// Converts this value to a JSON Schema document.
    fn to_json_schema(&self) -> Value;
}

impl ToJsonSchema for TypeDescriptor {
    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for (name, property) in self.properties.iter().chain(&self.optional_properties) {
            properties.insert(name.clone(), property_schema(property));
        }

        let required: Vec<&str> = self.properties.keys().map(String::as_str).collect();

        json!({
            "$schema": DRAFT_2020_12,
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": true,
        })
    }
}

impl ToJsonSchema for TypeModule {
    fn to_json_schema(&self) -> Value {
        self.describe().to_json_schema()
    }
}

/// Maps a property's base tag to a JSON Schema fragment.
///
/// Unknown tags accept anything and keep the tag in `$comment`.
pub fn property_schema(property: &PropertyType) -> Value {
    match property.base_tag() {
        "boolean" => json!({"type": "boolean"}),
        "string" => json!({"type": "string"}),
        "timestamp" => json!({"type": "string", "format": "date-time"}),
        "number" | "float64" => json!({"type": "number"}),
        "float32" => json!({
            "type": "number",
            "minimum": -f64::from(f32::MAX),
            "maximum": f64::from(f32::MAX),
        }),
        "int" => json!({"type": "integer"}),
        "int8" => integer(i8::MIN.into(), i8::MAX.into()),
        "uint8" => integer(u8::MIN.into(), u8::MAX.into()),
        "int16" => integer(i16::MIN.into(), i16::MAX.into()),
        "uint16" => integer(u16::MIN.into(), u16::MAX.into()),
        "int32" => integer(i32::MIN.into(), i32::MAX.into()),
        "uint32" => integer(u32::MIN.into(), u32::MAX.into()),
        _ => json!({"$comment": format!("typist tag: {}", property.tag)}),
    }
}

fn integer(minimum: i64, maximum: i64) -> Value {
    json!({"type": "integer", "minimum": minimum, "maximum": maximum})
}
