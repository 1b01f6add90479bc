//! Portable type descriptions of schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::Schema;

/// JSON Type Definition names for the base tags this crate ships.
const JTD_TYPES: [&str; 11] = [
    "boolean", "string", "timestamp", "float32", "float64", "int8", "uint8", "int16", "uint16",
    "int32", "uint32",
];

/// The semantic type of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    /// The factor's tag, e.g. `string` or `string(email)`.
    #[serde(rename = "type")]
    pub tag: String,
}

impl PropertyType {
    /// Creates a property type from a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Returns the outermost tag, before any composition suffix.
    ///
    /// `string(country)(home)` has base tag `string`.
    pub fn base_tag(&self) -> &str {
        self.tag
            .split_once('(')
            .map_or(self.tag.as_str(), |(base, _)| base)
    }
}

/// Required and optional fields of a schema with their type tags.
///
/// Serializes as
/// `{"properties": {name: {"type": tag}}, "optionalProperties": {...}}`.
/// Equality ignores field order.
///
/// ```rust
/// use typist::{factors, optional, TypeModule};
/// use serde_json::json;
///
/// let module = TypeModule::builder()
///     .field("name", factors::string())
///     .field("tree", optional(&factors::string()).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     module.describe().to_value(),
///     json!({
///         "properties": {"name": {"type": "string"}},
///         "optionalProperties": {"tree": {"type": "string"}}
///     })
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Required fields.
    #[serde(default)]
    pub properties: IndexMap<String, PropertyType>,
    /// Optional fields, tagged with the inner factor's tag.
    #[serde(default)]
    pub optional_properties: IndexMap<String, PropertyType>,
}

impl TypeDescriptor {
    /// Describes a schema, one entry per field, in definition order.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut descriptor = Self::default();

        for (name, factor) in schema.iter() {
            let property = PropertyType::new(factor.tag());
            if factor.is_optional() {
                descriptor.optional_properties.insert(name.clone(), property);
            } else {
                descriptor.properties.insert(name.clone(), property);
            }
        }

        descriptor
    }

    /// Returns the property type for `name` from either bucket.
    pub fn property(&self, name: &str) -> Option<&PropertyType> {
        self.properties
            .get(name)
            .or_else(|| self.optional_properties.get(name))
    }

    /// Returns true if `name` is an optional property.
    pub fn is_optional(&self, name: &str) -> bool {
        self.optional_properties.contains_key(name)
    }

    /// Renders the descriptor as a JSON value.
    pub fn to_value(&self) -> Value {
        json!({
            "properties": bucket(&self.properties, |p| json!({"type": p.tag})),
            "optionalProperties": bucket(&self.optional_properties, |p| json!({"type": p.tag})),
        })
    }

    /// Renders the descriptor as an RFC 8927 JSON Type Definition.
    ///
    /// Tags whose base is a JTD type map to that type. Any other tag becomes
    /// the empty form, keeping the tag under `metadata.tag`. Extra fields are
    /// tolerated, so `additionalProperties` is `true`.
    pub fn to_jtd(&self) -> Value {
        json!({
            "properties": bucket(&self.properties, jtd_form),
            "optionalProperties": bucket(&self.optional_properties, jtd_form),
            "additionalProperties": true,
        })
    }
}

fn bucket(
    properties: &IndexMap<String, PropertyType>,
    render: impl Fn(&PropertyType) -> Value,
) -> Value {
    let map: Map<String, Value> = properties
        .iter()
        .map(|(name, property)| (name.clone(), render(property)))
        .collect();
    Value::Object(map)
}

fn jtd_form(property: &PropertyType) -> Value {
    let base = property.base_tag();
    if JTD_TYPES.contains(&base) {
        json!({"type": base})
    } else {
        json!({"metadata": {"tag": property.tag}})
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factor::{builtin, optional};

    fn describe() -> TypeDescriptor {
        Schema::builder()
            .field("name", builtin::string())
            .field("born", builtin::timestamp())
            .field("country", builtin::string().retag("country"))
            .field("size", builtin::number())
            .field("tree", optional(&builtin::string()).unwrap())
            .build()
            .unwrap()
            .describe()
    }

    #[test]
    fn test_buckets() {
        let descriptor = describe();
        assert_eq!(
            descriptor.properties.keys().collect::<Vec<_>>(),
            vec!["name", "born", "country", "size"]
        );
        assert_eq!(descriptor.optional_properties.keys().collect::<Vec<_>>(), vec!["tree"]);
        assert!(descriptor.is_optional("tree"));
        assert!(!descriptor.is_optional("name"));
        assert_eq!(descriptor.property("tree"), Some(&PropertyType::new("string")));
        assert_eq!(descriptor.property("missing"), None);
    }

    #[test]
    fn test_base_tag() {
        assert_eq!(PropertyType::new("string").base_tag(), "string");
        assert_eq!(PropertyType::new("string(country)").base_tag(), "string");
        assert_eq!(PropertyType::new("string(a)(b)").base_tag(), "string");
    }

    #[test]
    fn test_serde_shape() {
        let value = serde_json::to_value(describe()).unwrap();
        assert_eq!(value, describe().to_value());
        assert_eq!(value["optionalProperties"]["tree"]["type"], "string");

        let back: TypeDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back, describe());
    }

    #[test]
    fn test_missing_buckets_default_to_empty() {
        let required_only: TypeDescriptor =
            serde_json::from_value(json!({"properties": {"name": {"type": "string"}}})).unwrap();
        assert_eq!(required_only.properties.len(), 1);
        assert!(required_only.optional_properties.is_empty());

        let optional_only: TypeDescriptor =
            serde_json::from_value(json!({"optionalProperties": {"tree": {"type": "string"}}}))
                .unwrap();
        assert!(optional_only.properties.is_empty());
        assert!(optional_only.is_optional("tree"));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut reordered = TypeDescriptor::default();
        for name in ["size", "country", "born", "name"] {
            let property = describe().properties[name].clone();
            reordered.properties.insert(name.to_string(), property);
        }
        reordered
            .optional_properties
            .insert("tree".to_string(), PropertyType::new("string"));
        assert_eq!(reordered, describe());
    }

    #[test]
    fn test_jtd_rendering() {
        let jtd = describe().to_jtd();
        assert_eq!(jtd["properties"]["name"], json!({"type": "string"}));
        assert_eq!(jtd["properties"]["born"], json!({"type": "timestamp"}));
        assert_eq!(jtd["properties"]["country"], json!({"type": "string"}));
        assert_eq!(jtd["properties"]["size"], json!({"metadata": {"tag": "number"}}));
        assert_eq!(jtd["optionalProperties"]["tree"], json!({"type": "string"}));
        assert_eq!(jtd["additionalProperties"], json!(true));
    }
}
