//! Schemas and the modules built over them.
//!
//! A [`Schema`] is an ordered, immutable mapping from field name to
//! [`Factor`]. A [`TypeModule`] wraps a schema and exposes `create`,
//! `validate`, `parse`, `stringify` and `describe` over records of that shape.
//!
//! # Example
//!
//! ```rust
//! use typist::{factors, optional, TypeModule};
//! use serde_json::json;
//!
//! let fruit = TypeModule::builder()
//!     .field("name", factors::string())
//!     .field("colour", factors::string())
//!     .field("tree", optional(&factors::string()).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let text = r#"{"name": "apple", "colour": "green"}"#;
//! let result = fruit.parse(text).unwrap();
//! assert!(result.is_success());
//! ```

mod descriptor;
mod module;
mod typed;

use indexmap::IndexMap;

use crate::factor::Factor;

pub use descriptor::{PropertyType, TypeDescriptor};
pub use module::{ModuleBuilder, ParseError, TypeModule};
pub use typed::{RecordError, TypedModule};

/// An ordered mapping from field name to factor.
///
/// Built once through [`Schema::builder`] and immutable afterwards. Field
/// names are unique and non-empty; iteration follows definition order.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: IndexMap<String, Factor>,
}

impl Schema {
    /// Starts building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns the factor for `name`.
    pub fn get(&self, name: &str) -> Option<&Factor> {
        self.fields.get(name)
    }

    /// Returns true if `name` is a field of this schema.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `(name, factor)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Factor)> {
        self.fields.iter()
    }

    /// Returns the field names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the names of fields whose factor is optional.
    pub fn optional_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, f)| f.is_optional())
            .map(|(name, _)| name.as_str())
    }

    /// Returns the names of fields whose factor is required.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, f)| !f.is_optional())
            .map(|(name, _)| name.as_str())
    }

    /// Emits the portable type description of this schema.
    pub fn describe(&self) -> TypeDescriptor {
        TypeDescriptor::from_schema(self)
    }
}

/// Collects fields for a [`Schema`].
///
/// Duplicate and empty field names are reported by [`build`](Self::build)
/// rather than silently resolved.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, Factor)>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn field(mut self, name: impl Into<String>, factor: Factor) -> Self {
        self.fields.push((name.into(), factor));
        self
    }

    /// Adds several fields in order.
    pub fn fields<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Factor)>,
        N: Into<String>,
    {
        self.fields
            .extend(fields.into_iter().map(|(name, factor)| (name.into(), factor)));
        self
    }

    /// Builds the schema.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::DuplicateField` for the first repeated name and
    /// `BuildError::EmptyFieldName` for an empty one.
    pub fn build(self) -> Result<Schema, BuildError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());

        for (name, factor) in self.fields {
            if name.is_empty() {
                return Err(BuildError::EmptyFieldName);
            }
            if fields.contains_key(&name) {
                return Err(BuildError::DuplicateField(name));
            }
            fields.insert(name, factor);
        }

        Ok(Schema { fields })
    }
}

/// Errors raised while building a schema.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// Two factors were supplied under the same field name.
    #[error("field '{0}' is defined more than once")]
    DuplicateField(String),

    /// A field was given an empty name.
    #[error("field name must not be empty")]
    EmptyFieldName,
}
