//! The schema module: create, validate, parse, stringify and describe.

use std::sync::Arc;

use rayon::prelude::*;
use serde_json::Value;

use super::typed::TypedModule;
use super::{BuildError, Schema, SchemaBuilder, TypeDescriptor};
use crate::error::ValidationErrors;
use crate::factor::Factor;
use crate::validation::{validate_record, value_type_name, Outcome, Record};

/// Operations over records shaped by one [`Schema`].
///
/// Domain failures are never faults: `create`, `validate` and `stringify`
/// return an [`Outcome`] whose failure side lists every rejected field. Only
/// `parse` has a fault channel, for text that is not a JSON object at all.
///
/// A module is cheap to clone and safe to share across threads; clones share
/// the same schema.
///
/// # Example
///
/// ```rust
/// use typist::{factors, TypeModule};
/// use serde_json::json;
///
/// let point = TypeModule::builder()
///     .field("x", factors::int32())
///     .field("y", factors::int32())
///     .build()
///     .unwrap();
///
/// let record = json!({"x": 1, "y": 2}).as_object().unwrap().clone();
/// assert!(point.validate(&record).is_success());
///
/// let text = point.stringify(&record).into_result().unwrap();
/// assert_eq!(text, r#"{"x":1,"y":2}"#);
///
/// let bad = json!({"x": 1.5}).as_object().unwrap().clone();
/// let errors = point.validate(&bad).into_result().unwrap_err();
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TypeModule {
    schema: Arc<Schema>,
    pretty: bool,
}

impl TypeModule {
    /// Starts building a module.
    pub fn builder() -> ModuleBuilder {
        ModuleBuilder::new()
    }

    /// Wraps an already built schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            pretty: false,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates `record` and hands it back unchanged on success.
    ///
    /// No normalization happens: the accepted record is the input record.
    pub fn create(&self, record: Record) -> Outcome<Record, ValidationErrors> {
        self.validate(&record).map(|()| record)
    }

    /// Runs every field's factor and reports all failing fields at once.
    ///
    /// Absent fields are handed to their factor as absent, which only optional
    /// factors accept. Fields not in the schema are ignored.
    pub fn validate(&self, record: &Record) -> Outcome<(), ValidationErrors> {
        validate_record(&self.schema, record)
    }

    /// Validates many records in parallel.
    ///
    /// Results are in input order.
    pub fn validate_all(&self, records: &[Record]) -> Vec<Outcome<(), ValidationErrors>> {
        records.par_iter().map(|record| self.validate(record)).collect()
    }

    /// Decodes `text` as a JSON object and [`create`](Self::create)s it.
    ///
    /// # Errors
    ///
    /// Text that is not JSON, or JSON that is not an object, is a fault and is
    /// returned as `Err(ParseError)` rather than folded into the outcome.
    pub fn parse(&self, text: &str) -> Result<Outcome<Record, ValidationErrors>, ParseError> {
        let document: Value = serde_json::from_str(text).map_err(|e| {
            tracing::debug!(error = %e, "malformed document");
            ParseError::Malformed(e)
        })?;

        match document {
            Value::Object(record) => Ok(self.create(record)),
            other => {
                let got = value_type_name(&other);
                tracing::debug!(got, "document is not an object");
                Err(ParseError::NotAnObject { got })
            }
        }
    }

    /// Validates `record` and, only if it is accepted, renders it as JSON.
    pub fn stringify(&self, record: &Record) -> Outcome<String, ValidationErrors> {
        self.validate(record).map(|()| {
            let document = Value::Object(record.clone());
            if self.pretty {
                format!("{:#}", document)
            } else {
                document.to_string()
            }
        })
    }

    /// Emits the portable type description of the schema.
    pub fn describe(&self) -> TypeDescriptor {
        self.schema.describe()
    }

    /// Returns a view of this module over a declared record type.
    pub fn typed<R>(&self) -> TypedModule<R> {
        TypedModule::new(self.clone())
    }
}

/// Builds a [`TypeModule`].
#[derive(Debug, Default)]
pub struct ModuleBuilder {
    schema: SchemaBuilder,
    pretty: bool,
}

impl ModuleBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    pub fn field(mut self, name: impl Into<String>, factor: Factor) -> Self {
        self.schema = self.schema.field(name, factor);
        self
    }

    /// Adds several fields in order.
    pub fn fields<I, N>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Factor)>,
        N: Into<String>,
    {
        self.schema = self.schema.fields(fields);
        self
    }

    /// Makes `stringify` emit indented JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Builds the module.
    ///
    /// # Errors
    ///
    /// Fails fast on duplicate or empty field names.
    pub fn build(self) -> Result<TypeModule, BuildError> {
        let schema = self.schema.build()?;
        tracing::debug!(
            fields = schema.len(),
            optional = schema.optional_fields().count(),
            "built type module"
        );
        Ok(TypeModule {
            schema: Arc::new(schema),
            pretty: self.pretty,
        })
    }
}

/// Faults raised by [`TypeModule::parse`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The text is not valid JSON.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The text is valid JSON but not an object.
    #[error("expected a JSON object, got {got}")]
    NotAnObject {
        /// JSON type of the document.
        got: &'static str,
    },
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<TypeModule>();
    assert_sync::<TypeModule>();
};
