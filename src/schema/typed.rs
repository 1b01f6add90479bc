//! Typed views of a module over a declared record type.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use stillwater::Validation;

use super::{ParseError, TypeModule};
use crate::error::ValidationErrors;
use crate::validation::{value_type_name, Outcome, Record};

/// A [`TypeModule`] bound to a Rust record type.
///
/// The record type declares the shape; the module's factors validate it. A
/// `None` in an optional field is treated as an absent field, so a
/// `#[derive(Serialize)]` struct with `Option` fields validates the same way
/// as the equivalent JSON object with those keys left out.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use typist::{factors, optional, TypeModule};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct Fruit {
///     name: String,
///     tree: Option<String>,
/// }
///
/// let fruit = TypeModule::builder()
///     .field("name", factors::string())
///     .field("tree", optional(&factors::string()).unwrap())
///     .build()
///     .unwrap()
///     .typed::<Fruit>();
///
/// let apple = Fruit { name: "apple".into(), tree: None };
/// let text = fruit.stringify(&apple).unwrap().into_result().unwrap();
/// assert_eq!(text, r#"{"name":"apple"}"#);
///
/// let back = fruit.parse(&text).unwrap().into_result().unwrap();
/// assert_eq!(back, apple);
/// ```
pub struct TypedModule<R> {
    module: TypeModule,
    _record: PhantomData<fn() -> R>,
}

impl<R> TypedModule<R> {
    pub(crate) fn new(module: TypeModule) -> Self {
        Self {
            module,
            _record: PhantomData,
        }
    }

    /// Returns the untyped module.
    pub fn module(&self) -> &TypeModule {
        &self.module
    }
}

impl<R> Clone for TypedModule<R> {
    fn clone(&self) -> Self {
        Self::new(self.module.clone())
    }
}

impl<R> TypedModule<R>
where
    R: Serialize + DeserializeOwned,
{
    /// Validates `record` and hands it back unchanged on success.
    pub fn create(&self, record: R) -> Result<Outcome<R, ValidationErrors>, RecordError> {
        let outcome = self.validate(&record)?;
        Ok(outcome.map(|()| record))
    }

    /// Validates `record` against every field.
    pub fn validate(&self, record: &R) -> Result<Outcome<(), ValidationErrors>, RecordError> {
        let fields = self.to_record(record)?;
        Ok(self.module.validate(&fields))
    }

    /// Parses, validates and decodes `text` into `R`.
    ///
    /// # Errors
    ///
    /// Malformed text is `RecordError::Parse`. A document accepted by the
    /// factors that still does not fit `R` is `RecordError::Shape`.
    pub fn parse(&self, text: &str) -> Result<Outcome<R, ValidationErrors>, RecordError> {
        match self.module.parse(text)? {
            Validation::Success(fields) => serde_json::from_value(Value::Object(fields))
                .map(Validation::Success)
                .map_err(RecordError::Shape),
            Validation::Failure(errors) => Ok(Validation::Failure(errors)),
        }
    }

    /// Validates `record` and renders it as JSON on success.
    pub fn stringify(&self, record: &R) -> Result<Outcome<String, ValidationErrors>, RecordError> {
        let fields = self.to_record(record)?;
        Ok(self.module.stringify(&fields))
    }

    /// Serializes `record`, dropping `null` optional fields.
    fn to_record(&self, record: &R) -> Result<Record, RecordError> {
        let mut fields = match serde_json::to_value(record).map_err(RecordError::Serialize)? {
            Value::Object(fields) => fields,
            other => {
                return Err(RecordError::NotAnObject {
                    got: value_type_name(&other),
                })
            }
        };

        let schema = self.module.schema();
        fields.retain(|name, value| {
            !(value.is_null() && schema.get(name).is_some_and(|f| f.is_optional()))
        });
        Ok(fields)
    }
}

/// Faults raised by [`TypedModule`] operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The record could not be serialized.
    #[error("record could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The record does not serialize to a JSON object.
    #[error("record must serialize to an object, got {got}")]
    NotAnObject {
        /// JSON type the record serialized to.
        got: &'static str,
    },

    /// The input text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Accepted fields did not fit the record type.
    #[error("accepted document does not fit the record type: {0}")]
    Shape(#[source] serde_json::Error),
}
