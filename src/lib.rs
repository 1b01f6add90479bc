//! # Typist
//!
//! Runtime record schemas built from reusable, type-tagged field validators.
//!
//! ## Overview
//!
//! A [`Factor`] validates one field's value and carries a semantic type tag.
//! Factors are combined into a [`TypeModule`], which can create, validate,
//! parse, stringify and describe records of that shape. Validation reports
//! every failing field in one pass rather than stopping at the first.
//!
//! ## Core Types
//!
//! - [`Factor`]: a single-field validator with a tag and an optional flag
//! - [`FactorRegistry`]: tags raw validators and factories by name
//! - [`optional`]: makes any factor accept an absent value
//! - [`TypeModule`]: create / validate / parse / stringify / describe
//! - [`ValidationErrors`]: field name to [`Rejection`], failing fields only
//! - [`TypeDescriptor`]: the portable `properties` / `optionalProperties` document
//!
//! ## Example
//!
//! ```rust
//! use typist::{factors, optional, Factor, TypeModule};
//! use serde_json::json;
//!
//! let country = Factor::predicate("string", |v| {
//!     v.as_str()
//!         .is_some_and(|s| ["ENGLAND", "WALES", "SCOTLAND"].contains(&s.to_uppercase().as_str()))
//! });
//!
//! let fruit = TypeModule::builder()
//!     .field("name", factors::string())
//!     .field("countryOfOrigin", country)
//!     .field("tree", optional(&factors::string()).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let apple = json!({"name": "apple", "countryOfOrigin": "spain"});
//! let errors = fruit
//!     .create(apple.as_object().unwrap().clone())
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(errors.to_value(), json!({"countryOfOrigin": "invalid"}));
//! ```

pub mod error;
pub mod factor;
pub mod interop;
pub mod registry;
pub mod schema;
pub mod validation;

pub use error::{Rejection, ValidationErrors};
pub use factor::builtin as factors;
pub use factor::{check, optional, Check, Factor, FactorError, Factory, FactoryArgs};
pub use interop::ToJsonSchema;
pub use registry::{FactorRegistry, Registered, RegistryError, Validator};
pub use schema::{
    BuildError, ModuleBuilder, ParseError, PropertyType, RecordError, Schema, SchemaBuilder,
    TypeDescriptor, TypeModule, TypedModule,
};
pub use validation::{validate_record, Outcome, Record};
