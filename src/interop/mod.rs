//! Interoperability with other schema formats.
//!
//! [`TypeDescriptor`](crate::TypeDescriptor) is already JTD-shaped (see
//! [`TypeDescriptor::to_jtd`](crate::TypeDescriptor::to_jtd)); this module adds
//! JSON Schema export.

pub mod json_schema;

pub use json_schema::ToJsonSchema;
