//! Error types for field rejections.
//!
//! Domain failures are values: a [`Rejection`] per field, gathered into
//! [`ValidationErrors`] for a whole record. Construction and parse faults live
//! next to the code that raises them.

mod rejection;

pub use rejection::{Rejection, ValidationErrors};
