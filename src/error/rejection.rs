//! Field rejection types.
//!
//! This module provides [`Rejection`] for a single field that failed its factor
//! and [`ValidationErrors`] for the per-field map a whole record produces.

use std::error::Error;
use std::fmt::{self, Display};
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::prelude::*;

/// Why a factor refused a value.
///
/// The `message` is `"invalid"` unless a factor chooses otherwise; the richer
/// detail lives in the machine-readable `code`, the optional `expected` / `got`
/// descriptions and an optional underlying `cause`.
///
/// # Example
///
/// ```rust
/// use typist::Rejection;
///
/// let rejection = Rejection::invalid()
///     .with_code("invalid_type")
///     .with_expected("string")
///     .with_got("number");
///
/// assert_eq!(rejection.message, "invalid");
/// assert_eq!(rejection.code, "invalid_type");
/// ```
#[derive(Debug, Clone)]
pub struct Rejection {
    /// Human-readable reason, `"invalid"` by default.
    pub message: String,
    /// Machine-readable reason (e.g. `required`, `out_of_range`).
    pub code: String,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// The offending value, formatted.
    pub got: Option<String>,
    cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl Rejection {
    /// Message carried by every rejection unless overridden.
    pub const INVALID: &'static str = "invalid";

    /// Creates the plain `"invalid"` rejection.
    pub fn invalid() -> Self {
        Self::new(Self::INVALID)
    }

    /// Creates a rejection with a custom message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "invalid".to_string(),
            expected: None,
            got: None,
            cause: None,
        }
    }

    /// Rejection used when a non-optional field is absent.
    pub fn required() -> Self {
        Self::invalid().with_code("required").with_expected("value")
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the "expected" description and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Sets the "got" description and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Attaches the underlying error that caused this rejection.
    pub fn because<E>(mut self, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Returns the underlying error, if one was attached.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

// The cause is context only; two rejections are equal when they say the same thing.
impl PartialEq for Rejection {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.code == other.code
            && self.expected == other.expected
            && self.got == other.got
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }
        if let Some(ref cause) = self.cause {
            write!(f, ": {}", cause)?;
        }

        Ok(())
    }
}

impl Error for Rejection {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

/// The failing fields of one record, keyed by field name.
///
/// A `ValidationErrors` value always holds at least one entry: a record with no
/// failing field is accepted instead. Keys appear in schema order.
///
/// Per-field failures combine through [`Semigroup`]; when both sides name the
/// same field the first rejection is kept.
///
/// ```rust
/// use typist::{Rejection, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let errors = ValidationErrors::single("name", Rejection::invalid())
///     .combine(ValidationErrors::single("colour", Rejection::required()));
///
/// assert_eq!(errors.len(), 2);
/// assert!(errors.contains("colour"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(IndexMap<String, Rejection>);

impl ValidationErrors {
    /// Creates a map holding one failing field.
    pub fn single(field: impl Into<String>, rejection: Rejection) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(field.into(), rejection);
        Self(map)
    }

    /// Wraps a map of rejections, or returns `None` if it is empty.
    pub fn from_map(map: IndexMap<String, Rejection>) -> Option<Self> {
        if map.is_empty() {
            None
        } else {
            Some(Self(map))
        }
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the map is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the rejection recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&Rejection> {
        self.0.get(field)
    }

    /// Returns true if `field` failed.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the failing field names in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns an iterator over `(field, rejection)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rejection)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the fields rejected with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&str> {
        self.iter()
            .filter(|(_, r)| r.code == code)
            .map(|(field, _)| field)
            .collect()
    }

    /// Consumes the errors into the underlying map.
    pub fn into_map(self) -> IndexMap<String, Rejection> {
        self.0
    }

    /// Renders the errors as a `{field: message}` JSON object.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(field, r)| (field.to_string(), Value::String(r.message.clone())))
            .collect();
        Value::Object(map)
    }
}

impl Semigroup for ValidationErrors {
    fn combine(mut self, other: Self) -> Self {
        for (field, rejection) in other.0 {
            self.0.entry(field).or_insert(rejection);
        }
        self
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed for {} field(s):", self.len())?;
        for (i, (field, rejection)) in self.iter().enumerate() {
            writeln!(f, "  {}. {}: {}", i + 1, field, rejection)?;
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = (String, Rejection);
    type IntoIter = indexmap::map::IntoIter<String, Rejection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Rejection>();
    assert_sync::<Rejection>();
    assert_send::<ValidationErrors>();
    assert_sync::<ValidationErrors>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_invalid_defaults() {
        let rejection = Rejection::invalid();
        assert_eq!(rejection.message, "invalid");
        assert_eq!(rejection.code, "invalid");
        assert!(rejection.expected.is_none());
        assert!(rejection.got.is_none());
        assert!(rejection.cause().is_none());
    }

    #[test]
    fn test_required_rejection() {
        let rejection = Rejection::required();
        assert_eq!(rejection.message, "invalid");
        assert_eq!(rejection.code, "required");
    }

    #[test]
    fn test_cause_is_source_but_not_identity() {
        let with_cause = Rejection::invalid().because(Boom);
        assert_eq!(with_cause.cause().map(|c| c.to_string()), Some("boom".to_string()));
        assert!(with_cause.source().is_some());
        assert_eq!(with_cause, Rejection::invalid());
    }

    #[test]
    fn test_rejection_display() {
        let rejection = Rejection::invalid()
            .with_expected("int32")
            .with_got("1.5");
        let display = rejection.to_string();
        assert!(display.starts_with("invalid"));
        assert!(display.contains("expected: int32"));
        assert!(display.contains("got: 1.5"));
    }

    #[test]
    fn test_from_empty_map_is_none() {
        assert!(ValidationErrors::from_map(IndexMap::new()).is_none());
    }

    #[test]
    fn test_combine_keeps_first_rejection() {
        let first = ValidationErrors::single("a", Rejection::invalid().with_code("first"));
        let second = ValidationErrors::single("a", Rejection::invalid().with_code("second"))
            .combine(ValidationErrors::single("b", Rejection::required()));

        let combined = first.combine(second);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.get("a").map(|r| r.code.as_str()), Some("first"));
        assert_eq!(combined.fields().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_with_code() {
        let errors = ValidationErrors::single("a", Rejection::required())
            .combine(ValidationErrors::single("b", Rejection::invalid()))
            .combine(ValidationErrors::single("c", Rejection::required()));

        assert_eq!(errors.with_code("required"), vec!["a", "c"]);
        assert_eq!(errors.with_code("invalid"), vec!["b"]);
    }

    #[test]
    fn test_to_value() {
        let errors = ValidationErrors::single("countryOfOrigin", Rejection::invalid());
        assert_eq!(
            errors.to_value(),
            serde_json::json!({"countryOfOrigin": "invalid"})
        );
    }

    #[test]
    fn test_equality_ignores_order() {
        let ab = ValidationErrors::single("a", Rejection::invalid())
            .combine(ValidationErrors::single("b", Rejection::invalid()));
        let ba = ValidationErrors::single("b", Rejection::invalid())
            .combine(ValidationErrors::single("a", Rejection::invalid()));
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_display_lists_every_field() {
        let errors = ValidationErrors::single("name", Rejection::required())
            .combine(ValidationErrors::single("colour", Rejection::invalid()));
        let display = errors.to_string();

        assert!(display.contains("2 field(s)"));
        assert!(display.contains("name: invalid"));
        assert!(display.contains("colour: invalid"));
    }
}
