//! Factors: single-field validators carrying a type tag.
//!
//! A [`Factor`] pairs an executable check with two pieces of metadata fixed at
//! construction: the semantic type tag reported by [`TypeModule::describe`]
//! and the optional flag set by [`optional`]. Clones share the same check, so
//! a factor referenced by many schemas is one callable.
//!
//! # Example
//!
//! ```rust
//! use typist::{Factor, Outcome};
//! use serde_json::json;
//!
//! let even = Factor::predicate("int", |v| v.as_i64().is_some_and(|n| n % 2 == 0));
//!
//! assert_eq!(even.tag(), "int");
//! assert!(even.accepts(Some(&json!(4))));
//! assert!(!even.accepts(Some(&json!(3))));
//! assert!(!even.accepts(None));
//! ```
//!
//! [`TypeModule::describe`]: crate::TypeModule::describe

pub mod builtin;
mod factory;
mod optional;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::Rejection;
use crate::validation::Outcome;

pub use factory::{Factory, FactoryArgs, FactoryFn};
pub use optional::optional;

/// The executable part of a factor: checks one present value.
pub type CheckFn = dyn Fn(&Value) -> Outcome<Value> + Send + Sync;

/// A shared, type-erased check.
pub type Check = Arc<CheckFn>;

/// Wraps a closure as a shared [`Check`].
///
/// Useful when writing factory closures, which must return a `Check`.
pub fn check<F>(f: F) -> Check
where
    F: Fn(&Value) -> Outcome<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A single-field validator with attached type metadata.
#[derive(Clone)]
pub struct Factor {
    tag: Arc<str>,
    optional: bool,
    check: Check,
}

impl Factor {
    /// Creates a factor from a check that may transform or reject a value.
    pub fn new<F>(tag: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Outcome<Value> + Send + Sync + 'static,
    {
        Self::from_check(tag, Arc::new(check))
    }

    /// Creates a factor from a boolean test.
    ///
    /// A `false` result rejects with the plain `"invalid"` reason.
    pub fn predicate<F>(tag: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::new(tag, move |value| {
            if test(value) {
                Validation::Success(value.clone())
            } else {
                Validation::Failure(Rejection::invalid())
            }
        })
    }

    /// Creates a factor around an existing shared check.
    pub fn from_check(tag: impl Into<String>, check: Check) -> Self {
        Self {
            tag: Arc::from(tag.into()),
            optional: false,
            check,
        }
    }

    /// Returns the semantic type tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns true if this factor accepts an absent value.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the shared check.
    pub fn check_fn(&self) -> &Check {
        &self.check
    }

    /// Applies the factor to a field that may be absent.
    ///
    /// An absent value is accepted as `None` by optional factors and rejected
    /// with code `required` by every other factor. A present value goes
    /// through the check and is accepted as `Some`.
    pub fn apply(&self, value: Option<&Value>) -> Outcome<Option<Value>> {
        match value {
            None if self.optional => Validation::Success(None),
            None => Validation::Failure(Rejection::required()),
            Some(v) => (self.check)(v).map(Some),
        }
    }

    /// Runs the check against a present value.
    pub fn check(&self, value: &Value) -> Outcome<Value> {
        (self.check)(value)
    }

    /// Returns true if [`apply`](Self::apply) would accept the value.
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        self.apply(value).is_success()
    }

    /// Composes a new tag onto this factor: `<tag>(<name>)`.
    ///
    /// The returned factor shares this factor's check and optional flag.
    pub fn retag(&self, name: &str) -> Self {
        Self {
            tag: Arc::from(format!("{}({})", self.tag, name)),
            optional: self.optional,
            check: Arc::clone(&self.check),
        }
    }

    /// Makes this factor accept absent values. See [`optional`].
    pub fn optional(&self) -> Result<Self, FactorError> {
        optional(self)
    }

    /// Returns true if both factors run the same check.
    pub fn shares_check_with(&self, other: &Factor) -> bool {
        Arc::ptr_eq(&self.check, &other.check)
    }
}

impl fmt::Debug for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factor")
            .field("tag", &self.tag)
            .field("optional", &self.optional)
            .finish_non_exhaustive()
    }
}

/// Errors raised while constructing factors.
#[derive(Debug, thiserror::Error)]
pub enum FactorError {
    /// `optional` was applied to a factor that is already optional.
    #[error("factor '{tag}' is already optional")]
    NestedOptional {
        /// Tag of the factor that was wrapped twice.
        tag: String,
    },

    /// A factory was called without a required argument.
    #[error("factory '{factory}' is missing argument {index}")]
    MissingArgument {
        /// Tag of the factory.
        factory: String,
        /// Zero-based position of the missing argument.
        index: usize,
    },

    /// A factory argument had the wrong type or value.
    #[error("factory '{factory}' argument {index}: {reason}")]
    InvalidArgument {
        /// Tag of the factory.
        factory: String,
        /// Zero-based position of the argument.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A pattern argument was not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as supplied.
        pattern: String,
        /// The regex compile error.
        #[source]
        source: regex::Error,
    },
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Factor>();
    assert_sync::<Factor>();
};
