//! Parameterized factor constructors.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{Check, Factor, FactorError};
use crate::validation::value_type_name;

/// Builds a check from construction arguments.
pub type FactoryFn = dyn Fn(&FactoryArgs<'_>) -> Result<Check, FactorError> + Send + Sync;

/// A tagged constructor of factors, such as a numeric range.
///
/// Every factor a factory builds carries the factory's tag.
///
/// # Example
///
/// ```rust
/// use typist::factors;
/// use serde_json::json;
///
/// let year = factors::range().build(&[json!(2000), json!(2999)]).unwrap();
///
/// assert!(year.accepts(Some(&json!(2000))));
/// assert!(year.accepts(Some(&json!(2999))));
/// assert!(!year.accepts(Some(&json!(3000))));
/// ```
#[derive(Clone)]
pub struct Factory {
    tag: Arc<str>,
    build: Arc<FactoryFn>,
}

impl Factory {
    /// Creates a factory from a build closure.
    pub fn new<F>(tag: impl Into<String>, build: F) -> Self
    where
        F: Fn(&FactoryArgs<'_>) -> Result<Check, FactorError> + Send + Sync + 'static,
    {
        Self::from_fn(tag, Arc::new(build))
    }

    /// Creates a factory around an existing shared build closure.
    pub fn from_fn(tag: impl Into<String>, build: Arc<FactoryFn>) -> Self {
        Self {
            tag: Arc::from(tag.into()),
            build,
        }
    }

    /// Returns the tag given to every factor this factory builds.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Builds a factor from construction arguments.
    pub fn build(&self, args: &[Value]) -> Result<Factor, FactorError> {
        let args = FactoryArgs::new(&self.tag, args);
        let check = (self.build)(&args)?;
        Ok(Factor::from_check(self.tag.to_string(), check))
    }

    /// Composes a new tag onto this factory: `<tag>(<name>)`.
    pub fn retag(&self, name: &str) -> Self {
        Self {
            tag: Arc::from(format!("{}({})", self.tag, name)),
            build: Arc::clone(&self.build),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Construction arguments handed to a factory's build closure.
///
/// Accessors report wrong or missing arguments as [`FactorError`]s naming the
/// factory and the argument position.
pub struct FactoryArgs<'a> {
    factory: &'a str,
    values: &'a [Value],
}

impl<'a> FactoryArgs<'a> {
    /// Wraps the raw argument list for the named factory.
    pub fn new(factory: &'a str, values: &'a [Value]) -> Self {
        Self { factory, values }
    }

    /// Returns the number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no arguments were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns all arguments.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Fails unless exactly `count` arguments were given.
    pub fn expect_len(&self, count: usize) -> Result<(), FactorError> {
        if self.values.len() < count {
            return Err(FactorError::MissingArgument {
                factory: self.factory.to_string(),
                index: self.values.len(),
            });
        }
        if self.values.len() > count {
            return Err(self.invalid(count, "unexpected extra argument"));
        }
        Ok(())
    }

    /// Returns the argument at `index`.
    pub fn value(&self, index: usize) -> Result<&'a Value, FactorError> {
        self.values
            .get(index)
            .ok_or_else(|| FactorError::MissingArgument {
                factory: self.factory.to_string(),
                index,
            })
    }

    /// Returns the argument at `index` as a number.
    pub fn number(&self, index: usize) -> Result<f64, FactorError> {
        let value = self.value(index)?;
        value
            .as_f64()
            .ok_or_else(|| self.invalid(index, format!("expected number, got {}", value_type_name(value))))
    }

    /// Returns the argument at `index` as a non-negative integer.
    pub fn unsigned(&self, index: usize) -> Result<u64, FactorError> {
        let value = self.value(index)?;
        value.as_u64().ok_or_else(|| {
            self.invalid(index, format!("expected non-negative integer, got {}", value))
        })
    }

    /// Returns the argument at `index` as a string.
    pub fn string(&self, index: usize) -> Result<&'a str, FactorError> {
        let value = self.value(index)?;
        value
            .as_str()
            .ok_or_else(|| self.invalid(index, format!("expected string, got {}", value_type_name(value))))
    }

    /// Returns every argument as a string.
    pub fn strings(&self) -> Result<Vec<String>, FactorError> {
        (0..self.values.len())
            .map(|i| self.string(i).map(str::to_string))
            .collect()
    }

    /// Builds an `InvalidArgument` error for this factory.
    pub fn invalid(&self, index: usize, reason: impl Into<String>) -> FactorError {
        FactorError::InvalidArgument {
            factory: self.factory.to_string(),
            index,
            reason: reason.into(),
        }
    }
}
