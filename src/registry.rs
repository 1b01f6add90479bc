//! Factor registry for named, tagged factors and factories.
//!
//! This module provides the [`FactorRegistry`] type that turns raw validators
//! into tagged [`Factor`]s and [`Factory`]s and stores them by name.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

use crate::factor::{builtin, Check, Factor, FactorError, Factory, FactoryArgs, FactoryFn};
use crate::validation::Outcome;

/// Type alias for the registry storage map.
type EntryMap = Arc<RwLock<IndexMap<String, Registered>>>;

/// A raw validator handed to the registry, before tagging.
///
/// An entry is either untagged (a bare check or factory closure) or already
/// tagged (an existing [`Factor`] or [`Factory`]). Registration derives the
/// tag from the entry's name, or from the explicit tag set with
/// [`tagged`](Self::tagged):
///
/// - untagged entries get `<name>`;
/// - tagged entries compose: `<existing tag>(<name>)`.
#[derive(Clone)]
pub struct Validator {
    kind: ValidatorKind,
    explicit_tag: Option<String>,
}

#[derive(Clone)]
enum ValidatorKind {
    Check(Check),
    Factor(Factor),
    Factory(Arc<FactoryFn>),
    TaggedFactory(Factory),
}

impl Validator {
    /// An untagged check.
    pub fn check<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Outcome<Value> + Send + Sync + 'static,
    {
        Self::from_kind(ValidatorKind::Check(Arc::new(f)))
    }

    /// An untagged boolean test; `false` rejects as `"invalid"`.
    pub fn predicate<F>(test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let factor = Factor::predicate("", test);
        Self::from_kind(ValidatorKind::Check(Arc::clone(factor.check_fn())))
    }

    /// An untagged factory closure.
    pub fn factory<F>(build: F) -> Self
    where
        F: Fn(&FactoryArgs<'_>) -> Result<Check, FactorError> + Send + Sync + 'static,
    {
        Self::from_kind(ValidatorKind::Factory(Arc::new(build)))
    }

    /// Uses `tag` instead of the registration name when deriving the tag.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.explicit_tag = Some(tag.into());
        self
    }

    fn from_kind(kind: ValidatorKind) -> Self {
        Self {
            kind,
            explicit_tag: None,
        }
    }

    /// Applies tag derivation and produces the registered entry.
    pub(crate) fn into_registered(self, name: &str) -> Registered {
        let label = self.explicit_tag.as_deref().unwrap_or(name);
        match self.kind {
            ValidatorKind::Check(check) => Registered::Factor(Factor::from_check(label, check)),
            ValidatorKind::Factor(factor) => Registered::Factor(factor.retag(label)),
            ValidatorKind::Factory(build) => Registered::Factory(Factory::from_fn(label, build)),
            ValidatorKind::TaggedFactory(factory) => Registered::Factory(factory.retag(label)),
        }
    }
}

impl From<Factor> for Validator {
    fn from(factor: Factor) -> Self {
        Self::from_kind(ValidatorKind::Factor(factor))
    }
}

impl From<Factory> for Validator {
    fn from(factory: Factory) -> Self {
        Self::from_kind(ValidatorKind::TaggedFactory(factory))
    }
}

/// A registered entry: a ready factor or a parameterized factory.
#[derive(Debug, Clone)]
pub enum Registered {
    /// A factor usable as-is.
    Factor(Factor),
    /// A factory that builds factors from arguments.
    Factory(Factory),
}

impl Registered {
    /// Returns the entry's tag.
    pub fn tag(&self) -> &str {
        match self {
            Registered::Factor(f) => f.tag(),
            Registered::Factory(f) => f.tag(),
        }
    }

    /// Returns true for factories.
    pub fn is_factory(&self) -> bool {
        matches!(self, Registered::Factory(_))
    }
}

/// A thread-safe registry of named factors and factories.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can look up factors concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share storage. Registered factors are immutable; looking one up
/// returns a clone that shares the same check.
///
/// # Example
///
/// ```rust
/// use typist::{FactorRegistry, Validator};
/// use serde_json::json;
///
/// let registry = FactorRegistry::standard();
///
/// let country = Validator::predicate(|v| {
///     v.as_str().is_some_and(|s| ["UK", "IRELAND"].contains(&s.to_uppercase().as_str()))
/// });
/// registry.register_as("country", country, "string").unwrap();
///
/// let factor = registry.factor("country").unwrap();
/// assert_eq!(factor.tag(), "string");
/// assert!(factor.accepts(Some(&json!("ireland"))));
///
/// let year = registry.build("range", &[json!(2000), json!(2999)]).unwrap();
/// assert!(year.accepts(Some(&json!(2024))));
/// ```
pub struct FactorRegistry {
    entries: EntryMap,
}

impl FactorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Creates a registry preloaded with every built-in factor and factory.
    ///
    /// Base factors are registered under their tag (`string`, `int32`, ...);
    /// factories as `range`, `length`, `pattern` and `one_of`.
    pub fn standard() -> Self {
        let registry = Self::new();
        {
            let mut entries = registry.entries.write();
            for (name, validator) in builtin::standard_entries() {
                entries.insert(name.to_string(), validator.into_registered(name));
            }
        }
        registry
    }

    /// Builds a registry from `name → validator` pairs, tagging each one.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if a name appears twice.
    pub fn from_validators<I, N>(validators: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (N, Validator)>,
        N: Into<String>,
    {
        let registry = Self::new();
        for (name, validator) in validators {
            registry.register(name, validator)?;
        }
        Ok(registry)
    }

    /// Tags `validator` by `name` and registers it.
    ///
    /// Returns the tagged entry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already
    /// registered, or `RegistryError::EmptyName` for an empty name.
    pub fn register(
        &self,
        name: impl Into<String>,
        validator: impl Into<Validator>,
    ) -> Result<Registered, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let mut entries = self.entries.write();
        if entries.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let validator: Validator = validator.into();
        let registered = validator.into_registered(&name);
        tracing::debug!(
            name = %name,
            tag = registered.tag(),
            factory = registered.is_factory(),
            "registered factor"
        );
        entries.insert(name, registered.clone());
        Ok(registered)
    }

    /// Registers `validator` under `name` with an explicit tag.
    ///
    /// Shorthand for `register(name, validator.tagged(tag))`.
    pub fn register_as(
        &self,
        name: impl Into<String>,
        validator: impl Into<Validator>,
        tag: impl Into<String>,
    ) -> Result<Registered, RegistryError> {
        let validator: Validator = validator.into();
        self.register(name, validator.tagged(tag))
    }

    /// Retrieves an entry by name.
    pub fn get(&self, name: &str) -> Option<Registered> {
        self.entries.read().get(name).cloned()
    }

    /// Retrieves a ready factor by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown names and `NotAFactor` for factories.
    pub fn factor(&self, name: &str) -> Result<Factor, RegistryError> {
        match self.get(name) {
            Some(Registered::Factor(factor)) => Ok(factor),
            Some(Registered::Factory(_)) => Err(RegistryError::NotAFactor(name.to_string())),
            None => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Retrieves a factory by name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown names and `NotAFactory` for factors.
    pub fn factory(&self, name: &str) -> Result<Factory, RegistryError> {
        match self.get(name) {
            Some(Registered::Factory(factory)) => Ok(factory),
            Some(Registered::Factor(_)) => Err(RegistryError::NotAFactory(name.to_string())),
            None => Err(RegistryError::NotFound(name.to_string())),
        }
    }

    /// Builds a factor from the named factory.
    pub fn build(&self, name: &str, args: &[Value]) -> Result<Factor, RegistryError> {
        Ok(self.factory(name)?.build(args)?)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Returns the registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns a copy of the `name → entry` mapping.
    pub fn snapshot(&self) -> IndexMap<String, Registered> {
        self.entries.read().clone()
    }
}

impl Default for FactorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FactorRegistry {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a name that already exists.
    #[error("factor '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to register an empty name.
    #[error("factor name must not be empty")]
    EmptyName,

    /// No entry with this name.
    #[error("factor '{0}' not found")]
    NotFound(String),

    /// The name refers to a factory, not a factor.
    #[error("'{0}' is a factory and needs arguments")]
    NotAFactor(String),

    /// The name refers to a factor, not a factory.
    #[error("'{0}' is a factor, not a factory")]
    NotAFactory(String),

    /// The factory rejected its arguments.
    #[error(transparent)]
    Factor(#[from] FactorError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_untagged_check_takes_name() {
        let registry = FactorRegistry::new();
        let entry = registry
            .register("even", Validator::predicate(|v| v.as_i64().is_some_and(|n| n % 2 == 0)))
            .unwrap();
        assert_eq!(entry.tag(), "even");
        assert!(!entry.is_factory());
    }

    #[test]
    fn test_explicit_tag_wins_over_name() {
        let registry = FactorRegistry::new();
        let entry = registry
            .register("even", Validator::predicate(|_| true).tagged("int"))
            .unwrap();
        assert_eq!(entry.tag(), "int");
    }

    #[test]
    fn test_tagged_factor_composes() {
        let registry = FactorRegistry::new();
        let entry = registry.register("email", builtin::string()).unwrap();
        assert_eq!(entry.tag(), "string(email)");

        let entry = registry
            .register_as("postcode", builtin::string(), "uk_postcode")
            .unwrap();
        assert_eq!(entry.tag(), "string(uk_postcode)");
    }

    #[test]
    fn test_composition_chains() {
        let registry = FactorRegistry::new();
        registry.register("email", builtin::string()).unwrap();
        let email = registry.factor("email").unwrap();
        let entry = registry.register("work_email", email).unwrap();
        assert_eq!(entry.tag(), "string(email)(work_email)");
    }

    #[test]
    fn test_factories_stay_factories() {
        let registry = FactorRegistry::new();
        let entry = registry.register("year", builtin::range()).unwrap();
        assert!(entry.is_factory());
        assert_eq!(entry.tag(), "number(year)");

        let factor = registry.build("year", &[json!(2000), json!(2999)]).unwrap();
        assert_eq!(factor.tag(), "number(year)");
    }

    #[test]
    fn test_untagged_factory_takes_name() {
        let registry = FactorRegistry::new();
        let entry = registry
            .register(
                "non_empty",
                Validator::factory(|args| {
                    args.expect_len(0)?;
                    Ok(crate::factor::check(|v| {
                        if v.as_str().is_some_and(|s| !s.is_empty()) {
                            stillwater::Validation::Success(v.clone())
                        } else {
                            stillwater::Validation::Failure(crate::Rejection::invalid())
                        }
                    }))
                }),
            )
            .unwrap();
        assert_eq!(entry.tag(), "non_empty");
        let factor = registry.build("non_empty", &[]).unwrap();
        assert!(factor.accepts(Some(&json!("x"))));
    }

    #[test]
    fn test_registration_aliases_the_input_check() {
        let registry = FactorRegistry::new();
        let base = builtin::string();
        registry.register("name", base.clone()).unwrap();
        let registered = registry.factor("name").unwrap();
        assert!(registered.shares_check_with(&base));
        assert_eq!(base.tag(), "string");
    }

    #[test]
    fn test_duplicate_and_empty_names() {
        let registry = FactorRegistry::new();
        registry.register("a", builtin::string()).unwrap();
        assert!(matches!(
            registry.register("a", builtin::int()),
            Err(RegistryError::DuplicateName(ref n)) if n == "a"
        ));
        assert!(matches!(
            registry.register("", builtin::int()),
            Err(RegistryError::EmptyName)
        ));
    }

    #[test]
    fn test_lookup_kind_mismatch() {
        let registry = FactorRegistry::standard();
        assert!(matches!(registry.factor("range"), Err(RegistryError::NotAFactor(_))));
        assert!(matches!(registry.factory("string"), Err(RegistryError::NotAFactory(_))));
        assert!(matches!(registry.factor("nope"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_standard_tags_match_names() {
        let registry = FactorRegistry::standard();
        for name in ["boolean", "string", "timestamp", "float32", "int8", "uint32"] {
            assert_eq!(registry.factor(name).unwrap().tag(), name);
        }
        assert_eq!(registry.factory("range").unwrap().tag(), "number");
        assert_eq!(registry.len(), 17);
    }

    #[test]
    fn test_build_propagates_factor_errors() {
        let registry = FactorRegistry::standard();
        let err = registry.build("range", &[json!(1)]).unwrap_err();
        assert!(matches!(err, RegistryError::Factor(FactorError::MissingArgument { .. })));
    }

    #[test]
    fn test_clone_shares_storage() {
        let registry = FactorRegistry::new();
        let other = registry.clone();
        registry.register("a", builtin::string()).unwrap();
        assert!(other.contains("a"));
    }
}
