use alloc::sync::Arc;
use core::fmt;
use std::sync::OnceLock;

use flowerfield_value::{Value, ValueType};

use crate::{FieldValue, KindId, TypeSet};

/// A check (and optional rewrite) applied to a field's value after it was
/// type-checked or mapped.
///
/// Returning `Err` rejects the value with the given message; returning `Ok`
/// binds whatever value was returned, which may differ from the input.
///
/// When mapping through [`crate::resolve_and_map`], validators run while the
/// [global](crate::global()) registry's read lock is held. A validator must
/// not call [`crate::declare_category`], [`crate::declare_kind`] or
/// [`crate::resolve_and_map`] itself, or it can deadlock.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync>);

impl Validator {
    /// Wraps a function over any bound value, nested instances and lists
    /// included.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static,
    {
        Validator(Arc::new(f))
    }

    /// Wraps a function over plain values. Nested instances and lists pass
    /// through untouched.
    pub fn scalar<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Validator::new(move |value| match value {
            FieldValue::Value(v) => f(v).map(FieldValue::Value),
            other => Ok(other),
        })
    }

    pub(crate) fn apply(&self, value: FieldValue) -> Result<FieldValue, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

impl<F> From<F> for Validator
where
    F: Fn(FieldValue) -> Result<FieldValue, String> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Validator::new(f)
    }
}

/// Where a structural reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A kind (or category) that was already declared.
    Kind(KindId),
    /// A kind named by string, looked up on first use. Either a bare name
    /// (`"Flower"`) or qualified with its category (`"Garden::Flower"`).
    Named(String),
}

impl From<KindId> for Target {
    fn from(id: KindId) -> Self {
        Target::Kind(id)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Target::Named(name.to_owned())
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Target::Named(name)
    }
}

/// The structural half of a field: which kinds a nested object may become.
///
/// Named targets are resolved against the registry the first time the field
/// maps something, and the resolved ids are kept for every later call.
#[derive(Debug)]
pub(crate) struct Reference {
    pub(crate) targets: Vec<Target>,
    pub(crate) resolved: OnceLock<Vec<KindId>>,
}

/// Describes one named slot of a kind.
///
/// Build one with [`Field::new`], [`Field::optional`], [`Field::any`],
/// [`Field::nested`], [`Field::list`] or [`Field::list_of`], then refine it
/// with the builder methods.
///
/// ```
/// use flowerfield::{Field, Validator};
/// use flowerfield_value::{Value, ValueType};
///
/// let kind = Field::new("type", ValueType::String)
///     .alias("kind")
///     .validator(Validator::scalar(|v| match v.as_str() {
///         Some(s) => Ok(Value::from(s.to_uppercase())),
///         None => Err("expected text".into()),
///     }));
/// assert_eq!(kind.key(), "kind");
/// ```
#[derive(Debug)]
pub struct Field {
    name: String,
    accepted: TypeSet,
    validator: Option<Validator>,
    alias: Option<String>,
    reference: Option<Reference>,
    list: bool,
}

impl Field {
    fn build(name: impl Into<String>, accepted: TypeSet, list: bool) -> Self {
        Field {
            name: name.into(),
            accepted,
            validator: None,
            alias: None,
            reference: None,
            list,
        }
    }

    /// A field whose value must be one of `accepted`.
    pub fn new(name: impl Into<String>, accepted: impl Into<TypeSet>) -> Self {
        Self::build(name, accepted.into(), false)
    }

    /// Like [`Field::new`], but `null` is accepted too.
    pub fn optional(name: impl Into<String>, accepted: impl Into<TypeSet>) -> Self {
        Self::new(name, accepted).nullable()
    }

    /// A field that accepts a value of any type.
    pub fn any(name: impl Into<String>) -> Self {
        Self::build(name, TypeSet::ANY, false)
    }

    /// A field holding one nested structure of kind (or category) `target`.
    pub fn nested(name: impl Into<String>, target: impl Into<Target>) -> Self {
        Self::build(name, TypeSet::EMPTY, false).or_nested(target)
    }

    /// A homogeneous list whose elements must be one of `accepted`.
    pub fn list(name: impl Into<String>, accepted: impl Into<TypeSet>) -> Self {
        Self::build(name, accepted.into(), true)
    }

    /// A list of nested structures of kind (or category) `target`.
    pub fn list_of(name: impl Into<String>, target: impl Into<Target>) -> Self {
        Self::build(name, TypeSet::EMPTY, true).or_nested(target)
    }

    /// Adds another kind a nested object may resolve to. When several
    /// targets are listed, the one sharing the most keys with the object
    /// wins, the earliest listed on ties.
    #[must_use]
    pub fn or_nested(mut self, target: impl Into<Target>) -> Self {
        self.reference
            .get_or_insert_with(|| Reference {
                targets: Vec::new(),
                resolved: OnceLock::new(),
            })
            .targets
            .push(target.into());
        self
    }

    /// Also accept values of type `ty`.
    #[must_use]
    pub fn accepts(mut self, ty: ValueType) -> Self {
        self.accepted = self.accepted.with(ty);
        self
    }

    /// Also accept `null` as a list element. A `null` field value binds the
    /// "no value" marker either way; this marks the field optional.
    #[must_use]
    pub fn nullable(self) -> Self {
        self.accepts(ValueType::Null)
    }

    /// Read and write this field under `alias` instead of its name. The
    /// declared name is still accepted on input.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = (alias != self.name).then_some(alias);
        self
    }

    /// Run `validator` on every value bound to this field.
    #[must_use]
    pub fn validator(mut self, validator: impl Into<Validator>) -> Self {
        self.validator = Some(validator.into());
        self
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias, if any.
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The externally visible key: the alias if present, else the name.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The accepted value types.
    pub fn accepted(&self) -> TypeSet {
        self.accepted
    }

    /// Whether `null` is in the accepted set.
    pub fn is_optional(&self) -> bool {
        self.accepted.contains(ValueType::Null)
    }

    /// Whether this is a list field.
    pub fn is_list(&self) -> bool {
        self.list
    }

    /// Whether nested objects are mapped onto other kinds.
    pub fn is_structural(&self) -> bool {
        self.reference.is_some()
    }

    /// The reference targets, as declared.
    pub fn targets(&self) -> &[Target] {
        match &self.reference {
            Some(reference) => &reference.targets,
            None => &[],
        }
    }

    pub(crate) fn reference(&self) -> Option<&Reference> {
        self.reference.as_ref()
    }

    pub(crate) fn validator_fn(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Keys under which this field may appear in input.
    pub(crate) fn input_keys(&self) -> impl Iterator<Item = &str> {
        self.alias.as_deref().into_iter().chain([self.name.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_equal_to_name_is_dropped() {
        let field = Field::new("color", ValueType::String).alias("color");
        assert_eq!(field.alias_name(), None);
        assert_eq!(field.key(), "color");
    }

    #[test]
    fn input_keys_try_alias_first() {
        let field = Field::new("kind", ValueType::String).alias("type");
        let keys: Vec<_> = field.input_keys().collect();
        assert_eq!(keys, ["type", "kind"]);
    }

    #[test]
    fn optional_adds_null() {
        let field = Field::optional("pot", ValueType::String);
        assert!(field.is_optional());
        assert!(!Field::new("pot", ValueType::String).is_optional());
    }

    #[test]
    fn nested_fields_accept_no_plain_types() {
        let field = Field::list_of("flowers", "Flower").or_nested("Weed");
        assert!(field.is_list());
        assert!(field.accepted().is_empty());
        assert_eq!(
            field.targets(),
            [Target::from("Flower"), Target::from("Weed")]
        );
    }

    #[test]
    fn scalar_validator_skips_instances() {
        let upper = Validator::scalar(|v| Ok(Value::from(v.as_str().unwrap_or("").to_uppercase())));
        let out = upper.apply(FieldValue::Value(Value::from("rose"))).unwrap();
        assert_eq!(out, FieldValue::Value(Value::from("ROSE")));
        let list = FieldValue::List(vec![]);
        assert_eq!(upper.apply(list.clone()).unwrap(), list);
    }
}
