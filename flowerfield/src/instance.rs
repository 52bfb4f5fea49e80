use alloc::sync::Arc;
use core::fmt;

use flowerfield_value::Value;

use crate::{Field, Kind, Registry, SchemeError};

/// What a field of an [`Instance`] is bound to.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// The "no value" marker: the key was absent or `null`.
    #[default]
    None,
    /// A plain value that passed the type check.
    Value(Value),
    /// A nested structure.
    Instance(Box<Instance>),
    /// A list field; elements are plain values, instances, or nested lists.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Whether this is the "no value" marker.
    pub fn is_none(&self) -> bool {
        matches!(self, FieldValue::None)
    }

    /// The plain value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Shorthand for a plain string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The nested instance, if this is one.
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            FieldValue::Instance(i) => Some(i),
            _ => None,
        }
    }

    /// The list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Value(v)
    }
}

impl From<Instance> for FieldValue {
    fn from(i: Instance) -> Self {
        FieldValue::Instance(Box::new(i))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::None => f.write_str("none"),
            FieldValue::Value(v) => fmt::Display::fmt(v, f),
            FieldValue::Instance(i) => fmt::Display::fmt(i, f),
            FieldValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(item, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A mapped structure: one bound value per field of its kind.
///
/// Instances own their nested instances; the tree shares nothing with the
/// record it was built from.
#[derive(Debug, Clone)]
pub struct Instance {
    kind: Arc<Kind>,
    slots: Vec<FieldValue>,
}

impl Instance {
    pub(crate) fn new(kind: Arc<Kind>, slots: Vec<FieldValue>) -> Self {
        debug_assert_eq!(kind.fields().len(), slots.len());
        Instance { kind, slots }
    }

    /// The kind this instance was built from.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Shorthand for `self.kind().name()`.
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// The value bound to the field answering to `key` (alias or name).
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.kind.position(key).map(|i| &self.slots[i])
    }

    /// Whether the kind has a field answering to `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.kind.position(key).is_some()
    }

    /// Number of fields, bound or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the kind declares no fields.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(external key, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.kind
            .fields()
            .iter()
            .map(Field::key)
            .zip(self.slots.iter())
    }

    /// Rebinds the field answering to `key` from a raw value, running the
    /// same type check, mapping and validation as construction does.
    ///
    /// On error the instance is left unchanged.
    ///
    /// `registry` must be the one that declared this instance's kind.
    /// Reference targets are resolved once and cached on the field, so
    /// another registry would be handed that registry's [`crate::KindId`]s.
    pub fn set(&mut self, registry: &Registry, key: &str, raw: &Value) -> Result<(), SchemeError> {
        let Some(index) = self.kind.position(key) else {
            return Err(SchemeError::UnknownField {
                kind: self.kind.qualified_name().to_owned(),
                key: key.to_owned(),
            });
        };
        let bound = registry.bind_field(&self.kind, &self.kind.fields()[index], raw)?;
        self.slots[index] = bound;
        Ok(())
    }

    /// Clears the field answering to `key` back to the "no value" marker.
    pub fn unset(&mut self, key: &str) -> Result<(), SchemeError> {
        let Some(index) = self.kind.position(key) else {
            return Err(SchemeError::UnknownField {
                kind: self.kind.qualified_name().to_owned(),
                key: key.to_owned(),
            });
        };
        self.slots[index] = FieldValue::None;
        Ok(())
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.kind.qualified_name() == other.kind.qualified_name() && self.slots == other.slots
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.name())?;
        for (i, (field, value)) in self.kind.fields().iter().zip(&self.slots).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={value}", field.name())?;
        }
        f.write_str(")")
    }
}
