use std::collections::HashSet;

use flowerfield_value::VObject;

use crate::{Field, SchemeError};

/// Handle to a kind or category declared in a [`Registry`](crate::Registry).
///
/// Ids are indices into the registry's arena and are only meaningful for
/// the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(pub(crate) usize);

impl KindId {
    /// Position of this kind in declaration order.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A declared structure: an ordered set of fields under a category root, or
/// a category root itself.
#[derive(Debug)]
pub struct Kind {
    id: KindId,
    name: String,
    qualified_name: String,
    category: Option<KindId>,
    fields: Vec<Field>,
}

impl Kind {
    /// Starts building a kind called `name`.
    pub fn builder(name: impl Into<String>) -> KindBuilder {
        KindBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub(crate) fn category_root(id: KindId, name: String) -> Self {
        Kind {
            id,
            qualified_name: name.clone(),
            name,
            category: None,
            fields: Vec::new(),
        }
    }

    /// This kind's handle.
    pub fn id(&self) -> KindId {
        self.id
    }

    /// The declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Category::Kind`, or just the name for a category root.
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// The category root this kind belongs to; `None` for a root.
    pub fn category(&self) -> Option<KindId> {
        self.category
    }

    /// Whether this is a category root (never matched itself).
    pub fn is_category(&self) -> bool {
        self.category.is_none()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by its declared name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Position of the field answering to `key`, checking aliases first.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.alias_name() == Some(key))
            .or_else(|| self.fields.iter().position(|f| f.name() == key))
    }

    /// Number of `record` keys matching a field name or alias.
    ///
    /// Names and aliases are distinct within a kind, so this is the size of
    /// the intersection between the record's keys and the kind's keys.
    pub fn overlap(&self, record: &VObject) -> usize {
        self.fields
            .iter()
            .flat_map(|f| f.input_keys())
            .filter(|key| record.contains_key(key))
            .count()
    }

    /// Every key this kind answers to, aliases before names.
    pub(crate) fn known_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().flat_map(|f| f.input_keys())
    }
}

/// Collects the fields of a kind before it is declared.
///
/// ```
/// use flowerfield::{Field, Kind};
/// use flowerfield_value::ValueType;
///
/// let flower = Kind::builder("Flower")
///     .field(Field::new("color", ValueType::String))
///     .field(Field::new("type", ValueType::String));
/// assert_eq!(flower.name(), "Flower");
/// ```
#[derive(Debug)]
pub struct KindBuilder {
    name: String,
    fields: Vec<Field>,
}

impl KindBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// The name the kind will be declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks key uniqueness and produces the kind.
    pub(crate) fn finish(
        self,
        id: KindId,
        category: KindId,
        category_name: &str,
    ) -> Result<Kind, SchemeError> {
        let mut seen = HashSet::new();
        for key in self.fields.iter().flat_map(|f| f.input_keys()) {
            if !seen.insert(key) {
                return Err(SchemeError::DuplicateField {
                    kind: self.name.clone(),
                    key: key.to_owned(),
                });
            }
        }

        Ok(Kind {
            id,
            qualified_name: format!("{category_name}::{}", self.name),
            name: self.name,
            category: Some(category),
            fields: self.fields,
        })
    }
}
