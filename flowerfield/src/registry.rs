use alloc::sync::Arc;
use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::{Field, Kind, KindBuilder, KindId, SchemeError, Target, debug, trace};

/// Every declared category and kind, addressed by [`KindId`].
///
/// Kinds live in an arena for as long as the registry does; nothing is ever
/// removed. Declaring needs `&mut self`, mapping only `&self`, so a
/// registry that is fully declared can be shared freely between threads.
#[derive(Debug, Default)]
pub struct Registry {
    kinds: Vec<Arc<Kind>>,
    /// Category root → its kinds, in declaration order.
    members: HashMap<KindId, Vec<KindId>>,
    /// Bare name → every kind or category declared under it.
    by_name: HashMap<String, Vec<KindId>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: Kind) -> KindId {
        let id = kind.id();
        self.by_name
            .entry(kind.name().to_owned())
            .or_default()
            .push(id);
        self.kinds.push(Arc::new(kind));
        id
    }

    /// Declares a category root: a named, initially empty set of candidate
    /// kinds. Category names are unique within a registry.
    pub fn declare_category(&mut self, name: impl Into<String>) -> Result<KindId, SchemeError> {
        let name = name.into();
        if self.category_named(&name).is_some() {
            return Err(SchemeError::DuplicateKind {
                category: None,
                kind: name,
            });
        }

        let id = KindId(self.kinds.len());
        debug!(category = %name, "declared category");
        self.members.insert(id, Vec::new());
        Ok(self.push(Kind::category_root(id, name)))
    }

    /// Declares a kind under `category` and appends it to that category's
    /// candidates.
    pub fn declare_kind(
        &mut self,
        category: KindId,
        builder: KindBuilder,
    ) -> Result<KindId, SchemeError> {
        let root = self.kind(category)?;
        if !root.is_category() {
            return Err(SchemeError::NotACategory {
                name: root.qualified_name().to_owned(),
            });
        }
        let root_name = root.name().to_owned();

        if self.member_named(category, builder.name()).is_some() {
            return Err(SchemeError::DuplicateKind {
                category: Some(root_name),
                kind: builder.name().to_owned(),
            });
        }

        let id = KindId(self.kinds.len());
        let kind = builder.finish(id, category, &root_name)?;
        debug!(
            kind = %kind.qualified_name(),
            fields = kind.fields().len(),
            "declared kind"
        );
        self.members.entry(category).or_default().push(id);
        Ok(self.push(kind))
    }

    /// Looks up a kind or category by id.
    pub fn get(&self, id: KindId) -> Option<&Arc<Kind>> {
        self.kinds.get(id.0)
    }

    pub(crate) fn kind(&self, id: KindId) -> Result<&Arc<Kind>, SchemeError> {
        self.get(id)
            .ok_or(SchemeError::UnknownKind { index: id.0 })
    }

    /// The kinds declared under `category`, in declaration order. Empty for
    /// anything that is not a category root.
    pub fn members(&self, category: KindId) -> &[KindId] {
        match self.members.get(&category) {
            Some(members) => members,
            None => &[],
        }
    }

    /// Finds a kind or category by name: `"Category"`, `"Category::Kind"`,
    /// or a bare `"Kind"` when exactly one category declares it.
    pub fn lookup(&self, name: &str) -> Option<KindId> {
        match self.lookup_all(name).as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Number of declared kinds and categories.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether nothing has been declared yet.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn category_named(&self, name: &str) -> Option<KindId> {
        self.by_name
            .get(name)?
            .iter()
            .copied()
            .find(|id| self.kinds[id.0].is_category())
    }

    fn member_named(&self, category: KindId, name: &str) -> Option<KindId> {
        self.members(category)
            .iter()
            .copied()
            .find(|id| self.kinds[id.0].name() == name)
    }

    fn lookup_all(&self, name: &str) -> Vec<KindId> {
        if let Some((category, kind)) = name.split_once("::") {
            return self
                .category_named(category)
                .and_then(|root| self.member_named(root, kind))
                .into_iter()
                .collect();
        }
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    /// The kinds a structural field may map onto, resolving named targets
    /// on first use. The result is cached in the field.
    pub(crate) fn reference_targets<'f>(
        &self,
        owner: &Kind,
        field: &'f Field,
    ) -> Result<&'f [KindId], SchemeError> {
        let Some(reference) = field.reference() else {
            return Ok(&[]);
        };
        if let Some(ids) = reference.resolved.get() {
            return Ok(ids);
        }

        let mut ids = Vec::with_capacity(reference.targets.len());
        for target in &reference.targets {
            let id = match target {
                Target::Kind(id) if id.0 < self.kinds.len() => *id,
                Target::Kind(id) => {
                    return Err(unresolved(owner, field, format!("#{}", id.0), Vec::new()));
                }
                Target::Named(name) => match self.lookup_all(name).as_slice() {
                    [only] => *only,
                    candidates => {
                        let candidates = candidates
                            .iter()
                            .map(|id| self.kinds[id.0].qualified_name().to_owned())
                            .collect();
                        return Err(unresolved(owner, field, name.clone(), candidates));
                    }
                },
            };
            ids.push(id);
        }

        trace!(
            kind = %owner.qualified_name(),
            field = %field.name(),
            targets = ?ids,
            "resolved structural reference"
        );
        Ok(reference.resolved.get_or_init(|| ids))
    }

    /// Describes what a field accepts, for error messages.
    pub(crate) fn describe_expected(&self, field: &Field) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !field.accepted().is_empty() {
            parts.push(field.accepted().to_string());
        }
        for target in field.targets() {
            parts.push(match target {
                Target::Kind(id) => self
                    .kinds
                    .get(id.0)
                    .map_or_else(|| format!("#{}", id.0), |k| k.qualified_name().to_owned()),
                Target::Named(name) => name.clone(),
            });
        }
        let inner = if parts.is_empty() {
            "nothing".to_owned()
        } else {
            parts.join(" | ")
        };
        if field.is_list() {
            format!("array of {inner}")
        } else {
            inner
        }
    }
}

fn unresolved(owner: &Kind, field: &Field, name: String, candidates: Vec<String>) -> SchemeError {
    SchemeError::UnresolvedReference {
        kind: owner.qualified_name().to_owned(),
        field: field.name().to_owned(),
        name,
        candidates,
    }
}

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

/// The process-wide registry.
///
/// Declarations take the write lock, mapping takes the read lock, so
/// declaring from several threads is safe and readers never block each other
/// once declaration is over.
pub fn global() -> &'static RwLock<Registry> {
    GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowerfield_value::ValueType;

    fn garden() -> (Registry, KindId) {
        let mut reg = Registry::new();
        let garden = reg.declare_category("Garden").unwrap();
        (reg, garden)
    }

    #[test]
    fn kinds_join_their_category_in_order() {
        let (mut reg, garden) = garden();
        let flower = reg
            .declare_kind(
                garden,
                Kind::builder("Flower").field(Field::new("color", ValueType::String)),
            )
            .unwrap();
        let pot = reg
            .declare_kind(
                garden,
                Kind::builder("Pot").field(Field::new("watered", ValueType::Bool)),
            )
            .unwrap();
        assert_eq!(reg.members(garden), [flower, pot]);
        assert!(reg.members(flower).is_empty());
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn duplicate_kind_in_same_category_fails() {
        let (mut reg, garden) = garden();
        reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        let err = reg
            .declare_kind(garden, Kind::builder("Flower"))
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "kind `Flower` is already declared in category `Garden`"
        );
    }

    #[test]
    fn same_name_in_other_category_is_allowed() {
        let (mut reg, garden) = garden();
        let shop = reg.declare_category("Shop").unwrap();
        reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        reg.declare_kind(shop, Kind::builder("Flower")).unwrap();
        assert_eq!(reg.lookup("Flower"), None);
        assert!(reg.lookup("Shop::Flower").is_some());
        assert!(reg.lookup("Garden::Flower").is_some());
    }

    #[test]
    fn duplicate_category_fails() {
        let (mut reg, _) = garden();
        let err = reg.declare_category("Garden").unwrap_err();
        assert!(matches!(err, SchemeError::DuplicateKind { category: None, .. }));
    }

    #[test]
    fn kinds_cannot_nest_under_kinds() {
        let (mut reg, garden) = garden();
        let flower = reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        let err = reg
            .declare_kind(flower, Kind::builder("Petal"))
            .unwrap_err();
        assert_eq!(err.to_string(), "`Garden::Flower` is not a category root");
    }

    #[test]
    fn named_reference_is_resolved_once_and_cached() {
        let (mut reg, garden) = garden();
        let pot = reg
            .declare_kind(
                garden,
                Kind::builder("Pot").field(Field::list_of("flowers", "Flower")),
            )
            .unwrap();
        let pot_kind = reg.kind(pot).unwrap().clone();
        let field = &pot_kind.fields()[0];

        // not declared yet: fails, and the failure is not cached
        let err = reg.reference_targets(&pot_kind, field).unwrap_err();
        assert!(matches!(err, SchemeError::UnresolvedReference { ref candidates, .. } if candidates.is_empty()));

        let flower = reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        assert_eq!(reg.reference_targets(&pot_kind, field).unwrap(), [flower]);
        assert!(field.reference().unwrap().resolved.get().is_some());
    }

    #[test]
    fn ambiguous_bare_name_lists_candidates() {
        let (mut reg, garden) = garden();
        let shop = reg.declare_category("Shop").unwrap();
        reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        reg.declare_kind(shop, Kind::builder("Flower")).unwrap();
        let vase = reg
            .declare_kind(shop, Kind::builder("Vase").field(Field::nested("flower", "Flower")))
            .unwrap();
        let vase_kind = reg.kind(vase).unwrap().clone();
        let err = reg
            .reference_targets(&vase_kind, &vase_kind.fields()[0])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `flower` of `Shop::Vase` references `Flower`, which is ambiguous between [\"Garden::Flower\", \"Shop::Flower\"]"
        );
    }

    #[test]
    fn describes_expected_values() {
        let (mut reg, garden) = garden();
        let flower = reg.declare_kind(garden, Kind::builder("Flower")).unwrap();
        assert_eq!(
            reg.describe_expected(&Field::list_of("flowers", flower)),
            "array of Garden::Flower"
        );
        assert_eq!(
            reg.describe_expected(&Field::optional("name", ValueType::String)),
            "null | string"
        );
    }
}
