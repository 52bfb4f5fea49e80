use core::fmt;

use flowerfield_value::ValueType;

/// A set of [`ValueType`]s, stored as a bitmask.
///
/// A field accepts a raw value when the value's type is in the set. There is
/// one subtype rule: a set containing [`ValueType::Float`] also accepts
/// [`ValueType::Integer`], since every JSON integer is a valid number.
/// Containing [`ValueType::Null`] makes a field optional.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeSet {
    bits: u8,
}

impl TypeSet {
    /// Accepts nothing. Fields that only hold nested structures use this.
    pub const EMPTY: TypeSet = TypeSet { bits: 0 };

    /// Accepts every value type.
    pub const ANY: TypeSet = TypeSet {
        bits: (1 << ValueType::ALL.len()) - 1,
    };

    const fn bit(ty: ValueType) -> u8 {
        1 << ty as u8
    }

    /// A set holding exactly `ty`.
    pub const fn of(ty: ValueType) -> Self {
        TypeSet {
            bits: Self::bit(ty),
        }
    }

    /// This set with `ty` added.
    #[must_use]
    pub const fn with(self, ty: ValueType) -> Self {
        TypeSet {
            bits: self.bits | Self::bit(ty),
        }
    }

    /// Union of two sets.
    #[must_use]
    pub const fn union(self, other: TypeSet) -> Self {
        TypeSet {
            bits: self.bits | other.bits,
        }
    }

    /// Whether `ty` is literally in the set.
    pub const fn contains(self, ty: ValueType) -> bool {
        self.bits & Self::bit(ty) != 0
    }

    /// Whether a value of type `ty` is accepted, including the
    /// integer-as-float rule.
    pub const fn accepts(self, ty: ValueType) -> bool {
        self.contains(ty)
            || (matches!(ty, ValueType::Integer) && self.contains(ValueType::Float))
    }

    /// Whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Whether the set accepts every type.
    pub const fn is_any(self) -> bool {
        self.bits == Self::ANY.bits
    }

    /// Iterates over the members in [`ValueType::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = ValueType> {
        ValueType::ALL.into_iter().filter(move |ty| self.contains(*ty))
    }
}

impl From<ValueType> for TypeSet {
    fn from(ty: ValueType) -> Self {
        TypeSet::of(ty)
    }
}

impl<const N: usize> From<[ValueType; N]> for TypeSet {
    fn from(types: [ValueType; N]) -> Self {
        types.into_iter().collect()
    }
}

impl FromIterator<ValueType> for TypeSet {
    fn from_iter<I: IntoIterator<Item = ValueType>>(iter: I) -> Self {
        iter.into_iter().fold(TypeSet::EMPTY, TypeSet::with)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str("any");
        }
        for (i, ty) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_accepts_integers_but_not_the_reverse() {
        let float = TypeSet::of(ValueType::Float);
        assert!(float.accepts(ValueType::Integer));
        assert!(!float.contains(ValueType::Integer));

        let int = TypeSet::of(ValueType::Integer);
        assert!(!int.accepts(ValueType::Float));
    }

    #[test]
    fn any_accepts_everything() {
        for ty in ValueType::ALL {
            assert!(TypeSet::ANY.accepts(ty));
        }
        assert_eq!(TypeSet::ANY.to_string(), "any");
    }

    #[test]
    fn display_lists_members_in_order() {
        let set = TypeSet::from([ValueType::String, ValueType::Null]);
        assert_eq!(set.to_string(), "null | string");
        assert!(TypeSet::EMPTY.is_empty());
    }
}
