//! Object value type: an insertion-ordered string-keyed map.

use core::fmt::{self, Debug, Formatter};

use indexmap::IndexMap;
use indexmap::map;

use crate::value::Value;

/// An object value.
///
/// Keys keep the order in which they were first inserted. Equality ignores
/// order: two objects are equal when they hold the same keys bound to equal
/// values.
#[derive(Clone, Default, PartialEq)]
pub struct VObject {
    entries: IndexMap<String, Value>,
}

/// Iterator over `(key, value)` pairs of a [`VObject`].
pub type Iter<'a> = map::Iter<'a, String, Value>;

/// Iterator over the keys of a [`VObject`].
pub type Keys<'a> = map::Keys<'a, String, Value>;

/// Iterator over the values of a [`VObject`].
pub type Values<'a> = map::Values<'a, String, Value>;

impl VObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object with room for `cap` entries.
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(cap),
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Gets a mutable value by key.
    #[must_use]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Checks if the object contains a key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts a key-value pair, returning the previous value.
    ///
    /// An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> Keys<'_> {
        self.entries.keys()
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> Values<'_> {
        self.entries.values()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        self.entries.iter()
    }
}

impl Debug for VObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for VObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for VObject {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a> IntoIterator for &'a VObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for VObject {
    type Item = (String, Value);
    type IntoIter = map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut obj = VObject::new();
        obj.insert("b", 1);
        obj.insert("a", 2);
        obj.insert("c", 3);
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn reinsert_keeps_position() {
        let mut obj: VObject = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(obj.insert("x", 10), Some(Value::from(1)));
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["x", "y"]);
    }

    #[test]
    fn remove_shifts_remaining_entries() {
        let mut obj: VObject = [("x", 1), ("y", 2), ("z", 3)].into_iter().collect();
        obj.remove("x");
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["y", "z"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: VObject = [("x", 1), ("y", 2)].into_iter().collect();
        let b: VObject = [("y", 2), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
    }
}
