//! Ordered members of an untyped object.
//!
//! [`ValueMap`] backs [`Value::Map`](crate::Value::Map). It is an [`IndexMap`]
//! so an object read without a target type is written back in the order it
//! was read:
//!
//! ```rust
//! use serde_graph::{from_str_dynamic, to_string_with_options, Options};
//!
//! let value = from_str_dynamic(r#"{"z":1,"a":2}"#).unwrap();
//! let text = to_string_with_options(&value, &Options::compact()).unwrap();
//! assert_eq!(text, r#"{"z":1,"a":2}"#);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// Insertion-ordered string keys to [`Value`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap(IndexMap<String, Value>);

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    /// Sets `key`. A key that is already present keeps its position.
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes `key`, keeping the order of the remaining members.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// The class key when the first member is a string `"class"` tag.
    ///
    /// ```rust
    /// use serde_graph::{value, Value};
    ///
    /// let tagged = value!({ "class": "shapes.Circle", "R": 2 });
    /// assert_eq!(tagged.as_map().unwrap().class_key(), Some("shapes.Circle"));
    ///
    /// let late = value!({ "R": 2, "class": "shapes.Circle" });
    /// assert_eq!(late.as_map().unwrap().class_key(), None);
    /// ```
    #[must_use]
    pub fn class_key(&self) -> Option<&str> {
        match self.0.first() {
            Some((key, Value::String(class))) if key == "class" => Some(class),
            _ => None,
        }
    }

    /// Applies every member of `other`: new keys are appended, existing keys
    /// are overwritten in place.
    pub fn merge(&mut self, other: ValueMap) {
        self.0.extend(other.0);
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ValueMap(iter.into_iter().collect())
    }
}
