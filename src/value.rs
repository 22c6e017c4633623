//! Dynamic value representation for untyped slots.
//!
//! This module provides the [`Value`] enum, used for members whose type is not
//! known statically and for reading text without a target type
//! ([`from_str_dynamic`](crate::from_str_dynamic)).
//!
//! ## Core Types
//!
//! - [`Value`]: null, bool, number, string, list, map, or a typed record
//! - [`ValueMap`]: the ordered map behind [`Value::Map`]
//!
//! An object whose first tag is `"class"` naming a registered record is read
//! as [`Value::Typed`], holding an instance of that record.
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use serde_graph::{value, Value};
//!
//! let null = Value::Null;
//! let number = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = value!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_map());
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use serde_graph::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! let num: i64 = i64::try_from(value).unwrap();
//! assert_eq!(num, 42);
//! ```
//!
//! ### Interop with serde
//!
//! `Value` implements `Serialize` and `Deserialize`, so it can move between
//! this crate and any serde format. Typed records are serialized as maps
//! holding their `"class"` tag and members, resolved through the thread's
//! default registry unless the value is bound with [`Value::in_registry`].

use crate::object::Object;
use crate::{Error, Field, Options, Reader, Record, Registry, Result, ValueKind, ValueMap, Writer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed value.
///
/// # Examples
///
/// ```rust
/// use serde_graph::Value;
///
/// let null = Value::Null;
/// let num = Value::Number(42.0);
/// let text = Value::String("hello".to_string());
///
/// assert!(null.is_null());
/// assert!(num.is_number());
/// assert!(text.is_string());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Typed(Box<dyn Object>),
}

impl Value {
    /// Wraps a record so it is written with its `"class"` tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::{Describe, Record, Value};
    ///
    /// #[derive(Debug, Clone, PartialEq, Default)]
    /// struct Tag {
    ///     n: i32,
    /// }
    ///
    /// impl Record for Tag {
    ///     fn describe(d: &mut Describe<Self>) {
    ///         d.member("N", |t| &t.n, |t| &mut t.n);
    ///     }
    /// }
    ///
    /// let value = Value::typed(Tag { n: 3 });
    /// assert_eq!(value.as_typed::<Tag>(), Some(&Tag { n: 3 }));
    /// ```
    pub fn typed<T: Record>(record: T) -> Self {
        Value::Typed(Box::new(record))
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        matches!(self, Value::Typed(_))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as an `i64` if it is integral and in range.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::Value;
    ///
    /// assert_eq!(Value::from(42).as_i64(), Some(42));
    /// assert_eq!(Value::from(4.5).as_i64(), None);
    /// ```
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the typed record if it is a `T`.
    #[must_use]
    pub fn as_typed<T: Record>(&self) -> Option<&T> {
        match self {
            Value::Typed(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Replaces typed records with plain maps that keep their `"class"` tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_graph::{Describe, Record, Registry, Value};
    ///
    /// #[derive(Debug, Clone, PartialEq, Default)]
    /// struct Tag {
    ///     n: i32,
    /// }
    ///
    /// impl Record for Tag {
    ///     fn describe(d: &mut Describe<Self>) {
    ///         d.class_key("demo.Tag");
    ///         d.member("N", |t| &t.n, |t| &mut t.n);
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// let plain = Value::typed(Tag { n: 3 }).to_plain(&registry).unwrap();
    /// let map = plain.as_map().unwrap();
    /// assert_eq!(map.get("class").and_then(|v| v.as_str()), Some("demo.Tag"));
    /// assert_eq!(map.get("N").and_then(|v| v.as_i64()), Some(3));
    /// ```
    pub fn to_plain(&self, registry: &Registry) -> Result<Value> {
        match self {
            Value::Typed(_) => {
                let options = Options::compact();
                let text = registry.to_string(self, &options)?;
                let mut reader = Reader::new(&text, &options, registry);
                let plain = reader.read_plain_value()?;
                reader.finish()?;
                Ok(plain)
            }
            Value::List(items) => items
                .iter()
                .map(|item| item.to_plain(registry))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| v.to_plain(registry).map(|v| (k.clone(), v)))
                .collect::<Result<ValueMap>>()
                .map(Value::Map),
            other => Ok(other.clone()),
        }
    }
}

impl Field for Value {
    fn kind() -> ValueKind {
        ValueKind::Interface
    }

    fn numeric() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        match self {
            Value::Null => w.write_null(),
            Value::Bool(b) => w.write_bool(*b),
            Value::Number(n) => w.write_f64(*n),
            Value::String(s) => w.write_str(s),
            Value::List(items) => return w.write_seq(items.iter()),
            Value::Map(map) => return w.write_entries(map.iter()),
            Value::Typed(object) => return object.write_object(w),
        }
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_value()
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        match (&mut *self, r.read_value()?) {
            (Value::Map(map), Value::Map(incoming)) => map.merge(incoming),
            (Value::List(items), Value::List(incoming)) => items.extend(incoming),
            (slot, incoming) => *slot = incoming,
        }
        Ok(())
    }
}

/// A [`Value`] paired with the registry its typed records belong to.
///
/// Created by [`Value::in_registry`]. Its `Display` and `Serialize` impls
/// resolve typed records through that registry.
#[derive(Clone, Copy)]
pub struct BoundValue<'a> {
    value: &'a Value,
    registry: &'a Registry,
}

impl Value {
    /// Binds this value to `registry` for display and serde output.
    ///
    /// ```rust
    /// use serde_graph::{Describe, Record, Registry, Value};
    ///
    /// #[derive(Debug, Clone, PartialEq, Default)]
    /// struct Tag {
    ///     n: i32,
    /// }
    ///
    /// impl Record for Tag {
    ///     fn describe(d: &mut Describe<Self>) {
    ///         d.class_key("demo.Tag");
    ///         d.member("N", |t| &t.n, |t| &mut t.n);
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// let value = Value::typed(Tag { n: 3 });
    /// assert_eq!(value.in_registry(&registry).to_string(), r#"{"class":"demo.Tag","N":3}"#);
    /// ```
    #[must_use]
    pub fn in_registry<'a>(&'a self, registry: &'a Registry) -> BoundValue<'a> {
        BoundValue { value: self, registry }
    }
}

impl fmt::Display for BoundValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .registry
            .to_string(self.value, &Options::compact())
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for BoundValue<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::Error as _;
        self.value
            .to_plain(self.registry)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

impl fmt::Debug for BoundValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.value, f)
    }
}

/// Compact text of the value. Typed records are resolved through this
/// thread's default registry; use [`Value::in_registry`] for any other.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Registry::with_default(|registry| fmt::Display::fmt(&self.in_registry(registry), f))
    }
}

/// Typed records are serialized as plain maps through this thread's default
/// registry; use [`Value::in_registry`] for any other.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for element in items {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Typed(_) => {
                Registry::with_default(|registry| self.in_registry(registry).serialize(serializer))
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Number(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ValueMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch("integer", format!("{:?}", value), crate::Position::NONE))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(n),
            other => Err(Error::type_mismatch("number", format!("{:?}", other), crate::Position::NONE)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(Error::type_mismatch("bool", format!("{:?}", other), crate::Position::NONE)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("string", format!("{:?}", other), crate::Position::NONE)),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}
