//! Values that can sit in a record member.
//!
//! [`Field`] is implemented for:
//!
//! - integers, floats, `bool`, `char` and `String`
//! - `chrono::NaiveDateTime` (dates) and `chrono::TimeDelta` (durations)
//! - `Option<T>` (nullable slots)
//! - `Vec<T>`, `VecDeque<T>` and `Box<[T]>` (collections)
//! - `IndexMap<K, V>`, `HashMap<K, V>` and `BTreeMap<K, V>` (dictionaries)
//! - every [`Record`]
//! - [`Value`](crate::Value) (untyped slots)
//!
//! Enums get their implementation from [`enumeration!`](crate::enumeration)
//! and polymorphic slots from [`polymorphic!`](crate::polymorphic).
//!
//! ## Merge rules
//!
//! Reading into an existing value ([`Field::merge_field`]) replaces it, with
//! two exceptions: records merge member by member, and `Option<T>` holding a
//! value merges into that value. At the root ([`Field::merge_root`])
//! collections append and dictionaries insert.

use crate::de::EnumToken;
use crate::meta::short_type_name;
use crate::{Error, Reader, Record, Registry, Result, ValueKind, Writer};
use chrono::{NaiveDateTime, TimeDelta};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

/// A value that can be written and read by the engine.
pub trait Field: Sized + 'static {
    fn kind() -> ValueKind {
        ValueKind::Primitive
    }

    /// `true` for values allowed in compact records (numbers, strings, enums).
    fn is_simple() -> bool {
        false
    }

    /// `true` when a value may be written as a bare number literal.
    fn numeric() -> bool {
        false
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()>;

    fn read_field(r: &mut Reader<'_>) -> Result<Self>;

    /// Reads into an existing value. Replaces it unless overridden.
    fn merge_field(&mut self, r: &mut Reader<'_>) -> Result<()> {
        *self = Self::read_field(r)?;
        Ok(())
    }

    /// Writes a top-level value.
    fn write_root(&self, w: &mut Writer<'_>) -> Result<()> {
        self.write_field(w)
    }

    /// Reads a fresh top-level value.
    fn read_root(r: &mut Reader<'_>) -> Result<Self> {
        Self::read_field(r)
    }

    /// Reads into an existing top-level value.
    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        self.merge_field(r)
    }
}

impl<T: Record> Field for T {
    fn kind() -> ValueKind {
        ValueKind::Struct
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_record(self, false)
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut value = r.registry().entry::<T>()?.instantiate();
        r.read_record(&mut value)?;
        Ok(value)
    }

    fn merge_field(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_record(self)
    }

    fn write_root(&self, w: &mut Writer<'_>) -> Result<()> {
        let with_class = w.options().save_root_class;
        w.write_record(self, with_class)
    }

    fn read_root(r: &mut Reader<'_>) -> Result<Self> {
        let mut value = r.registry().entry::<T>()?.instantiate();
        r.read_record_root(&mut value)?;
        Ok(value)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_record_root(self)
    }
}

macro_rules! impl_small_integer {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                fn is_simple() -> bool {
                    true
                }

                fn numeric() -> bool {
                    true
                }

                fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
                    w.write_integer(self);
                    Ok(())
                }

                fn read_field(r: &mut Reader<'_>) -> Result<Self> {
                    r.read_integer(stringify!($ty), false)
                }
            }
        )*
    };
}

macro_rules! impl_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                fn is_simple() -> bool {
                    true
                }

                fn numeric() -> bool {
                    true
                }

                fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
                    w.write_int64(self);
                    Ok(())
                }

                fn read_field(r: &mut Reader<'_>) -> Result<Self> {
                    r.read_integer(stringify!($ty), true)
                }
            }
        )*
    };
}

impl_small_integer!(i8, i16, i32, u8, u16, u32);
impl_wide_integer!(i64, u64, isize, usize);

impl Field for f64 {
    fn is_simple() -> bool {
        true
    }

    fn numeric() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_f64(*self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_float()
    }
}

impl Field for f32 {
    fn is_simple() -> bool {
        true
    }

    fn numeric() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_f32(*self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_f32()
    }
}

impl Field for bool {
    fn is_simple() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_bool(*self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_bool()
    }
}

impl Field for String {
    fn is_simple() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_str(self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_string()
    }
}

impl Field for char {
    fn is_simple() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_char(*self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_char()
    }
}

impl Field for NaiveDateTime {
    fn is_simple() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_datetime(self)
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_datetime()
    }
}

impl Field for TimeDelta {
    fn is_simple() -> bool {
        true
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_duration(self);
        Ok(())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        r.read_duration()
    }
}

impl<T: Field> Field for Option<T> {
    fn kind() -> ValueKind {
        T::kind()
    }

    fn is_simple() -> bool {
        T::is_simple()
    }

    fn numeric() -> bool {
        T::numeric()
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        match self {
            Some(value) => value.write_field(w),
            None => {
                w.write_null();
                Ok(())
            }
        }
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        if r.read_null()? {
            Ok(None)
        } else {
            T::read_field(r).map(Some)
        }
    }

    fn merge_field(&mut self, r: &mut Reader<'_>) -> Result<()> {
        if r.read_null()? {
            *self = None;
            return Ok(());
        }
        match self {
            Some(value) => value.merge_field(r),
            None => {
                *self = Some(T::read_field(r)?);
                Ok(())
            }
        }
    }

    fn write_root(&self, w: &mut Writer<'_>) -> Result<()> {
        match self {
            Some(value) => value.write_root(w),
            None => {
                w.write_null();
                Ok(())
            }
        }
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        if r.read_null()? {
            *self = None;
            return Ok(());
        }
        match self {
            Some(value) => value.merge_root(r),
            None => {
                *self = Some(T::read_root(r)?);
                Ok(())
            }
        }
    }
}

impl<T: Field> Field for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::Collection
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_seq(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut items = Vec::new();
        items.merge_root(r)?;
        Ok(items)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_seq(|r| {
            self.push(T::read_field(r)?);
            Ok(())
        })
    }
}

impl<T: Field> Field for VecDeque<T> {
    fn kind() -> ValueKind {
        ValueKind::Collection
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_seq(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut items = VecDeque::new();
        items.merge_root(r)?;
        Ok(items)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_seq(|r| {
            self.push_back(T::read_field(r)?);
            Ok(())
        })
    }
}

/// Fixed-size arrays.
///
/// Readers driven by a generated codec also accept a leading element count
/// when the elements are never written as numbers. The count must match the
/// number of elements that follow.
impl<T: Field> Field for Box<[T]> {
    fn kind() -> ValueKind {
        ValueKind::Collection
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_seq(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let counted = r.is_generated() && !T::numeric();
        let mut items = Vec::new();
        r.read_seq_with_count(counted, |r| {
            items.push(T::read_field(r)?);
            Ok(())
        })?;
        Ok(items.into_boxed_slice())
    }
}

/// A type usable as a dictionary key.
///
/// Keys are written as strings. Types without a built-in parser use the one
/// registered with [`Registry::register_key_parser`].
pub trait MapKey: Sized + 'static {
    fn to_key(&self) -> String;

    fn from_key(text: &str, registry: &Registry) -> Option<Self> {
        registry.parse_key::<Self>(text)
    }
}

impl MapKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(text: &str, _registry: &Registry) -> Option<Self> {
        Some(text.to_string())
    }
}

macro_rules! impl_parsed_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                fn to_key(&self) -> String {
                    self.to_string()
                }

                fn from_key(text: &str, _registry: &Registry) -> Option<Self> {
                    text.parse().ok()
                }
            }
        )*
    };
}

impl_parsed_key!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize, bool, char);

fn read_key<K: MapKey>(r: &Reader<'_>, text: &str, pos: crate::Position) -> Result<K> {
    K::from_key(text, r.registry()).ok_or_else(|| {
        Error::type_mismatch(
            format!("key of type '{}'", short_type_name(std::any::type_name::<K>())),
            format!("\"{}\"", text),
            pos,
        )
    })
}

impl<K: MapKey + Hash + Eq, V: Field> Field for IndexMap<K, V> {
    fn kind() -> ValueKind {
        ValueKind::Dictionary
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_entries(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut map = IndexMap::new();
        map.merge_root(r)?;
        Ok(map)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_entries(|r, text, pos| {
            let key = read_key::<K>(r, &text, pos)?;
            let value = V::read_field(r)?;
            self.insert(key, value);
            Ok(())
        })
    }
}

impl<K: MapKey + Hash + Eq, V: Field> Field for HashMap<K, V> {
    fn kind() -> ValueKind {
        ValueKind::Dictionary
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_entries(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut map = HashMap::new();
        map.merge_root(r)?;
        Ok(map)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_entries(|r, text, pos| {
            let key = read_key::<K>(r, &text, pos)?;
            let value = V::read_field(r)?;
            self.insert(key, value);
            Ok(())
        })
    }
}

impl<K: MapKey + Ord, V: Field> Field for BTreeMap<K, V> {
    fn kind() -> ValueKind {
        ValueKind::Dictionary
    }

    fn write_field(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_entries(self.iter())
    }

    fn read_field(r: &mut Reader<'_>) -> Result<Self> {
        let mut map = BTreeMap::new();
        map.merge_root(r)?;
        Ok(map)
    }

    fn merge_root(&mut self, r: &mut Reader<'_>) -> Result<()> {
        r.read_entries(|r, text, pos| {
            let key = read_key::<K>(r, &text, pos)?;
            let value = V::read_field(r)?;
            self.insert(key, value);
            Ok(())
        })
    }
}

/// A fieldless enum with explicit ordinals. Implemented by
/// [`enumeration!`](crate::enumeration).
pub trait Enumeration: Copy + PartialEq + 'static {
    const TYPE_NAME: &'static str;

    /// `(name, ordinal, value)` for every variant, in declaration order.
    const VARIANTS: &'static [(&'static str, i64, Self)];

    fn name(&self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, _, v)| v == self)
            .map_or("", |(name, _, _)| *name)
    }

    fn ordinal(&self) -> i64 {
        Self::VARIANTS
            .iter()
            .find(|(_, _, v)| v == self)
            .map_or(0, |(_, ordinal, _)| *ordinal)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|(_, _, v)| *v)
    }

    fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(_, o, _)| *o == ordinal)
            .map(|(_, _, v)| *v)
    }
}

/// Writes an enum as its ordinal, or its name under [`Options::enum_as_string`](crate::Options::enum_as_string).
pub fn write_enum<E: Enumeration>(value: &E, w: &mut Writer<'_>) -> Result<()> {
    if w.options().enum_as_string {
        w.write_str(value.name());
    } else {
        w.write_integer(value.ordinal());
    }
    Ok(())
}

/// Reads an enum from its name or ordinal, quoted or not.
pub fn read_enum<E: Enumeration>(r: &mut Reader<'_>) -> Result<E> {
    let (token, pos) = r.read_enum_token(E::TYPE_NAME)?;
    let found = match &token {
        EnumToken::Ordinal(ordinal) => E::from_ordinal(*ordinal),
        EnumToken::Name(name) => E::from_name(name).or_else(|| {
            name.trim()
                .parse::<i64>()
                .ok()
                .and_then(E::from_ordinal)
        }),
    };
    found.ok_or_else(|| {
        let text = match token {
            EnumToken::Ordinal(ordinal) => ordinal.to_string(),
            EnumToken::Name(name) => format!("\"{}\"", name),
        };
        Error::type_mismatch(format!("'{}'", E::TYPE_NAME), text, pos)
    })
}

/// A sum over record types read by class tag. Implemented by
/// [`polymorphic!`](crate::polymorphic).
pub trait Polymorphic: Field {
    /// Name of the slot used in error messages.
    const SLOT: &'static str;

    /// The wrapped record.
    fn as_object(&self) -> &dyn crate::Object;
}

/// Reads a polymorphic slot: `{"class":"key", ...members}`.
///
/// `pick` maps the class key to a variant, returning `None` for keys outside
/// the slot.
pub fn read_polymorphic<P>(
    r: &mut Reader<'_>,
    slot: &str,
    pick: impl FnOnce(&str, &mut Reader<'_>) -> Result<Option<P>>,
) -> Result<P> {
    let (key, pos) = r.read_class_tag(slot)?;
    match pick(&key, r)? {
        Some(value) => Ok(value),
        None => Err(r.foreign_class(&key, pos, slot)),
    }
}

/// Reads the members of a record whose `"class"` tag was already consumed.
pub fn read_variant<T: Record>(r: &mut Reader<'_>) -> Result<T> {
    let entry = r.registry().entry::<T>()?;
    let mut value = entry.instantiate();
    r.read_record_after_class(&entry, &mut value)?;
    Ok(value)
}
