//! Type registry: cached member models, class keys and key parsers.
//!
//! A [`Registry`] is the meta-information cache shared by a writer and a
//! reader. It extracts each record's [`TypeEntry`] on first use, keeps the
//! result (or the declaration error) for later calls, and maps class keys back
//! to constructors for polymorphic and untyped slots.
//!
//! The registry is single-threaded (`!Sync`). The free functions in the crate
//! root use one registry per thread; create your own to isolate id assignment
//! or registrations.
//!
//! ```rust
//! use serde_graph::{Describe, Options, Record, Registry};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Record for Point {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.member("X", |p| &p.x, |p| &mut p.x);
//!         d.member("Y", |p| &p.y, |p| &mut p.y);
//!     }
//! }
//!
//! let registry = Registry::new();
//! let options = Options::compact();
//! let text = registry.to_string(&Point { x: 1, y: 2 }, &options).unwrap();
//! assert_eq!(text, r#"{"X":1,"Y":2}"#);
//!
//! let back: Point = registry.from_str(&text, &options).unwrap();
//! assert_eq!(back, Point { x: 1, y: 2 });
//! ```

use crate::meta::{Describe, TypeEntry};
use crate::object::Object;
use crate::{Error, Field, Options, Reader, Record, Result, Value, Writer};
use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

type Construct = fn(&mut Reader<'_>) -> Result<Box<dyn Object>>;

/// A class key known to the registry.
#[derive(Clone)]
pub struct ClassInfo {
    pub type_id: TypeId,
    pub type_name: String,
    construct: Construct,
}

impl ClassInfo {
    /// Reads the members that follow the `"class"` tag into a fresh instance.
    pub(crate) fn construct(&self, r: &mut Reader<'_>) -> Result<Box<dyn Object>> {
        (self.construct)(r)
    }
}

impl fmt::Debug for ClassInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassInfo")
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn construct_record<T: Record>(r: &mut Reader<'_>) -> Result<Box<dyn Object>> {
    let entry = r.registry().entry::<T>()?;
    let mut value = entry.instantiate();
    r.read_record_after_class(&entry, &mut value)?;
    Ok(Box::new(value))
}

/// Cache of member models keyed by type.
pub struct Registry {
    entries: RefCell<HashMap<TypeId, Box<dyn Any>>>,
    classes: RefCell<IndexMap<String, ClassInfo>>,
    key_parsers: RefCell<HashMap<TypeId, Box<dyn Any>>>,
    next_id: Cell<u64>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Registry {
            entries: RefCell::new(HashMap::new()),
            classes: RefCell::new(IndexMap::new()),
            key_parsers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    /// Runs `f` with this thread's shared registry.
    pub fn with_default<R>(f: impl FnOnce(&Registry) -> R) -> R {
        thread_local! {
            static DEFAULT: Registry = Registry::new();
        }
        DEFAULT.with(f)
    }

    /// Returns the member model of `T`, extracting it on first use.
    ///
    /// Declaration errors are cached: every later call fails the same way.
    pub fn entry<T: Record>(&self) -> Result<Rc<TypeEntry<T>>> {
        let type_id = TypeId::of::<T>();
        if let Some(cached) = self.entries.borrow().get(&type_id) {
            if let Some(cached) = cached.downcast_ref::<Result<Rc<TypeEntry<T>>>>() {
                return cached.clone();
            }
        }

        let mut describe = Describe::<T>::new();
        T::describe(&mut describe);
        let built = TypeEntry::build(describe, || self.next_id())
            .and_then(|entry| self.add_class::<T>(&entry).map(|()| Rc::new(entry)));

        match &built {
            Ok(entry) => log::debug!(
                "registered '{}' as '{}' with {} member(s)",
                entry.type_name(),
                entry.class_key(),
                entry.members().len()
            ),
            Err(err) => log::warn!("{}", err),
        }
        self.entries
            .borrow_mut()
            .insert(type_id, Box::new(built.clone()));
        built
    }

    /// Makes `T` known by class key so untyped slots can construct it.
    pub fn register<T: Record>(&self) -> Result<()> {
        self.entry::<T>().map(|_| ())
    }

    fn add_class<T: Record>(&self, entry: &TypeEntry<T>) -> Result<()> {
        let mut classes = self.classes.borrow_mut();
        if let Some(existing) = classes.get(entry.class_key()) {
            if existing.type_id != TypeId::of::<T>() {
                return Err(Error::declaration(
                    entry.type_name(),
                    format!(
                        "class key '{}' is already used by '{}'",
                        entry.class_key(),
                        existing.type_name
                    ),
                ));
            }
            return Ok(());
        }
        log::trace!("class key '{}' maps to '{}'", entry.class_key(), entry.type_name());
        classes.insert(
            entry.class_key().to_string(),
            ClassInfo {
                type_id: TypeId::of::<T>(),
                type_name: entry.type_name().to_string(),
                construct: construct_record::<T>,
            },
        );
        Ok(())
    }

    /// Looks up a class key.
    #[must_use]
    pub fn resolve(&self, class_key: &str) -> Option<ClassInfo> {
        self.classes.borrow().get(class_key).cloned()
    }

    /// Class keys registered so far, in registration order.
    #[must_use]
    pub fn class_keys(&self) -> Vec<String> {
        self.classes.borrow().keys().cloned().collect()
    }

    /// Registers the parser used for dictionary keys of type `K`.
    ///
    /// Replaces any earlier parser for `K`.
    pub fn register_key_parser<K: 'static>(&self, parse: fn(&str) -> Option<K>) {
        self.key_parsers
            .borrow_mut()
            .insert(TypeId::of::<K>(), Box::new(parse));
    }

    /// Parses a dictionary key with the parser registered for `K`.
    ///
    /// Returns `None` if no parser is registered or the parser rejects `text`.
    #[must_use]
    pub fn parse_key<K: 'static>(&self, text: &str) -> Option<K> {
        let parsers = self.key_parsers.borrow();
        let parse = parsers
            .get(&TypeId::of::<K>())?
            .downcast_ref::<fn(&str) -> Option<K>>()?;
        parse(text)
    }

    /// Draws the next value of the registry-wide id counter.
    ///
    /// The first call returns 1. Member ids in [`TagMode::Ids`](crate::TagMode)
    /// come from this counter.
    pub fn next_id(&self) -> u64 {
        let next = self.next_id.get() + 1;
        self.next_id.set(next);
        next
    }

    /// Writes `value` as text.
    pub fn to_string<T: Field>(&self, value: &T, options: &Options) -> Result<String> {
        let mut writer = Writer::new(options, self);
        value.write_root(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Reads a fresh `T` from `input`.
    pub fn from_str<T: Field>(&self, input: &str, options: &Options) -> Result<T> {
        let mut reader = Reader::new(input, options, self);
        let value = T::read_root(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }

    /// Reads `input` into an existing `target`, keeping members the input omits.
    pub fn merge_from_str<T: Field>(&self, input: &str, target: &mut T, options: &Options) -> Result<()> {
        let mut reader = Reader::new(input, options, self);
        target.merge_root(&mut reader)?;
        reader.finish()
    }

    /// Reads `input` without a target type.
    pub fn read_value(&self, input: &str, options: &Options) -> Result<Value> {
        let mut reader = Reader::new(input, options, self);
        let value = reader.read_value()?;
        reader.finish()?;
        Ok(value)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.entries.borrow().len())
            .field("classes", &self.class_keys())
            .field("next_id", &self.next_id.get())
            .finish()
    }
}
