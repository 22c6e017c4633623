//! Member model: what a type exposes to the serializer.
//!
//! Rust has no runtime reflection, so every serializable record states its
//! members once, through [`Record::describe`]. The [`Registry`](crate::Registry)
//! turns that description into a [`TypeEntry`] on first use and caches it,
//! including any declaration error.
//!
//! ## Declaring a record
//!
//! ```rust
//! use serde_graph::{Describe, Record};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Sample {
//!     x: i32,
//!     y: String,
//!     cache: Vec<u8>, // not declared, never serialized
//! }
//!
//! impl Default for Sample {
//!     fn default() -> Self {
//!         Sample { x: 0, y: "zzz".to_string(), cache: Vec::new() }
//!     }
//! }
//!
//! impl Record for Sample {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.class_key("demo.Sample");
//!         d.member("X", |s| &s.x, |s| &mut s.x);
//!         d.defaulted("Y", "zzz".to_string(), |s| &s.y, |s| &mut s.y);
//!     }
//! }
//! ```
//!
//! ## Member order
//!
//! Members keep the order in which they are declared. Members flattened from a
//! [`Describe::base`] record always come first, in the base's own order.

use crate::delegate::Delegate;
use crate::tags::{self, Tags};
use crate::{Error, Field, Options, Reader, Result, TagMode, Writer};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shape of a member value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Primitive,
    Struct,
    Collection,
    Dictionary,
    Interface,
    Enum,
    Delegate,
}

/// A type whose members are serialized through the registry.
///
/// Implementors list their members in [`Record::describe`]. Fields that are
/// not declared there never reach the wire.
pub trait Record: Default + Clone + PartialEq + fmt::Debug + 'static {
    fn describe(d: &mut Describe<Self>);
}

/// Identity of a flattened base record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseType {
    pub type_id: TypeId,
    pub type_name: String,
}

/// Static description of one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: String,
    pub tags: Tags,
    pub declared_order: usize,
    pub kind: ValueKind,
    pub optional: bool,
    pub has_default: bool,
    pub simple: bool,
    explicit_alias: Option<String>,
}

impl MemberDescriptor {
    fn new(name: &str, kind: ValueKind, simple: bool) -> Self {
        MemberDescriptor {
            name: name.to_string(),
            tags: Tags {
                name: name.to_string(),
                alias: String::new(),
                id: String::new(),
            },
            declared_order: 0,
            kind,
            optional: false,
            has_default: false,
            simple,
            explicit_alias: None,
        }
    }

    /// Pins the alias used in [`TagMode::Aliases`] instead of the generated one.
    pub fn alias(&mut self, alias: &str) -> &mut Self {
        self.explicit_alias = Some(alias.to_string());
        self
    }

    /// Returns the wire tag for `mode`.
    #[must_use]
    pub fn tag(&self, mode: TagMode) -> &str {
        self.tags.get(mode)
    }
}

pub(crate) type WriteFn<T> = Rc<dyn Fn(&T, &mut Writer<'_>) -> Result<()>>;
pub(crate) type ReadFn<T> = Rc<dyn Fn(&mut T, &mut Reader<'_>) -> Result<()>>;
type DefaultFn<T> = Rc<dyn Fn(&T) -> bool>;
type ResetFn<T> = Rc<dyn Fn(&mut T)>;
type HookFn<T> = Rc<dyn Fn(&mut T)>;

/// One member of a record: its descriptor plus typed accessors.
pub struct Member<T> {
    descriptor: MemberDescriptor,
    write: WriteFn<T>,
    read: ReadFn<T>,
    is_default: Option<DefaultFn<T>>,
    reset: Option<ResetFn<T>>,
}

impl<T: 'static> Member<T> {
    #[must_use]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.descriptor
    }

    /// Writes this member's value (without its tag).
    pub fn write(&self, value: &T, w: &mut Writer<'_>) -> Result<()> {
        (self.write)(value, w)
    }

    /// Reads this member's value into `target`.
    pub fn read(&self, target: &mut T, r: &mut Reader<'_>) -> Result<()> {
        (self.read)(target, r)
    }

    /// Returns `true` if the member has a declared default and currently equals it.
    #[must_use]
    pub fn is_default(&self, value: &T) -> bool {
        self.is_default.as_ref().is_some_and(|check| check(value))
    }

    fn reset(&self, target: &mut T) {
        if let Some(reset) = &self.reset {
            reset(target);
        }
    }

    fn project<O: 'static>(self, get: fn(&O) -> &T, get_mut: fn(&mut O) -> &mut T) -> Member<O> {
        let write = self.write;
        let read = self.read;
        Member {
            descriptor: self.descriptor,
            write: Rc::new(move |o: &O, w: &mut Writer<'_>| write(get(o), w)),
            read: Rc::new(move |o: &mut O, r: &mut Reader<'_>| read(get_mut(o), r)),
            is_default: self.is_default.map(|check| {
                Rc::new(move |o: &O| check(get(o))) as DefaultFn<O>
            }),
            reset: self
                .reset
                .map(|reset| Rc::new(move |o: &mut O| reset(get_mut(o))) as ResetFn<O>),
        }
    }
}

/// Item list of a collection-like record.
pub(crate) struct Items<T> {
    pub(crate) kind: ValueKind,
    pub(crate) write: WriteFn<T>,
    pub(crate) read: ReadFn<T>,
    pub(crate) append: ReadFn<T>,
}

/// Builder passed to [`Record::describe`].
pub struct Describe<T> {
    type_name: String,
    class_key: Option<String>,
    base: Option<BaseType>,
    base_members: Vec<Member<T>>,
    members: Vec<Member<T>>,
    compact: bool,
    items: Option<Items<T>>,
    after_read: Vec<HookFn<T>>,
    problems: Vec<String>,
}

impl<T: Record> Describe<T> {
    pub(crate) fn new() -> Self {
        Describe {
            type_name: short_type_name(std::any::type_name::<T>()),
            class_key: None,
            base: None,
            base_members: Vec::new(),
            members: Vec::new(),
            compact: false,
            items: None,
            after_read: Vec::new(),
            problems: Vec::new(),
        }
    }

    /// Sets the string written under the `"class"` tag.
    ///
    /// Defaults to the fully qualified Rust type name.
    pub fn class_key(&mut self, key: &str) -> &mut Self {
        self.class_key = Some(key.to_string());
        self
    }

    /// Declares a required member.
    pub fn member<F: Field>(
        &mut self,
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut MemberDescriptor {
        let member = Member {
            descriptor: MemberDescriptor::new(name, F::kind(), F::is_simple()),
            write: Rc::new(move |t: &T, w: &mut Writer<'_>| get(t).write_field(w)),
            read: Rc::new(move |t: &mut T, r: &mut Reader<'_>| get_mut(t).merge_field(r)),
            is_default: None,
            reset: None,
        };
        self.push(member)
    }

    /// Declares an optional member. It is always written but may be absent on read.
    pub fn optional<F: Field>(
        &mut self,
        name: &str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut MemberDescriptor {
        let descriptor = self.member(name, get, get_mut);
        descriptor.optional = true;
        descriptor
    }

    /// Declares an optional member with a default value.
    ///
    /// The member is omitted on write while it equals `default`, and fresh
    /// instances start from `default`.
    pub fn defaulted<F: Field + PartialEq + Clone>(
        &mut self,
        name: &str,
        default: F,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> &mut MemberDescriptor {
        let compare = default.clone();
        let member = Member {
            descriptor: MemberDescriptor {
                optional: true,
                has_default: true,
                ..MemberDescriptor::new(name, F::kind(), F::is_simple())
            },
            write: Rc::new(move |t: &T, w: &mut Writer<'_>| get(t).write_field(w)),
            read: Rc::new(move |t: &mut T, r: &mut Reader<'_>| get_mut(t).merge_field(r)),
            is_default: Some(Rc::new(move |t: &T| *get(t) == compare)),
            reset: Some(Rc::new(move |t: &mut T| *get_mut(t) = default.clone())),
        };
        self.push(member)
    }

    /// Declares a bound-method member.
    ///
    /// The handler's name is written; on read the name is looked up in
    /// `handlers` and bound on the instance being read.
    pub fn delegate<A: 'static>(
        &mut self,
        name: &str,
        get: fn(&T) -> &Delegate<T, A>,
        get_mut: fn(&mut T) -> &mut Delegate<T, A>,
        handlers: &'static [(&'static str, fn(&mut T, A))],
    ) -> &mut MemberDescriptor {
        let member = Member {
            descriptor: MemberDescriptor {
                optional: true,
                ..MemberDescriptor::new(name, ValueKind::Delegate, true)
            },
            write: Rc::new(move |t: &T, w: &mut Writer<'_>| {
                match get(t).name() {
                    Some(handler) => w.write_str(handler),
                    None => w.write_null(),
                }
                Ok(())
            }),
            read: Rc::new(move |t: &mut T, r: &mut Reader<'_>| {
                if r.read_null()? {
                    get_mut(t).unbind();
                    return Ok(());
                }
                let (handler, pos) = r.read_string_at()?;
                let (found, func) = handlers
                    .iter()
                    .find(|(candidate, _)| *candidate == handler)
                    .ok_or_else(|| {
                        Error::unknown_handler(&handler, &short_type_name(std::any::type_name::<T>()), pos)
                    })?;
                get_mut(t).bind(found, *func);
                Ok(())
            }),
            is_default: None,
            reset: None,
        };
        self.push(member)
    }

    /// Flattens the members of base record `B` in front of this record's own.
    pub fn base<B: Record>(&mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> &mut Self {
        let mut inner = Describe::<B>::new();
        B::describe(&mut inner);

        if self.base.is_some() {
            self.problems.push("more than one base type".to_string());
        }
        if inner.items.is_some() {
            self.problems
                .push(format!("base type '{}' is a collection", inner.type_name));
        }
        self.problems.extend(inner.problems.drain(..));
        self.base = Some(BaseType {
            type_id: TypeId::of::<B>(),
            type_name: inner.type_name.clone(),
        });

        for member in inner.base_members.into_iter().chain(inner.members) {
            self.base_members.push(member.project(get, get_mut));
        }
        for hook in inner.after_read {
            self.after_read
                .push(Rc::new(move |t: &mut T| hook(get_mut(t))));
        }
        self
    }

    /// Marks the record as a candidate for positional-array rendering.
    pub fn compact(&mut self) -> &mut Self {
        self.compact = true;
        self
    }

    /// Marks the record as collection-like: it is written as its item list.
    pub fn items<F: Field>(&mut self, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> &mut Self {
        if self.items.is_some() {
            self.problems.push("item list declared twice".to_string());
        }
        self.items = Some(Items {
            kind: F::kind(),
            write: Rc::new(move |t: &T, w: &mut Writer<'_>| get(t).write_field(w)),
            read: Rc::new(move |t: &mut T, r: &mut Reader<'_>| get_mut(t).merge_field(r)),
            append: Rc::new(move |t: &mut T, r: &mut Reader<'_>| get_mut(t).merge_root(r)),
        });
        self
    }

    /// Registers a hook run after every successful object read.
    pub fn after_read(&mut self, hook: fn(&mut T)) -> &mut Self {
        self.after_read.push(Rc::new(hook));
        self
    }

    fn push(&mut self, member: Member<T>) -> &mut MemberDescriptor {
        self.members.push(member);
        let last = self.members.len() - 1;
        &mut self.members[last].descriptor
    }
}

/// Extracted, validated member model of a record.
pub struct TypeEntry<T> {
    type_name: String,
    class_key: String,
    base: Option<BaseType>,
    members: Vec<Member<T>>,
    compact: bool,
    items: Option<Items<T>>,
    after_read: Vec<HookFn<T>>,
    by_name: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl<T: Record> TypeEntry<T> {
    /// Validates the description and assigns tags.
    ///
    /// `next_id` is called once per member, in member order, after validation
    /// has succeeded.
    pub(crate) fn build(describe: Describe<T>, mut next_id: impl FnMut() -> u64) -> Result<Self> {
        let Describe {
            type_name,
            class_key,
            base,
            base_members,
            members: own_members,
            compact,
            items,
            after_read,
            problems,
        } = describe;

        if let Some(problem) = problems.into_iter().next() {
            return Err(Error::declaration(&type_name, problem));
        }
        if items.is_some() && !(own_members.is_empty() && base_members.is_empty()) {
            return Err(Error::declaration(
                &type_name,
                "collection type also declares members",
            ));
        }
        if let Some(items) = &items {
            if !matches!(items.kind, ValueKind::Collection | ValueKind::Dictionary) {
                return Err(Error::declaration(
                    &type_name,
                    format!("item list must be a collection, not {:?}", items.kind),
                ));
            }
        }

        let mut members: Vec<Member<T>> = base_members.into_iter().chain(own_members).collect();
        let mut by_name = HashMap::with_capacity(members.len());
        let mut by_alias = HashMap::with_capacity(members.len());

        for (index, member) in members.iter_mut().enumerate() {
            let descriptor = &mut member.descriptor;
            descriptor.declared_order = index;

            if descriptor.name == "class" {
                return Err(Error::declaration(
                    &type_name,
                    "member name 'class' is reserved",
                ));
            }
            if compact && !descriptor.simple {
                return Err(Error::declaration(
                    &type_name,
                    format!("compact type member '{}' is not a simple value", descriptor.name),
                ));
            }
            if by_name.insert(descriptor.name.clone(), index).is_some() {
                return Err(Error::declaration(
                    &type_name,
                    format!("duplicate member '{}'", descriptor.name),
                ));
            }

            let alias = descriptor
                .explicit_alias
                .clone()
                .unwrap_or_else(|| tags::alias(index));
            if by_alias.insert(alias.clone(), index).is_some() {
                return Err(Error::declaration(
                    &type_name,
                    format!("duplicate alias '{}' on member '{}'", alias, descriptor.name),
                ));
            }
            descriptor.tags.alias = alias;
        }

        let mut by_id = HashMap::with_capacity(members.len());
        for (index, member) in members.iter_mut().enumerate() {
            let id = tags::id(next_id());
            by_id.insert(id.clone(), index);
            member.descriptor.tags.id = id;
        }

        Ok(TypeEntry {
            class_key: class_key.unwrap_or_else(|| std::any::type_name::<T>().to_string()),
            type_name,
            base,
            members,
            compact,
            items,
            after_read,
            by_name,
            by_alias,
            by_id,
        })
    }

    /// Short type name used in messages (`Sample1`, `Holder<i32>`).
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn class_key(&self) -> &str {
        &self.class_key
    }

    #[must_use]
    pub fn base_type(&self) -> Option<&BaseType> {
        self.base.as_ref()
    }

    #[must_use]
    pub fn members(&self) -> &[Member<T>] {
        &self.members
    }

    /// Member descriptors in declared order.
    pub fn descriptors(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().map(|m| &m.descriptor)
    }

    #[must_use]
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.items.is_some()
    }

    pub(crate) fn items(&self) -> Option<&Items<T>> {
        self.items.as_ref()
    }

    /// Resolves a wire tag to a member index (`FromTag`).
    #[must_use]
    pub fn find(&self, tag: &str, mode: TagMode) -> Option<usize> {
        let table = match mode {
            TagMode::Names => &self.by_name,
            TagMode::Aliases => &self.by_alias,
            TagMode::Ids => &self.by_id,
        };
        table.get(tag).copied()
    }

    /// Rejects memberless records unless the options allow them.
    pub fn check_usable(&self, options: &Options) -> Result<()> {
        if self.members.is_empty() && self.items.is_none() && !options.allow_empty_types {
            log::warn!("type '{}' has no serializable members", self.type_name);
            return Err(Error::declaration(&self.type_name, "no serializable members"));
        }
        Ok(())
    }

    /// Creates a fresh instance with declared defaults applied.
    #[must_use]
    pub fn instantiate(&self) -> T {
        let mut value = T::default();
        for member in &self.members {
            member.reset(&mut value);
        }
        value
    }

    pub(crate) fn finish_read(&self, target: &mut T) {
        for hook in &self.after_read {
            hook(target);
        }
    }
}

impl<T> fmt::Debug for TypeEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("type_name", &self.type_name)
            .field("class_key", &self.class_key)
            .field("base", &self.base)
            .field(
                "members",
                &self.members.iter().map(|m| &m.descriptor).collect::<Vec<_>>(),
            )
            .field("compact", &self.compact)
            .field("collection", &self.items.is_some())
            .finish()
    }
}

/// Strips module paths from a Rust type name, keeping generic arguments.
///
/// ```rust
/// use serde_graph::meta::short_type_name;
///
/// assert_eq!(short_type_name("app::model::Point"), "Point");
/// assert_eq!(short_type_name("app::Holder<alloc::string::String>"), "Holder<String>");
/// ```
#[must_use]
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                out.push_str(segment.rsplit("::").next().unwrap_or(""));
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(""));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Base {
        f_base: i32,
    }

    impl Default for Base {
        fn default() -> Self {
            Base { f_base: 0 }
        }
    }

    impl Record for Base {
        fn describe(d: &mut Describe<Self>) {
            d.member("FBase", |s| &s.f_base, |s| &mut s.f_base);
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Derived {
        base: Base,
        fa: i32,
        label: String,
    }

    impl Record for Derived {
        fn describe(d: &mut Describe<Self>) {
            d.member("FA", |s| &s.fa, |s| &mut s.fa);
            d.defaulted("Label", "none".to_string(), |s| &s.label, |s| &mut s.label);
            d.base(|s| &s.base, |s| &mut s.base);
        }
    }

    fn build<T: Record>() -> Result<TypeEntry<T>> {
        let mut d = Describe::<T>::new();
        T::describe(&mut d);
        let mut counter = 0;
        TypeEntry::build(d, || {
            counter += 1;
            counter
        })
    }

    #[test]
    fn test_base_members_come_first() {
        let entry = build::<Derived>().unwrap();
        let names: Vec<_> = entry.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["FBase", "FA", "Label"]);
        assert_eq!(entry.base_type().unwrap().type_name, "Base");
    }

    #[test]
    fn test_tags_assigned_in_order() {
        let entry = build::<Derived>().unwrap();
        let aliases: Vec<_> = entry.descriptors().map(|d| d.tag(TagMode::Aliases)).collect();
        assert_eq!(aliases, vec!["a", "b", "c"]);
        let ids: Vec<_> = entry.descriptors().map(|d| d.tag(TagMode::Ids)).collect();
        assert_eq!(ids, vec!["AAAB", "AAAC", "AAAD"]);
        assert_eq!(entry.find("b", TagMode::Aliases), Some(1));
        assert_eq!(entry.find("FA", TagMode::Names), Some(1));
        assert_eq!(entry.find("FA", TagMode::Aliases), None);
    }

    #[test]
    fn test_instantiate_applies_defaults() {
        let entry = build::<Derived>().unwrap();
        let fresh = entry.instantiate();
        assert_eq!(fresh.label, "none");
        assert!(entry.members()[2].is_default(&fresh));
        assert!(!entry.members()[1].is_default(&fresh));
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Duplicate {
        f: i32,
    }

    impl Record for Duplicate {
        fn describe(d: &mut Describe<Self>) {
            d.member("F", |s| &s.f, |s| &mut s.f);
            d.member("F", |s| &s.f, |s| &mut s.f);
        }
    }

    #[test]
    fn test_duplicate_member_is_declaration_error() {
        let err = build::<Duplicate>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Declaration);
        assert!(err.to_string().contains("'F'"));
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct ScalarItems {
        n: i32,
    }

    impl Record for ScalarItems {
        fn describe(d: &mut Describe<Self>) {
            d.items(|s| &s.n, |s| &mut s.n);
        }
    }

    #[test]
    fn test_item_list_must_be_a_collection() {
        let err = build::<ScalarItems>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Declaration);
        assert!(err.to_string().contains("Primitive"));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("Sample"), "Sample");
        assert_eq!(short_type_name("a::b::Sample"), "Sample");
        assert_eq!(
            short_type_name("a::Map<alloc::string::String, b::Key>"),
            "Map<String, Key>"
        );
    }
}
