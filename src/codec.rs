//! Codecs: reusable write/read pairs bound to one record type.
//!
//! Two implementations of [`Codec`] exist:
//!
//! - [`ReflectiveCodec`] consults the [`Registry`] member model on every call
//! - [`GeneratedCodec`] compiles the member model once into a [`Plan`]:
//!   resolved tags, pre-rendered key fragments, a tag lookup table and the
//!   compact-form decision
//!
//! Both must produce identical text and identical read results for the same
//! input; [`conformance`](crate::conformance) checks that.
//!
//! ```rust
//! use serde_graph::{Codec, Describe, GeneratedCodec, Options, Record, Registry};
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
//! let codec = GeneratedCodec::<Point>::generate(&registry, Options::compact()).unwrap();
//! assert_eq!(codec.to_string(&Point { x: 1, y: 2 }).unwrap(), r#"{"X":1,"Y":2}"#);
//! assert_eq!(codec.from_str(r#"{"Y":4,"X":3}"#).unwrap(), Point { x: 3, y: 4 });
//! ```

use crate::de::misplaced_class;
use crate::lexer::Token;
use crate::meta::TypeEntry;
use crate::ser::escape_into;
use crate::{Error, Field, Options, Reader, Record, Registry, Result, Writer};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

/// Writes and reads values of one type with fixed options.
pub trait Codec<T> {
    fn to_string(&self, value: &T) -> Result<String>;

    /// Reads `input` into `target`, keeping members the input omits.
    fn merge_from_str(&self, input: &str, target: &mut T) -> Result<()>;

    fn from_str(&self, input: &str) -> Result<T>;
}

/// Codec that walks the registry member model on every call.
pub struct ReflectiveCodec<'r, T> {
    registry: &'r Registry,
    options: Options,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Field> ReflectiveCodec<'r, T> {
    pub fn new(registry: &'r Registry, options: Options) -> Self {
        ReflectiveCodec {
            registry,
            options,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl<T: Field> Codec<T> for ReflectiveCodec<'_, T> {
    fn to_string(&self, value: &T) -> Result<String> {
        self.registry.to_string(value, &self.options)
    }

    fn merge_from_str(&self, input: &str, target: &mut T) -> Result<()> {
        self.registry.merge_from_str(input, target, &self.options)
    }

    fn from_str(&self, input: &str) -> Result<T> {
        self.registry.from_str(input, &self.options)
    }
}

/// Precomputed layout of one record type under fixed options.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// `(member index, "tag":)` in member order.
    pub keys: Vec<(usize, String)>,
    /// `"class":"key"` fragment written when the root class is saved.
    pub class_fragment: String,
    /// Wire tag to member index.
    pub lookup: HashMap<String, usize>,
    /// Whether the root is written as a positional array.
    pub compact: bool,
}

impl Plan {
    fn compile<T: Record>(entry: &TypeEntry<T>, options: &Options) -> Self {
        let keys = entry
            .descriptors()
            .enumerate()
            .map(|(index, descriptor)| {
                let mut fragment = String::new();
                escape_into(&mut fragment, descriptor.tag(options.tag_mode));
                fragment.push(':');
                (index, fragment)
            })
            .collect();
        let lookup = entry
            .descriptors()
            .enumerate()
            .map(|(index, descriptor)| (descriptor.tag(options.tag_mode).to_string(), index))
            .collect();

        let mut class_fragment = String::from("\"class\":");
        escape_into(&mut class_fragment, entry.class_key());

        Plan {
            keys,
            class_fragment,
            lookup,
            compact: entry.is_compact() && !options.ignore_compact && !options.save_root_class,
        }
    }
}

/// Codec compiled ahead of use for one record type.
pub struct GeneratedCodec<'r, T> {
    registry: &'r Registry,
    options: Options,
    entry: Rc<TypeEntry<T>>,
    plan: Plan,
}

impl<'r, T: Record> GeneratedCodec<'r, T> {
    /// Compiles the plan for `T`.
    ///
    /// Fails with the same declaration error the reflective path would raise.
    pub fn generate(registry: &'r Registry, options: Options) -> Result<Self> {
        let entry = registry.entry::<T>()?;
        entry.check_usable(&options)?;
        let plan = Plan::compile(&entry, &options);
        log::debug!(
            "generated codec for '{}' ({} member(s), compact: {})",
            entry.type_name(),
            plan.keys.len(),
            plan.compact
        );
        Ok(GeneratedCodec {
            registry,
            options,
            entry,
            plan,
        })
    }

    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn write_root(&self, value: &T, w: &mut Writer<'_>) -> Result<()> {
        if let Some(items) = self.entry.items() {
            return (items.write)(value, w);
        }
        let members = self.entry.members();

        if self.plan.compact {
            w.begin_container('[');
            for (position, (index, _)) in self.plan.keys.iter().enumerate() {
                w.begin_item(position == 0);
                members[*index].write(value, w)?;
            }
            w.end_container(']');
            return Ok(());
        }

        w.begin_container('{');
        let mut first = true;
        if self.options.save_root_class {
            w.begin_item(true);
            w.write_raw(&self.plan.class_fragment);
            first = false;
        }
        for (index, fragment) in &self.plan.keys {
            let member = &members[*index];
            if member.is_default(value) {
                continue;
            }
            w.begin_item(first);
            first = false;
            w.write_raw(fragment);
            member.write(value, w)?;
        }
        w.end_container('}');
        Ok(())
    }

    fn read_root(&self, input: &str, target: &mut T) -> Result<()> {
        let mut reader = Reader::new(input, &self.options, self.registry);
        reader.set_generated(true);
        self.read_record(&mut reader, target)?;
        reader.finish()
    }

    fn read_record(&self, r: &mut Reader<'_>, target: &mut T) -> Result<()> {
        if let Some(items) = self.entry.items() {
            (items.append)(target, r)?;
            self.entry.finish_read(target);
            return Ok(());
        }
        match r.peek_token()? {
            Some(Token::BeginObject) => self.read_object(r, target),
            Some(Token::BeginArray) if self.entry.is_compact() => self.read_positional(r, target),
            Some(_) => {
                let (token, pos) = r.next_token("object")?;
                Err(r.mismatch(format!("'{}'", self.entry.type_name()), &token, pos))
            }
            None => Err(Error::unexpected_end(&format!("'{}'", self.entry.type_name()))),
        }
    }

    /// Reads `{...}` through the plan's tag table.
    fn read_object(&self, r: &mut Reader<'_>, target: &mut T) -> Result<()> {
        let members = self.entry.members();
        let type_name = self.entry.type_name();
        let mut seen = vec![false; members.len()];
        let mut leading = true;
        r.read_entries(|r, tag, pos| {
            let first = std::mem::replace(&mut leading, false);
            if tag == "class" {
                if !first {
                    return Err(misplaced_class(pos));
                }
                let (key, key_pos) = r.read_string_at()?;
                if key != self.entry.class_key() {
                    return Err(r.foreign_class(&key, key_pos, type_name));
                }
                return Ok(());
            }
            match self.plan.lookup.get(&tag) {
                Some(&index) => {
                    members[index].read(target, r)?;
                    seen[index] = true;
                    Ok(())
                }
                None if r.options().ignore_new_fields => r.skip_value(),
                None => Err(Error::unknown_member(&tag, type_name, pos)),
            }
        })?;

        if let Some(index) = (0..members.len()).find(|&index| !seen[index] && !members[index].descriptor().optional) {
            return Err(Error::missing_member(&members[index].descriptor().name, type_name));
        }
        self.entry.finish_read(target);
        Ok(())
    }

    /// Reads `[...]` with one element per member in plan order.
    fn read_positional(&self, r: &mut Reader<'_>, target: &mut T) -> Result<()> {
        let members = self.entry.members();
        let type_name = self.entry.type_name();
        let mut keys = self.plan.keys.iter();
        r.read_seq(|r| match keys.next() {
            Some((index, _)) => members[*index].read(target, r),
            None => {
                let (token, pos) = r.next_token("']'")?;
                Err(Error::malformed(
                    format!("too many elements for '{}': found {}", type_name, token),
                    r.at(pos),
                ))
            }
        })?;
        if let Some((index, _)) = keys.next() {
            return Err(Error::missing_member(&members[*index].descriptor().name, type_name));
        }
        self.entry.finish_read(target);
        Ok(())
    }
}

impl<T: Record> Codec<T> for GeneratedCodec<'_, T> {
    fn to_string(&self, value: &T) -> Result<String> {
        let mut writer = Writer::new(&self.options, self.registry);
        self.write_root(value, &mut writer)?;
        Ok(writer.into_inner())
    }

    fn merge_from_str(&self, input: &str, target: &mut T) -> Result<()> {
        self.read_root(input, target)
    }

    fn from_str(&self, input: &str) -> Result<T> {
        let mut value = self.entry.instantiate();
        self.read_root(input, &mut value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Describe, ErrorKind, TagMode};

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Pair {
        a: i32,
        b: String,
    }

    impl Record for Pair {
        fn describe(d: &mut Describe<Self>) {
            d.class_key("codec.Pair");
            d.member("A", |p| &p.a, |p| &mut p.a);
            d.defaulted("B", String::new(), |p| &p.b, |p| &mut p.b);
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Coord {
        x: i32,
        y: i32,
    }

    impl Record for Coord {
        fn describe(d: &mut Describe<Self>) {
            d.compact();
            d.member("X", |p| &p.x, |p| &mut p.x);
            d.member("Y", |p| &p.y, |p| &mut p.y);
        }
    }

    #[test]
    fn test_plan_prerenders_tags() {
        let registry = Registry::new();
        let options = Options::new().with_tag_mode(TagMode::Aliases);
        let codec = GeneratedCodec::<Pair>::generate(&registry, options).unwrap();
        let plan = codec.plan();
        assert_eq!(plan.keys, vec![(0, "\"a\":".to_string()), (1, "\"b\":".to_string())]);
        assert_eq!(plan.lookup.get("b"), Some(&1));
        assert_eq!(plan.class_fragment, "\"class\":\"codec.Pair\"");
        assert!(!plan.compact);
    }

    #[test]
    fn test_outputs_match_reflective() {
        let registry = Registry::new();
        for options in [
            Options::new(),
            Options::compact().with_save_root_class(true),
            Options::new().with_tag_mode(TagMode::Ids),
        ] {
            let reflective = ReflectiveCodec::<Pair>::new(&registry, options.clone());
            let generated = GeneratedCodec::<Pair>::generate(&registry, options).unwrap();
            for value in [Pair::default(), Pair { a: 3, b: "x".to_string() }] {
                assert_eq!(
                    reflective.to_string(&value).unwrap(),
                    generated.to_string(&value).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_compact_decision() {
        let registry = Registry::new();
        let compact = GeneratedCodec::<Coord>::generate(&registry, Options::compact()).unwrap();
        assert!(compact.plan().compact);
        assert_eq!(compact.to_string(&Coord { x: 1, y: 2 }).unwrap(), "[1,2]");
        assert_eq!(compact.from_str("[5,6]").unwrap(), Coord { x: 5, y: 6 });

        let named = GeneratedCodec::<Coord>::generate(
            &registry,
            Options::compact().with_ignore_compact(true),
        )
        .unwrap();
        assert!(!named.plan().compact);
        assert_eq!(named.to_string(&Coord { x: 1, y: 2 }).unwrap(), r#"{"X":1,"Y":2}"#);
    }

    #[test]
    fn test_generated_reader_rules() {
        let registry = Registry::new();
        let codec = GeneratedCodec::<Pair>::generate(&registry, Options::new()).unwrap();
        let pair = codec.from_str(r#"{"class":"codec.Pair","A":1}"#).unwrap();
        assert_eq!(pair, Pair { a: 1, b: String::new() });

        let kind = |input: &str| codec.from_str(input).unwrap_err().kind();
        assert_eq!(kind(r#"{"A":1,"class":"codec.Pair"}"#), ErrorKind::MalformedToken);
        assert_eq!(kind(r#"{"B":"x"}"#), ErrorKind::MissingRequiredMember);
        assert_eq!(kind(r#"{"A":1,"C":2}"#), ErrorKind::UnknownMember);
        assert_eq!(kind("7"), ErrorKind::TypeMismatch);
        assert_eq!(kind(""), ErrorKind::UnexpectedEnd);

        let coords = GeneratedCodec::<Coord>::generate(&registry, Options::compact()).unwrap();
        assert_eq!(coords.from_str("[1,2,3]").unwrap_err().kind(), ErrorKind::MalformedToken);
        assert_eq!(coords.from_str("[1]").unwrap_err().kind(), ErrorKind::MissingRequiredMember);
    }

    #[test]
    fn test_merge_keeps_omitted_members() {
        let registry = Registry::new();
        let codec = GeneratedCodec::<Pair>::generate(&registry, Options::new()).unwrap();
        let mut pair = Pair { a: 1, b: "keep".to_string() };
        codec.merge_from_str(r#"{"A":2}"#, &mut pair).unwrap();
        assert_eq!(pair, Pair { a: 2, b: "keep".to_string() });
    }
}
