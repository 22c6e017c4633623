//! # serde_graph
//!
//! An object-graph serialization engine with a JSON front end.
//!
//! Record types describe their members once; the engine extracts a cached
//! member model from that description and uses it to write and read text.
//!
//! ## Key Features
//!
//! - **Member model**: required, optional and defaulted members, flattened
//!   base records, compact (positional) records and collection-like records
//! - **Tag modes**: members appear on the wire by name, by short alias
//!   (`a`, `b`, ...) or by registry-wide id (`AAAB`, `AAAC`, ...)
//! - **Polymorphism**: class-tagged objects resolved through a [`Registry`]
//! - **Merge reads**: reading into an existing value keeps what the input omits
//! - **Precise errors**: every reader failure names its kind and, optionally,
//!   the 1-based character position
//! - **Generated codecs**: a precompiled [`GeneratedCodec`] that matches the
//!   reflective path byte for byte
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_graph::{from_str, to_string, Describe, Record};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! impl Record for User {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.member("Id", |u| &u.id, |u| &mut u.id);
//!         d.member("Name", |u| &u.name, |u| &mut u.name);
//!         d.defaulted("Active", false, |u| &u.active, |u| &mut u.active);
//!     }
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "{\n\t\"Id\":123,\n\t\"Name\":\"Alice\",\n\t\"Active\":true\n}");
//!
//! let back: User = from_str(&text).unwrap();
//! assert_eq!(user, back);
//! ```
//!
//! ### Merging into an existing value
//!
//! ```rust
//! use serde_graph::{from_str_into, Describe, Record};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Settings {
//!     width: i32,
//!     title: String,
//! }
//!
//! impl Record for Settings {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.optional("Width", |s| &s.width, |s| &mut s.width);
//!         d.optional("Title", |s| &s.title, |s| &mut s.title);
//!     }
//! }
//!
//! let mut settings = Settings { width: 80, title: "main".to_string() };
//! from_str_into(r#"{"Width":120}"#, &mut settings).unwrap();
//! assert_eq!(settings, Settings { width: 120, title: "main".to_string() });
//! ```
//!
//! ### Dynamic values
//!
//! ```rust
//! use serde_graph::{from_str_dynamic, value, Value};
//!
//! let data = from_str_dynamic(r#"{ "name": "Alice", "tags": ["a", "b"] }"#).unwrap();
//! assert_eq!(data, value!({ "name": "Alice", "tags": ["a", "b"] }));
//! ```
//!
//! ## Modules
//!
//! - [`meta`]: member model ([`Record`], [`Describe`], [`TypeEntry`])
//! - [`tags`]: alias and id generation
//! - [`registry`]: type registry and class-key resolution
//! - [`ser`] / [`de`]: the [`Writer`] and [`Reader`]
//! - [`field`]: the [`Field`] trait and its built-in implementations
//! - [`codec`]: reflective and generated codecs
//! - [`conformance`]: cross-checking the two codecs
//! - [`wire`]: the text format
//!
//! Demos live in the `demos/` directory; run one with `cargo run --example <name>`.

pub mod codec;
pub mod conformance;
pub mod de;
pub mod delegate;
pub mod error;
#[macro_use]
pub mod macros;
pub mod field;
mod lexer;
pub mod map;
pub mod meta;
pub mod object;
pub mod options;
pub mod registry;
pub mod ser;
pub mod tags;
pub mod value;
pub mod wire;

pub use codec::{Codec, GeneratedCodec, Plan, ReflectiveCodec};
pub use de::{EnumToken, Reader};
pub use delegate::Delegate;
pub use error::{Error, ErrorKind, Position, Result};
pub use field::{Enumeration, Field, MapKey, Polymorphic};
pub use map::ValueMap;
pub use meta::{Describe, MemberDescriptor, Record, TypeEntry, ValueKind};
pub use object::Object;
pub use options::{Options, TagMode};
pub use registry::{ClassInfo, Registry};
pub use ser::Writer;
pub use value::{BoundValue, Value};

use std::io;

/// Writes `value` with default options using the thread's default registry.
///
/// # Examples
///
/// ```rust
/// use serde_graph::to_string;
///
/// assert_eq!(to_string(&vec![1, 2]).unwrap(), "[\n\t1,\n\t2\n]");
/// ```
///
/// # Errors
///
/// Returns an error if a record type in the graph has an invalid declaration.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T: Field>(value: &T) -> Result<String> {
    to_string_with_options(value, &Options::default())
}

/// Writes `value` with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_graph::{to_string_with_options, Options};
///
/// let text = to_string_with_options(&vec![1, 2], &Options::compact()).unwrap();
/// assert_eq!(text, "[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if a record type in the graph has an invalid declaration.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T: Field>(value: &T, options: &Options) -> Result<String> {
    Registry::with_default(|registry| registry.to_string(value, options))
}

/// Writes `value` to an I/O stream.
///
/// # Errors
///
/// Returns an error if writing fails or a record declaration is invalid.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, options: &Options) -> Result<()>
where
    W: io::Write,
    T: Field,
{
    let text = to_string_with_options(value, options)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Reads a fresh `T` with default options.
///
/// # Examples
///
/// ```rust
/// use serde_graph::from_str;
///
/// let numbers: Vec<i32> = from_str("[1, 2, 3]").unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T: Field>(input: &str) -> Result<T> {
    from_str_with_options(input, &Options::default())
}

/// Reads a fresh `T` with custom options.
///
/// # Errors
///
/// Returns an error if the input is malformed or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T: Field>(input: &str, options: &Options) -> Result<T> {
    Registry::with_default(|registry| registry.from_str(input, options))
}

/// Reads into an existing value, keeping what the input omits.
///
/// At the root, collections append and dictionaries insert.
///
/// # Examples
///
/// ```rust
/// use serde_graph::from_str_into;
///
/// let mut numbers = vec![1];
/// from_str_into("[2]", &mut numbers).unwrap();
/// assert_eq!(numbers, vec![1, 2]);
/// ```
///
/// # Errors
///
/// Returns an error if the input is malformed or does not fit `T`. The target
/// may be partially updated.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_into<T: Field>(input: &str, target: &mut T) -> Result<()> {
    Registry::with_default(|registry| registry.merge_from_str(input, target, &Options::default()))
}

/// Reads a fresh `T` from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use serde_graph::{from_reader, Options};
/// use std::io::Cursor;
///
/// let flags: Vec<bool> = from_reader(Cursor::new(b"[true,false]"), &Options::new()).unwrap();
/// assert_eq!(flags, vec![true, false]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is malformed, or it does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R, options: &Options) -> Result<T>
where
    R: io::Read,
    T: Field,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str_with_options(&string, options)
}

/// Reads from an I/O stream into an existing value.
///
/// # Errors
///
/// Returns an error if reading fails, the input is malformed, or it does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_into<R, T>(mut reader: R, target: &mut T, options: &Options) -> Result<()>
where
    R: io::Read,
    T: Field,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    Registry::with_default(|registry| registry.merge_from_str(&string, target, options))
}

/// Reads a fresh `T` from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8 or the text does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T: Field>(bytes: &[u8]) -> Result<T> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    from_str(text)
}

/// Reads an untyped value; class-tagged objects of registered types become
/// [`Value::Typed`].
///
/// # Errors
///
/// Returns an error if the input is malformed or names an unregistered class.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_dynamic(input: &str) -> Result<Value> {
    Registry::with_default(|registry| registry.read_value(input, &Options::default()))
}

/// Publishes `T`'s class key in the thread's default registry.
///
/// # Errors
///
/// Returns an error if `T`'s declaration is invalid or its class key is taken.
pub fn register<T: Record>() -> Result<()> {
    Registry::with_default(|registry| registry.register::<T>())
}

/// Installs a dictionary-key parser in the thread's default registry.
pub fn register_key_parser<K: 'static>(parse: fn(&str) -> Option<K>) {
    Registry::with_default(|registry| registry.register_key_parser(parse));
}
