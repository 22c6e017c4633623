//! Wire Format
//!
//! This module documents the text format written by [`Writer`](crate::Writer)
//! and accepted by [`Reader`](crate::Reader). It contains no code.
//!
//! # Overview
//!
//! The format is JSON with a few extensions: bare `NaN`, `Infinity` and
//! `-Infinity` number tokens, a reserved `"class"` tag naming an object's
//! type, and positional arrays for compact records.
//!
//! # Layout
//!
//! Whitespace is controlled by [`Options::indent`](crate::Options::indent) and
//! [`Options::field_separator`](crate::Options::field_separator). For a
//! container at nesting depth `d`:
//!
//! ```text
//! {<sep><indent × d>"A":1,<sep><indent × d>"B":2<sep><indent × (d-1)>}
//! ```
//!
//! With the defaults (`"\t"` and `"\n"`) a record `{X: 1, Y: 2}` is written:
//!
//! ```text
//! {
//! 	"X":1,
//! 	"Y":2
//! }
//! ```
//!
//! and with [`Options::compact`](crate::Options::compact) as `{"X":1,"Y":2}`.
//! There is never a space after `:`.
//!
//! # Records
//!
//! | Shape | Written as | Example |
//! |-------|------------|---------|
//! | Plain record | object, members in declaration order | `{"X":1,"Y":2}` |
//! | Derived record | base members first | `{"Base":1,"Own":2}` |
//! | Compact record | positional array | `[1,2]` |
//! | Collection-like record | its item list | `[1,2,3]` |
//! | Class-tagged record | `"class"` first | `{"class":"shapes.Circle","R":2}` |
//!
//! Members with a declared default are omitted while they equal it. A compact
//! record is written as an object when
//! [`Options::ignore_compact`](crate::Options::ignore_compact) is set or when
//! its class tag is written.
//!
//! ## Tags
//!
//! Member keys follow [`TagMode`](crate::TagMode):
//!
//! - `Names`: `{"Value":1}`
//! - `Aliases`: `{"a":1}` (see [`tags::alias`](crate::tags::alias))
//! - `Ids`: `{"AAAB":1}` (see [`tags::id`](crate::tags::id))
//!
//! The reader resolves tags in the same mode. When a tag repeats, the last
//! occurrence wins.
//!
//! # Primitives
//!
//! | Type | Written as | Example |
//! |------|------------|---------|
//! | `bool` | literal | `true` |
//! | integers up to 32 bits | decimal | `-209` |
//! | 64-bit integers | decimal, or quoted under `int64_as_string` | `"-8589934592"` |
//! | `f32` / `f64` | shortest round-trip, exponent outside `[1e-5, 1e15)` | `1E-20`, `-3.1415E+100` |
//! | `char` | one-character string | `"A"` |
//! | `String` | escaped string | `"a\/b"` |
//! | enum | ordinal, or name under `enum_as_string` | `2`, `"Green"` |
//! | date | `yyyy-MM-ddTHH:mm:ss.fffffff` or `date_format` | `"2011-03-25T00:00:00.0000000"` |
//! | duration | `[-][d.]hh:mm:ss[.fffffff]` | `"3.00:00:01.5000000"` |
//! | absent optional | `null` | `null` |
//!
//! Strings escape `"`, `\`, `/`, the short control escapes (`\n`, `\t`, `\r`,
//! `\b`, `\f`) and other control characters as `\u00xx`. Readers decode every
//! `\uXXXX` escape, including surrogate pairs.
//!
//! # Dictionaries
//!
//! Dictionaries are objects whose keys are the [`MapKey`](crate::MapKey) text
//! of each key: `{"1":"a","2":"b"}`.
//!
//! # Reading rules
//!
//! - Whitespace between tokens is ignored.
//! - Required members must appear; optional members keep their current value.
//! - Unknown tags fail unless `ignore_new_fields` is set, in which case their
//!   values are skipped after a syntax check.
//! - A `"class"` tag is only accepted as the first member of an object.
//! - Integer literals that do not fit the target width are range overflows,
//!   as are finite floats beyond the `f32` range read into `f32` members.
//! - Enums accept the name or the ordinal, quoted or bare.
//! - Count-prefixed arrays (`[2,"a","b"]`) are accepted by generated codecs
//!   for fixed arrays whose elements are never written as numbers. The count
//!   must match the number of elements.
//! - Only whitespace may follow the root value.
