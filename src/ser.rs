//! Writing object graphs as text.
//!
//! This module provides the [`Writer`], which renders any [`Field`] value
//! using the member models held by a [`Registry`].
//!
//! ## Layout
//!
//! Objects, arrays and dictionaries share one layout, controlled by
//! [`Options::field_separator`] and [`Options::indent`]:
//!
//! ```text
//! {<sep><indent*d>"A":1,<sep><indent*d>"B":2<sep><indent*(d-1)>}
//! ```
//!
//! Empty arrays and dictionaries are written as `[]` and `{}`.
//!
//! ```rust
//! use serde_graph::{Describe, Options, Record, Registry};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Sample {
//!     x: i32,
//!     y: String,
//! }
//!
//! impl Record for Sample {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.member("X", |s| &s.x, |s| &mut s.x);
//!         d.member("Y", |s| &s.y, |s| &mut s.y);
//!     }
//! }
//!
//! let registry = Registry::new();
//! let options = Options::new().with_indent("");
//! let sample = Sample { x: 345, y: "test".to_string() };
//! let text = registry.to_string(&sample, &options).unwrap();
//! assert_eq!(text, "{\n\"X\":345,\n\"Y\":\"test\"\n}");
//! ```
//!
//! ## Scalars
//!
//! - Floats use the shortest round-trip form; magnitudes below `1e-5` or from
//!   `1e15` upward switch to exponent form (`1E-20`, `-3.1415E+100`).
//!   Non-finite values are written as the bare words `NaN`, `Infinity` and
//!   `-Infinity`.
//! - Strings escape `"`, `\`, `/` and control characters.
//! - Dates default to `2011-03-25T00:00:00.0000000`; durations to
//!   `[-][d.]hh:mm:ss[.fffffff]`.

use crate::{Error, Field, MapKey, Options, Record, Registry, Result};
use chrono::{NaiveDateTime, TimeDelta, Timelike};
use std::fmt::{self, Write as _};

/// Renders values as text.
///
/// Created via [`Writer::new`]; the finished text is taken with
/// [`Writer::into_inner`]. Custom [`Field`] implementations call the
/// `write_*` methods.
pub struct Writer<'a> {
    output: String,
    options: &'a Options,
    registry: &'a Registry,
    depth: usize,
}

impl<'a> Writer<'a> {
    pub fn new(options: &'a Options, registry: &'a Registry) -> Self {
        Writer {
            output: String::with_capacity(256),
            options,
            registry,
            depth: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    #[must_use]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Appends text without any escaping.
    pub fn write_raw(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_null(&mut self) {
        self.output.push_str("null");
    }

    pub fn write_bool(&mut self, value: bool) {
        self.output.push_str(if value { "true" } else { "false" });
    }

    /// Writes an integer of 32 bits or fewer.
    pub fn write_integer(&mut self, value: impl fmt::Display) {
        let _ = write!(self.output, "{}", value);
    }

    /// Writes a 64-bit integer, quoted when [`Options::int64_as_string`] is set.
    pub fn write_int64(&mut self, value: impl fmt::Display) {
        if self.options.int64_as_string {
            let _ = write!(self.output, "\"{}\"", value);
        } else {
            let _ = write!(self.output, "{}", value);
        }
    }

    pub fn write_f64(&mut self, value: f64) {
        self.output.push_str(&format_f64(value));
    }

    pub fn write_f32(&mut self, value: f32) {
        self.output.push_str(&format_f32(value));
    }

    /// Writes a quoted, escaped string.
    pub fn write_str(&mut self, value: &str) {
        escape_into(&mut self.output, value);
    }

    pub fn write_char(&mut self, value: char) {
        let mut buf = [0u8; 4];
        escape_into(&mut self.output, value.encode_utf8(&mut buf));
    }

    /// Writes a date using [`Options::date_format`] or the default pattern.
    pub fn write_datetime(&mut self, value: &NaiveDateTime) -> Result<()> {
        let text = format_datetime(value, self.options.date_format.as_deref())?;
        self.write_str(&text);
        Ok(())
    }

    pub fn write_duration(&mut self, value: &TimeDelta) {
        let text = format_duration(value);
        self.write_str(&text);
    }

    /// Writes a sequence of fields as an array.
    pub fn write_seq<'v, F, I>(&mut self, items: I) -> Result<()>
    where
        F: Field + 'v,
        I: IntoIterator<Item = &'v F>,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_none() {
            self.output.push_str("[]");
            return Ok(());
        }
        self.begin_container('[');
        for (index, item) in items.enumerate() {
            self.begin_item(index == 0);
            item.write_field(self)?;
        }
        self.end_container(']');
        Ok(())
    }

    /// Writes key/value pairs as a dictionary object.
    pub fn write_entries<'v, K, V, I>(&mut self, entries: I) -> Result<()>
    where
        K: MapKey + 'v,
        V: Field + 'v,
        I: IntoIterator<Item = (&'v K, &'v V)>,
    {
        let mut entries = entries.into_iter().peekable();
        if entries.peek().is_none() {
            self.output.push_str("{}");
            return Ok(());
        }
        self.begin_container('{');
        for (index, (key, value)) in entries.enumerate() {
            self.begin_item(index == 0);
            self.write_key(&key.to_key());
            value.write_field(self)?;
        }
        self.end_container('}');
        Ok(())
    }

    /// Writes a record.
    ///
    /// With `with_class` set the object starts with the record's `"class"`
    /// tag and is never rendered in compact form.
    pub fn write_record<T: Record>(&mut self, value: &T, with_class: bool) -> Result<()> {
        let entry = self.registry.entry::<T>()?;
        entry.check_usable(self.options)?;

        if let Some(items) = entry.items() {
            return (items.write)(value, self);
        }

        if entry.is_compact() && !self.options.ignore_compact && !with_class {
            self.begin_container('[');
            for (index, member) in entry.members().iter().enumerate() {
                self.begin_item(index == 0);
                member.write(value, self)?;
            }
            self.end_container(']');
            return Ok(());
        }

        let mode = self.options.tag_mode;
        self.begin_container('{');
        let mut first = true;
        if with_class {
            self.begin_item(true);
            self.write_key("class");
            self.write_str(entry.class_key());
            first = false;
        }
        for member in entry.members() {
            if member.is_default(value) {
                continue;
            }
            self.begin_item(first);
            first = false;
            self.write_key(member.descriptor().tag(mode));
            member.write(value, self)?;
        }
        self.end_container('}');
        Ok(())
    }

    pub(crate) fn begin_container(&mut self, open: char) {
        self.output.push(open);
        self.depth += 1;
    }

    pub(crate) fn begin_item(&mut self, first: bool) {
        if !first {
            self.output.push(',');
        }
        self.output.push_str(&self.options.field_separator);
        for _ in 0..self.depth {
            self.output.push_str(&self.options.indent);
        }
    }

    pub(crate) fn end_container(&mut self, close: char) {
        self.depth = self.depth.saturating_sub(1);
        self.output.push_str(&self.options.field_separator);
        for _ in 0..self.depth {
            self.output.push_str(&self.options.indent);
        }
        self.output.push(close);
    }

    /// Writes `"tag":`.
    pub(crate) fn write_key(&mut self, tag: &str) {
        self.write_str(tag);
        self.output.push(':');
    }
}

/// Formats an `f64` in its shortest round-trip form.
///
/// ```rust
/// use serde_graph::ser::format_f64;
///
/// assert_eq!(format_f64(1.5), "1.5");
/// assert_eq!(format_f64(1e-20), "1E-20");
/// assert_eq!(format_f64(-3.1415e100), "-3.1415E+100");
/// assert_eq!(format_f64(f64::NAN), "NaN");
/// ```
#[must_use]
pub fn format_f64(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    if needs_exponent(value.abs()) {
        signed_exponent(format!("{:E}", value))
    } else {
        format!("{}", value)
    }
}

/// Formats an `f32` in its shortest round-trip form.
#[must_use]
pub fn format_f32(value: f32) -> String {
    if let Some(special) = non_finite(f64::from(value)) {
        return special.to_string();
    }
    if needs_exponent(f64::from(value.abs())) {
        signed_exponent(format!("{:E}", value))
    } else {
        format!("{}", value)
    }
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("NaN")
    } else if value.is_infinite() {
        Some(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        None
    }
}

fn needs_exponent(magnitude: f64) -> bool {
    magnitude != 0.0 && !(1e-5..1e15).contains(&magnitude)
}

fn signed_exponent(text: String) -> String {
    match text.split_once('E') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}E+{}", mantissa, exponent)
        }
        _ => text,
    }
}

/// Appends `value` as a quoted string with escapes.
pub(crate) fn escape_into(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '/' => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Formats a date with `pattern`, or `%Y-%m-%dT%H:%M:%S` plus seven fraction digits.
pub(crate) fn format_datetime(value: &NaiveDateTime, pattern: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match pattern {
        Some(pattern) => write!(out, "{}", value.format(pattern))
            .map_err(|_| Error::custom(format!("invalid date format '{}'", pattern)))?,
        None => write!(
            out,
            "{}.{:07}",
            value.format("%Y-%m-%dT%H:%M:%S"),
            value.nanosecond() % 1_000_000_000 / 100
        )
        .map_err(|_| Error::custom("date formatting failed"))?,
    }
    Ok(out)
}

/// Formats a duration as `[-][d.]hh:mm:ss[.fffffff]`.
///
/// ```rust
/// use chrono::TimeDelta;
/// use serde_graph::ser::format_duration;
///
/// assert_eq!(format_duration(&TimeDelta::minutes(5)), "00:05:00");
/// assert_eq!(format_duration(&TimeDelta::hours(-26)), "-1.02:00:00");
/// ```
#[must_use]
pub fn format_duration(value: &TimeDelta) -> String {
    let negative = *value < TimeDelta::zero();
    let value = if negative { -*value } else { *value };
    let total = value.num_seconds();
    let ticks = value.subsec_nanos() / 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let days = total / 86_400;
    if days > 0 {
        let _ = write!(out, "{}.", days);
    }
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        total % 86_400 / 3600,
        total % 3600 / 60,
        total % 60
    );
    if ticks > 0 {
        let _ = write!(out, ".{:07}", ticks);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_float_forms() {
        assert_eq!(format_f64(0.0), "0");
        assert_eq!(format_f64(5.0), "5");
        assert_eq!(format_f64(0.1), "0.1");
        assert_eq!(format_f64(1e-5), "0.00001");
        assert_eq!(format_f64(1e-20), "1E-20");
        assert_eq!(format_f64(1e15), "1E+15");
        assert_eq!(format_f64(-3.1415e100), "-3.1415E+100");
        assert_eq!(format_f64(f64::INFINITY), "Infinity");
        assert_eq!(format_f64(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_f32(0.25), "0.25");
        assert_eq!(format_f32(1e-20), "1E-20");
        assert_eq!(format_f32(f32::NAN), "NaN");
    }

    #[test]
    fn test_escapes() {
        let mut out = String::new();
        escape_into(&mut out, "\"/{\u{1}}\n\t\"\"");
        assert_eq!(out, r#""\"\/{\u0001}\n\t\"\"""#);

        let mut out = String::new();
        escape_into(&mut out, "привет\u{1f}");
        assert_eq!(out, "\"привет\\u001f\"");
    }

    #[test]
    fn test_default_date_format() {
        let date = NaiveDate::from_ymd_opt(2011, 3, 25)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            format_datetime(&date, None).unwrap(),
            "2011-03-25T00:00:00.0000000"
        );
        assert_eq!(format_datetime(&date, Some("%Y")).unwrap(), "2011");

        let precise = NaiveDate::from_ymd_opt(2011, 3, 25)
            .unwrap()
            .and_hms_nano_opt(1, 2, 3, 123_456_700)
            .unwrap();
        assert_eq!(
            format_datetime(&precise, None).unwrap(),
            "2011-03-25T01:02:03.1234567"
        );
    }

    #[test]
    fn test_duration_forms() {
        assert_eq!(format_duration(&TimeDelta::zero()), "00:00:00");
        assert_eq!(format_duration(&TimeDelta::minutes(5)), "00:05:00");
        assert_eq!(
            format_duration(&(TimeDelta::days(3) + TimeDelta::milliseconds(1500))),
            "3.00:00:01.5000000"
        );
        assert_eq!(format_duration(&-TimeDelta::seconds(90)), "-00:01:30");
    }
}
