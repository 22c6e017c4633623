//! Reading object graphs from text.
//!
//! This module provides the [`Reader`], which parses text into any [`Field`](crate::Field)
//! value using the member models held by a [`Registry`].
//!
//! ## Overview
//!
//! - **Merge semantics**: records are read into an existing instance, so
//!   members absent from the input keep their current values
//! - **Tag resolution**: member tags are resolved in the configured
//!   [`TagMode`](crate::TagMode); the last duplicate tag wins
//! - **Required members**: every required member must appear, or the read
//!   fails naming the member
//! - **Unknown tags**: rejected, or skipped syntactically when
//!   [`Options::ignore_new_fields`] is set
//! - **Error positions**: 1-based character positions, reported when
//!   [`Options::report_error_position`] is set
//!
//! ## Usage
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
//!         d.optional("Y", |s| &s.y, |s| &mut s.y);
//!     }
//! }
//!
//! let registry = Registry::new();
//! let options = Options::new();
//! let mut sample = Sample { x: 1, y: "kept".to_string() };
//! registry.merge_from_str(r#"{ "X": 7 }"#, &mut sample, &options).unwrap();
//! assert_eq!(sample, Sample { x: 7, y: "kept".to_string() });
//! ```

use crate::lexer::{Lexer, Token};
use crate::meta::TypeEntry;
use crate::{Error, Options, Position, Record, Registry, Result, Value, ValueMap};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::rc::Rc;

/// States of the syntax-only skipper used for ignored members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SkipState {
    StartValue,
    ObjectKeyOrEnd,
    ObjectKey,
    ObjectColon,
    ObjectNext,
    ArrayValueOrEnd,
    ArrayNext,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Parses values from text.
///
/// Created via [`Reader::new`]. Custom [`Field`](crate::Field) implementations call the
/// `read_*` methods.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    options: &'a Options,
    registry: &'a Registry,
    generated: bool,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str, options: &'a Options, registry: &'a Registry) -> Self {
        Reader {
            lexer: Lexer::new(input, options.report_error_position),
            options,
            registry,
            generated: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &'a Options {
        self.options
    }

    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// `true` when driven by a [`GeneratedCodec`](crate::GeneratedCodec).
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    pub(crate) fn set_generated(&mut self, generated: bool) {
        self.generated = generated;
    }

    /// Fails unless only whitespace remains.
    pub fn finish(&mut self) -> Result<()> {
        self.lexer.finish()
    }

    pub(crate) fn at(&self, pos: usize) -> Position {
        self.lexer.at(pos)
    }

    pub(crate) fn peek_token(&mut self) -> Result<Option<&Token>> {
        self.lexer.peek()
    }

    pub(crate) fn next_token(&mut self, expected: &str) -> Result<(Token, usize)> {
        self.lexer.expect(expected)
    }

    fn expect_token(&mut self, wanted: Token, expected: &str) -> Result<()> {
        let (token, pos) = self.next_token(expected)?;
        if token == wanted {
            Ok(())
        } else {
            Err(Error::malformed(
                format!("expected {} but found {}", expected, token),
                self.at(pos),
            ))
        }
    }

    pub(crate) fn mismatch(&self, expected: impl std::fmt::Display, token: &Token, pos: usize) -> Error {
        Error::type_mismatch(expected, token, self.at(pos))
    }

    /// Consumes a `null` if one comes next.
    pub fn read_null(&mut self) -> Result<bool> {
        match self.lexer.peek()? {
            Some(Token::Null) => {
                self.lexer.next()?;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(Error::unexpected_end("value")),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.next_token("bool")? {
            (Token::True, _) => Ok(true),
            (Token::False, _) => Ok(false),
            (token, pos) => Err(self.mismatch("bool", &token, pos)),
        }
    }

    /// Reads a string with the position of its opening quote.
    pub fn read_string_at(&mut self) -> Result<(String, Position)> {
        match self.next_token("string")? {
            (Token::Str(text), pos) => Ok((text, self.at(pos))),
            (token, pos) => Err(self.mismatch("string", &token, pos)),
        }
    }

    pub fn read_string(&mut self) -> Result<String> {
        self.read_string_at().map(|(text, _)| text)
    }

    pub fn read_char(&mut self) -> Result<char> {
        let (text, pos) = self.read_string_at()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(Error::type_mismatch("single character", format!("\"{}\"", text), pos)),
        }
    }

    /// Reads an integer and narrows it to `N`.
    ///
    /// When `quoted` is set a string holding the literal is accepted too.
    pub fn read_integer<N: TryFrom<i128>>(&mut self, target: &str, quoted: bool) -> Result<N> {
        let (raw, pos) = match self.next_token(target)? {
            (Token::Number(raw), pos) => (raw, pos),
            (Token::Str(raw), pos) if quoted => (raw, pos),
            (token, pos) => return Err(self.mismatch(target, &token, pos)),
        };
        parse_integer(&raw, target, self.at(pos))
    }

    /// Reads a float; `NaN`, `Infinity` and `-Infinity` are accepted.
    pub fn read_float(&mut self) -> Result<f64> {
        match self.next_token("number")? {
            (Token::Number(raw), pos) => parse_float(&raw, self.at(pos)),
            (token, pos) => Err(self.mismatch("number", &token, pos)),
        }
    }

    /// Reads a float narrowed to `f32`.
    ///
    /// A finite literal beyond the `f32` range is a range overflow.
    pub fn read_f32(&mut self) -> Result<f32> {
        match self.next_token("number")? {
            (Token::Number(raw), pos) => {
                let pos = self.at(pos);
                let wide = parse_float(&raw, pos)?;
                let narrow = wide as f32;
                if wide.is_finite() && narrow.is_infinite() {
                    return Err(Error::range_overflow(&raw, "f32", pos));
                }
                Ok(narrow)
            }
            (token, pos) => Err(self.mismatch("number", &token, pos)),
        }
    }

    /// Reads an enum value as either its name or its ordinal.
    pub fn read_enum_token(&mut self, type_name: &str) -> Result<(EnumToken, Position)> {
        match self.next_token(type_name)? {
            (Token::Number(raw), pos) => {
                let pos = self.at(pos);
                let ordinal = parse_integer::<i64>(&raw, type_name, pos)?;
                Ok((EnumToken::Ordinal(ordinal), pos))
            }
            (Token::Str(text), pos) => Ok((EnumToken::Name(text), self.at(pos))),
            (token, pos) => Err(self.mismatch(format!("'{}'", type_name), &token, pos)),
        }
    }

    pub fn read_datetime(&mut self) -> Result<NaiveDateTime> {
        let (text, pos) = self.read_string_at()?;
        parse_datetime(&text, self.options.date_format.as_deref())
            .ok_or_else(|| Error::type_mismatch("date", format!("\"{}\"", text), pos))
    }

    pub fn read_duration(&mut self) -> Result<TimeDelta> {
        let (text, pos) = self.read_string_at()?;
        match parse_duration(&text) {
            Ok(duration) => Ok(duration),
            Err(DurationError::Syntax) => Err(Error::type_mismatch("duration", format!("\"{}\"", text), pos)),
            Err(DurationError::Overflow) => Err(Error::range_overflow(&text, "duration", pos)),
        }
    }

    /// Reads an array, calling `item` once per element.
    pub fn read_seq(&mut self, item: impl FnMut(&mut Reader<'a>) -> Result<()>) -> Result<()> {
        self.read_seq_with_count(false, item).map(|_| ())
    }

    /// Reads an array that may start with an element count.
    ///
    /// When `counted` is set and the first element is a number, it is taken as
    /// the element count and returned instead of being passed to `item`. A
    /// count that differs from the number of elements read is malformed.
    pub fn read_seq_with_count(
        &mut self,
        counted: bool,
        mut item: impl FnMut(&mut Reader<'a>) -> Result<()>,
    ) -> Result<Option<usize>> {
        match self.next_token("'['")? {
            (Token::BeginArray, _) => {}
            (token, pos) => return Err(self.mismatch("array", &token, pos)),
        }
        if self.lexer.peek()? == Some(&Token::EndArray) {
            self.lexer.next()?;
            return Ok(None);
        }
        let leading_number = match self.lexer.peek()? {
            Some(Token::Number(raw)) if counted => Some(raw.clone()),
            _ => None,
        };
        let mut prefix = None;
        let mut more = true;
        if let Some(raw) = leading_number {
            let (_, pos) = self.next_token("element count")?;
            let pos = self.at(pos);
            prefix = Some((parse_integer::<usize>(&raw, "element count", pos)?, raw, pos));
            more = self.seq_continues()?;
        }
        let mut read = 0;
        while more {
            item(self)?;
            read += 1;
            more = self.seq_continues()?;
        }
        match prefix {
            Some((count, raw, pos)) if count != read => Err(Error::malformed(
                format!("element count {} but {} element(s) follow", raw, read),
                pos,
            )),
            Some((count, _, _)) => Ok(Some(count)),
            None => Ok(None),
        }
    }

    fn seq_continues(&mut self) -> Result<bool> {
        match self.next_token("',' or ']'")? {
            (Token::Comma, _) => Ok(true),
            (Token::EndArray, _) => Ok(false),
            (token, pos) => Err(Error::malformed(
                format!("expected ',' or ']' but found {}", token),
                self.at(pos),
            )),
        }
    }

    /// Reads a dictionary object, calling `entry` with each key and its position.
    pub fn read_entries(
        &mut self,
        mut entry: impl FnMut(&mut Reader<'a>, String, Position) -> Result<()>,
    ) -> Result<()> {
        match self.next_token("'{'")? {
            (Token::BeginObject, _) => {}
            (token, pos) => return Err(self.mismatch("dictionary", &token, pos)),
        }
        let mut first = true;
        loop {
            let (token, pos) = self.next_token("key or '}'")?;
            let key = match token {
                Token::EndObject if first => return Ok(()),
                Token::Str(key) => key,
                other => {
                    return Err(Error::malformed(
                        format!("expected key but found {}", other),
                        self.at(pos),
                    ))
                }
            };
            first = false;
            self.expect_token(Token::Colon, "':'")?;
            let pos = self.at(pos);
            entry(self, key, pos)?;
            if !self.object_continues()? {
                return Ok(());
            }
        }
    }

    fn object_continues(&mut self) -> Result<bool> {
        match self.next_token("',' or '}'")? {
            (Token::Comma, _) => Ok(true),
            (Token::EndObject, _) => Ok(false),
            (token, pos) => Err(Error::malformed(
                format!("expected ',' or '}}' but found {}", token),
                self.at(pos),
            )),
        }
    }

    /// Reads a record into `target`, keeping members the input omits.
    pub fn read_record<T: Record>(&mut self, target: &mut T) -> Result<()> {
        let entry = self.registry.entry::<T>()?;
        self.read_record_with(&entry, target, false)
    }

    /// Reads a record at the root, where collection-like records append.
    pub(crate) fn read_record_root<T: Record>(&mut self, target: &mut T) -> Result<()> {
        let entry = self.registry.entry::<T>()?;
        self.read_record_with(&entry, target, true)
    }

    fn read_record_with<T: Record>(&mut self, entry: &Rc<TypeEntry<T>>, target: &mut T, root: bool) -> Result<()> {
        entry.check_usable(self.options)?;

        if let Some(items) = entry.items() {
            let read = if root { &items.append } else { &items.read };
            read(target, self)?;
            entry.finish_read(target);
            return Ok(());
        }

        match self.lexer.peek()? {
            Some(Token::BeginObject) => {
                self.lexer.next()?;
                self.read_members(entry, target, true)
            }
            Some(Token::BeginArray) if entry.is_compact() => self.read_compact(entry, target),
            Some(_) => {
                let (token, pos) = self.next_token("object")?;
                Err(self.mismatch(format!("'{}'", entry.type_name()), &token, pos))
            }
            None => Err(Error::unexpected_end(&format!("'{}'", entry.type_name()))),
        }
    }

    /// Reads the members that follow an already consumed `"class"` tag.
    pub fn read_record_after_class<T: Record>(&mut self, entry: &TypeEntry<T>, target: &mut T) -> Result<()> {
        entry.check_usable(self.options)?;
        self.read_members(entry, target, false)
    }

    /// Reads object members after `{` (`first`) or after a previous member.
    ///
    /// A `"class"` tag is only accepted as the first member of the object.
    fn read_members<T: Record>(&mut self, entry: &TypeEntry<T>, target: &mut T, first: bool) -> Result<()> {
        let mode = self.options.tag_mode;
        let members = entry.members();
        let mut leading = first;
        let mut seen = vec![false; members.len()];
        let mut more = if first {
            match self.lexer.peek()? {
                Some(Token::EndObject) => {
                    self.lexer.next()?;
                    false
                }
                _ => true,
            }
        } else {
            self.object_continues()?
        };

        while more {
            let (token, pos) = self.next_token("member tag")?;
            let tag = match token {
                Token::Str(tag) => tag,
                other => {
                    return Err(Error::malformed(
                        format!("expected member tag but found {}", other),
                        self.at(pos),
                    ))
                }
            };
            self.expect_token(Token::Colon, "':'")?;

            if tag == "class" {
                if !leading {
                    return Err(misplaced_class(self.at(pos)));
                }
                let (key, key_pos) = self.read_string_at()?;
                if key != entry.class_key() {
                    return Err(self.foreign_class(&key, key_pos, entry.type_name()));
                }
            } else {
                match entry.find(&tag, mode) {
                    Some(index) => {
                        members[index].read(target, self)?;
                        seen[index] = true;
                    }
                    None if self.options.ignore_new_fields => {
                        log::trace!("skipping unknown member '{}' of '{}'", tag, entry.type_name());
                        self.skip_value()?;
                    }
                    None => {
                        return Err(Error::unknown_member(&tag, entry.type_name(), self.at(pos)));
                    }
                }
            }
            leading = false;
            more = self.object_continues()?;
        }

        for (member, seen) in members.iter().zip(&seen) {
            let descriptor = member.descriptor();
            if !seen && !descriptor.optional {
                return Err(Error::missing_member(&descriptor.name, entry.type_name()));
            }
        }
        entry.finish_read(target);
        Ok(())
    }

    fn read_compact<T: Record>(&mut self, entry: &TypeEntry<T>, target: &mut T) -> Result<()> {
        self.lexer.next()?;
        let members = entry.members();
        let mut index = 0;
        if self.lexer.peek()? == Some(&Token::EndArray) {
            self.lexer.next()?;
        } else {
            loop {
                match members.get(index) {
                    Some(member) => member.read(target, self)?,
                    None => {
                        let (token, pos) = self.next_token("']'")?;
                        return Err(Error::malformed(
                            format!("too many elements for '{}': found {}", entry.type_name(), token),
                            self.at(pos),
                        ));
                    }
                }
                index += 1;
                if !self.seq_continues()? {
                    break;
                }
            }
        }
        if let Some(missing) = members.get(index) {
            return Err(Error::missing_member(&missing.descriptor().name, entry.type_name()));
        }
        entry.finish_read(target);
        Ok(())
    }

    /// Reads `{"class":"key"`, returning the key and its position.
    ///
    /// `slot` names the polymorphic slot in errors.
    pub fn read_class_tag(&mut self, slot: &str) -> Result<(String, Position)> {
        match self.next_token("'{'")? {
            (Token::BeginObject, _) => {}
            (token, pos) => return Err(self.mismatch(format!("'{}'", slot), &token, pos)),
        }
        match self.next_token("'class'")? {
            (Token::Str(tag), _) if tag == "class" => {}
            _ => return Err(Error::missing_member("class", slot)),
        }
        self.expect_token(Token::Colon, "':'")?;
        self.read_string_at()
    }

    /// Error for a class key that does not fit the slot being read.
    pub fn foreign_class(&self, key: &str, pos: Position, slot: &str) -> Error {
        if self.registry.resolve(key).is_some() {
            Error::type_mismatch(format!("'{}'", slot), format!("class '{}'", key), pos)
        } else {
            Error::unresolved_type(key, pos)
        }
    }

    /// Reads any value without a target type.
    ///
    /// Objects whose first tag is `"class"` naming a registered record become
    /// [`Value::Typed`].
    pub fn read_value(&mut self) -> Result<Value> {
        self.read_any(true)
    }

    /// Reads any value, keeping `"class"` tags as ordinary map entries.
    pub fn read_plain_value(&mut self) -> Result<Value> {
        self.read_any(false)
    }

    fn read_any(&mut self, typed: bool) -> Result<Value> {
        let (token, pos) = self.next_token("value")?;
        match token {
            Token::Null => Ok(Value::Null),
            Token::True => Ok(Value::Bool(true)),
            Token::False => Ok(Value::Bool(false)),
            Token::Str(text) => Ok(Value::String(text)),
            Token::Number(raw) => parse_float(&raw, self.at(pos)).map(Value::Number),
            Token::BeginArray => {
                let mut items = Vec::new();
                if self.lexer.peek()? == Some(&Token::EndArray) {
                    self.lexer.next()?;
                    return Ok(Value::List(items));
                }
                loop {
                    items.push(self.read_any(typed)?);
                    if !self.seq_continues()? {
                        return Ok(Value::List(items));
                    }
                }
            }
            Token::BeginObject => self.read_value_object(typed),
            other => Err(Error::malformed(format!("unexpected {}", other), self.at(pos))),
        }
    }

    fn read_value_object(&mut self, typed: bool) -> Result<Value> {
        let mut map = ValueMap::new();
        let mut first = true;
        loop {
            let (token, pos) = self.next_token("key or '}'")?;
            let key = match token {
                Token::EndObject if first => return Ok(Value::Map(map)),
                Token::Str(key) => key,
                other => {
                    return Err(Error::malformed(
                        format!("expected key but found {}", other),
                        self.at(pos),
                    ))
                }
            };
            self.expect_token(Token::Colon, "':'")?;
            if typed && first && key == "class" {
                let (class_key, key_pos) = self.read_string_at()?;
                let info = self
                    .registry
                    .resolve(&class_key)
                    .ok_or_else(|| Error::unresolved_type(&class_key, key_pos))?;
                return info.construct(self).map(Value::Typed);
            }
            first = false;
            let value = self.read_any(typed)?;
            map.insert(key, value);
            if !self.object_continues()? {
                return Ok(Value::Map(map));
            }
        }
    }

    /// Skips one complete value, checking syntax only.
    pub fn skip_value(&mut self) -> Result<()> {
        let mut stack: Vec<Container> = Vec::new();
        let mut state = SkipState::StartValue;

        while state != SkipState::Done {
            let (token, pos) = self.next_token("value")?;
            state = match (state, token) {
                (SkipState::StartValue, Token::BeginObject)
                | (SkipState::ArrayValueOrEnd, Token::BeginObject) => {
                    stack.push(Container::Object);
                    SkipState::ObjectKeyOrEnd
                }
                (SkipState::StartValue, Token::BeginArray)
                | (SkipState::ArrayValueOrEnd, Token::BeginArray) => {
                    stack.push(Container::Array);
                    SkipState::ArrayValueOrEnd
                }
                (
                    SkipState::StartValue | SkipState::ArrayValueOrEnd,
                    Token::Str(_) | Token::Number(_) | Token::True | Token::False | Token::Null,
                ) => after_value(&stack),
                (SkipState::ObjectKeyOrEnd, Token::EndObject)
                | (SkipState::ObjectNext, Token::EndObject)
                | (SkipState::ArrayValueOrEnd, Token::EndArray)
                | (SkipState::ArrayNext, Token::EndArray) => {
                    stack.pop();
                    after_value(&stack)
                }
                (SkipState::ObjectKeyOrEnd | SkipState::ObjectKey, Token::Str(_)) => {
                    SkipState::ObjectColon
                }
                (SkipState::ObjectColon, Token::Colon) => SkipState::StartValue,
                (SkipState::ObjectNext, Token::Comma) => SkipState::ObjectKey,
                (SkipState::ArrayNext, Token::Comma) => SkipState::StartValue,
                (_, other) => {
                    return Err(Error::malformed(format!("unexpected {}", other), self.at(pos)))
                }
            };
        }
        Ok(())
    }
}

fn after_value(stack: &[Container]) -> SkipState {
    match stack.last() {
        None => SkipState::Done,
        Some(Container::Object) => SkipState::ObjectNext,
        Some(Container::Array) => SkipState::ArrayNext,
    }
}

/// An enum value as it appeared on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumToken {
    Name(String),
    Ordinal(i64),
}

/// Parses an integer literal and narrows it to `N`.
pub(crate) fn parse_integer<N: TryFrom<i128>>(raw: &str, target: &str, pos: Position) -> Result<N> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::type_mismatch(target, raw, pos));
    }
    let wide: i128 = raw
        .parse()
        .map_err(|_| Error::range_overflow(raw, target, pos))?;
    N::try_from(wide).map_err(|_| Error::range_overflow(raw, target, pos))
}

pub(crate) fn parse_float(raw: &str, pos: Position) -> Result<f64> {
    match raw {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        _ => raw
            .parse()
            .map_err(|_| Error::type_mismatch("number", raw, pos)),
    }
}

/// Parses a date in `pattern`, or in the default form with any fraction length.
pub(crate) fn parse_datetime(text: &str, pattern: Option<&str>) -> Option<NaiveDateTime> {
    match pattern {
        Some(pattern) => NaiveDateTime::parse_from_str(text, pattern).ok().or_else(|| {
            NaiveDate::parse_from_str(text, pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }),
        None => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            }),
    }
}

/// Error for a `"class"` tag that is not the first member of its object.
pub(crate) fn misplaced_class(pos: Position) -> Error {
    Error::malformed("'class' tag must be the first member", pos)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DurationError {
    Syntax,
    Overflow,
}

fn clock_part(text: &str) -> std::result::Result<i64, DurationError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DurationError::Syntax);
    }
    text.parse().map_err(|_| DurationError::Overflow)
}

/// Parses `[-][d.]hh:mm:ss[.fffffff]`.
pub(crate) fn parse_duration(text: &str) -> std::result::Result<TimeDelta, DurationError> {
    use DurationError::{Overflow, Syntax};
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (clock, fraction) = match rest.rsplit_once('.') {
        Some((clock, fraction)) if clock.contains(':') && !fraction.contains(':') => {
            (clock, Some(fraction))
        }
        _ => (rest, None),
    };
    let (days, clock) = match clock.split_once('.') {
        Some((days, clock)) => (clock_part(days)?, clock),
        None => (0, clock),
    };
    let mut parts = clock.split(':');
    let mut next_part = || parts.next().ok_or(Syntax).and_then(clock_part);
    let hours = next_part()?;
    let minutes = next_part()?;
    let seconds = next_part()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return Err(Syntax);
    }
    let nanos = match fraction {
        Some(fraction) => {
            if fraction.is_empty() || fraction.len() > 9 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Syntax);
            }
            let value: i64 = fraction.parse().map_err(|_| Syntax)?;
            value * 10i64.pow(9 - fraction.len() as u32)
        }
        None => 0,
    };
    let total_seconds = days
        .checked_mul(86_400)
        .and_then(|s| s.checked_add(hours.checked_mul(3600)?))
        .and_then(|s| s.checked_add(minutes * 60 + seconds))
        .ok_or(Overflow)?;
    let total = TimeDelta::try_seconds(total_seconds)
        .and_then(|whole| whole.checked_add(&TimeDelta::nanoseconds(nanos)))
        .ok_or(Overflow)?;
    Ok(if negative { -total } else { total })
}
