//! Tokenizer for the JSON text form.
//!
//! The lexer works on a `&str` and tracks the 1-based character position of
//! every token, so reader errors can point at the offending character. It
//! accepts the bare words `NaN` and `Infinity` (optionally negated) in addition
//! to standard JSON, since the writer emits them for non-finite floats.

use crate::{Error, Position, Result};
use std::fmt;

/// A single lexical token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    Colon,
    Comma,
    Str(String),
    /// Raw numeric text, including `NaN`, `Infinity` and `-Infinity`.
    Number(String),
    True,
    False,
    Null,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::BeginObject => f.write_str("'{'"),
            Token::EndObject => f.write_str("'}'"),
            Token::BeginArray => f.write_str("'['"),
            Token::EndArray => f.write_str("']'"),
            Token::Colon => f.write_str("':'"),
            Token::Comma => f.write_str("','"),
            Token::Str(s) => write!(f, "string \"{}\"", s),
            Token::Number(raw) => write!(f, "number {}", raw),
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Null => f.write_str("null"),
        }
    }
}

pub(crate) struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    consumed: usize,
    report_positions: bool,
    peeked: Option<(Token, usize)>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(input: &'a str, report_positions: bool) -> Self {
        Lexer {
            input,
            offset: 0,
            consumed: 0,
            report_positions,
            peeked: None,
        }
    }

    /// Converts a 1-based character position into a reportable [`Position`].
    pub(crate) fn at(&self, position: usize) -> Position {
        if self.report_positions {
            Position::at(position)
        } else {
            Position::NONE
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.offset += ch.len_utf8();
        self.consumed += 1;
        Some(ch)
    }

    /// Position the next unread character will have.
    fn here(&self) -> usize {
        self.consumed + 1
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if matches!(ch, ' ' | '\t' | '\n' | '\r') {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Returns the next token without consuming it.
    pub(crate) fn peek(&mut self) -> Result<Option<&Token>> {
        if self.peeked.is_none() {
            self.peeked = self.lex()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| token))
    }

    /// Consumes and returns the next token with its start position.
    pub(crate) fn next(&mut self) -> Result<Option<(Token, usize)>> {
        match self.peeked.take() {
            Some(peeked) => Ok(Some(peeked)),
            None => self.lex(),
        }
    }

    /// Like [`Lexer::next`], but running out of input is an error naming `expected`.
    pub(crate) fn expect(&mut self, expected: &str) -> Result<(Token, usize)> {
        self.next()?.ok_or_else(|| Error::unexpected_end(expected))
    }

    /// Fails unless only whitespace remains.
    pub(crate) fn finish(&mut self) -> Result<()> {
        match self.next()? {
            None => Ok(()),
            Some((token, pos)) => Err(Error::malformed(
                format!("unexpected {} after value", token),
                self.at(pos),
            )),
        }
    }

    fn lex(&mut self) -> Result<Option<(Token, usize)>> {
        self.skip_whitespace();
        let start = self.here();
        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => return Ok(None),
        };
        let token = match ch {
            '{' => self.single(Token::BeginObject),
            '}' => self.single(Token::EndObject),
            '[' => self.single(Token::BeginArray),
            ']' => self.single(Token::EndArray),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '"' => Token::Str(self.lex_string()?),
            '-' | '0'..='9' => Token::Number(self.lex_number()?),
            't' => self.keyword("true", Token::True)?,
            'f' => self.keyword("false", Token::False)?,
            'n' => self.keyword("null", Token::Null)?,
            'N' => self.keyword("NaN", Token::Number("NaN".to_string()))?,
            'I' => self.keyword("Infinity", Token::Number("Infinity".to_string()))?,
            other => {
                return Err(Error::malformed(
                    format!("unexpected character '{}'", other),
                    self.at(start),
                ))
            }
        };
        Ok(Some((token, start)))
    }

    fn single(&mut self, token: Token) -> Token {
        self.next_char();
        token
    }

    fn keyword(&mut self, word: &str, token: Token) -> Result<Token> {
        for expected in word.chars() {
            let pos = self.here();
            match self.next_char() {
                Some(ch) if ch == expected => {}
                Some(ch) => {
                    return Err(Error::malformed(
                        format!("expected '{}' but found '{}'", expected, ch),
                        self.at(pos),
                    ))
                }
                None => return Err(Error::unexpected_end(&format!("'{}'", expected))),
            }
        }
        Ok(token)
    }

    fn lex_number(&mut self) -> Result<String> {
        let start = self.offset;
        if self.peek_char() == Some('-') {
            self.next_char();
            if self.peek_char() == Some('I') {
                self.keyword("Infinity", Token::Null)?;
                return Ok("-Infinity".to_string());
            }
        }
        if !self.digits() {
            return match self.peek_char() {
                Some(ch) => Err(Error::malformed(
                    format!("expected digit but found '{}'", ch),
                    self.at(self.here()),
                )),
                None => Err(Error::unexpected_end("digit")),
            };
        }
        if self.peek_char() == Some('.') {
            self.next_char();
            self.require_digits()?;
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.next_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.next_char();
            }
            self.require_digits()?;
        }
        Ok(self.input[start..self.offset].to_string())
    }

    fn digits(&mut self) -> bool {
        let mut any = false;
        while matches!(self.peek_char(), Some('0'..='9')) {
            self.next_char();
            any = true;
        }
        any
    }

    fn require_digits(&mut self) -> Result<()> {
        if self.digits() {
            return Ok(());
        }
        match self.peek_char() {
            Some(ch) => Err(Error::malformed(
                format!("expected digit but found '{}'", ch),
                self.at(self.here()),
            )),
            None => Err(Error::unexpected_end("digit")),
        }
    }

    fn lex_string(&mut self) -> Result<String> {
        self.next_char(); // opening quote
        let mut result = String::new();
        loop {
            match self.next_char() {
                None => return Err(Error::unexpected_end("'\"'")),
                Some('"') => return Ok(result),
                Some('\\') => {
                    let escape_pos = self.here();
                    match self.next_char() {
                        Some('"') => result.push('"'),
                        Some('\\') => result.push('\\'),
                        Some('/') => result.push('/'),
                        Some('b') => result.push('\u{0008}'),
                        Some('f') => result.push('\u{000C}'),
                        Some('n') => result.push('\n'),
                        Some('r') => result.push('\r'),
                        Some('t') => result.push('\t'),
                        Some('u') => result.push(self.lex_unicode_escape()?),
                        Some(other) => {
                            return Err(Error::malformed(
                                format!("invalid escape '\\{}'", other),
                                self.at(escape_pos),
                            ))
                        }
                        None => return Err(Error::unexpected_end("escape character")),
                    }
                }
                Some(ch) => result.push(ch),
            }
        }
    }

    fn lex_unicode_escape(&mut self) -> Result<char> {
        let first = self.hex4()?;
        if !(0xD800..0xDC00).contains(&first) {
            return char::from_u32(first).ok_or_else(|| {
                Error::malformed(format!("invalid code point {:04x}", first), self.at(self.consumed))
            });
        }
        // High surrogate: a low surrogate escape must follow.
        let pos = self.here();
        if self.next_char() != Some('\\') || self.next_char() != Some('u') {
            return Err(Error::malformed("unpaired surrogate", self.at(pos)));
        }
        let second = self.hex4()?;
        if !(0xDC00..0xE000).contains(&second) {
            return Err(Error::malformed("unpaired surrogate", self.at(pos)));
        }
        let code = 0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00);
        char::from_u32(code)
            .ok_or_else(|| Error::malformed(format!("invalid code point {:x}", code), self.at(pos)))
    }

    fn hex4(&mut self) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let pos = self.here();
            match self.next_char() {
                Some(ch) => match ch.to_digit(16) {
                    Some(digit) => code = code * 16 + digit,
                    None => {
                        return Err(Error::malformed(
                            format!("invalid hex digit '{}' in unicode escape", ch),
                            self.at(pos),
                        ))
                    }
                },
                None => return Err(Error::unexpected_end("hex digit")),
            }
        }
        Ok(code)
    }
}
