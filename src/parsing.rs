//! Cursor based scanning primitives shared by the parser.
//!
//! The [Scanner] wraps a [LocatedSpan] so that every position it hands out carries its byte
//! offset, line and column for diagnostics.

use nom::{
    bytes::complete::{tag, take_while},
    character::complete::{digit1, one_of},
    error::ErrorKind as NomErrorKind,
};
use nom_locate::LocatedSpan;

use crate::error::ErrorKind;

/// A slice of the source text that remembers where it starts.
pub type Span<'a> = LocatedSpan<&'a str>;

type ScanError<'a> = (Span<'a>, NomErrorKind);

/// Characters that end a statement (besides the end of input).
pub const TERMINATORS: &str = ";\n";

const SPACE_CHARACTERS: &str = " \t";
const BLANK_CHARACTERS: &str = " \t\n";

fn is_space(c: char) -> bool {
    SPACE_CHARACTERS.contains(c)
}

fn is_blank(c: char) -> bool {
    BLANK_CHARACTERS.contains(c)
}

/// A cursor over the source text.
///
/// Matching methods only advance the cursor when they succeed.
#[derive(Clone, Copy, Debug)]
pub struct Scanner<'a> {
    rest: Span<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            rest: Span::new(input),
        }
    }

    /// The unconsumed input, including its location in the original source.
    pub fn position(&self) -> Span<'a> {
        self.rest
    }

    /// Byte offset of the cursor from the beginning of the source.
    pub fn offset(&self) -> usize {
        self.rest.location_offset()
    }

    pub fn eof(&self) -> bool {
        self.rest.fragment().is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest.fragment().chars().next()
    }

    /// Returns `true` if the next character is one of `chars`.
    pub fn is_char(&self, chars: &str) -> bool {
        self.peek().map_or(false, |c| chars.contains(c))
    }

    /// Consumes the next character if it is one of `chars`.
    pub fn match_char(&mut self, chars: &str) -> Option<char> {
        match one_of::<_, _, ScanError<'a>>(chars)(self.rest) {
            Ok((rest, c)) => {
                self.rest = rest;
                Some(c)
            }
            Err(_) => None,
        }
    }

    /// Consumes `literal` if the input continues with it.
    pub fn match_str(&mut self, literal: &str) -> bool {
        match tag::<_, _, ScanError<'a>>(literal)(self.rest) {
            Ok((rest, _)) => {
                self.rest = rest;
                true
            }
            Err(_) => false,
        }
    }

    /// Lexes a run of decimal digits as an unsigned integer.
    pub fn take_integer(&mut self) -> Result<usize, ErrorKind> {
        let (rest, digits) = digit1::<_, ScanError<'a>>(self.rest)
            .map_err(|_| ErrorKind::NoIntegerParsed)?;

        let value = digits
            .fragment()
            .parse::<usize>()
            .map_err(|_| ErrorKind::IntegerOverflow)?;

        self.rest = rest;

        Ok(value)
    }

    /// Skips spaces and tabs.
    pub fn skip_spaces(&mut self) {
        if let Ok((rest, _)) = take_while::<_, _, ScanError<'a>>(is_space)(self.rest) {
            self.rest = rest;
        }
    }

    /// Skips spaces, tabs and newlines.
    pub fn skip_blank(&mut self) {
        if let Ok((rest, _)) = take_while::<_, _, ScanError<'a>>(is_blank)(self.rest) {
            self.rest = rest;
        }
    }

    /// The run of alphanumeric characters at the cursor. Used for diagnostics only.
    pub fn word(&self) -> &'a str {
        let fragment: &'a str = *self.rest.fragment();
        let end = fragment
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or_else(|| fragment.len());

        &fragment[..end]
    }
}
