use std::fmt::{self, Display};

use crate::parsing::Span;

/// The reason a program could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A line number (`L<n>`) was expected but not found.
    ExpectedLineNumber,

    /// A line label does not match the position of its line.
    LineNumberMismatch {
        /// The index of the line being parsed.
        expected: usize,
        /// The value written in the label.
        found: usize,
    },

    /// A label is not followed by `:`.
    ExpectedColon,

    /// A register reference is not followed by `+` or `-`.
    ExpectedSignToken,

    /// The `->` token is missing.
    ExpectedArrow,

    /// The two targets of a decrement instruction are not separated by `,`.
    ExpectedComma,

    /// A statement is not followed by `;`, a newline or the end of input.
    ExpectedTerminator,

    /// The line does not start with any known statement.
    UnrecognizedStatement,

    /// An integer was required but there were no digits.
    NoIntegerParsed,

    /// An integer does not fit into `usize`.
    IntegerOverflow,

    /// A register index does not fit into the register bank.
    RegisterOutOfRange {
        register: usize,
        capacity: usize,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::ExpectedLineNumber => write!(f, "expected a line number"),
            ErrorKind::LineNumberMismatch { expected, found } =>
                write!(f, "line number L{} does not match the line index {}", found, expected),
            ErrorKind::ExpectedColon => write!(f, "expected ':'"),
            ErrorKind::ExpectedSignToken => write!(f, "expected either '+' or '-'"),
            ErrorKind::ExpectedArrow => write!(f, "expected \"->\""),
            ErrorKind::ExpectedComma => write!(f, "expected ','"),
            ErrorKind::ExpectedTerminator =>
                write!(f, "missing statement terminator (';', newline or end of input)"),
            ErrorKind::UnrecognizedStatement => write!(f, "unrecognized statement"),
            ErrorKind::NoIntegerParsed => write!(f, "no number specified"),
            ErrorKind::IntegerOverflow => write!(f, "number is too large"),
            ErrorKind::RegisterOutOfRange { register, capacity } =>
                write!(f, "register R{} is out of range for {} registers", register, capacity),
        }
    }
}

/// Error type that contains the reason of the error and its location in the source.
///
/// For a rendering which includes the offending input see [ParseError::verbose].
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    offset: usize,
    line: u32,
    column: usize,
    hint: Option<&'static str>,
}

impl ParseError {
    pub(crate) fn at(position: Span, kind: ErrorKind) -> ParseError {
        ParseError {
            kind,
            offset: position.location_offset(),
            line: position.location_line(),
            column: position.get_column(),
            hint: None,
        }
    }

    pub(crate) fn with_hint(mut self, hint: &'static str) -> ParseError {
        self.hint = Some(hint);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset of the error location.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The line number of the error location, starting from 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The column number of the error location, starting from 1.
    pub fn column(&self) -> usize {
        self.column
    }

    /// A suggestion for fixing the error, if one is known.
    pub fn hint(&self) -> Option<&'static str> {
        self.hint
    }

    /// Attaches the offending input to the error.
    ///
    /// # Parameters
    /// - `input`: The original input buffer or an exact copy of it.
    pub fn verbose(self, input: &str) -> VerboseParseError {
        let start = std::cmp::min(self.offset, input.len());

        let rest = input[start..]
            .char_indices()
            .take_while(|&(i, c)| c != '\n' && i <= 20)
            .last()
            .map(|(i, c)| &input[start..start + i + c.len_utf8()])
            .unwrap_or("");

        VerboseParseError {
            error: self,
            rest,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at line {} col {}: {}", self.line, self.column, self.kind)?;

        if let Some(hint) = self.hint {
            write!(f, " ({})", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Error type containing the offending input in addition to the location of the error.
///
/// Created from a [ParseError] with [ParseError::verbose].
#[derive(Clone, Debug)]
pub struct VerboseParseError<'a> {
    pub error: ParseError,
    rest: &'a str,
}

impl<'a> VerboseParseError<'a> {
    /// The input at the error location, up to the end of its line.
    pub fn rest(&self) -> &'a str {
        self.rest
    }
}

impl<'a> Display for VerboseParseError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, at '{}'", self.error, self.rest)
    }
}

/// Errors which abort the execution of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionError {
    /// A jump landed exactly one past the last instruction.
    JumpOutOfRange {
        /// The line of the jumping instruction.
        from: usize,
        target: usize,
        instruction_count: usize,
    },

    /// More initial values were supplied than the program has registers.
    TooManyInitialValues {
        given: usize,
        capacity: usize,
    },

    /// The register bank of the program does not fit in memory.
    RegisterBankTooLarge {
        registers: usize,
    },
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionError::JumpOutOfRange { from, target, instruction_count } => write!(
                f,
                "jump from L{} to L{} is out of range for a program of {} instructions",
                from, target, instruction_count,
            ),
            ExecutionError::TooManyInitialValues { given, capacity } => write!(
                f,
                "{} initial values given for a program with {} registers",
                given, capacity,
            ),
            ExecutionError::RegisterBankTooLarge { registers } => write!(
                f,
                "can not allocate {} registers",
                registers,
            ),
        }
    }
}

impl std::error::Error for ExecutionError {}
