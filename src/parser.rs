//! Recursive-descent parser for counter machine programs.
//!
//! ```text
//! program     := line*
//! line        := [label ':'] (halt | transfer) terminator
//! label       := 'L' integer
//! halt        := 'HALT'
//! transfer    := register ('+' increment | '-' decrement)
//! register    := 'R' integer
//! increment   := '->' label
//! decrement   := '->' label ',' label
//! terminator  := ';' | newline | end-of-input
//! ```

use edit_distance::edit_distance;
use slog::{debug, o, trace, warn, Discard, Logger};

use crate::capacity::Capacities;
use crate::error::{ErrorKind, ParseError};
use crate::instruction::Instruction;
use crate::parsing::{Scanner, TERMINATORS};
use crate::program::Program;

type Result<T> = std::result::Result<T, ParseError>;

const HALT_KEYWORD: &str = "HALT";

/// Translates program text into a [Program] with a fixed number of instruction slots.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    capacities: Capacities,
    logger: Logger,
}

impl<'a> Parser<'a> {
    /// Create a parser for `input` which fills at most `capacities.lines` slots.
    ///
    /// Capacities below 1 are raised to 1.
    pub fn new<L>(input: &'a str, capacities: Capacities, logger: L) -> Parser<'a>
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or_else(|| Logger::root(Discard, o!()))
            .new(o!("stage" => "parsing"));

        let capacities = Capacities::new(
            std::cmp::max(capacities.registers, 1),
            std::cmp::max(capacities.lines, 1),
        );

        Parser {
            scanner: Scanner::new(input),
            capacities,
            logger,
        }
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::at(self.scanner.position(), kind)
    }

    fn parse_integer(&mut self) -> Result<usize> {
        let position = self.scanner.position();

        self.scanner
            .take_integer()
            .map_err(|kind| ParseError::at(position, kind))
    }

    fn parse_line_number(&mut self) -> Result<usize> {
        if self.scanner.match_char("L").is_none() {
            return Err(self.error(ErrorKind::ExpectedLineNumber));
        }

        self.parse_integer()
    }

    fn parse_register(&mut self) -> Result<usize> {
        let position = self.scanner.position();
        let register = self.parse_integer()?;

        if register >= self.capacities.registers {
            return Err(ParseError::at(position, ErrorKind::RegisterOutOfRange {
                register,
                capacity: self.capacities.registers,
            }));
        }

        Ok(register)
    }

    fn parse_terminator(&mut self) -> Result<()> {
        self.scanner.skip_spaces();

        if !self.scanner.eof() && self.scanner.match_char(TERMINATORS).is_none() {
            return Err(self.error(ErrorKind::ExpectedTerminator));
        }

        Ok(())
    }

    /// Parses `L<n>:` and checks that `n` is the index of the current line.
    fn parse_label(&mut self, line: usize) -> Result<()> {
        let position = self.scanner.position();
        let found = self.parse_line_number()?;

        if found != line {
            return Err(ParseError::at(position, ErrorKind::LineNumberMismatch {
                expected: line,
                found,
            }));
        }

        self.scanner.skip_spaces();

        if self.scanner.match_char(":").is_none() {
            return Err(self.error(ErrorKind::ExpectedColon));
        }

        self.scanner.skip_spaces();

        Ok(())
    }

    /// Parses the remainder of an increment or decrement statement after the `R`.
    fn parse_transfer(&mut self) -> Result<Instruction> {
        let register = self.parse_register()?;

        self.scanner.skip_spaces();

        let sign = self.scanner
            .match_char("+-")
            .ok_or_else(|| self.error(ErrorKind::ExpectedSignToken))?;

        self.scanner.skip_spaces();

        if !self.scanner.match_str("->") {
            return Err(self.error(ErrorKind::ExpectedArrow));
        }

        self.scanner.skip_spaces();

        let target = self.parse_line_number()?;

        if sign == '+' {
            self.parse_terminator()?;
            return Ok(Instruction::Increment { register, target });
        }

        self.scanner.skip_spaces();

        if self.scanner.match_char(",").is_none() {
            return Err(self.error(ErrorKind::ExpectedComma));
        }

        self.scanner.skip_spaces();

        let zero_target = self.parse_line_number()?;
        self.parse_terminator()?;

        Ok(Instruction::DecrementBranch {
            register,
            positive_target: target,
            zero_target,
        })
    }

    fn unrecognized_statement(&self) -> ParseError {
        let error = self.error(ErrorKind::UnrecognizedStatement);
        let word = self.scanner.word().to_uppercase();

        if !word.is_empty() && edit_distance(&word, HALT_KEYWORD) <= 2 {
            return error.with_hint("did you mean 'HALT'?");
        }

        error
    }

    /// Parses the statement for the slot `line`.
    fn parse_statement(&mut self, line: usize) -> Result<Instruction> {
        if self.scanner.is_char("L") {
            self.parse_label(line)?;
        }

        if self.scanner.match_char("R").is_some() {
            self.parse_transfer()
        } else if self.scanner.match_str(HALT_KEYWORD) {
            self.parse_terminator()?;
            Ok(Instruction::Halt)
        } else if self.scanner.eof() || self.scanner.match_char(TERMINATORS).is_some() {
            // An empty statement still occupies its slot.
            Ok(Instruction::Halt)
        } else {
            Err(self.unrecognized_statement())
        }
    }

    /// Parses the whole input.
    ///
    /// Slots the input does not reach are left as [Instruction::Halt].
    pub fn parse(mut self) -> Result<Program> {
        debug!(self.logger, "parsing program";
               "registers" => self.capacities.registers,
               "lines" => self.capacities.lines);

        let mut instructions = Vec::new();

        self.scanner.skip_blank();

        while instructions.len() < self.capacities.lines && !self.scanner.eof() {
            let line = instructions.len();
            let instruction = self.parse_statement(line)?;

            trace!(self.logger, "parsed instruction"; "line" => line, "instruction" => %instruction);

            instructions.push(instruction);
            self.scanner.skip_blank();
        }

        if !self.scanner.eof() {
            warn!(self.logger, "ignoring input past the last instruction slot";
                  "offset" => self.scanner.offset(),
                  "lines" => self.capacities.lines);
        }

        Ok(Program::new(instructions, self.capacities))
    }
}

/// Parses `source` with capacities inferred by [infer_capacities](crate::infer_capacities).
pub fn parse(source: &str) -> Result<Program> {
    parse_with_logger(source, None::<Capacities>, None::<Logger>)
}

/// Parses `source` into a program with exactly `capacities.lines` instruction slots.
pub fn parse_with_capacities(source: &str, capacities: Capacities) -> Result<Program> {
    parse_with_logger(source, capacities, None::<Logger>)
}

/// Parses `source`, logging the progress to `logger`.
///
/// If `capacities` is `None` they are inferred from the source.
pub fn parse_with_logger<C, L>(source: &str, capacities: C, logger: L) -> Result<Program>
where
    C: Into<Option<Capacities>>,
    L: Into<Option<Logger>>,
{
    let capacities = capacities
        .into()
        .unwrap_or_else(|| crate::capacity::infer_capacities(source));

    Parser::new(source, capacities, logger).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(source: &str) -> ErrorKind {
        match parse(source) {
            Ok(program) => panic!("expected an error, parsed {:?}", program),
            Err(error) => error.kind(),
        }
    }

    #[test]
    fn test_parse_addition() {
        let program = parse("L0: R1- -> L1, L2\nL1: R0+ -> L0\nL2: R2- -> L3, L4\nL3: R0+ -> L2\nL4: HALT")
            .unwrap();

        assert_eq!(program.register_count(), 3);
        assert_eq!(program.instructions(), &[
            Instruction::DecrementBranch { register: 1, positive_target: 1, zero_target: 2 },
            Instruction::Increment { register: 0, target: 0 },
            Instruction::DecrementBranch { register: 2, positive_target: 3, zero_target: 4 },
            Instruction::Increment { register: 0, target: 2 },
            Instruction::Halt,
        ]);
    }

    #[test]
    fn test_labels_are_optional() {
        let program = parse("R0+ -> L1; L1: HALT").unwrap();

        assert_eq!(program.instructions(), &[
            Instruction::Increment { register: 0, target: 1 },
            Instruction::Halt,
        ]);
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let program = parse("  L0\t:R0-->L0 ,L1\n\n\tL1 :  HALT  ;").unwrap();

        assert_eq!(program.instructions(), &[
            Instruction::DecrementBranch { register: 0, positive_target: 0, zero_target: 1 },
            Instruction::Halt,
        ]);
    }

    #[test]
    fn test_empty_statement_is_halt() {
        let program = parse("R0+ -> L2;;R0+ -> L0").unwrap();

        assert_eq!(program.instructions(), &[
            Instruction::Increment { register: 0, target: 2 },
            Instruction::Halt,
            Instruction::Increment { register: 0, target: 0 },
        ]);
    }

    #[test]
    fn test_label_without_statement_is_halt() {
        let program = parse("L0:\nL1: R0+ -> L0").unwrap();

        assert_eq!(program.instruction(0), Some(&Instruction::Halt));
        assert_eq!(program.instruction(1), Some(&Instruction::Increment { register: 0, target: 0 }));
    }

    #[test]
    fn test_unfilled_slots_are_halt() {
        let program = parse("L0: R0+ -> L5").unwrap();

        assert_eq!(program.instruction_count(), 6);
        assert_eq!(program.instructions().len(), 1);
        assert!((1..6).all(|line| program.instruction(line) == Some(&Instruction::Halt)));
    }

    #[test]
    fn test_input_past_capacity_is_ignored() {
        let program = parse_with_capacities("HALT\nR0+ -> L0\nnonsense", Capacities::new(1, 1))
            .unwrap();

        assert_eq!(program.instructions(), &[Instruction::Halt]);
    }

    #[test]
    fn test_line_number_mismatch() {
        assert_eq!(
            kind_of("L1: HALT"),
            ErrorKind::LineNumberMismatch { expected: 0, found: 1 },
        );
        assert_eq!(
            kind_of("L0: R0+ -> L1\nL0: HALT"),
            ErrorKind::LineNumberMismatch { expected: 1, found: 0 },
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(kind_of("R0+ -> 5"), ErrorKind::ExpectedLineNumber);
        assert_eq!(kind_of("R0+ ->"), ErrorKind::ExpectedLineNumber);
        assert_eq!(kind_of("L0 HALT"), ErrorKind::ExpectedColon);
        assert_eq!(kind_of("R0 * -> L0"), ErrorKind::ExpectedSignToken);
        assert_eq!(kind_of("R0"), ErrorKind::ExpectedSignToken);
        assert_eq!(kind_of("R0+ L0"), ErrorKind::ExpectedArrow);
        assert_eq!(kind_of("R0- -> L0 L1"), ErrorKind::ExpectedComma);
        assert_eq!(kind_of("HALT HALT"), ErrorKind::ExpectedTerminator);
        assert_eq!(kind_of("R0+ -> L0 L1"), ErrorKind::ExpectedTerminator);
        assert_eq!(kind_of("JUMP L0"), ErrorKind::UnrecognizedStatement);
        assert_eq!(kind_of("R+ -> L0"), ErrorKind::NoIntegerParsed);
        assert_eq!(kind_of("L: HALT"), ErrorKind::NoIntegerParsed);
        assert_eq!(kind_of("R0+ -> L"), ErrorKind::NoIntegerParsed);
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(kind_of("R0+ -> L99999999999999999999999999"), ErrorKind::IntegerOverflow);
    }

    #[test]
    fn test_register_out_of_range() {
        let error = parse_with_capacities("R3+ -> L0", Capacities::new(2, 1)).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::RegisterOutOfRange { register: 3, capacity: 2 });
        assert_eq!(error.column(), 2);
    }

    #[test]
    fn test_zero_register_capacity_admits_register_zero() {
        let program = parse_with_capacities("R0+ -> L0", Capacities::new(0, 1)).unwrap();

        assert_eq!(program.register_count(), 1);
        assert_eq!(program.execute_bounded(&[0u8], 3), Ok(None));

        let error = parse_with_capacities("R1+ -> L0", Capacities::new(0, 0)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::RegisterOutOfRange { register: 1, capacity: 1 });
    }

    #[test]
    fn test_halt_hint() {
        let error = parse("L0: HLAT").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnrecognizedStatement);
        assert_eq!(error.hint(), Some("did you mean 'HALT'?"));

        let error = parse("L0: JUMP").unwrap_err();
        assert_eq!(error.hint(), None);
    }
}
