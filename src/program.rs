use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::capacity::Capacities;
use crate::emulator::{Counter, Emulator};
use crate::error::{ExecutionError, ParseError};
use crate::instruction::Instruction;

/// Instruction of the slots past the last parsed line.
static PADDING: Instruction = Instruction::Halt;

/// A validated counter machine program.
///
/// The index of an instruction is its line number. A program always has at least one
/// instruction slot and at least one register, and never changes after it has been built.
///
/// Only the parsed instructions are stored. The remaining slots up to
/// [instruction_count](Program::instruction_count) hold [Instruction::Halt].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
    instruction_count: usize,
    register_count: usize,
}

impl Program {
    /// Builds a program with `capacities.lines` slots from parsed instructions.
    ///
    /// The capacities are expected to be at least 1 and to cover `instructions`.
    pub(crate) fn new(instructions: Vec<Instruction>, capacities: Capacities) -> Program {
        Program {
            instruction_count: std::cmp::max(capacities.lines, instructions.len()),
            instructions,
            register_count: capacities.registers,
        }
    }

    /// Parses a program, inferring its capacities from the source.
    pub fn parse(source: &str) -> Result<Program, ParseError> {
        crate::parser::parse(source)
    }

    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    pub fn register_count(&self) -> usize {
        self.register_count
    }

    /// The parsed instructions, without the trailing `HALT` slots.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions[..]
    }

    /// Fetch the instruction at `line`.
    ///
    /// # Returns
    /// `None` if `line` is not below [instruction_count](Program::instruction_count).
    pub fn instruction(&self, line: usize) -> Option<&Instruction> {
        match self.instructions.get(line) {
            Some(instruction) => Some(instruction),
            None if line < self.instruction_count => Some(&PADDING),
            None => None,
        }
    }

    /// Executes the program until it halts.
    ///
    /// The first `initial.len()` registers are seeded from `initial` and the rest start at zero.
    /// Does not return if the program never halts, see [Program::execute_bounded].
    ///
    /// # Returns
    /// The value of register 0 after the program has halted.
    pub fn execute<W: Counter>(&self, initial: &[W]) -> Result<W, ExecutionError> {
        Emulator::new(self, initial)?.run()
    }

    /// Executes at most `max_steps` instructions.
    ///
    /// # Returns
    /// `Ok(None)` if the program did not halt within `max_steps` steps.
    pub fn execute_bounded<W: Counter>(
        &self,
        initial: &[W],
        max_steps: u64,
    ) -> Result<Option<W>, ExecutionError> {
        Emulator::new(self, initial)?.run_for(max_steps)
    }
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Program, ParseError> {
        Program::parse(source)
    }
}

/// Renders the parsed instructions as source text with one labelled line each.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let listing = self.instructions
            .iter()
            .enumerate()
            .map(|(line, instruction)| format!("L{}: {}", line, instruction))
            .join("\n");

        write!(f, "{}", listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_capacities() {
        let program = crate::parse_with_capacities("", Capacities::new(0, 0)).unwrap();

        assert_eq!(program.instruction_count(), 1);
        assert_eq!(program.register_count(), 1);
        assert_eq!(program.instruction(0), Some(&Instruction::Halt));
        assert_eq!(program.instruction(1), None);
    }

    #[test]
    fn test_display_round_trip() {
        let source = "R1- -> L1, L2\nR0+ -> L0\n\nL2: HALT";
        let program: Program = source.parse().unwrap();

        let listing = program.to_string();
        assert_eq!(listing, "L0: R1- -> L1, L2\nL1: R0+ -> L0\nL2: HALT");
        assert_eq!(Program::parse(&listing).unwrap(), program);
    }

    #[test]
    fn test_padding_is_not_stored() {
        let program = Program::parse("L0: R0+ -> L100000000000000").unwrap();

        assert_eq!(program.instruction_count(), 100_000_000_000_001);
        assert_eq!(program.instructions().len(), 1);
        assert_eq!(program.instruction(99_999_999_999_999), Some(&Instruction::Halt));
        assert_eq!(program.instruction(100_000_000_000_000), Some(&Instruction::Halt));
        assert_eq!(program.instruction(100_000_000_000_001), None);
        assert_eq!(program.to_string(), "L0: R0+ -> L100000000000000");
    }

    #[test]
    fn test_huge_label_executes() {
        let program = Program::parse("L0: R0+ -> L100000000000000").unwrap();

        assert_eq!(program.execute(&[41u32]), Ok(42));
    }
}
