//! types for representing counter machine instructions

use std::fmt;

/// Instructions of the counter machine.
///
/// All targets are indices into the instruction sequence of a [Program](crate::program::Program)
/// and all registers are indices into its register bank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Stops the execution. (`HALT`)
    Halt,

    /// Increments `register` and jumps to `target`. (`R<n>+ -> L<t>`)
    Increment {
        register: usize,
        target: usize,
    },

    /// Decrements `register` and jumps to `positive_target` if the register is greater than
    /// zero. Otherwise jumps to `zero_target` and leaves the register untouched.
    /// (`R<n>- -> L<p>, L<z>`)
    DecrementBranch {
        register: usize,
        positive_target: usize,
        zero_target: usize,
    },
}

impl Default for Instruction {
    fn default() -> Instruction {
        Instruction::Halt
    }
}

impl Instruction {
    /// The register the instruction operates on, if any.
    pub fn register(&self) -> Option<usize> {
        match *self {
            Instruction::Halt => None,
            Instruction::Increment { register, .. } => Some(register),
            Instruction::DecrementBranch { register, .. } => Some(register),
        }
    }

    pub fn is_halt(&self) -> bool {
        *self == Instruction::Halt
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Halt => write!(f, "HALT"),
            Instruction::Increment { register, target } =>
                write!(f, "R{}+ -> L{}", register, target),
            Instruction::DecrementBranch { register, positive_target, zero_target } =>
                write!(f, "R{}- -> L{}, L{}", register, positive_target, zero_target),
        }
    }
}

#[test]
fn test_display() {
    assert_eq!(Instruction::Halt.to_string(), "HALT");
    assert_eq!(Instruction::Increment { register: 0, target: 3 }.to_string(), "R0+ -> L3");
    assert_eq!(
        Instruction::DecrementBranch { register: 2, positive_target: 3, zero_target: 4 }.to_string(),
        "R2- -> L3, L4",
    );
}

#[test]
fn test_register() {
    assert_eq!(Instruction::Halt.register(), None);
    assert_eq!(Instruction::Increment { register: 7, target: 0 }.register(), Some(7));
    assert!(Instruction::default().is_halt());
}
