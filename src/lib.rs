//! A crate for parsing and executing programs for counter (register) machines.
//!
//! A counter machine has a bank of registers holding non-negative integers and only three
//! instructions:
//!
//! - `R<n>+ -> L<t>` increments register `n` and jumps to line `t`.
//! - `R<n>- -> L<p>, L<z>` decrements register `n` and jumps to line `p` if the register is
//!   greater than zero, otherwise it jumps to line `z`.
//! - `HALT` stops the machine. The result of the computation is the value of register 0.
//!
//! Every statement may be prefixed with a label `L<n>:` which has to match the position of the
//! statement in the program. Statements are terminated by `;`, a newline or the end of input.
//!
//! Currently this crate provides the functionality to:
//! - Infer the number of registers and instructions a program needs.
//! - Parse program text into a validated [Program].
//! - Execute programs, either to completion or step by step with an [Emulator].
//!
//! # Example
//! ```
//! use ctrm::Program;
//!
//! // Adds the values of R1 and R2 into R0.
//! let source = r#"
//!     L0: R1- -> L1, L2
//!     L1: R0+ -> L0
//!     L2: R2- -> L3, L4
//!     L3: R0+ -> L2
//!     L4: HALT
//! "#;
//!
//! let program = Program::parse(source).expect("could not parse the program");
//!
//! assert_eq!(program.register_count(), 3);
//! assert_eq!(program.instruction_count(), 5);
//! assert_eq!(program.execute(&[0u32, 3, 5]), Ok(8));
//! ```
//!
//! # Executables
//!
//! ## `ctrmrun`
//!
//! Built with the `ctrmrun` feature. Parses a program from a file and runs it with the initial
//! register values given on the command line.
//!
//! ```text
//! $ ctrmrun add.rm 0 3 5
//! 8
//! ```
pub mod parsing;
pub mod capacity;
pub mod instruction;
pub mod parser;
pub mod program;
pub mod emulator;
pub mod error;
pub mod event;

pub use capacity::{infer_capacities, Capacities};
pub use emulator::{Counter, Emulator};
pub use error::{ErrorKind, ExecutionError, ParseError};
pub use instruction::Instruction;
pub use parser::{parse, parse_with_capacities, parse_with_logger};
pub use program::Program;
