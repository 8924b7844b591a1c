//! [Emulator] for executing [programs](crate::program::Program).

use std::cmp::Ordering;
use std::fmt;

use slog::{debug, o, trace, Discard, Logger};

use crate::error::ExecutionError;
use crate::event::{Event, EventDispatcher, EventListener};
use crate::instruction::Instruction;
use crate::program::Program;

/// Unsigned integer type used for the values of the registers.
///
/// Incrementing and decrementing wrap around on overflow. Decrementing is only ever done on
/// values greater than zero.
pub trait Counter: Copy + PartialEq + fmt::Debug + fmt::Display + 'static {
    /// The value every register starts with.
    fn zero() -> Self;

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn increment(self) -> Self;

    fn decrement(self) -> Self;
}

macro_rules! impl_counter {
    ($($ty:ty),*) => {
        $(impl Counter for $ty {
            fn zero() -> $ty {
                0
            }

            fn increment(self) -> $ty {
                self.wrapping_add(1)
            }

            fn decrement(self) -> $ty {
                self.wrapping_sub(1)
            }
        })*
    };
}

impl_counter!(u8, u16, u32, u64, u128, usize);

/// Contains the execution state of the counter machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Context<W> {
    /// The Program Counter stores the line of the next instruction to be executed.
    pub pc: usize,

    /// The register bank.
    pub registers: Vec<W>,
}

/// The emulator contains all neccessary context for executing a program.
pub struct Emulator<'p, W> {
    program: &'p Program,

    /// The execution context, which includes the program counter and the registers.
    pub context: Context<W>,

    /// True if the execution has been halted.
    pub halted: bool,

    steps: u64,
    logger: Logger,
    dispatcher: EventDispatcher<W>,
}

impl<'p, W: Counter> Emulator<'p, W> {
    /// Create a new emulator.
    ///
    /// # Parameters
    /// - `program`: The program to be executed.
    /// - `initial`: Values for the first registers. Remaining registers start at zero.
    ///
    /// # Errors
    /// [ExecutionError::TooManyInitialValues] if `initial` has more values than the program has
    /// registers, [ExecutionError::RegisterBankTooLarge] if the registers can not be allocated.
    pub fn new(program: &'p Program, initial: &[W]) -> Result<Emulator<'p, W>, ExecutionError> {
        Emulator::with_logger(program, initial, None::<Logger>)
    }

    /// Create a new emulator which logs its progress to `logger`.
    pub fn with_logger<L>(
        program: &'p Program,
        initial: &[W],
        logger: L,
    ) -> Result<Emulator<'p, W>, ExecutionError>
    where
        L: Into<Option<Logger>>,
    {
        let capacity = program.register_count();

        if initial.len() > capacity {
            return Err(ExecutionError::TooManyInitialValues {
                given: initial.len(),
                capacity,
            });
        }

        let mut registers = Vec::new();
        registers
            .try_reserve_exact(capacity)
            .map_err(|_| ExecutionError::RegisterBankTooLarge { registers: capacity })?;
        registers.extend_from_slice(initial);
        registers.resize(capacity, W::zero());

        let logger = logger
            .into()
            .unwrap_or_else(|| Logger::root(Discard, o!()))
            .new(o!("stage" => "execution"));

        Ok(Emulator {
            program,
            context: Context {
                pc: 0,
                registers,
            },
            halted: false,
            steps: 0,
            logger,
            dispatcher: EventDispatcher::new(),
        })
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger.new(o!("stage" => "execution"));
    }

    /// Registers a listener which is notified of every state change.
    pub fn add_listener<L: EventListener<W> + 'static>(&mut self, listener: L) {
        self.dispatcher.add_listener(listener);
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// The number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The current value of register 0.
    pub fn result(&self) -> W {
        self.context.registers.first().copied().unwrap_or_else(W::zero)
    }

    /// Fetches the instruction pointed by the Program Counter.
    pub fn current_instruction(&self) -> Result<Instruction, ExecutionError> {
        let pc = self.context.pc;

        self.program
            .instruction(pc)
            .copied()
            .ok_or(ExecutionError::JumpOutOfRange {
                from: pc,
                target: pc,
                instruction_count: self.program.instruction_count(),
            })
    }

    fn halt(&mut self, line: usize, implicit: bool) {
        self.halted = true;

        debug!(self.logger, "halted";
               "line" => line,
               "implicit" => implicit,
               "steps" => self.steps,
               "result" => %self.result());

        self.dispatcher.dispatch(Event::Halt { line, implicit });
    }

    fn set_register(&mut self, register: usize, value: W) {
        self.context.registers[register] = value;
        self.dispatcher.dispatch(Event::RegisterChange { register, value });
    }

    /// Moves the Program Counter to `target`.
    ///
    /// A target past the end of the program halts the execution, but a target exactly one past
    /// the last instruction is an error.
    fn jump(&mut self, from: usize, target: usize) -> Result<(), ExecutionError> {
        self.context.pc = target;
        self.dispatcher.dispatch(Event::Jump { from, target });

        let instruction_count = self.program.instruction_count();

        match target.cmp(&instruction_count) {
            Ordering::Less => Ok(()),
            Ordering::Greater => {
                self.halt(from, true);
                Ok(())
            }
            Ordering::Equal => {
                debug!(self.logger, "jump out of range"; "from" => from, "target" => target);

                Err(ExecutionError::JumpOutOfRange {
                    from,
                    target,
                    instruction_count,
                })
            }
        }
    }

    /// Fetches and executes the instruction pointed by the Program Counter.
    ///
    /// Does nothing if the execution has already halted.
    ///
    /// # Errors
    /// [ExecutionError::JumpOutOfRange] if the instruction jumps to the line right after the
    /// last instruction.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if self.halted {
            return Ok(());
        }

        let line = self.context.pc;
        let instruction = self.current_instruction()?;
        self.steps += 1;

        trace!(self.logger, "step"; "line" => line, "instruction" => %instruction);

        match instruction {
            Instruction::Halt => {
                self.halt(line, false);
                Ok(())
            }
            Instruction::Increment { register, target } => {
                let value = self.context.registers[register].increment();
                self.set_register(register, value);
                self.jump(line, target)
            }
            Instruction::DecrementBranch { register, positive_target, zero_target } => {
                let value = self.context.registers[register];

                if value.is_zero() {
                    self.jump(line, zero_target)
                } else {
                    self.set_register(register, value.decrement());
                    self.jump(line, positive_target)
                }
            }
        }
    }

    /// Executes the program until it halts.
    ///
    /// # Returns
    /// The value of register 0.
    pub fn run(&mut self) -> Result<W, ExecutionError> {
        while !self.halted {
            self.step()?;
        }

        Ok(self.result())
    }

    /// Executes at most `max_steps` more instructions.
    ///
    /// # Returns
    /// The value of register 0 if the program halted, `None` if it is still running.
    pub fn run_for(&mut self, max_steps: u64) -> Result<Option<W>, ExecutionError> {
        for _ in 0..max_steps {
            if self.halted {
                break;
            }

            self.step()?;
        }

        if self.halted {
            Ok(Some(self.result()))
        } else {
            Ok(None)
        }
    }
}

impl<'p, W: fmt::Debug> fmt::Debug for Emulator<'p, W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Emulator")
            .field("context", &self.context)
            .field("halted", &self.halted)
            .field("steps", &self.steps)
            .finish()
    }
}

#[cfg(test)]
macro_rules! assert_register {
    ($emulator:expr, $register:expr, $value:expr) => {
        assert_eq!($emulator.context.registers[$register], $value, "Register {} != {}", $register, $value);
    };
}

#[test]
fn test_increment_and_decrement() {
    let program = Program::parse("R0+ -> L1\nR1- -> L2, L2\nR1- -> L3, L3\nHALT").unwrap();

    let mut emulator = Emulator::new(&program, &[5u32, 1]).unwrap();

    while !emulator.halted {
        println!("{:?}", emulator.current_instruction());
        emulator.step().unwrap();
        println!("{:?}", emulator.context);
    }

    assert_register!(emulator, 0, 6);
    assert_register!(emulator, 1, 0);
    assert_eq!(emulator.steps(), 4);
}

#[test]
fn test_remaining_registers_start_at_zero() {
    let program = Program::parse("R3+ -> L1\nHALT").unwrap();
    let emulator = Emulator::new(&program, &[7u8]).unwrap();

    assert_eq!(emulator.context.registers, vec![7, 0, 0, 0]);
    assert_eq!(emulator.context.pc, 0);
}

#[test]
fn test_too_many_initial_values() {
    let program = Program::parse("R1+ -> L1\nHALT").unwrap();

    let error = Emulator::new(&program, &[1u64, 2, 3]).unwrap_err();
    assert_eq!(error, ExecutionError::TooManyInitialValues { given: 3, capacity: 2 });
}

#[test]
fn test_jump_past_the_end_halts() {
    let program = crate::parse_with_capacities("R0+ -> L2", crate::Capacities::new(1, 1)).unwrap();

    assert_eq!(program.instruction_count(), 1);
    assert_eq!(program.execute(&[0u32]), Ok(1));
}

#[test]
fn test_jump_one_past_the_end_is_an_error() {
    let program = crate::parse_with_capacities("R0+ -> L1", crate::Capacities::new(1, 1)).unwrap();

    let mut emulator = Emulator::new(&program, &[0u32]).unwrap();

    assert_eq!(emulator.run(), Err(ExecutionError::JumpOutOfRange {
        from: 0,
        target: 1,
        instruction_count: 1,
    }));
    assert!(!emulator.halted);
    assert_register!(emulator, 0, 1);
}

#[test]
fn test_wrapping_increment() {
    let program = Program::parse("R0+ -> L1\nHALT").unwrap();

    assert_eq!(program.execute(&[u8::max_value()]), Ok(0));
}

#[test]
fn test_run_for_stops_endless_programs() {
    let program = Program::parse("L0: R0+ -> L0").unwrap();
    let mut emulator = Emulator::new(&program, &[0u64]).unwrap();

    assert_eq!(emulator.run_for(100), Ok(None));
    assert_eq!(emulator.steps(), 100);
    assert_register!(emulator, 0, 100);
    assert!(!emulator.halted);
}

#[test]
fn test_run_for_returns_result() {
    let program = Program::parse("R1- -> L0, L1\nHALT").unwrap();

    assert_eq!(program.execute_bounded(&[9u16, 3], 10), Ok(Some(9)));
    assert_eq!(program.execute_bounded(&[9u16, 30], 10), Ok(None));
}

#[test]
fn test_register_bank_too_large() {
    let program = Program::parse("R1000000000000000+ -> L1\nHALT").unwrap();

    assert_eq!(program.register_count(), 1_000_000_000_000_001);
    assert_eq!(
        program.execute(&[0u32]),
        Err(ExecutionError::RegisterBankTooLarge { registers: 1_000_000_000_000_001 }),
    );
}
