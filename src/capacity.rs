//! Inference of the register bank size and instruction count of a program.

/// The number of registers and instruction slots a program needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacities {
    /// Size of the register bank.
    pub registers: usize,

    /// Number of instruction slots.
    pub lines: usize,
}

impl Capacities {
    pub fn new(registers: usize, lines: usize) -> Capacities {
        Capacities { registers, lines }
    }
}

impl From<Capacities> for (usize, usize) {
    fn from(capacities: Capacities) -> (usize, usize) {
        (capacities.registers, capacities.lines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Skip,
    ReadLine,
    ReadRegister,
}

#[derive(Debug, Default)]
struct Maximums {
    line: usize,
    register: usize,
}

impl Maximums {
    fn commit(&mut self, mode: Mode, value: usize) {
        match mode {
            Mode::ReadLine => self.line = std::cmp::max(self.line, value),
            Mode::ReadRegister => self.register = std::cmp::max(self.register, value),
            Mode::Skip => (),
        }
    }
}

/// Finds the largest line number and register index mentioned in `source`.
///
/// Numbers are classified by the closest preceding `L` or `R`. The grammar is not validated,
/// so this also produces a result for programs that will fail to parse.
///
/// # Returns
/// The capacities `(largest register + 1, largest line + 1)`.
pub fn infer_capacities(source: &str) -> Capacities {
    let mut mode = Mode::Skip;
    let mut value: usize = 0;
    let mut max = Maximums::default();

    for c in source.chars() {
        match c {
            'L' => mode = Mode::ReadLine,
            'R' => mode = Mode::ReadRegister,
            '0'..='9' => {
                if mode != Mode::Skip {
                    let digit = c as usize - '0' as usize;
                    value = value.saturating_mul(10).saturating_add(digit);
                }
            }
            _ => {
                if value != 0 {
                    max.commit(mode, value);
                    value = 0;
                    mode = Mode::Skip;
                }
            }
        }
    }

    max.commit(mode, value);

    Capacities {
        registers: max.register.saturating_add(1),
        lines: max.line.saturating_add(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_addition() {
        let source = "L0: R1- -> L1, L2\nL1: R0+ -> L0\nL2: R2- -> L3, L4\nL3: R0+ -> L2\nL4: HALT";

        assert_eq!(infer_capacities(source), Capacities::new(3, 5));
    }

    #[test]
    fn test_infer_number_at_end_of_input() {
        assert_eq!(infer_capacities("R12+ -> L7"), Capacities::new(13, 8));
    }

    #[test]
    fn test_infer_empty() {
        assert_eq!(infer_capacities(""), Capacities::new(1, 1));
        assert_eq!(infer_capacities("HALT"), Capacities::new(1, 1));
    }

    #[test]
    fn test_digits_without_marker_are_ignored() {
        assert_eq!(infer_capacities("123 L2: 99"), Capacities::new(1, 3));
    }

    #[test]
    fn test_zero_keeps_the_mode() {
        // `R0` commits nothing, so the following number is still read as a register.
        assert_eq!(infer_capacities("R0 5"), Capacities::new(6, 1));
    }

    #[test]
    fn test_saturates() {
        let capacities = infer_capacities("R99999999999999999999999999999999");
        assert_eq!(capacities.registers, usize::MAX);
    }

    #[test]
    fn test_pair_conversion() {
        let pair: (usize, usize) = infer_capacities("L3: R4+ -> L0").into();
        assert_eq!(pair, (5, 4));
    }
}
