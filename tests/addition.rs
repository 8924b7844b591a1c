use ctrm::{
    infer_capacities,
    Capacities,
    Emulator,
    Instruction,
    Program,
};

fn read_program() -> Program {
    let source = include_str!("addition.rm");

    Program::parse(source).expect("could not parse addition.rm")
}

#[test]
fn test_addition_capacities() {
    assert_eq!(infer_capacities(include_str!("addition.rm")), Capacities::new(3, 5));

    let p = read_program();

    assert_eq!(p.register_count(), 3);
    assert_eq!(p.instruction_count(), 5);
    assert_eq!(p.instruction(4), Some(&Instruction::Halt));
}

#[test]
fn test_addition_references_fit_capacities() {
    let p = read_program();

    for instruction in p.instructions() {
        if let Some(register) = instruction.register() {
            assert!(register < p.register_count());
        }

        match *instruction {
            Instruction::Halt => (),
            Instruction::Increment { target, .. } => assert!(target < p.instruction_count()),
            Instruction::DecrementBranch { positive_target, zero_target, .. } => {
                assert!(positive_target < p.instruction_count());
                assert!(zero_target < p.instruction_count());
            }
        }
    }
}

#[test]
fn test_addition_execute() {
    let p = read_program();

    let cases = vec![
        (vec![0, 1, 2], 3),
        (vec![0, 3, 5], 8),
        (vec![0, 0, 0], 0),
        (vec![10], 10),
        (vec![], 0),
        (vec![4, 100, 1000], 1104),
    ];

    for (input, output) in cases {
        assert_eq!(p.execute::<u32>(&input), Ok(output), "input {:?}", input);
    }
}

#[test]
fn test_addition_element_types() {
    let p = read_program();

    assert_eq!(p.execute(&[0u8, 1, 2]), Ok(3));
    assert_eq!(p.execute(&[0u16, 3, 5]), Ok(8));
    assert_eq!(p.execute(&[0u64, 3, 5]), Ok(8));
    assert_eq!(p.execute(&[0u128, 3, 5]), Ok(8));
    assert_eq!(p.execute(&[0usize, 3, 5]), Ok(8));

    // u8 wraps around.
    assert_eq!(p.execute(&[0u8, 200, 100]), Ok(44));
}

#[test]
fn test_addition_is_deterministic() {
    let p = read_program();

    let first = p.execute(&[1u64, 20, 300]);
    let second = p.execute(&[1u64, 20, 300]);

    assert_eq!(first, Ok(321));
    assert_eq!(first, second);
}

#[test]
fn test_addition_emulate_program() {
    let p = read_program();

    let mut e = Emulator::new(&p, &[0u32, 3, 5]).unwrap();

    while !e.halted {
        println!("{:?}", e.current_instruction());
        e.step().unwrap();
        println!("{:?}", e.context);

        // R1 is drained before R2 and neither is decremented below zero.
        assert!(e.context.registers[1] <= 3);
        assert!(e.context.registers[2] <= 5);
    }

    assert_eq!(e.context.registers, vec![8, 0, 0]);
    assert_eq!(e.result(), 8);

    // 2 steps per unit moved, plus one zero test per register and the halt.
    assert_eq!(e.steps(), 2 * 8 + 2 + 1);
}

#[test]
fn test_addition_listing() {
    let p = read_program();

    assert_eq!(p.to_string(), include_str!("addition.rm").trim_end());
}
