use ctrm::{
    infer_capacities,
    parse_with_logger,
    Capacities,
    Emulator,
    ExecutionError,
    ParseError,
};

use clap::{App, Arg, ArgMatches};
use slog::{o, Discard, Drain, Logger};
use slog_term::{FullFormat, TermDecorator};

enum Error {
    Parse(String),
    Execution(ExecutionError),
    Argument(String),
    StepLimit(u64),
    IO(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<ExecutionError> for Error {
    fn from(e: ExecutionError) -> Error {
        Error::Execution(e)
    }
}

fn parse_arguments() -> ArgMatches<'static> {
    App::new("ctrmrun")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Utility for executing counter machine programs")
        .arg(Arg::with_name("source")
             .help("File containing the program source")
             .value_name("SOURCE")
             .required(true)
             .index(1))
        .arg(Arg::with_name("values")
             .help("Initial values of the registers, starting from R0")
             .value_name("VALUE")
             .multiple(true)
             .index(2))
        .arg(Arg::with_name("max-steps")
             .help("Stop after executing this many instructions")
             .long("max-steps")
             .short("n")
             .takes_value(true)
             .value_name("STEPS"))
        .arg(Arg::with_name("registers")
             .help("Size of the register bank instead of the inferred one")
             .long("registers")
             .takes_value(true)
             .requires("lines")
             .value_name("COUNT"))
        .arg(Arg::with_name("lines")
             .help("Number of instruction slots instead of the inferred one")
             .long("lines")
             .takes_value(true)
             .requires("registers")
             .value_name("COUNT"))
        .arg(Arg::with_name("capacities")
             .help("Print the inferred register and line capacities and exit")
             .long("capacities"))
        .arg(Arg::with_name("verbose")
             .help("Enables verbose logging")
             .long("verbose")
             .short("v"))
        .get_matches()
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| Error::Argument(format!("invalid value '{}' for {}", value, name)))
}

fn main() {
    let args = parse_arguments();

    let logger = if args.is_present("verbose") {
        let decorator = TermDecorator::new().build();
        let drain = FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        Logger::root(drain, o!())
    } else {
        Logger::root(Discard, o!())
    };

    match run(&args, logger) {
        Ok(()) => (),
        Err(error) => {
            match error {
                Error::IO(io) => eprintln!("IO error: {}", io),
                Error::Execution(e) => eprintln!("Execution error: {}", e),
                Error::Parse(e) => eprintln!("Parse error {}", e),
                Error::Argument(e) => eprintln!("Argument error: {}", e),
                Error::StepLimit(steps) => eprintln!("Program did not halt within {} steps", steps),
            }

            std::process::exit(1);
        }
    }
}

fn run(args: &ArgMatches, logger: Logger) -> Result<(), Error> {
    let file_path = args.value_of("source").unwrap_or_default();
    let source = std::fs::read_to_string(file_path)?;

    if args.is_present("capacities") {
        let capacities = infer_capacities(&source);
        println!("registers: {}", capacities.registers);
        println!("lines: {}", capacities.lines);
        return Ok(());
    }

    let capacities = match (args.value_of("registers"), args.value_of("lines")) {
        (Some(registers), Some(lines)) => Some(Capacities::new(
            parse_number("--registers", registers)?,
            parse_number("--lines", lines)?,
        )),
        _ => None,
    };

    let program = parse_with_logger(&source, capacities, logger.clone())
        .map_err(|e: ParseError| Error::Parse(e.verbose(&source).to_string()))?;

    let values = args
        .values_of("values")
        .map(|values| values
             .map(|value| parse_number::<u128>("VALUE", value))
             .collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();

    let mut emulator = Emulator::with_logger(&program, &values, logger)?;

    let result = match args.value_of("max-steps") {
        Some(steps) => {
            let max_steps = parse_number("--max-steps", steps)?;
            emulator.run_for(max_steps)?.ok_or(Error::StepLimit(max_steps))?
        }
        None => emulator.run()?,
    };

    println!("{}", result);

    Ok(())
}
