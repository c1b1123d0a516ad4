use std::io;
use std::path::PathBuf;
use std::process;

use argh::FromArgs;
use color_eyre::eyre::{eyre, Result, WrapErr};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use wordvm::memory::StdMem;
use wordvm::outcome::Outcome;
use wordvm::processor::trace::{LogTracer, NoTrace, Tracer};
use wordvm::processor::Processor;

/// Loads a program image of little endian 16 bit words and runs it.
#[derive(FromArgs)]
struct Arguments {
    /// log every executed instruction
    #[argh(switch, short = 't')]
    trace: bool,

    /// log level: off, error, warn, info, debug or trace
    #[argh(option, default = "LevelFilter::Warn")]
    level: LevelFilter,

    /// the program image to run
    #[argh(positional)]
    image: PathBuf,
}

fn run<T: Tracer>(memory: &mut StdMem, tracer: T) -> Result<Outcome> {
    let mut cpu = Processor::new().with_tracer(tracer);
    let outcome = cpu.run(memory);

    cpu.output
        .flush(&mut io::stdout().lock())
        .wrap_err("Failed to write program output")?;

    Ok(outcome)
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling

    let args: Arguments = argh::from_env();
    let level = if args.trace {
        args.level.max(LevelFilter::Debug)
    } else {
        args.level
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .map_err(|err| eyre!("Failed to set up logging: {}", err))?; // logging

    let mut memory = StdMem::from_file(&args.image)
        .wrap_err_with(|| format!("Failed to load image {}", args.image.display()))?;

    let outcome = if args.trace {
        run(&mut memory, LogTracer)?
    } else {
        run(&mut memory, NoTrace)?
    };

    process::exit(outcome.exit_code());
}
