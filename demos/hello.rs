use std::io;

use color_eyre::eyre::{eyre, Result};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use wordvm::memory::StdMem;
use wordvm::processor::instruction::Opcode::*;
use wordvm::processor::operand::{R0, R1};
use wordvm::processor::trace::LogTracer;
use wordvm::processor::Processor;
use wordvm::write_words;

/// Prints "hi" through a subroutine, then counts r1 down from 3 printing digits.
fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Debug)
        .init()
        .map_err(|err| eyre!("{}", err))?; // logging

    let mut mem = StdMem::default();
    write_words!(mem : 0 =>
        Call, 30,
        Set, R1, 3,
        // 5: loop
        Add, R0, R1, 48,
        Out, R0,
        Add, R1, R1, 32767,
        Jt, R1, 5,
        Out, 10,
        Halt
    );
    write_words!(mem : 30 =>
        Out, 104,
        Out, 105,
        Out, 10,
        Ret
    );

    let mut cpu = Processor::new().with_tracer(LogTracer);
    let outcome = cpu.run(&mut mem);
    cpu.output.flush(&mut io::stdout())?;

    println!("{} (exit code {})", outcome, outcome.exit_code());

    Ok(())
}
