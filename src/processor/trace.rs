use log::debug;

use super::instruction::Instruction;

/// Observes every decoded instruction right before it executes
pub trait Tracer {
    fn trace(&mut self, address: usize, instruction: &Instruction);
}

/// Headless default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoTrace;

impl Tracer for NoTrace {
    fn trace(&mut self, _address: usize, _instruction: &Instruction) {}
}

/// Logs each instruction at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&mut self, address: usize, instruction: &Instruction) {
        debug!("{:>5}: {}", address, instruction);
    }
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn trace(&mut self, address: usize, instruction: &Instruction) {
        (**self).trace(address, instruction);
    }
}
