use crate::memory::{Memory, Word};
use crate::outcome::{Fault, Halt, Outcome};
use log::*;

pub mod instruction;
pub mod io;
pub mod operand;
pub mod stack;
pub mod trace;

use self::instruction::Instruction;
use self::io::{Input, Output, Unimplemented};
use self::operand::{Registers, REGISTER_BASE};
use self::stack::Stack;
use self::trace::{NoTrace, Tracer};

/// Arithmetic results are reduced modulo 32768
const MODULUS: u32 = REGISTER_BASE as u32;

fn wrap(value: u32) -> Word {
    (value % MODULUS) as Word
}

/// Result of a single execution step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Continue,
    Halt(Halt),
}

/// Emulates the CPU. Memory is owned by the caller and passed to every step.
#[derive(Debug, Clone)]
pub struct Processor<I = Unimplemented, T = NoTrace> {
    /// Instruction pointer
    pub ip: usize,
    pub registers: Registers,
    pub stack: Stack,
    /// Bytes written by `out`, flushed by the caller once the run ends
    pub output: Output,
    input: I,
    tracer: T,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    /// A processor starting at address 0 that cannot read input and traces nothing
    pub fn new() -> Self {
        Self {
            ip: 0,
            registers: Registers::default(),
            stack: Stack::default(),
            output: Output::default(),
            input: Unimplemented,
            tracer: NoTrace,
        }
    }
}

impl<I: Input, T: Tracer> Processor<I, T> {
    /// Replaces the input source
    pub fn with_input<J: Input>(self, input: J) -> Processor<J, T> {
        Processor {
            ip: self.ip,
            registers: self.registers,
            stack: self.stack,
            output: self.output,
            input,
            tracer: self.tracer,
        }
    }

    /// Replaces the tracer
    pub fn with_tracer<U: Tracer>(self, tracer: U) -> Processor<I, U> {
        Processor {
            ip: self.ip,
            registers: self.registers,
            stack: self.stack,
            output: self.output,
            input: self.input,
            tracer,
        }
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    fn jump(&mut self, target: Word) {
        self.ip = target as usize;
    }

    /// Executes a decoded instruction located at `self.ip`. `next` is the
    /// address right behind it.
    pub fn execute_instruction<const S: usize>(
        &mut self,
        instruction: Instruction,
        next: usize,
        memory: &mut Memory<S>,
    ) -> Result<Step, Fault> {
        let address = self.ip;
        self.ip = next;

        match instruction {
            Instruction::Halt => return Ok(Step::Halt(Halt::Instruction)),
            Instruction::Set(a, b) => self.registers.set(a, b),
            Instruction::Push(a) => self.stack.push(a),
            Instruction::Pop(a) => match self.stack.pop() {
                Some(value) => self.registers.set(a, value),
                None => return Ok(Step::Halt(Halt::StackEmpty { address })),
            },
            Instruction::Eq(a, b, c) => self.registers.set(a, (b == c) as Word),
            Instruction::Gt(a, b, c) => self.registers.set(a, (b > c) as Word),
            Instruction::Jmp(a) => self.jump(a),
            Instruction::Jt(a, b) => {
                if a != 0 {
                    self.jump(b);
                }
            }
            Instruction::Jf(a, b) => {
                if a == 0 {
                    self.jump(b);
                }
            }
            Instruction::Add(a, b, c) => self.registers.set(a, wrap(b as u32 + c as u32)),
            Instruction::Mult(a, b, c) => self.registers.set(a, wrap(b as u32 * c as u32)),
            Instruction::Mod(a, b, c) => {
                if c == 0 {
                    return Err(Fault::DivisionByZero { address });
                }
                self.registers.set(a, b % c);
            }
            Instruction::And(a, b, c) => self.registers.set(a, wrap((b & c) as u32)),
            Instruction::Or(a, b, c) => self.registers.set(a, wrap((b | c) as u32)),
            // complement over 16 bits first, then reduce
            Instruction::Not(a, b) => self.registers.set(a, wrap((0xFFFF ^ b) as u32)),
            Instruction::Rmem(a, b) => {
                let value = memory
                    .read_word(b as usize)
                    .ok_or(Fault::InvalidAddress { target: b, address })?;
                self.registers.set(a, value);
            }
            Instruction::Wmem(a, b) => memory
                .write_word(a as usize, b)
                .ok_or(Fault::InvalidAddress { target: a, address })?,
            Instruction::Call(a) => {
                self.stack.push(next as Word);
                self.jump(a);
            }
            Instruction::Ret => match self.stack.pop() {
                Some(target) => self.jump(target % REGISTER_BASE),
                None => return Ok(Step::Halt(Halt::StackEmpty { address })),
            },
            Instruction::Out(a) => self.output.push(a),
            Instruction::In(a) => match self.input.read_char() {
                Some(character) => self.registers.set(a, character as Word),
                None => return Err(Fault::UnimplementedInput { address }),
            },
            Instruction::Noop => {}
        }

        Ok(Step::Continue)
    }

    /// Runs one execution step
    pub fn execute<const S: usize>(&mut self, memory: &mut Memory<S>) -> Result<Step, Fault> {
        let (instruction, next) = Instruction::decode(memory, &self.registers, self.ip)?;
        self.tracer.trace(self.ip, &instruction);
        self.execute_instruction(instruction, next, memory)
    }

    /// Runs until the program halts or faults
    pub fn execute_until_halt<const S: usize>(
        &mut self,
        memory: &mut Memory<S>,
    ) -> Result<Halt, Fault> {
        loop {
            if let Step::Halt(halt) = self.execute(memory)? {
                return Ok(halt);
            }
        }
    }

    /// Runs the program to completion. The output stays buffered in
    /// [`Processor::output`] whatever the outcome.
    pub fn run<const S: usize>(&mut self, memory: &mut Memory<S>) -> Outcome {
        let outcome = Outcome::from(self.execute_until_halt(memory));

        match &outcome {
            Outcome::Halted(halt) => info!("Program terminated: {}", halt),
            Outcome::Faulted(fault) => error!("Program faulted: {}", fault),
        }

        outcome
    }
}
