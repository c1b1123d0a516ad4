pub mod memory;
pub mod outcome;
pub mod processor;
