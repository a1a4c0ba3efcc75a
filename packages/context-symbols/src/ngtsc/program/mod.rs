//! Program frontend
//!
//! Concrete `ts::Program` implementations: source text is parsed with oxc and
//! lowered into the `ts` declaration model, either from in-memory sources or
//! from a project directory on disk.

pub mod src;

#[cfg(test)]
mod test;

pub use src::in_memory::InMemoryProgram;
pub use src::loader::load_program;
pub use src::oxc_frontend::{parse_source_file, ParseError};
