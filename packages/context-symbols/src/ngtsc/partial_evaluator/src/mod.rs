pub mod builtin;
pub mod diagnostics;
pub mod dynamic;
pub mod interpreter;
pub mod result;
