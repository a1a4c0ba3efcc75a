//! Core
//!
//! The `ContextSymbols` facade. It owns the current program, builds the
//! analyzed module graph on the first query and rebuilds it wholesale after
//! `update_program`.

pub mod src;


pub use src::analyzer::analyze_program;
pub use src::context_symbols::{ContextSymbols, ContextSymbolsOptions};
pub use src::summary::ContextSummary;
