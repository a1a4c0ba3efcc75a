pub mod analyzer;
pub mod context_symbols;
pub mod summary;
