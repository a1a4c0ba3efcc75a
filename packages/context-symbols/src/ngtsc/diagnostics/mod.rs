//! Diagnostics
//!
//! Classification, evaluation and validation problems are attached to the
//! descriptor they concern as `Diagnostic`s. Only failures of a specific query
//! (no root module, nothing at the requested position) surface as `ContextError`.

pub mod src;

#[cfg(test)]
mod test;

pub use src::error::{ContextError, Diagnostic, DiagnosticKind};
pub use src::error_code::{ng_error_code, ErrorCode};
