//! Partial Evaluator
//!
//! Turns metadata expressions into `MetadataValue` trees without running any
//! code. Anything that needs runtime information evaluates to
//! `MetadataValue::Unresolvable`, locally, so the rest of the tree survives.

pub mod src;

#[cfg(test)]
mod test;

pub use src::diagnostics::unresolvable_diagnostics;
pub use src::dynamic::{DynamicReason, DynamicValue};
pub use src::interpreter::{PartialEvaluator, DEFAULT_MAX_MACRO_DEPTH};
pub use src::result::{ForwardRef, MetadataValue};
