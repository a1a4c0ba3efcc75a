#![deny(clippy::all)]

/**
 * Angular Context Symbols - Rust Implementation
 *
 * Static extraction of NgModules, directives, pipes, providers and lazy routes
 * from a compiled program, without executing it.
 */
pub use ts;

pub mod ngtsc;

pub use ngtsc::core::{ContextSummary, ContextSymbols, ContextSymbolsOptions};
pub use ngtsc::diagnostics::{ContextError, Diagnostic, DiagnosticKind, ErrorCode};
pub use ngtsc::imports::Reference;
pub use ngtsc::metadata::{
    DirectiveDescriptor, InjectableDescriptor, PipeDescriptor, ProviderDescriptor,
};
pub use ngtsc::partial_evaluator::MetadataValue;
pub use ngtsc::resource::{FileResourceResolver, InMemoryResourceResolver, ResourceResolver};
pub use ngtsc::scope::{AnalyzedModules, ModuleDescriptor};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
