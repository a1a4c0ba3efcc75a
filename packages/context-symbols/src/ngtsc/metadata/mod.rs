//! Metadata
//!
//! Per-kind resolution of evaluated decorator metadata into typed descriptors.
//! Every descriptor keeps the raw decorator argument next to its resolved form
//! and carries the diagnostics found while resolving it.

pub mod src;

#[cfg(test)]
mod test;

pub use src::api::{
    DirectiveDescriptor, InjectableDescriptor, NgModuleMetadata, NonResolvedMetadata,
    PipeDescriptor, ResolvedTemplate,
};
pub use src::provider::{providers_from_entries, ProviderDescriptor, ProviderStrategy};
pub use src::resolver::MetadataResolver;
pub use src::util::{describe, DiagnosticSite};
