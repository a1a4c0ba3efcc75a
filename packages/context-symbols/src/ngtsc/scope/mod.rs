//! Scope
//!
//! Links module descriptors into the transitive NgModule graph: imports and
//! re-exports, compilation scopes, providers, entry components and lazy routes.

pub mod src;


pub use src::api::{
    AnalyzedFile, AnalyzedModules, CompilationScope, LazyRoute, ModuleDescriptor, ProviderEntry,
};
pub use src::graph::{GraphOptions, ModuleGraph, ModuleGraphBuilder, ModuleSeed};
pub use src::routes::{collect_route_targets, parse_load_children, RouteTarget};
