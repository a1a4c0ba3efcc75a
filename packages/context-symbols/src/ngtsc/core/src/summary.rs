// Context Summary
//
// Read-only projection of the analyzed graph rooted at one NgModule.

use crate::ngtsc::imports::Reference;
use crate::ngtsc::metadata::{DirectiveDescriptor, PipeDescriptor};
use crate::ngtsc::scope::{AnalyzedModules, LazyRoute, ModuleDescriptor, ProviderEntry};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    /// The root module.
    #[serde(rename = "type")]
    pub module: ModuleDescriptor,
    pub entry_components: Vec<Reference>,
    pub exported_directives: Vec<Reference>,
    pub exported_pipes: Vec<Reference>,
    /// Transitively imported modules, ending with the root.
    pub modules: Vec<Reference>,
    /// Providers of every transitive module; the same token may appear more than once.
    pub providers: Vec<ProviderEntry>,
    /// Directives and pipes declared by the transitive modules.
    pub directives: Vec<DirectiveDescriptor>,
    pub pipes: Vec<PipeDescriptor>,
    pub lazy_routes: Vec<LazyRoute>,
}

impl ContextSummary {
    pub fn new(root: &ModuleDescriptor, analyzed: &AnalyzedModules) -> Self {
        let transitive: Vec<&ModuleDescriptor> = root
            .transitive_modules
            .iter()
            .filter_map(|module| analyzed.module(module))
            .collect();

        let directives = transitive
            .iter()
            .flat_map(|module| module.declared_directives.iter())
            .filter_map(|directive| analyzed.directive(directive).cloned())
            .collect();
        let pipes = transitive
            .iter()
            .flat_map(|module| module.declared_pipes.iter())
            .filter_map(|pipe| analyzed.pipe(pipe).cloned())
            .collect();
        let lazy_routes = transitive
            .iter()
            .flat_map(|module| module.lazy_routes.iter().cloned())
            .collect();

        Self {
            module: root.clone(),
            entry_components: root.entry_components.clone(),
            exported_directives: root.exported_directives.clone(),
            exported_pipes: root.exported_pipes.clone(),
            modules: root.transitive_modules.clone(),
            providers: root.transitive_providers.clone(),
            directives,
            pipes,
            lazy_routes,
        }
    }

    pub fn name(&self) -> &str {
        self.module.name()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
