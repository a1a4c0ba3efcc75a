//! Graph-level records: module descriptors and the analyzed program.

use crate::ngtsc::diagnostics::Diagnostic;
use crate::ngtsc::imports::{Reference, SymbolKey};
use crate::ngtsc::metadata::{
    DirectiveDescriptor, InjectableDescriptor, NgModuleMetadata, PipeDescriptor,
    ProviderDescriptor,
};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// A provider together with the module it is attributed to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderEntry {
    pub provider: ProviderDescriptor,
    pub module: Reference,
    /// Position in the module's own provider list.
    #[serde(skip)]
    pub ordinal: usize,
}

/// `loadChildren` of a route found in an entry-components provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LazyRoute {
    pub path: Option<String>,
    /// `"./lazy/lazy.module#LazyModule"` as written.
    pub load_children: String,
    /// The module it loads, when it resolves inside the program.
    pub module: Option<Reference>,
}

/// Directives and pipes usable in templates of a module's declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompilationScope {
    pub directives: Vec<Reference>,
    pub pipes: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub reference: Reference,
    pub file: String,
    /// Declared lists as evaluated.
    pub metadata: NgModuleMetadata,
    pub imported_modules: Vec<Reference>,
    pub exported_modules: Vec<Reference>,
    pub declared_directives: Vec<Reference>,
    pub declared_pipes: Vec<Reference>,
    pub exported_directives: Vec<Reference>,
    pub exported_pipes: Vec<Reference>,
    pub compilation_scope: CompilationScope,
    /// Imported modules first, in post order, ending with this module.
    pub transitive_modules: Vec<Reference>,
    /// `ModuleWithProviders` providers followed by the module's own.
    pub providers: Vec<ProviderEntry>,
    pub transitive_providers: Vec<ProviderEntry>,
    pub entry_components: Vec<Reference>,
    pub lazy_routes: Vec<LazyRoute>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ModuleDescriptor {
    pub fn name(&self) -> &str {
        self.reference.name()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Per-file breakdown of the analyzed declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedFile {
    pub file_name: String,
    pub modules: Vec<Reference>,
    pub directives: Vec<Reference>,
    pub pipes: Vec<Reference>,
    pub injectables: Vec<Reference>,
}

impl AnalyzedFile {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
            && self.directives.is_empty()
            && self.pipes.is_empty()
            && self.injectables.is_empty()
    }
}

fn serialize_values<S, V>(map: &IndexMap<SymbolKey, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}

fn serialize_index<S>(map: &IndexMap<SymbolKey, Reference>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(map.iter().map(|(key, module)| (key.to_string(), module)))
}

/// The analyzed program graph. Every declaration key maps to one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedModules {
    #[serde(serialize_with = "serialize_values")]
    pub ng_modules: IndexMap<SymbolKey, ModuleDescriptor>,
    pub modules_with_errors: Vec<Reference>,
    #[serde(serialize_with = "serialize_values")]
    pub directives: IndexMap<SymbolKey, DirectiveDescriptor>,
    #[serde(serialize_with = "serialize_values")]
    pub pipes: IndexMap<SymbolKey, PipeDescriptor>,
    #[serde(serialize_with = "serialize_values")]
    pub injectables: IndexMap<SymbolKey, InjectableDescriptor>,
    /// Declaration -> first module declaring it.
    #[serde(serialize_with = "serialize_index")]
    pub declaring_modules: IndexMap<SymbolKey, Reference>,
    pub files: Vec<AnalyzedFile>,
}

impl AnalyzedModules {
    pub fn module(&self, reference: &Reference) -> Option<&ModuleDescriptor> {
        self.ng_modules.get(reference.key())
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.ng_modules.values()
    }

    pub fn directive(&self, reference: &Reference) -> Option<&DirectiveDescriptor> {
        self.directives.get(reference.key())
    }

    pub fn pipe(&self, reference: &Reference) -> Option<&PipeDescriptor> {
        self.pipes.get(reference.key())
    }

    pub fn declaring_module(&self, declaration: &Reference) -> Option<&ModuleDescriptor> {
        self.declaring_modules
            .get(declaration.key())
            .and_then(|module| self.module(module))
    }

    /// Every diagnostic attached to a descriptor, in analysis order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for directive in self.directives.values() {
            out.extend(directive.diagnostics.iter().cloned());
            for provider in directive
                .metadata
                .providers
                .iter()
                .chain(&directive.metadata.view_providers)
            {
                out.extend(provider.diagnostics.iter().cloned());
            }
        }
        for pipe in self.pipes.values() {
            out.extend(pipe.diagnostics.iter().cloned());
        }
        for injectable in self.injectables.values() {
            out.extend(injectable.diagnostics.iter().cloned());
        }
        for module in self.ng_modules.values() {
            out.extend(module.diagnostics.iter().cloned());
            for entry in &module.providers {
                out.extend(entry.provider.diagnostics.iter().cloned());
            }
        }
        out
    }
}
