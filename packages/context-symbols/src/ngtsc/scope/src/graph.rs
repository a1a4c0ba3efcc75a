// Module Graph
//
// Resolves every NgModule of the program into a `ModuleDescriptor`. Modules are
// visited depth first through their imports; a module reached again
// while it is still resolving is linked by reference without descending.

use super::api::{CompilationScope, LazyRoute, ModuleDescriptor, ProviderEntry};
use super::routes::{collect_route_targets, parse_load_children, RouteTarget};
use crate::ngtsc::diagnostics::{Diagnostic, DiagnosticKind, ErrorCode};
use crate::ngtsc::file_system::dirname;
use crate::ngtsc::imports::{
    DeclarationKind, Reference, SymbolKey, ANALYZE_FOR_ENTRY_COMPONENTS, CORE_MODULE,
};
use crate::ngtsc::logging::Logger;
use crate::ngtsc::metadata::{
    describe, providers_from_entries, DiagnosticSite, DirectiveDescriptor, NgModuleMetadata,
};
use crate::ngtsc::partial_evaluator::{MetadataValue, PartialEvaluator};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};
use ts::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Resolving,
    Resolved,
}

/// An NgModule with its declared lists, before linking.
#[derive(Debug, Clone)]
pub struct ModuleSeed {
    pub reference: Reference,
    pub file: String,
    pub span: Span,
    pub metadata: NgModuleMetadata,
}

#[derive(Debug, Clone)]
pub struct GraphOptions {
    pub core_module: String,
    /// Report `ANALYZE_FOR_ENTRY_COMPONENTS` providers that are not `multi`.
    pub require_multi_entry_components: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            core_module: CORE_MODULE.to_string(),
            require_multi_entry_components: true,
        }
    }
}

/// Linked modules plus the declaration -> declaring module index.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub modules: IndexMap<SymbolKey, ModuleDescriptor>,
    pub declaring_modules: IndexMap<SymbolKey, Reference>,
}

pub struct ModuleGraphBuilder<'g, 'a> {
    evaluator: &'g PartialEvaluator<'a>,
    directives: &'g IndexMap<SymbolKey, DirectiveDescriptor>,
    options: &'g GraphOptions,
    logger: &'g dyn Logger,
    seeds: IndexMap<SymbolKey, ModuleSeed>,
    states: HashMap<SymbolKey, VisitState>,
    resolved: IndexMap<SymbolKey, ModuleDescriptor>,
}

impl<'g, 'a> ModuleGraphBuilder<'g, 'a> {
    pub fn new(
        evaluator: &'g PartialEvaluator<'a>,
        directives: &'g IndexMap<SymbolKey, DirectiveDescriptor>,
        options: &'g GraphOptions,
        logger: &'g dyn Logger,
    ) -> Self {
        Self {
            evaluator,
            directives,
            options,
            logger,
            seeds: IndexMap::new(),
            states: HashMap::new(),
            resolved: IndexMap::new(),
        }
    }

    pub fn add_module(&mut self, seed: ModuleSeed) {
        let key = seed.reference.key().clone();
        self.states.insert(key.clone(), VisitState::Unvisited);
        self.seeds.insert(key, seed);
    }

    /// Resolve every seeded module. The result keeps seeding order.
    pub fn build(mut self) -> ModuleGraph {
        let keys: Vec<SymbolKey> = self.seeds.keys().cloned().collect();
        for key in &keys {
            self.resolve(key);
        }

        let mut graph = ModuleGraph::default();
        for key in keys {
            let Some(mut module) = self.resolved.swap_remove(&key) else {
                continue;
            };
            let span = self.seeds.get(&key).map(|seed| seed.span).unwrap_or_default();
            let mut duplicates = Vec::new();
            for declaration in module.declared_directives.iter().chain(&module.declared_pipes) {
                match graph.declaring_modules.get(declaration.key()) {
                    Some(first) => duplicates.push(format!(
                        "{} is part of the declarations of 2 modules: {} and {}",
                        declaration.name(),
                        first.name(),
                        module.name()
                    )),
                    None => {
                        graph
                            .declaring_modules
                            .insert(declaration.key().clone(), module.reference.clone());
                    }
                }
            }
            for message in duplicates {
                module.diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Validation,
                    ErrorCode::NgmoduleInvalidDeclaration,
                    message,
                    module.file.clone(),
                    span,
                ));
            }
            graph.modules.insert(key, module);
        }
        graph
    }

    fn state(&self, key: &SymbolKey) -> VisitState {
        self.states.get(key).copied().unwrap_or(VisitState::Unvisited)
    }

    fn kind_of(&self, reference: &Reference) -> Option<DeclarationKind> {
        self.evaluator.registry().kind_of(reference)
    }

    fn is_module(&self, reference: &Reference) -> bool {
        self.seeds.contains_key(reference.key())
    }

    fn resolve(&mut self, key: &SymbolKey) {
        if self.state(key) != VisitState::Unvisited {
            return;
        }
        let Some(seed) = self.seeds.get(key).cloned() else {
            return;
        };
        self.states.insert(key.clone(), VisitState::Resolving);
        self.logger.debug(&format!("resolving NgModule {}", seed.reference.name()));

        let descriptor = self.link(seed);

        self.states.insert(key.clone(), VisitState::Resolved);
        self.resolved.insert(key.clone(), descriptor);
    }

    /// Resolve an imported module first; `false` when it is not one.
    fn link_module(
        &mut self,
        module: &Reference,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> bool {
        if !self.is_module(module) {
            diagnostics.push(site.validation(
                ErrorCode::NgmoduleInvalidImport,
                format!("{} imported by {} is not an NgModule", module.name(), site.owner),
            ));
            return false;
        }
        if self.state(module.key()) == VisitState::Resolving {
            self.logger
                .debug(&format!("import cycle between {} and {}", site.owner, module.name()));
        }
        self.resolve(module.key());
        true
    }

    fn link(&mut self, seed: ModuleSeed) -> ModuleDescriptor {
        let ModuleSeed {
            reference,
            file,
            span,
            metadata,
        } = seed;
        let owner = reference.name().to_string();
        let site = DiagnosticSite::new(&owner, &file, span);
        let mut diagnostics = metadata.diagnostics.clone();

        // Imports, including `{ngModule, providers}` objects.
        let mut imported_modules: IndexSet<Reference> = IndexSet::new();
        let mut import_providers = Vec::new();
        for entry in &metadata.imports {
            match entry {
                MetadataValue::Reference(module) => {
                    if self.link_module(module, &site, &mut diagnostics) {
                        imported_modules.insert(module.clone());
                    }
                }
                MetadataValue::Object(object) if object.contains_key("ngModule") => {
                    match object.get("ngModule") {
                        Some(MetadataValue::Reference(module)) => {
                            if self.link_module(module, &site, &mut diagnostics) {
                                imported_modules.insert(module.clone());
                            }
                        }
                        other => diagnostics.push(site.validation(
                            ErrorCode::NgmoduleInvalidImport,
                            format!(
                                "ngModule of a ModuleWithProviders imported by {} must be a class, got {}",
                                owner,
                                other.map_or("nothing", describe)
                            ),
                        )),
                    }
                    let entries: Vec<MetadataValue> = object
                        .get("providers")
                        .map(|providers| providers.flatten().into_iter().cloned().collect())
                        .unwrap_or_default();
                    import_providers.extend(providers_from_entries(&entries, &site, &mut diagnostics));
                }
                MetadataValue::Unresolvable(_) => {}
                other => diagnostics.push(site.validation(
                    ErrorCode::NgmoduleInvalidImport,
                    format!("Imports of {} must be NgModules, got {}", owner, describe(other)),
                )),
            }
        }

        // Declarations.
        let mut declared_directives: IndexSet<Reference> = IndexSet::new();
        let mut declared_pipes: IndexSet<Reference> = IndexSet::new();
        for entry in &metadata.declarations {
            match entry {
                MetadataValue::Reference(declaration) => match self.kind_of(declaration) {
                    Some(kind) if kind.is_directive() => {
                        declared_directives.insert(declaration.clone());
                    }
                    Some(DeclarationKind::Pipe) => {
                        declared_pipes.insert(declaration.clone());
                    }
                    _ => diagnostics.push(site.validation(
                        ErrorCode::NgmoduleInvalidDeclaration,
                        format!(
                            "{} declared by {} is not a directive, component or pipe",
                            declaration.name(),
                            owner
                        ),
                    )),
                },
                MetadataValue::Unresolvable(_) => {}
                other => diagnostics.push(site.validation(
                    ErrorCode::NgmoduleInvalidDeclaration,
                    format!("Declarations of {} must be classes, got {}", owner, describe(other)),
                )),
            }
        }

        // What the imported modules make visible.
        let mut imported_directives: IndexSet<Reference> = IndexSet::new();
        let mut imported_pipes: IndexSet<Reference> = IndexSet::new();
        for module in &imported_modules {
            if let Some(imported) = self.resolved.get(module.key()) {
                imported_directives.extend(imported.exported_directives.iter().cloned());
                imported_pipes.extend(imported.exported_pipes.iter().cloned());
            }
        }

        // Exports: a module both imported and exported is re-exported and
        // expands in place.
        let mut exported_modules: IndexSet<Reference> = IndexSet::new();
        let mut exported_directives: IndexSet<Reference> = IndexSet::new();
        let mut exported_pipes: IndexSet<Reference> = IndexSet::new();
        for entry in &metadata.exports {
            let export = match entry {
                MetadataValue::Reference(export) => export,
                MetadataValue::Unresolvable(_) => continue,
                other => {
                    diagnostics.push(site.validation(
                        ErrorCode::NgmoduleInvalidExport,
                        format!("Exports of {} must be classes, got {}", owner, describe(other)),
                    ));
                    continue;
                }
            };

            if self.is_module(export) {
                if !imported_modules.contains(export) {
                    diagnostics.push(site.validation(
                        ErrorCode::NgmoduleInvalidReexport,
                        format!(
                            "Can't re-export NgModule {} from {} as it is not imported",
                            export.name(),
                            owner
                        ),
                    ));
                    continue;
                }
                exported_modules.insert(export.clone());
                match self.resolved.get(export.key()) {
                    Some(module) => {
                        exported_directives.extend(module.exported_directives.iter().cloned());
                        exported_pipes.extend(module.exported_pipes.iter().cloned());
                    }
                    None => diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::Validation,
                        ErrorCode::NgmoduleInvalidReexport,
                        format!(
                            "{} re-exports {} which is still being resolved (import cycle); its exports are not visible",
                            owner,
                            export.name()
                        ),
                        site.file,
                        site.span,
                    )),
                }
                continue;
            }

            match self.kind_of(export) {
                Some(kind) if kind.is_directive() => {
                    if declared_directives.contains(export) || imported_directives.contains(export) {
                        exported_directives.insert(export.clone());
                    } else {
                        diagnostics.push(site.validation(
                            ErrorCode::NgmoduleInvalidExport,
                            format!(
                                "Can't export {} {} from {} as it was neither declared nor imported",
                                kind,
                                export.name(),
                                owner
                            ),
                        ));
                    }
                }
                Some(DeclarationKind::Pipe) => {
                    if declared_pipes.contains(export) || imported_pipes.contains(export) {
                        exported_pipes.insert(export.clone());
                    } else {
                        diagnostics.push(site.validation(
                            ErrorCode::NgmoduleInvalidExport,
                            format!(
                                "Can't export pipe {} from {} as it was neither declared nor imported",
                                export.name(),
                                owner
                            ),
                        ));
                    }
                }
                _ => diagnostics.push(site.validation(
                    ErrorCode::NgmoduleInvalidExport,
                    format!(
                        "{} exported by {} is not an NgModule, directive, component or pipe",
                        export.name(),
                        owner
                    ),
                )),
            }
        }

        let compilation_scope = CompilationScope {
            directives: declared_directives
                .iter()
                .chain(&imported_directives)
                .cloned()
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect(),
            pipes: declared_pipes
                .iter()
                .chain(&imported_pipes)
                .cloned()
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect(),
        };

        // Modules whose transitive state this module inherits.
        let linked: Vec<Reference> = imported_modules
            .iter()
            .chain(&exported_modules)
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let mut transitive_modules: IndexSet<Reference> = IndexSet::new();
        for module in &linked {
            match self.resolved.get(module.key()) {
                Some(resolved) => transitive_modules.extend(resolved.transitive_modules.iter().cloned()),
                None => {
                    transitive_modules.insert(module.clone());
                }
            }
        }
        transitive_modules.insert(reference.clone());

        // Providers: `ModuleWithProviders` ones come before the module's own.
        let own_providers = providers_from_entries(&metadata.providers, &site, &mut diagnostics);
        let providers: Vec<ProviderEntry> = import_providers
            .into_iter()
            .chain(own_providers)
            .enumerate()
            .map(|(ordinal, provider)| ProviderEntry {
                provider,
                module: reference.clone(),
                ordinal,
            })
            .collect();

        let mut seen: HashSet<(SymbolKey, usize)> = HashSet::new();
        let mut transitive_providers = Vec::new();
        let inherited = linked
            .iter()
            .filter_map(|module| self.resolved.get(module.key()))
            .flat_map(|module| module.transitive_providers.iter());
        for entry in inherited.chain(&providers) {
            if seen.insert((entry.module.key().clone(), entry.ordinal)) {
                transitive_providers.push(entry.clone());
            }
        }

        // Entry components.
        let mut entry_components: IndexSet<Reference> = IndexSet::new();
        for entry in metadata.entry_components.iter().chain(&metadata.bootstrap) {
            match entry {
                MetadataValue::Reference(component) => {
                    entry_components.insert(component.clone());
                }
                MetadataValue::Unresolvable(_) => {}
                other => diagnostics.push(site.validation(
                    ErrorCode::ValueHasWrongType,
                    format!(
                        "Entry components and bootstrap of {} must be classes, got {}",
                        owner,
                        describe(other)
                    ),
                )),
            }
        }
        for directive in &declared_directives {
            if let Some(descriptor) = self.directives.get(directive.key()) {
                entry_components.extend(descriptor.metadata.entry_components.iter().cloned());
            }
        }

        let mut lazy_routes = Vec::new();
        for entry in &providers {
            if !self.is_entry_components_token(&entry.provider.token, site.file) {
                continue;
            }
            if self.options.require_multi_entry_components && !entry.provider.multi {
                diagnostics.push(site.validation(
                    ErrorCode::InvalidEntryComponentsProvider,
                    format!("{} provider in {} must be multi", ANALYZE_FOR_ENTRY_COMPONENTS, owner),
                ));
            }
            let Some(value) = entry.provider.use_value() else {
                diagnostics.push(site.validation(
                    ErrorCode::InvalidEntryComponentsProvider,
                    format!("{} provider in {} must use useValue", ANALYZE_FOR_ENTRY_COMPONENTS, owner),
                ));
                continue;
            };
            self.collect_components(value, &mut entry_components);
            for target in collect_route_targets(value) {
                lazy_routes.push(self.resolve_lazy_route(target, &site, &mut diagnostics));
            }
        }
        for module in &linked {
            if let Some(resolved) = self.resolved.get(module.key()) {
                entry_components.extend(resolved.entry_components.iter().cloned());
            }
        }

        ModuleDescriptor {
            reference,
            file: file.clone(),
            metadata,
            imported_modules: imported_modules.into_iter().collect(),
            exported_modules: exported_modules.into_iter().collect(),
            declared_directives: declared_directives.into_iter().collect(),
            declared_pipes: declared_pipes.into_iter().collect(),
            exported_directives: exported_directives.into_iter().collect(),
            exported_pipes: exported_pipes.into_iter().collect(),
            compilation_scope,
            transitive_modules: transitive_modules.into_iter().collect(),
            providers,
            transitive_providers,
            entry_components: entry_components.into_iter().collect(),
            lazy_routes,
            diagnostics,
        }
    }

    /// `true` when `token` is the entry components token declared by the core
    /// package, as resolved from `containing_file`.
    fn is_entry_components_token(&self, token: &MetadataValue, containing_file: &str) -> bool {
        let Some(reference) = token.as_reference() else {
            return false;
        };
        if reference.name() != ANALYZE_FOR_ENTRY_COMPONENTS {
            return false;
        }
        let Some(core) = self
            .evaluator
            .host()
            .resolve_module(&self.options.core_module, containing_file)
        else {
            return false;
        };
        let declared_in = reference.file();
        if declared_in == core.file_name {
            return true;
        }
        let package_dir = dirname(&core.file_name);
        package_dir.contains("/node_modules/")
            && declared_in
                .strip_prefix(package_dir.as_str())
                .map_or(false, |rest| rest.starts_with('/'))
    }

    /// Components and directives referenced anywhere inside a value.
    fn collect_components(&self, value: &MetadataValue, out: &mut IndexSet<Reference>) {
        match value {
            MetadataValue::Reference(reference) => {
                if self.kind_of(reference).map_or(false, DeclarationKind::is_directive) {
                    out.insert(reference.clone());
                }
            }
            MetadataValue::Array(items) => {
                items.iter().for_each(|item| self.collect_components(item, out))
            }
            MetadataValue::Object(object) => {
                object.values().for_each(|item| self.collect_components(item, out))
            }
            _ => {}
        }
    }

    fn resolve_lazy_route(
        &self,
        target: RouteTarget,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> LazyRoute {
        let (module_path, export_name) = parse_load_children(&target.load_children);
        let resolved = self
            .evaluator
            .host()
            .resolve_module(module_path, site.file)
            .and_then(|file| self.evaluator.resolve_export_reference(file, export_name));

        let module = match resolved {
            Some(module) if self.is_module(&module) => Some(module),
            Some(other) => {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::Validation,
                    ErrorCode::NgmoduleInvalidLazyRoute,
                    format!("Lazy route '{}' of {} loads {} which is not an NgModule", target.load_children, site.owner, other.name()),
                    site.file,
                    site.span,
                ));
                None
            }
            None => {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::Validation,
                    ErrorCode::NgmoduleInvalidLazyRoute,
                    format!("Lazy route '{}' of {} cannot be resolved", target.load_children, site.owner),
                    site.file,
                    site.span,
                ));
                None
            }
        };

        LazyRoute {
            path: target.path,
            load_children: target.load_children,
            module,
        }
    }
}
