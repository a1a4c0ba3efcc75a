// Context Symbols
//
// Facade over one program generation. The graph is built lazily on the first
// query and replaced wholesale by `update_program`.

use super::analyzer::analyze_program;
use super::summary::ContextSummary;
use crate::ngtsc::diagnostics::{ContextError, Diagnostic};
use crate::ngtsc::imports::{DeclarationKind, Reference, ReferenceRegistry, CORE_MODULE};
use crate::ngtsc::logging::{ConsoleLogger, LogLevel, Logger, NullLogger};
use crate::ngtsc::metadata::{DirectiveDescriptor, InjectableDescriptor, PipeDescriptor};
use crate::ngtsc::partial_evaluator::DEFAULT_MAX_MACRO_DEPTH;
use crate::ngtsc::reflection::ClassificationCache;
use crate::ngtsc::resource::{ResourceCache, ResourceResolver};
use crate::ngtsc::scope::{AnalyzedModules, CompilationScope, ModuleDescriptor};
use indexmap::IndexSet;
use std::rc::Rc;
use ts::{Program, Span, Statement};

#[derive(Debug, Clone)]
pub struct ContextSymbolsOptions {
    /// Module specifier the Angular decorators and tokens are imported from.
    pub core_module: String,
    /// Log to stderr at this level. `None` keeps the analysis silent unless a
    /// logger is injected with `ContextSymbols::with_logger`.
    pub log_level: Option<LogLevel>,
    pub require_multi_entry_components: bool,
    pub max_macro_depth: usize,
}

impl Default for ContextSymbolsOptions {
    fn default() -> Self {
        Self {
            core_module: CORE_MODULE.to_string(),
            log_level: None,
            require_multi_entry_components: true,
            max_macro_depth: DEFAULT_MAX_MACRO_DEPTH,
        }
    }
}

/// Results of one build pass. References only compare equal within a pass,
/// so the registry lives and dies with the graph it produced.
struct BuildState {
    registry: ReferenceRegistry,
    analyzed: AnalyzedModules,
}

pub struct ContextSymbols {
    program: Box<dyn Program>,
    options: ContextSymbolsOptions,
    logger: Rc<dyn Logger>,
    resources: ResourceCache,
    classifications: ClassificationCache,
    state: Option<BuildState>,
    generation: usize,
}

impl ContextSymbols {
    pub fn new(program: Box<dyn Program>, resources: Rc<dyn ResourceResolver>) -> Self {
        Self::with_options(program, resources, ContextSymbolsOptions::default())
    }

    pub fn with_options(
        program: Box<dyn Program>,
        resources: Rc<dyn ResourceResolver>,
        options: ContextSymbolsOptions,
    ) -> Self {
        let logger: Rc<dyn Logger> = match options.log_level {
            Some(level) => Rc::new(ConsoleLogger::new(level).with_prefix("context-symbols")),
            None => Rc::new(NullLogger::new()),
        };
        Self {
            program,
            options,
            logger,
            resources: ResourceCache::new(resources),
            classifications: ClassificationCache::new(),
            state: None,
            generation: 0,
        }
    }

    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &ContextSymbolsOptions {
        &self.options
    }

    pub fn program(&self) -> &dyn Program {
        self.program.as_ref()
    }

    /// Number of validation passes run so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn ensure_analyzed(&mut self) -> &BuildState {
        let Self {
            program,
            options,
            logger,
            resources,
            classifications,
            state,
            generation,
        } = self;
        state.get_or_insert_with(|| {
            *generation += 1;
            logger.debug(&format!("building context symbols, generation {}", generation));
            let registry = ReferenceRegistry::new();
            let analyzed = analyze_program(
                &**program,
                &registry,
                classifications,
                resources,
                options,
                &**logger,
            );
            BuildState { registry, analyzed }
        })
    }

    fn analyzed(&mut self) -> &AnalyzedModules {
        &self.ensure_analyzed().analyzed
    }

    /// The whole analyzed graph, built on first use.
    pub fn get_analyzed_modules(&mut self) -> AnalyzedModules {
        self.analyzed().clone()
    }

    pub fn get_modules(&mut self) -> Vec<ModuleDescriptor> {
        self.analyzed().ng_modules.values().cloned().collect()
    }

    pub fn get_directives(&mut self) -> Vec<DirectiveDescriptor> {
        self.analyzed().directives.values().cloned().collect()
    }

    pub fn get_pipes(&mut self) -> Vec<PipeDescriptor> {
        self.analyzed().pipes.values().cloned().collect()
    }

    pub fn get_injectables(&mut self) -> Vec<InjectableDescriptor> {
        self.analyzed().injectables.values().cloned().collect()
    }

    /// Every diagnostic attached to a descriptor of the current build.
    pub fn diagnostics(&mut self) -> Vec<Diagnostic> {
        self.analyzed().diagnostics()
    }

    /// The directive whose class is `node`, or encloses or is enclosed by it.
    pub fn get_directive_from_node(
        &mut self,
        node: &Statement,
        file_name: &str,
    ) -> Result<DirectiveDescriptor, ContextError> {
        let span = node.span();
        self.find_directive(file_name, span, |declared| {
            declared.contains_span(span) || span.contains_span(declared)
        })
    }

    /// The directive whose class declaration contains `offset`.
    pub fn get_directive_at(
        &mut self,
        file_name: &str,
        offset: u32,
    ) -> Result<DirectiveDescriptor, ContextError> {
        self.find_directive(file_name, Span::new(offset, offset), |declared| {
            declared.contains(offset)
        })
    }

    fn find_directive(
        &mut self,
        file_name: &str,
        span: Span,
        matches: impl Fn(Span) -> bool,
    ) -> Result<DirectiveDescriptor, ContextError> {
        if self.program.source_file(file_name).is_none() {
            return Err(ContextError::FileNotFound(file_name.to_string()));
        }
        self.analyzed()
            .directives
            .values()
            .find(|directive| {
                directive.reference.file() == file_name && matches(directive.reference.span())
            })
            .cloned()
            .ok_or_else(|| ContextError::DirectiveNotFound {
                file: file_name.to_string(),
                span,
            })
    }

    /// Directives and pipes visible in the template of `declaration`.
    pub fn get_template_scope(
        &mut self,
        declaration: &Reference,
    ) -> Result<CompilationScope, ContextError> {
        self.analyzed()
            .declaring_module(declaration)
            .map(|module| module.compilation_scope.clone())
            .ok_or_else(|| ContextError::NotDeclared {
                name: declaration.name().to_string(),
            })
    }

    /// NgModule references declared under `name`, in discovery order.
    pub fn find_module(&mut self, name: &str) -> Vec<Reference> {
        self.ensure_analyzed()
            .registry
            .lookup(DeclarationKind::NgModule, |reference| reference.name() == name)
    }

    /// Summary rooted at `root`, or at the one module no other module
    /// imports (directly, via `ModuleWithProviders` or as a lazy route).
    pub fn get_context_summary(
        &mut self,
        root: Option<&Reference>,
    ) -> Result<ContextSummary, ContextError> {
        let analyzed = self.analyzed();
        let module = match root {
            Some(reference) => analyzed.module(reference).ok_or_else(|| ContextError::NotAModule {
                name: reference.name().to_string(),
            })?,
            None => find_root_module(analyzed)?,
        };
        Ok(ContextSummary::new(module, analyzed))
    }

    /// Point at a new program generation and validate it once.
    pub fn update_program(&mut self, program: Box<dyn Program>) {
        self.program = program;
        self.classifications
            .retain_files(self.program.source_files().iter().map(|sf| sf.file_name.as_str()));
        self.state = None;
        self.ensure_analyzed();
    }
}

fn find_root_module(analyzed: &AnalyzedModules) -> Result<&ModuleDescriptor, ContextError> {
    let mut referenced: IndexSet<&Reference> = IndexSet::new();
    for module in analyzed.modules() {
        for imported in &module.imported_modules {
            if !Reference::ptr_eq(imported, &module.reference) {
                referenced.insert(imported);
            }
        }
        referenced.extend(module.lazy_routes.iter().filter_map(|route| route.module.as_ref()));
    }

    let candidates: Vec<&ModuleDescriptor> = analyzed
        .modules()
        .filter(|module| !referenced.contains(&module.reference))
        .collect();
    match candidates.as_slice() {
        [root] => Ok(*root),
        [] => Err(ContextError::NoRootModule),
        _ => Err(ContextError::AmbiguousRootModule {
            candidates: candidates.iter().map(|module| module.name().to_string()).collect(),
        }),
    }
}
