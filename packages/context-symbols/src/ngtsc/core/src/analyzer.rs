// Analyzer
//
// One full build pass: classify every file, intern and resolve each annotated
// declaration, then link the NgModules into the graph.

use super::context_symbols::ContextSymbolsOptions;
use crate::ngtsc::imports::{DeclarationKind, Reference, ReferenceRegistry};
use crate::ngtsc::logging::Logger;
use crate::ngtsc::metadata::MetadataResolver;
use crate::ngtsc::partial_evaluator::PartialEvaluator;
use crate::ngtsc::reflection::{ClassificationCache, DeclarationClassifier, ProgramReflectionHost};
use crate::ngtsc::resource::ResourceCache;
use crate::ngtsc::scope::{AnalyzedFile, AnalyzedModules, GraphOptions, ModuleGraphBuilder, ModuleSeed};
use indexmap::IndexMap;
use ts::Program;

/// Build the analyzed program graph.
///
/// `registry` must be fresh for every pass: identities are only stable
/// within one program generation. `classifications` and `resources` may be
/// carried over between passes.
pub fn analyze_program(
    program: &dyn Program,
    registry: &ReferenceRegistry,
    classifications: &mut ClassificationCache,
    resources: &ResourceCache,
    options: &ContextSymbolsOptions,
    logger: &dyn Logger,
) -> AnalyzedModules {
    let classifier = DeclarationClassifier::new(options.core_module.clone());
    let host = ProgramReflectionHost::new(program);
    let evaluator =
        PartialEvaluator::new(&host, registry).with_max_macro_depth(options.max_macro_depth);
    let resolver = MetadataResolver::new(&evaluator, resources, logger);

    let mut analyzed = AnalyzedModules::default();
    let mut seeds = Vec::new();

    for file in program.source_files() {
        let classified = classifications.classify_file(&classifier, file);
        if classified.is_empty() {
            continue;
        }

        // Intern and register every declaration of the file before resolving
        // any of them, so that references between siblings see their kind.
        let references: Vec<Reference> = classified
            .iter()
            .map(|classification| {
                let reference =
                    registry.intern(&file.file_name, &classification.class_name, classification.span);
                registry.register_kind(&reference, classification.kind);
                reference
            })
            .collect();

        let mut summary = AnalyzedFile {
            file_name: file.file_name.clone(),
            ..AnalyzedFile::default()
        };
        for (classification, reference) in classified.iter().zip(references) {
            let key = reference.key().clone();
            match classification.kind {
                DeclarationKind::NgModule => {
                    let metadata = resolver.resolve_ng_module(classification, file, &reference);
                    summary.modules.push(reference.clone());
                    seeds.push(ModuleSeed {
                        reference,
                        file: file.file_name.clone(),
                        span: classification.span,
                        metadata,
                    });
                }
                DeclarationKind::Pipe => {
                    summary.pipes.push(reference.clone());
                    let pipe = resolver.resolve_pipe(classification, file, reference);
                    analyzed.pipes.insert(key, pipe);
                }
                DeclarationKind::Injectable => {
                    summary.injectables.push(reference.clone());
                    let injectable = resolver.resolve_injectable(classification, file, reference);
                    analyzed.injectables.insert(key, injectable);
                }
                DeclarationKind::Component | DeclarationKind::Directive => {
                    summary.directives.push(reference.clone());
                    let directive = resolver.resolve_directive(classification, file, reference);
                    analyzed.directives.insert(key, directive);
                }
            }
        }
        analyzed.files.push(summary);
    }

    let graph_options = GraphOptions {
        core_module: options.core_module.clone(),
        require_multi_entry_components: options.require_multi_entry_components,
    };
    let mut builder = ModuleGraphBuilder::new(
        &evaluator,
        &analyzed.directives,
        &graph_options,
        logger,
    );
    for seed in seeds {
        builder.add_module(seed);
    }
    let graph = builder.build();

    analyzed.ng_modules = graph.modules;
    analyzed.declaring_modules = graph.declaring_modules;
    analyzed.modules_with_errors = analyzed
        .ng_modules
        .values()
        .filter(|module| module.has_errors())
        .map(|module| module.reference.clone())
        .collect();

    logger.info(&format!(
        "analyzed {} NgModules, {} directives, {} pipes, {} injectables ({} modules with errors)",
        analyzed.ng_modules.len(),
        analyzed.directives.len(),
        analyzed.pipes.len(),
        analyzed.injectables.len(),
        analyzed.modules_with_errors.len()
    ));
    analyzed
}
