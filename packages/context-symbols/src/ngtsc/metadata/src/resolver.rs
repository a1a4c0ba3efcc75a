// Metadata Resolver
//
// Turns the evaluated decorator argument of a classified declaration into the
// descriptor of its kind, applying defaults and shape validation.

use super::api::{
    DirectiveDescriptor, InjectableDescriptor, NgModuleMetadata, NonResolvedMetadata,
    PipeDescriptor, ResolvedTemplate,
};
use super::provider::{providers_from_entries, ProviderDescriptor};
use super::util::{
    array_entries, describe, optional_bool, optional_string, string_entries, string_map,
    DiagnosticSite,
};
use crate::ngtsc::diagnostics::{Diagnostic, DiagnosticKind, ErrorCode};
use crate::ngtsc::file_system::resolve_relative_to_file;
use crate::ngtsc::imports::{DeclarationKind, Reference};
use crate::ngtsc::logging::Logger;
use crate::ngtsc::partial_evaluator::{MetadataValue, PartialEvaluator};
use crate::ngtsc::reflection::Classification;
use crate::ngtsc::resource::ResourceCache;
use indexmap::IndexMap;
use ts::SourceFile;

type MetadataObject = IndexMap<String, MetadataValue>;

pub struct MetadataResolver<'a> {
    evaluator: &'a PartialEvaluator<'a>,
    resources: &'a ResourceCache,
    logger: &'a dyn Logger,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(
        evaluator: &'a PartialEvaluator<'a>,
        resources: &'a ResourceCache,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            evaluator,
            resources,
            logger,
        }
    }

    pub fn evaluator(&self) -> &'a PartialEvaluator<'a> {
        self.evaluator
    }

    /// The decorator argument as an evaluated object with forward references
    /// resolved. Missing or non-object arguments read as `{}`.
    fn evaluate_metadata(
        &self,
        classification: &Classification,
        file: &'a SourceFile,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> MetadataObject {
        let Some(expression) = &classification.expression else {
            return MetadataObject::new();
        };
        let value = self
            .evaluator
            .resolve_forward_refs(&self.evaluator.evaluate(expression, file));
        match value {
            MetadataValue::Object(object) => object,
            unresolved @ MetadataValue::Unresolvable(_) => {
                diagnostics.extend(site.evaluation(&unresolved, classification.kind.decorator_name()));
                MetadataObject::new()
            }
            // The classifier already reported the non-literal argument.
            _ => MetadataObject::new(),
        }
    }

    fn providers(
        &self,
        object: &MetadataObject,
        field: &str,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ProviderDescriptor> {
        let entries = array_entries(object, field, ErrorCode::ValueHasWrongType, site, diagnostics);
        providers_from_entries(&entries, site, diagnostics)
    }

    pub fn resolve_directive(
        &self,
        classification: &Classification,
        file: &'a SourceFile,
        reference: Reference,
    ) -> DirectiveDescriptor {
        let site = DiagnosticSite::new(reference.name(), &file.file_name, classification.span);
        let mut diagnostics = classification.errors.clone();
        let object = self.evaluate_metadata(classification, file, &site, &mut diagnostics);

        let selector = optional_string(&object, "selector", &site, &mut diagnostics);
        if selector.is_none() {
            diagnostics.push(site.validation(
                ErrorCode::DirectiveMissingSelector,
                format!("{} {} has no selector", classification.kind, reference.name()),
            ));
        }

        let entry_components = array_entries(
            &object,
            "entryComponents",
            ErrorCode::ValueHasWrongType,
            &site,
            &mut diagnostics,
        )
        .into_iter()
        .filter_map(|entry| match entry {
            MetadataValue::Reference(reference) => Some(reference),
            MetadataValue::Unresolvable(_) => None,
            other => {
                diagnostics.push(site.validation(
                    ErrorCode::ValueHasWrongType,
                    format!("entryComponents of {} must contain classes, got {}", site.owner, describe(&other)),
                ));
                None
            }
        })
        .collect();

        let metadata = NonResolvedMetadata {
            selector,
            inputs: string_entries(&object, "inputs", &site, &mut diagnostics),
            outputs: string_entries(&object, "outputs", &site, &mut diagnostics),
            host: string_map(&object, "host", &site, &mut diagnostics),
            export_as: optional_string(&object, "exportAs", &site, &mut diagnostics),
            providers: self.providers(&object, "providers", &site, &mut diagnostics),
            view_providers: self.providers(&object, "viewProviders", &site, &mut diagnostics),
            entry_components,
            template: optional_string(&object, "template", &site, &mut diagnostics),
            template_url: optional_string(&object, "templateUrl", &site, &mut diagnostics),
            styles: string_entries(&object, "styles", &site, &mut diagnostics),
            style_urls: string_entries(&object, "styleUrls", &site, &mut diagnostics),
        };

        let template = (classification.kind == DeclarationKind::Component)
            .then(|| self.resolve_template(&metadata, &site, &mut diagnostics));

        self.logger.debug(&format!(
            "resolved {} {} ({} diagnostics)",
            classification.kind,
            reference.name(),
            diagnostics.len()
        ));

        DirectiveDescriptor {
            reference,
            kind: classification.kind,
            metadata,
            template,
            expression: classification.expression.clone(),
            diagnostics,
        }
    }

    /// Inline template and styles, with `templateUrl` / `styleUrls` loaded
    /// relative to the component's file.
    fn resolve_template(
        &self,
        metadata: &NonResolvedMetadata,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ResolvedTemplate {
        let template = match (&metadata.template, &metadata.template_url) {
            (Some(template), None) => Some(template.clone()),
            (None, Some(url)) => self.load(url, site, diagnostics),
            (Some(template), Some(_)) => {
                diagnostics.push(site.validation(
                    ErrorCode::ComponentMissingTemplate,
                    format!("{} specifies both template and templateUrl", site.owner),
                ));
                Some(template.clone())
            }
            (None, None) => {
                diagnostics.push(site.validation(
                    ErrorCode::ComponentMissingTemplate,
                    format!("{} has neither template nor templateUrl", site.owner),
                ));
                None
            }
        };

        let mut styles = metadata.styles.clone();
        for url in &metadata.style_urls {
            styles.extend(self.load(url, site, diagnostics));
        }

        ResolvedTemplate { template, styles }
    }

    fn load(
        &self,
        url: &str,
        site: &DiagnosticSite<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<String> {
        let path = resolve_relative_to_file(site.file, url);
        match self.resources.load(&path) {
            Ok(content) => Some(content),
            Err(err) => {
                self.logger.warn(&format!("{}: {}", site.owner, err));
                diagnostics.push(Diagnostic::error(
                    DiagnosticKind::Validation,
                    ErrorCode::ComponentResourceNotFound,
                    format!("Could not load resource '{}' of {}: {}", url, site.owner, err),
                    site.file,
                    site.span,
                ));
                None
            }
        }
    }

    pub fn resolve_pipe(
        &self,
        classification: &Classification,
        file: &'a SourceFile,
        reference: Reference,
    ) -> PipeDescriptor {
        let site = DiagnosticSite::new(reference.name(), &file.file_name, classification.span);
        let mut diagnostics = classification.errors.clone();
        let object = self.evaluate_metadata(classification, file, &site, &mut diagnostics);

        let name = optional_string(&object, "name", &site, &mut diagnostics).unwrap_or_else(|| {
            diagnostics.push(site.validation(
                ErrorCode::PipeMissingName,
                format!("Pipe {} has no name", reference.name()),
            ));
            reference.name().to_string()
        });
        let pure = optional_bool(&object, "pure", true, &site, &mut diagnostics);

        PipeDescriptor {
            reference,
            name,
            pure,
            expression: classification.expression.clone(),
            diagnostics,
        }
    }

    pub fn resolve_injectable(
        &self,
        classification: &Classification,
        file: &'a SourceFile,
        reference: Reference,
    ) -> InjectableDescriptor {
        let site = DiagnosticSite::new(reference.name(), &file.file_name, classification.span);
        let mut diagnostics = classification.errors.clone();
        let object = self.evaluate_metadata(classification, file, &site, &mut diagnostics);

        let provided_in = object.get("providedIn").cloned();
        if let Some(value @ MetadataValue::Unresolvable(_)) = &provided_in {
            diagnostics.extend(site.evaluation(value, "providedIn"));
        }

        let has_strategy = ["useClass", "useValue", "useExisting", "useFactory"]
            .iter()
            .any(|key| object.contains_key(*key));
        let provider = has_strategy.then(|| {
            let mut config = object.clone();
            config.insert(
                "provide".to_string(),
                MetadataValue::Reference(reference.clone()),
            );
            let descriptor = ProviderDescriptor::from_object(&config, &site);
            diagnostics.extend(descriptor.diagnostics.iter().cloned());
            descriptor
        });

        InjectableDescriptor {
            reference,
            provided_in,
            provider,
            expression: classification.expression.clone(),
            diagnostics,
        }
    }

    pub fn resolve_ng_module(
        &self,
        classification: &Classification,
        file: &'a SourceFile,
        reference: &Reference,
    ) -> NgModuleMetadata {
        let site = DiagnosticSite::new(reference.name(), &file.file_name, classification.span);
        let mut diagnostics = classification.errors.clone();
        let object = self.evaluate_metadata(classification, file, &site, &mut diagnostics);

        let list = |field: &str, code: ErrorCode, diagnostics: &mut Vec<Diagnostic>| {
            array_entries(&object, field, code, &site, diagnostics)
        };
        let declarations = list("declarations", ErrorCode::NgmoduleInvalidDeclaration, &mut diagnostics);
        let imports = list("imports", ErrorCode::NgmoduleInvalidImport, &mut diagnostics);
        let exports = list("exports", ErrorCode::NgmoduleInvalidExport, &mut diagnostics);
        let providers = list("providers", ErrorCode::ValueHasWrongType, &mut diagnostics);
        let entry_components = list("entryComponents", ErrorCode::ValueHasWrongType, &mut diagnostics);
        let bootstrap = list("bootstrap", ErrorCode::ValueHasWrongType, &mut diagnostics);
        let id = optional_string(&object, "id", &site, &mut diagnostics);

        NgModuleMetadata {
            declarations,
            imports,
            exports,
            providers,
            entry_components,
            bootstrap,
            id,
            expression: classification.expression.clone(),
            diagnostics,
        }
    }
}
