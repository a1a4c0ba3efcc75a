//! Descriptor types produced by the metadata resolver.

use super::provider::ProviderDescriptor;
use crate::ngtsc::diagnostics::Diagnostic;
use crate::ngtsc::imports::{DeclarationKind, Reference};
use crate::ngtsc::partial_evaluator::MetadataValue;
use indexmap::IndexMap;
use serde::Serialize;
use ts::Expression;

/// Directive metadata as written in the decorator, before any resource loading.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonResolvedMetadata {
    pub selector: Option<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub host: IndexMap<String, String>,
    pub export_as: Option<String>,
    pub providers: Vec<ProviderDescriptor>,
    pub view_providers: Vec<ProviderDescriptor>,
    pub entry_components: Vec<Reference>,
    pub template: Option<String>,
    pub template_url: Option<String>,
    pub styles: Vec<String>,
    pub style_urls: Vec<String>,
}

/// Template and style contents of a component, external resources loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedTemplate {
    /// `None` when `templateUrl` could not be loaded.
    pub template: Option<String>,
    /// Inline styles followed by the loaded `styleUrls`, in order.
    pub styles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDescriptor {
    pub reference: Reference,
    pub kind: DeclarationKind,
    pub metadata: NonResolvedMetadata,
    /// Present for components only.
    pub template: Option<ResolvedTemplate>,
    #[serde(skip)]
    pub expression: Option<Expression>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DirectiveDescriptor {
    pub fn is_component(&self) -> bool {
        self.kind == DeclarationKind::Component
    }

    pub fn non_resolved_metadata(&self) -> &NonResolvedMetadata {
        &self.metadata
    }

    pub fn selector(&self) -> Option<&str> {
        self.metadata.selector.as_deref()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipeDescriptor {
    pub reference: Reference,
    /// Name used in templates; the class name when missing.
    pub name: String,
    pub pure: bool,
    #[serde(skip)]
    pub expression: Option<Expression>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipeDescriptor {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectableDescriptor {
    pub reference: Reference,
    pub provided_in: Option<MetadataValue>,
    /// `useClass` / `useValue` / ... configured on the decorator itself.
    pub provider: Option<ProviderDescriptor>,
    #[serde(skip)]
    pub expression: Option<Expression>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The declared lists of an `@NgModule`, each flattened in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NgModuleMetadata {
    pub declarations: Vec<MetadataValue>,
    pub imports: Vec<MetadataValue>,
    pub exports: Vec<MetadataValue>,
    pub providers: Vec<MetadataValue>,
    pub entry_components: Vec<MetadataValue>,
    pub bootstrap: Vec<MetadataValue>,
    pub id: Option<String>,
    #[serde(skip)]
    pub expression: Option<Expression>,
    pub diagnostics: Vec<Diagnostic>,
}
