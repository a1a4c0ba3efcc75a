// Metadata Utilities
//
// Shape checks shared by the per-kind resolvers. Each helper reports problems
// into the caller's diagnostic list and returns the best-effort value.

use crate::ngtsc::diagnostics::{Diagnostic, DiagnosticKind, ErrorCode};
use crate::ngtsc::partial_evaluator::{unresolvable_diagnostics, MetadataValue};
use indexmap::IndexMap;
use ts::Span;

/// Where diagnostics for one declaration are reported.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticSite<'s> {
    pub owner: &'s str,
    pub file: &'s str,
    pub span: Span,
}

impl<'s> DiagnosticSite<'s> {
    pub fn new(owner: &'s str, file: &'s str, span: Span) -> Self {
        Self { owner, file, span }
    }

    pub fn validation(&self, code: ErrorCode, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Validation, code, message, self.file, self.span)
    }

    pub fn evaluation(&self, value: &MetadataValue, field: &str) -> Vec<Diagnostic> {
        unresolvable_diagnostics(value, field, self.owner, self.file, self.span)
    }
}

/// Name of a value kind for messages.
pub fn describe(value: &MetadataValue) -> &'static str {
    match value {
        MetadataValue::String(_) => "a string",
        MetadataValue::Number(_) => "a number",
        MetadataValue::Boolean(_) => "a boolean",
        MetadataValue::Null => "null",
        MetadataValue::Array(_) => "an array",
        MetadataValue::Object(_) => "an object",
        MetadataValue::Reference(_) => "a class reference",
        MetadataValue::ForwardRef(_) => "a forward reference",
        MetadataValue::Unresolvable(_) => "a dynamic value",
    }
}

/// Optional string property. `Null` counts as absent.
pub fn optional_string(
    object: &IndexMap<String, MetadataValue>,
    field: &str,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    match object.get(field)? {
        MetadataValue::String(s) => Some(s.clone()),
        MetadataValue::Null => None,
        value @ MetadataValue::Unresolvable(_) => {
            diagnostics.extend(site.evaluation(value, field));
            None
        }
        other => {
            diagnostics.push(site.validation(
                ErrorCode::ValueHasWrongType,
                format!("{} of {} must be a string, got {}", field, site.owner, describe(other)),
            ));
            None
        }
    }
}

/// Optional boolean property; `default` when absent or invalid.
pub fn optional_bool(
    object: &IndexMap<String, MetadataValue>,
    field: &str,
    default: bool,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    match object.get(field) {
        None | Some(MetadataValue::Null) => default,
        Some(MetadataValue::Boolean(b)) => *b,
        Some(value @ MetadataValue::Unresolvable(_)) => {
            diagnostics.extend(site.evaluation(value, field));
            default
        }
        Some(other) => {
            diagnostics.push(site.validation(
                ErrorCode::ValueHasWrongType,
                format!("{} of {} must be a boolean, got {}", field, site.owner, describe(other)),
            ));
            default
        }
    }
}

/// Flattened entries of an array property. Absent and `null` are empty; any
/// other non-array value is reported with `invalid_code` and treated as empty.
/// Unresolvable entries stay in place and are reported as evaluation errors.
pub fn array_entries(
    object: &IndexMap<String, MetadataValue>,
    field: &str,
    invalid_code: ErrorCode,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<MetadataValue> {
    match object.get(field) {
        None | Some(MetadataValue::Null) => Vec::new(),
        Some(value @ MetadataValue::Array(_)) => {
            diagnostics.extend(site.evaluation(value, field));
            value.flatten().into_iter().cloned().collect()
        }
        Some(value @ MetadataValue::Unresolvable(_)) => {
            diagnostics.extend(site.evaluation(value, field));
            Vec::new()
        }
        Some(other) => {
            diagnostics.push(site.validation(
                invalid_code,
                format!("{} of {} must be an array, got {}", field, site.owner, describe(other)),
            ));
            Vec::new()
        }
    }
}

/// String entries of an array property; anything else is a type error.
pub fn string_entries(
    object: &IndexMap<String, MetadataValue>,
    field: &str,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<String> {
    let mut out = Vec::new();
    for entry in array_entries(object, field, ErrorCode::ValueHasWrongType, site, diagnostics) {
        match entry {
            MetadataValue::String(s) => out.push(s),
            MetadataValue::Unresolvable(_) => {}
            other => diagnostics.push(site.validation(
                ErrorCode::ValueHasWrongType,
                format!("{} of {} must contain strings, got {}", field, site.owner, describe(&other)),
            )),
        }
    }
    out
}

/// A `{ [key: string]: string }` property such as `host`.
pub fn string_map(
    object: &IndexMap<String, MetadataValue>,
    field: &str,
    site: &DiagnosticSite<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    match object.get(field) {
        None | Some(MetadataValue::Null) => {}
        Some(MetadataValue::Object(map)) => {
            for (key, value) in map {
                match value {
                    MetadataValue::String(s) => {
                        out.insert(key.clone(), s.clone());
                    }
                    MetadataValue::Unresolvable(_) => {
                        diagnostics.extend(site.evaluation(value, &format!("{}.{}", field, key)))
                    }
                    other => diagnostics.push(site.validation(
                        ErrorCode::ValueHasWrongType,
                        format!("{}.{} of {} must be a string, got {}", field, key, site.owner, describe(other)),
                    )),
                }
            }
        }
        Some(value @ MetadataValue::Unresolvable(_)) => diagnostics.extend(site.evaluation(value, field)),
        Some(other) => diagnostics.push(site.validation(
            ErrorCode::ValueHasWrongType,
            format!("{} of {} must be an object, got {}", field, site.owner, describe(other)),
        )),
    }
    out
}
