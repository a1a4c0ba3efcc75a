// Diagnostics
//
// Evaluation failures reported against the declaration whose metadata they
// were found in.

use super::result::MetadataValue;
use crate::ngtsc::diagnostics::{Diagnostic, DiagnosticKind, ErrorCode};
use ts::Span;

/// One `Evaluation` diagnostic per unresolvable leaf of `value`.
pub fn unresolvable_diagnostics(
    value: &MetadataValue,
    field: &str,
    owner: &str,
    file: &str,
    span: Span,
) -> Vec<Diagnostic> {
    value
        .unresolvable_leaves()
        .into_iter()
        .map(|dynamic| {
            Diagnostic::error(
                DiagnosticKind::Evaluation,
                ErrorCode::ValueNotLiteral,
                format!("Value of '{}' in {} could not be evaluated: {}", field, owner, dynamic),
                file,
                span,
            )
        })
        .collect()
}
