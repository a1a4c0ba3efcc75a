use super::error_code::ErrorCode;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use ts::{DiagnosticCategory, Span};

/// Which stage of the analysis produced a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Malformed annotation on a declaration.
    Classification,
    /// A value that is not statically derivable.
    Evaluation,
    /// A resolved value with the wrong shape for its kind.
    Validation,
    /// No unique root module for a summary.
    Resolution,
    /// A node, file or declaration lookup miss.
    NotFound,
}

/// A problem attached to the declaration it concerns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: ErrorCode,
    pub category: DiagnosticCategory,
    pub message: String,
    pub file: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(
        kind: DiagnosticKind,
        code: ErrorCode,
        message: impl Into<String>,
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            kind,
            code,
            category: DiagnosticCategory::Error,
            message: message.into(),
            file: file.into(),
            span,
        }
    }

    pub fn warning(
        kind: DiagnosticKind,
        code: ErrorCode,
        message: impl Into<String>,
        file: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(kind, code, message, file, span)
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {} {}: {}",
            self.file, self.span.start, self.category, self.code, self.message
        )
    }
}

/// Failure of a single query that cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("no root module: every analyzed NgModule is imported by another module")]
    NoRootModule,

    #[error("ambiguous root module, candidates are: {}", .candidates.join(", "))]
    AmbiguousRootModule { candidates: Vec<String> },

    #[error("'{name}' is not an analyzed NgModule")]
    NotAModule { name: String },

    #[error("source file '{0}' is not part of the program")]
    FileNotFound(String),

    #[error("no directive declared at {span} in '{file}'")]
    DirectiveNotFound { file: String, span: Span },

    #[error("'{name}' is not declared by any analyzed NgModule")]
    NotDeclared { name: String },
}

impl ContextError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ContextError::NoRootModule | ContextError::AmbiguousRootModule { .. } => {
                DiagnosticKind::Resolution
            }
            ContextError::NotAModule { .. }
            | ContextError::FileNotFound(_)
            | ContextError::DirectiveNotFound { .. }
            | ContextError::NotDeclared { .. } => DiagnosticKind::NotFound,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ContextError::NoRootModule => ErrorCode::RootModuleNotFound,
            ContextError::AmbiguousRootModule { .. } => ErrorCode::RootModuleAmbiguous,
            _ => ErrorCode::DeclarationNotFound,
        }
    }
}
