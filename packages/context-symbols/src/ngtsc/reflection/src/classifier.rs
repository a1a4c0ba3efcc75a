// Declaration Classifier
//
// Recognizes the Angular decorators on class declarations and extracts the raw
// metadata expression. Classification only looks at the file itself: the
// decorator must be imported from the core module (aliases and namespace
// imports are followed) or be an unimported ambient name.

use crate::ngtsc::diagnostics::{Diagnostic, DiagnosticKind, ErrorCode};
use crate::ngtsc::imports::{decorator_kind, is_core_specifier, DeclarationKind, CORE_MODULE};
use std::collections::HashMap;
use ts::{ClassDeclaration, Decorator, Expression, ImportBinding, SourceFile, Span};

/// Result of classifying one annotated class.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: DeclarationKind,
    pub class_name: String,
    pub span: Span,
    /// The first recognized decorator.
    pub decorator: Decorator,
    /// The unevaluated metadata argument, if the decorator has one.
    pub expression: Option<Expression>,
    pub errors: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct DeclarationClassifier {
    core_module: String,
}

impl Default for DeclarationClassifier {
    fn default() -> Self {
        Self::new(CORE_MODULE)
    }
}

impl DeclarationClassifier {
    pub fn new(core_module: impl Into<String>) -> Self {
        Self {
            core_module: core_module.into(),
        }
    }

    /// Classifications of every annotated class of `file`, in statement order.
    pub fn classify_file(&self, file: &SourceFile) -> Vec<Classification> {
        file.classes()
            .filter_map(|class| self.classify(class, file))
            .collect()
    }

    pub fn classify(&self, class: &ClassDeclaration, file: &SourceFile) -> Option<Classification> {
        let mut recognized = class
            .decorators
            .iter()
            .filter_map(|decorator| self.recognize(decorator, file).map(|kind| (decorator, kind)));

        let (decorator, kind) = recognized.next()?;
        let mut errors = Vec::new();

        for (extra, extra_kind) in recognized {
            errors.push(self.error(
                ErrorCode::DecoratorCollision,
                format!(
                    "Class {} is decorated with both @{} and @{}; only @{} is analyzed",
                    class.name, kind, extra_kind, kind
                ),
                file,
                extra.span,
            ));
        }

        let expression = match &decorator.arguments {
            None => {
                errors.push(self.error(
                    ErrorCode::DecoratorNotCalled,
                    format!("@{} on {} must be invoked", kind, class.name),
                    file,
                    decorator.span,
                ));
                None
            }
            Some(args) => {
                if args.len() > 1
                    || (args.is_empty()
                        && matches!(kind, DeclarationKind::Component | DeclarationKind::Pipe))
                {
                    errors.push(self.error(
                        ErrorCode::DecoratorArityWrong,
                        format!(
                            "@{} on {} expects exactly one argument, got {}",
                            kind,
                            class.name,
                            args.len()
                        ),
                        file,
                        decorator.span,
                    ));
                }
                match args.first() {
                    Some(arg) if !arg.is_object_literal() => {
                        errors.push(self.error(
                            ErrorCode::DecoratorArgNotLiteral,
                            format!("@{} argument must be an object literal", kind),
                            file,
                            decorator.span,
                        ));
                        Some(arg.clone())
                    }
                    other => other.cloned(),
                }
            }
        };

        Some(Classification {
            kind,
            class_name: class.name.clone(),
            span: class.span,
            decorator: decorator.clone(),
            expression,
            errors,
        })
    }

    fn recognize(&self, decorator: &Decorator, file: &SourceFile) -> Option<DeclarationKind> {
        match &decorator.namespace {
            Some(namespace) => match file.find_import(namespace) {
                Some((import, ImportBinding::Namespace { .. }))
                    if is_core_specifier(&import.module_specifier, &self.core_module) =>
                {
                    decorator_kind(&decorator.name)
                }
                _ => None,
            },
            None => match file.find_import(&decorator.name) {
                Some((import, ImportBinding::Named { imported, .. }))
                    if is_core_specifier(&import.module_specifier, &self.core_module) =>
                {
                    decorator_kind(imported)
                }
                Some(_) => None,
                // A local declaration shadows the ambient decorator.
                None if file.find_local(&decorator.name).is_some() => None,
                None => decorator_kind(&decorator.name),
            },
        }
    }

    fn error(&self, code: ErrorCode, message: String, file: &SourceFile, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::Classification,
            code,
            message,
            file.file_name.clone(),
            span,
        )
    }
}

#[derive(Debug)]
struct CacheEntry {
    file: SourceFile,
    classifications: Vec<Classification>,
}

/// Per-file classification results, kept across program generations and
/// reused while a file stays structurally identical.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: HashMap<String, CacheEntry>,
    hits: usize,
    misses: usize,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify_file(
        &mut self,
        classifier: &DeclarationClassifier,
        file: &SourceFile,
    ) -> Vec<Classification> {
        if let Some(entry) = self.entries.get(&file.file_name) {
            if entry.file == *file {
                self.hits += 1;
                return entry.classifications.clone();
            }
        }

        self.misses += 1;
        let classifications = classifier.classify_file(file);
        self.entries.insert(
            file.file_name.clone(),
            CacheEntry {
                file: file.clone(),
                classifications: classifications.clone(),
            },
        );
        classifications
    }

    /// Drop entries for files no longer in the program.
    pub fn retain_files<'f>(&mut self, file_names: impl IntoIterator<Item = &'f str>) {
        let keep: std::collections::HashSet<&str> = file_names.into_iter().collect();
        self.entries.retain(|name, _| keep.contains(name.as_str()));
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
