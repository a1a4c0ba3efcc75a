use crate::ngtsc::imports::OwningModule;
use ts::{LocalDeclaration, SourceFile};

/// The import through which an identifier was brought into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Exported name in the source module; `None` for a namespace import.
    pub name: Option<String>,
    /// Module specifier as written.
    pub from: String,
}

/// A top-level declaration an identifier resolved to.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    /// Bare module specifier through which the declaration was reached, if any.
    pub via_module: Option<OwningModule>,
    pub file: &'a SourceFile,
    pub node: LocalDeclaration<'a>,
}

impl<'a> Declaration<'a> {
    pub fn name(&self) -> &'a str {
        self.node.name()
    }

    fn with_via_module(mut self, via_module: Option<OwningModule>) -> Self {
        if via_module.is_some() {
            self.via_module = via_module;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub enum ResolvedIdentifier<'a> {
    Declaration(Declaration<'a>),
    /// `import * as ns` / `export * as ns`: the module itself.
    Namespace(&'a SourceFile),
    /// Imported from a module that is not part of the program.
    External(Import),
}

impl<'a> ResolvedIdentifier<'a> {
    pub(crate) fn with_via_module(self, via_module: Option<OwningModule>) -> Self {
        match self {
            ResolvedIdentifier::Declaration(decl) => {
                ResolvedIdentifier::Declaration(decl.with_via_module(via_module))
            }
            other => other,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration<'a>> {
        match self {
            ResolvedIdentifier::Declaration(decl) => Some(decl),
            _ => None,
        }
    }
}

/// Abstracts symbol lookups over the program's declaration tree.
pub trait ReflectionHost<'a> {
    fn source_file(&self, file_name: &str) -> Option<&'a SourceFile>;

    /// Source file a module specifier written in `containing_file` refers to.
    fn resolve_module(&self, specifier: &str, containing_file: &str) -> Option<&'a SourceFile>;

    /// The import binding that introduces `name` in `file`, without following it.
    fn get_import_of_identifier(&self, name: &str, file: &'a SourceFile) -> Option<Import>;

    /// Follow `name` as seen from `file` to the declaration that introduces it,
    /// through import aliases, barrel files and `export *`.
    fn get_declaration_of_identifier(
        &self,
        name: &str,
        file: &'a SourceFile,
    ) -> Option<ResolvedIdentifier<'a>>;

    /// What `file` exports under `exported_name`.
    fn get_export_of_module(
        &self,
        file: &'a SourceFile,
        exported_name: &str,
    ) -> Option<ResolvedIdentifier<'a>>;
}
