// Program Reflection Host
//
// `ReflectionHost` over a `ts::Program`: identifiers are followed through the
// import and export statements of the program's source files.

use super::host::{Declaration, Import, ReflectionHost, ResolvedIdentifier};
use crate::ngtsc::file_system::is_relative_specifier;
use crate::ngtsc::imports::OwningModule;
use std::collections::HashSet;
use ts::{ExportKind, ImportBinding, Program, SourceFile};

type Visited = HashSet<(String, String)>;

#[derive(Clone, Copy)]
pub struct ProgramReflectionHost<'a> {
    program: &'a dyn Program,
}

impl<'a> ProgramReflectionHost<'a> {
    pub fn new(program: &'a dyn Program) -> Self {
        Self { program }
    }

    pub fn program(&self) -> &'a dyn Program {
        self.program
    }

    fn identifier(
        &self,
        name: &str,
        file: &'a SourceFile,
        visited: &mut Visited,
    ) -> Option<ResolvedIdentifier<'a>> {
        if let Some(node) = file.find_local(name) {
            return Some(ResolvedIdentifier::Declaration(Declaration {
                via_module: None,
                file,
                node,
            }));
        }

        let (import, binding) = file.find_import(name)?;
        let via_module = (!is_relative_specifier(&import.module_specifier))
            .then(|| OwningModule::new(import.module_specifier.clone(), file.file_name.clone()));
        let imported = match binding {
            ImportBinding::Named { imported, .. } => Some(imported.clone()),
            ImportBinding::Default { .. } => Some("default".to_string()),
            ImportBinding::Namespace { .. } => None,
        };

        let target = match self.resolve_module(&import.module_specifier, &file.file_name) {
            Some(target) => target,
            None => {
                return Some(ResolvedIdentifier::External(Import {
                    name: imported,
                    from: import.module_specifier.clone(),
                }))
            }
        };

        match imported {
            None => Some(ResolvedIdentifier::Namespace(target)),
            Some(exported) => self
                .export(target, &exported, visited)
                .map(|resolved| resolved.with_via_module(via_module)),
        }
    }

    fn export(
        &self,
        file: &'a SourceFile,
        exported_name: &str,
        visited: &mut Visited,
    ) -> Option<ResolvedIdentifier<'a>> {
        if !visited.insert((file.file_name.clone(), exported_name.to_string())) {
            return None;
        }

        if let Some(node) = file.find_local(exported_name) {
            if node.is_exported() {
                return Some(ResolvedIdentifier::Declaration(Declaration {
                    via_module: None,
                    file,
                    node,
                }));
            }
        }

        for export in file.exports() {
            match (&export.kind, &export.module_specifier) {
                (ExportKind::Named(specifiers), source) => {
                    let Some(spec) = specifiers.iter().find(|s| s.exported == exported_name) else {
                        continue;
                    };
                    return match source {
                        None => self.identifier(&spec.local, file, visited),
                        Some(specifier) => {
                            let target = self.resolve_module(specifier, &file.file_name)?;
                            self.export(target, &spec.local, visited)
                        }
                    };
                }
                (ExportKind::Namespace(name), Some(specifier)) if name == exported_name => {
                    return self
                        .resolve_module(specifier, &file.file_name)
                        .map(ResolvedIdentifier::Namespace);
                }
                (ExportKind::All, Some(specifier)) => {
                    if let Some(target) = self.resolve_module(specifier, &file.file_name) {
                        if let Some(found) = self.export(target, exported_name, visited) {
                            return Some(found);
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl<'a> std::fmt::Debug for ProgramReflectionHost<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramReflectionHost")
            .field("files", &self.program.source_files().len())
            .finish()
    }
}

impl<'a> ReflectionHost<'a> for ProgramReflectionHost<'a> {
    fn source_file(&self, file_name: &str) -> Option<&'a SourceFile> {
        let program = self.program;
        program.source_file(file_name)
    }

    fn resolve_module(&self, specifier: &str, containing_file: &str) -> Option<&'a SourceFile> {
        let program = self.program;
        let file_name = program.resolve_module_name(specifier, containing_file)?;
        program.source_file(&file_name)
    }

    fn get_import_of_identifier(&self, name: &str, file: &'a SourceFile) -> Option<Import> {
        let (import, binding) = file.find_import(name)?;
        let name = match binding {
            ImportBinding::Named { imported, .. } => Some(imported.clone()),
            ImportBinding::Default { .. } => Some("default".to_string()),
            ImportBinding::Namespace { .. } => None,
        };
        Some(Import {
            name,
            from: import.module_specifier.clone(),
        })
    }

    fn get_declaration_of_identifier(
        &self,
        name: &str,
        file: &'a SourceFile,
    ) -> Option<ResolvedIdentifier<'a>> {
        self.identifier(name, file, &mut Visited::new())
    }

    fn get_export_of_module(
        &self,
        file: &'a SourceFile,
        exported_name: &str,
    ) -> Option<ResolvedIdentifier<'a>> {
        self.export(file, exported_name, &mut Visited::new())
    }
}
