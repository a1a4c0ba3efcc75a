use crate::node::SourceFile;
use std::fmt::Debug;

/// A compiled program as seen by static analysis.
///
/// Implementations own the parsed source files and know how module specifiers
/// map onto them. Everything else (identifier binding, export lookup) is derived
/// by the analysis from these two capabilities.
pub trait Program: Debug {
    /// All source files, in the order the compilation discovered them.
    fn source_files(&self) -> &[SourceFile];

    fn source_file(&self, file_name: &str) -> Option<&SourceFile> {
        self.source_files().iter().find(|sf| sf.file_name == file_name)
    }

    /// Resolve `specifier` as written in `containing_file` to the file name of a
    /// source file of this program. `None` when the module is outside the program.
    fn resolve_module_name(&self, specifier: &str, containing_file: &str) -> Option<String>;

    fn root_file_names(&self) -> Vec<String> {
        self.source_files().iter().map(|sf| sf.file_name.clone()).collect()
    }
}
