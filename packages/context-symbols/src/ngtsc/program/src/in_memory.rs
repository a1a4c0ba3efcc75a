// In-memory Program
//
// A `ts::Program` over already parsed source files. Relative specifiers are
// resolved against the importing file, bare specifiers through explicit path
// mappings first and then through `node_modules` directories walking upwards.

use super::oxc_frontend::{parse_source_file, ParseError};
use crate::ngtsc::file_system::{
    candidate_file_names, dirname, is_relative_specifier, join, resolve_relative_to_file,
};
use indexmap::IndexMap;
use ts::{Program, SourceFile};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProgram {
    files: Vec<SourceFile>,
    path_mappings: IndexMap<String, String>,
}

impl InMemoryProgram {
    pub fn new(files: Vec<SourceFile>) -> Self {
        Self {
            files,
            path_mappings: IndexMap::new(),
        }
    }

    /// Parse `(file_name, source_text)` pairs, in order.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ParseError> {
        let files = sources
            .into_iter()
            .map(|(file_name, text)| parse_source_file(file_name, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(files))
    }

    /// Resolve the bare `specifier` to `file_name` (like a tsconfig `paths` entry).
    pub fn with_path_mapping(mut self, specifier: impl Into<String>, file_name: impl Into<String>) -> Self {
        self.path_mappings.insert(specifier.into(), file_name.into());
        self
    }

    pub fn add_file(&mut self, file: SourceFile) {
        match self.files.iter_mut().find(|f| f.file_name == file.file_name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    fn has_file(&self, file_name: &str) -> bool {
        self.files.iter().any(|f| f.file_name == file_name)
    }

    fn first_existing(&self, path: &str) -> Option<String> {
        candidate_file_names(path)
            .into_iter()
            .find(|candidate| self.has_file(candidate))
    }

    fn resolve_in_node_modules(&self, specifier: &str, containing_file: &str) -> Option<String> {
        let mut dir = dirname(containing_file);
        loop {
            let package = join(&dir, &format!("node_modules/{}", specifier));
            if let Some(found) = self.first_existing(&package) {
                return Some(found);
            }
            let parent = dirname(&dir);
            if parent == dir {
                return None;
            }
            dir = parent;
        }
    }
}

impl Program for InMemoryProgram {
    fn source_files(&self) -> &[SourceFile] {
        &self.files
    }

    fn resolve_module_name(&self, specifier: &str, containing_file: &str) -> Option<String> {
        if is_relative_specifier(specifier) {
            return self.first_existing(&resolve_relative_to_file(containing_file, specifier));
        }
        if let Some(mapped) = self.path_mappings.get(specifier) {
            return self.first_existing(mapped);
        }
        self.resolve_in_node_modules(specifier, containing_file)
    }
}
