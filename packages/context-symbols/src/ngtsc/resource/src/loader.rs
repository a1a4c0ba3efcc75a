// Resource Loader
//
// Resolves external resources (templates, styles) by path.

use crate::ngtsc::file_system::{clean_path, join, normalize_separators};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Resource load error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

impl ResourceError {
    pub fn not_found(path: &str) -> Self {
        ResourceError::NotFound {
            path: path.to_string(),
        }
    }

    pub fn load_failed(path: &str, reason: impl Into<String>) -> Self {
        ResourceError::LoadFailed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ResourceError::NotFound { path } | ResourceError::LoadFailed { path, .. } => path,
        }
    }
}

/// Turns a resolved resource path into its text content.
pub trait ResourceResolver {
    fn resolve(&self, path: &str) -> Result<String, ResourceError>;
}

/// In-memory resource resolver.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceResolver {
    resources: HashMap<String, String>,
}

impl InMemoryResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: &str, content: &str) {
        self.resources.insert(clean_path(path), content.to_string());
    }

    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.add(path, content);
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.resources.contains_key(&clean_path(path))
    }
}

impl ResourceResolver for InMemoryResourceResolver {
    fn resolve(&self, path: &str) -> Result<String, ResourceError> {
        self.resources
            .get(&clean_path(path))
            .cloned()
            .ok_or_else(|| ResourceError::not_found(path))
    }
}

/// File-based resource resolver. Relative paths are read below `root_dir`.
#[derive(Debug, Clone)]
pub struct FileResourceResolver {
    root_dir: String,
}

impl FileResourceResolver {
    pub fn new(root_dir: impl AsRef<Path>) -> Self {
        Self {
            root_dir: normalize_separators(&root_dir.as_ref().to_string_lossy()),
        }
    }

    fn full_path(&self, path: &str) -> String {
        join(&self.root_dir, path)
    }
}

impl ResourceResolver for FileResourceResolver {
    fn resolve(&self, path: &str) -> Result<String, ResourceError> {
        let full_path = self.full_path(path);
        if !Path::new(&full_path).exists() {
            return Err(ResourceError::not_found(path));
        }
        std::fs::read_to_string(&full_path).map_err(|e| ResourceError::load_failed(path, e.to_string()))
    }
}
