// References
//
// A Reference is a handle to a top-level declaration of the program. Records
// that mention the same declaration share one `Reference` (see `ReferenceRegistry`).

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use ts::Span;

/// Uniqueness key of a declaration: declaring file plus declared name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolKey {
    pub file: String,
    pub name: String,
}

impl SymbolKey {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file, self.name)
    }
}

/// Information about the module that owns a particular reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwningModule {
    /// The module specifier (e.g., "@angular/core").
    pub specifier: String,
    /// The file in which the specifier was written.
    pub resolution_context: String,
}

impl OwningModule {
    pub fn new(specifier: impl Into<String>, resolution_context: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            resolution_context: resolution_context.into(),
        }
    }
}

#[derive(Debug)]
struct ReferenceInner {
    key: SymbolKey,
    span: Span,
    /// The best guess at a bare module specifier which exposes the declaration.
    ///
    /// Recorded the first time the declaration is reached through a non-relative
    /// import; `None` means it most likely belongs to the application itself.
    best_guess_owning_module: RefCell<Option<OwningModule>>,
}

/// Shared, read-only identity of a declaration.
///
/// Equality and hashing go through the `SymbolKey`; `ptr_eq` tells whether two
/// handles are the very same interned instance.
#[derive(Clone)]
pub struct Reference(Rc<ReferenceInner>);

impl Reference {
    pub fn new(file: impl Into<String>, name: impl Into<String>, span: Span) -> Self {
        Self::with_owning_module(SymbolKey::new(file, name), span, None)
    }

    pub fn with_owning_module(
        key: SymbolKey,
        span: Span,
        best_guess_owning_module: Option<OwningModule>,
    ) -> Self {
        Reference(Rc::new(ReferenceInner {
            key,
            span,
            best_guess_owning_module: RefCell::new(best_guess_owning_module),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.key.name
    }

    pub fn file(&self) -> &str {
        &self.0.key.file
    }

    pub fn key(&self) -> &SymbolKey {
        &self.0.key
    }

    pub fn span(&self) -> Span {
        self.0.span
    }

    pub fn best_guess_owning_module(&self) -> Option<OwningModule> {
        self.0.best_guess_owning_module.borrow().clone()
    }

    /// Record `owner` unless an owning module is already known.
    pub(crate) fn note_owning_module(&self, owner: OwningModule) {
        let mut current = self.0.best_guess_owning_module.borrow_mut();
        if current.is_none() {
            *current = Some(owner);
        }
    }

    pub fn ptr_eq(a: &Reference, b: &Reference) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        Reference::ptr_eq(self, other) || self.0.key == other.0.key
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key.hash(state);
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference({})", self.0.key)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Reference", 3)?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("filePath", self.file())?;
        state.serialize_field(
            "moduleName",
            &self.best_guess_owning_module().map(|m| m.specifier),
        )?;
        state.end()
    }
}
