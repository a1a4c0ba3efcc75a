// Reference Registry
//
// Interning table for declaration references. Two `intern` calls for the same
// (file, name) pair return the same instance, which is what keeps a module
// reached through several import chains from being analyzed twice.

use super::core::DeclarationKind;
use super::references::{OwningModule, Reference, SymbolKey};
use indexmap::IndexMap;
use std::cell::RefCell;
use ts::Span;

#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    references: RefCell<IndexMap<SymbolKey, Reference>>,
    kinds: RefCell<IndexMap<SymbolKey, DeclarationKind>>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical reference for the declaration `name` in `file`.
    pub fn intern(&self, file: &str, name: &str, span: Span) -> Reference {
        self.intern_with_owner(file, name, span, None)
    }

    /// Like `intern`, additionally noting the bare module the declaration was reached through.
    pub fn intern_with_owner(
        &self,
        file: &str,
        name: &str,
        span: Span,
        owner: Option<OwningModule>,
    ) -> Reference {
        let key = SymbolKey::new(file, name);
        if let Some(existing) = self.references.borrow().get(&key) {
            if let Some(owner) = owner {
                existing.note_owning_module(owner);
            }
            return existing.clone();
        }
        let reference = Reference::with_owning_module(key.clone(), span, owner);
        self.references.borrow_mut().insert(key, reference.clone());
        reference
    }

    pub fn get(&self, key: &SymbolKey) -> Option<Reference> {
        self.references.borrow().get(key).cloned()
    }

    /// Record the kind the classifier assigned to `reference`.
    pub fn register_kind(&self, reference: &Reference, kind: DeclarationKind) {
        self.kinds.borrow_mut().insert(reference.key().clone(), kind);
    }

    pub fn kind_of(&self, reference: &Reference) -> Option<DeclarationKind> {
        self.kinds.borrow().get(reference.key()).copied()
    }

    /// Registered references of `kind` matching `predicate`, in registration order.
    pub fn lookup(&self, kind: DeclarationKind, predicate: impl Fn(&Reference) -> bool) -> Vec<Reference> {
        let references = self.references.borrow();
        self.kinds
            .borrow()
            .iter()
            .filter(|(_, k)| **k == kind)
            .filter_map(|(key, _)| references.get(key))
            .filter(|reference| predicate(reference))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.references.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.borrow().is_empty()
    }
}
