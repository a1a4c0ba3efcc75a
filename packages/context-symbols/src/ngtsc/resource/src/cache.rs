// Resource Cache
//
// Memoizes resolver results so each distinct path is requested once.

use super::loader::{ResourceError, ResourceResolver};
use crate::ngtsc::file_system::clean_path;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub struct ResourceCache {
    resolver: Rc<dyn ResourceResolver>,
    /// Failures are cached too.
    entries: RefCell<HashMap<String, Result<String, ResourceError>>>,
}

impl ResourceCache {
    pub fn new(resolver: Rc<dyn ResourceResolver>) -> Self {
        Self {
            resolver,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub fn load(&self, path: &str) -> Result<String, ResourceError> {
        let key = clean_path(path);
        if let Some(cached) = self.entries.borrow().get(&key) {
            return cached.clone();
        }
        let loaded = self.resolver.resolve(&key);
        self.entries.borrow_mut().insert(key, loaded.clone());
        loaded
    }

    /// Number of distinct paths requested so far.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.entries.borrow().len())
            .finish()
    }
}
