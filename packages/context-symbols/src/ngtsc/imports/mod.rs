//! Imports
//!
//! Declaration identity. A `Reference` names one top-level declaration by the
//! file that declares it and its declared name; the `ReferenceRegistry` hands out
//! exactly one live `Reference` per such key for the lifetime of a build.

pub mod src;


pub use src::core::*;
pub use src::references::{OwningModule, Reference, SymbolKey};
pub use src::registry::ReferenceRegistry;
