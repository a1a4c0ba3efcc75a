//! Resources
//!
//! Loading of component templates and stylesheets referenced by
//! `templateUrl` / `styleUrls`.

pub mod src;

#[cfg(test)]
mod test;

pub use src::cache::ResourceCache;
pub use src::loader::{
    FileResourceResolver, InMemoryResourceResolver, ResourceError, ResourceResolver,
};
