pub mod core;
pub mod references;
pub mod registry;
