pub mod in_memory;
pub mod loader;
pub mod oxc_frontend;
