pub mod classifier;
pub mod host;
pub mod program_host;
