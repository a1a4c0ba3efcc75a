//! Path helpers
//!
//! Program file names and resource paths are plain POSIX-style strings; these
//! helpers keep them normalized so they can be compared as identity keys.

pub mod src;

#[cfg(test)]
mod test;

pub use src::*;
