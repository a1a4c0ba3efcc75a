//! Angular static analysis (ngtsc-style layout)
//!
//! Each area keeps its implementation under `<area>/src` and its unit tests in
//! `<area>/test.rs`.

pub mod core;
pub mod diagnostics;
pub mod file_system;
pub mod imports;
pub mod logging;
pub mod metadata;
pub mod partial_evaluator;
pub mod program;
pub mod reflection;
pub mod resource;
pub mod scope;
