//! Logging
//!
//! Analysis reports progress and recoverable problems through an injected
//! `Logger`; the library never prints on its own.

pub mod src;


pub use src::console_logger::ConsoleLogger;
pub use src::logger::{CapturingLogger, LogLevel, Logger, NullLogger};
