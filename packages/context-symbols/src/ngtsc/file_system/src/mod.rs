pub mod util;

pub use util::*;
