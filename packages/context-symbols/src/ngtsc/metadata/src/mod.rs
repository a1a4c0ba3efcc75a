pub mod api;
pub mod provider;
pub mod resolver;
pub mod util;
