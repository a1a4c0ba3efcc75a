pub mod error;
pub mod error_code;
