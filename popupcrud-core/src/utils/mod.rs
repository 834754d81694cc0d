//! Utility functions

mod cookie;
mod log_sanitizer;

pub use cookie::read_cookie;
pub use log_sanitizer::truncate_for_log;
