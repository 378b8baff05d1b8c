//! Display module for terminal output formatting.

pub mod message;

pub use message::{print_error, print_info, print_success, MessageDisplay};
