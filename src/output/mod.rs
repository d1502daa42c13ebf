//! Output formatting module
//!
//! Provides two output formats:
//! - Terminal text with colors
//! - JSON reports

pub mod json;
pub mod terminal;

pub use json::{print_json, JsonError, JsonOutput};
pub use terminal::{
    print_chain_summary, print_error, print_header, print_info, print_success, print_warning,
};
