// URL handling utilities
pub mod url_parser;
pub mod url_builder;
pub mod query_string;

// Parsing utilities
pub mod labels;
pub mod parse_flag;
pub mod parse_int;

// Formatting utilities
pub mod json_converter;
pub mod status_formatter;

// Re-export all utilities for convenient access
pub use url_parser::{hostname_from_url, safe_next};
pub use url_builder::absolute_url;
pub use query_string::build_query_string;
pub use labels::{non_empty_lines, parse_labels};
pub use parse_flag::parse_flag;
pub use parse_int::parse_optional_u32;
pub use json_converter::display_json;
pub use status_formatter::{format_timestamp, status_badge_class};
