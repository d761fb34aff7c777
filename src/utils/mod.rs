// URL handling utilities
pub mod url_parser;
pub mod query_string;

// Parsing utilities
pub mod parse_flag;
pub mod split_list;

// Re-export all utilities for convenient access
pub use url_parser::hostname_from_url;
pub use query_string::build_query_string;
pub use parse_flag::parse_flag;
pub use split_list::split_list;
