//! Utility functions for common operations.
//!
//! - **Text processing**: Unicode-aware width calculation and truncation,
//!   char-bounded snippet truncation, control-character stripping
//! - **Files**: atomic write-then-rename
//! - **URL validation**: scheme checks before opening links in a browser

mod fs;
mod text;
mod url_validator;

pub use fs::write_atomic;
pub use text::{
    display_width, flatten_whitespace, strip_control_chars, truncate_chars, truncate_to_width,
};
pub use url_validator::{validate_url_for_open, UrlValidationError};

/// Maximum allowed search query length in the UI.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
