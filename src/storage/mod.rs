mod cache;
mod types;

pub use cache::TtlCache;
pub(crate) use types::iso8601;
pub use types::{
    Article, CacheError, CacheSnapshot, DEFAULT_CATEGORY, MAX_SNIPPET_CHARS, UNTITLED,
};
