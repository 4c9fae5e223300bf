// Keyword feed module.
// Provides the HTTP client and types for the trending keyword endpoint.

pub mod client;
pub mod types;

pub use client::{FeedClient, Fetch};
pub use types::{KeywordEntry, MAX_ENTRIES, WidgetSnapshot, parse_entries};
