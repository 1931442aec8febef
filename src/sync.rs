//! External state stores for page-window tokens.
//!
//! Pagination state is the one piece of table state that outlives a
//! component instance: it lives in navigation state (a query string)
//! keyed by the table's `name`, so two tables on the same screen never
//! collide. The [`PageWindowStore`] trait makes that binding explicit,
//! with a read step that parses and a write step that serializes,
//! instead of scattering token handling across components.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: a plain in-process map, for tests and hosts that
//!   manage navigation state elsewhere.
//! - [`QueryStringStore`]: owns a percent-encoded query string such as
//!   `products=20-10&orders=0-25`, preserving unrelated keys and their
//!   order across writes.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::sync::{PageWindowStore, QueryStringStore};
//!
//! let mut store = QueryStringStore::from_query("products=20-10&tab=all");
//! assert_eq!(store.read("products").as_deref(), Some("20-10"));
//!
//! store.write("products", "30-10");
//! assert_eq!(store.query(), "products=30-10&tab=all");
//! ```

use std::collections::HashMap;

/// A named slot of externally owned pagination state.
///
/// Reads happen on mount and whenever the host signals that navigation
/// state changed; the store is authoritative on read. Writes happen when
/// the user navigates, and round-trip through the same token format.
pub trait PageWindowStore {
    /// Returns the raw token stored under `name`, if any.
    fn read(&self, name: &str) -> Option<String>;

    /// Stores `token` under `name`, replacing any previous value.
    fn write(&mut self, name: &str, token: &str);
}

/// In-process [`PageWindowStore`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageWindowStore for MemoryStore {
    fn read(&self, name: &str) -> Option<String> {
        self.entries.get(name).cloned()
    }

    fn write(&mut self, name: &str, token: &str) {
        self.entries.insert(name.to_string(), token.to_string());
    }
}

/// [`PageWindowStore`] over a percent-encoded query string.
///
/// Keys and values are decoded on parse and re-encoded on
/// serialization. Unrelated keys are preserved in their original order;
/// writes to an existing key update it in place, writes to a new key
/// append it.
#[derive(Debug, Clone, Default)]
pub struct QueryStringStore {
    pairs: Vec<(String, String)>,
}

impl QueryStringStore {
    /// Creates a store with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string of `key=value` pairs separated by `&`.
    ///
    /// Segments without a `=` become keys with empty values. Percent
    /// escapes that fail to decode are kept verbatim.
    pub fn from_query(query: &str) -> Self {
        let pairs = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((k, v)) => (decode_component(k), decode_component(v)),
                None => (decode_component(segment), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// Serializes the current parameters back to a query string.
    pub fn query(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode_component(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

impl PageWindowStore for QueryStringStore {
    fn read(&self, name: &str) -> Option<String> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn write(&mut self, name: &str, token: &str) {
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| k == name) {
            pair.1 = token.to_string();
        } else {
            self.pairs.push((name.to_string(), token.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("products"), None);
        store.write("products", "20-10");
        assert_eq!(store.read("products").as_deref(), Some("20-10"));
        store.write("products", "30-10");
        assert_eq!(store.read("products").as_deref(), Some("30-10"));
    }

    #[test]
    fn test_query_string_parse_and_read() {
        let store = QueryStringStore::from_query("products=20-10&orders=0-25");
        assert_eq!(store.read("products").as_deref(), Some("20-10"));
        assert_eq!(store.read("orders").as_deref(), Some("0-25"));
        assert_eq!(store.read("missing"), None);
    }

    #[test]
    fn test_query_string_preserves_unrelated_keys() {
        let mut store = QueryStringStore::from_query("tab=all&products=20-10&view=grid");
        store.write("products", "40-10");
        assert_eq!(store.query(), "tab=all&products=40-10&view=grid");
    }

    #[test]
    fn test_query_string_appends_new_keys() {
        let mut store = QueryStringStore::from_query("tab=all");
        store.write("orders", "0-25");
        assert_eq!(store.query(), "tab=all&orders=0-25");
    }

    #[test]
    fn test_query_string_percent_encoding() {
        let mut store = QueryStringStore::new();
        store.write("my table", "0-10");
        assert_eq!(store.query(), "my%20table=0-10");
        let reparsed = QueryStringStore::from_query(&store.query());
        assert_eq!(reparsed.read("my table").as_deref(), Some("0-10"));
    }

    #[test]
    fn test_query_string_valueless_segment() {
        let store = QueryStringStore::from_query("flag&products=0-10");
        assert_eq!(store.read("flag").as_deref(), Some(""));
        assert_eq!(store.read("products").as_deref(), Some("0-10"));
    }
}
