//! Pagination coordinator for data tables.
//!
//! This component tracks the current page window and renders pagination
//! info; it does not render page content. It reconciles three inputs:
//! the page window held in an external [`PageWindowStore`] (authoritative
//! on read, written back on navigation), the locally known row counts,
//! and user navigation keys.
//!
//! Two data modes exist. In *manual* mode the host's row slice already
//! represents exactly the current page and a server-known `total_rows`
//! drives the page count. Otherwise the full dataset is assumed to be in
//! memory and the page count derives from the local row count, with the
//! table slicing rows itself.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::paginator::Model;
//! use datatable_widgets::sync::{MemoryStore, PageWindowStore};
//!
//! let mut store = MemoryStore::new();
//! store.write("products", "20-10");
//!
//! let mut paginator = Model::new()
//!     .with_name("products")
//!     .with_per_page(10)
//!     .with_total_items(95);
//!
//! paginator.sync_from_store(&store);
//! assert_eq!(paginator.page, 2);
//!
//! paginator.next_page();
//! paginator.write_to_store(&mut store);
//! assert_eq!(store.read("products").as_deref(), Some("30-10"));
//! ```

use crate::key::{self, KeyMap as KeyMapTrait};
use crate::pagewindow::PageWindow;
use crate::sync::PageWindowStore;
use bubbletea_rs::{KeyMsg, Msg};

/// Number of inline page slots before the page list starts eliding.
const DISPLAY_BUDGET: usize = 5;

/// The type of pagination to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Type {
    /// Display pagination as Arabic numerals (e.g., "3/10").
    #[default]
    Arabic,
    /// Display an inline page-number list with elision (e.g.,
    /// "1 … 4 [5] 6 … 12").
    Numbers,
}

/// Key bindings for paginator navigation.
///
/// Implements the `key::KeyMap` trait so the bindings surface in help
/// views.
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    /// Key binding for navigating to the previous page.
    /// Default keys: PageUp, Left Arrow, 'h'
    pub prev_page: key::Binding,
    /// Key binding for navigating to the next page.
    /// Default keys: PageDown, Right Arrow, 'l'
    pub next_page: key::Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", "left", "h"]),
                key::with_help("←/h", "prev page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "right", "l"]),
                key::with_help("→/l", "next page"),
            ]),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev_page, &self.next_page]]
    }
}

/// One slot in the rendered page list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageItem {
    /// An inline page, by zero-based index.
    Page(usize),
    /// An elision marker carrying the zero-based pages it hides, for
    /// hosts that render them as a dropdown.
    Ellipsis(Vec<usize>),
}

/// Pagination coordinator model.
///
/// Pages are zero-based internally and rendered one-based.
///
/// # Examples
///
/// ```rust
/// use datatable_widgets::paginator::Model;
///
/// // Client mode: 95 in-memory rows, 10 per page.
/// let paginator = Model::new().with_per_page(10).with_total_items(95);
/// assert_eq!(paginator.total_pages, 10);
/// assert!(!paginator.manual());
///
/// // Manual mode: the host holds one page of rows, the server knows
/// // the total.
/// let paginator = Model::new().with_per_page(25).with_total_rows(120);
/// assert_eq!(paginator.total_pages, 5);
/// assert!(paginator.manual());
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    /// The type of pagination to display.
    pub paginator_type: Type,
    /// The current page.
    pub page: usize,
    /// The number of items per page.
    pub per_page: usize,
    /// The total number of pages. Never below 1.
    pub total_pages: usize,
    /// The format string for Arabic mode (e.g., "%d/%d").
    pub arabic_format: String,
    /// Key bindings.
    pub keymap: PaginatorKeyMap,

    name: String,
    total_rows: Option<usize>,
    manual_override: Option<bool>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            paginator_type: Type::default(),
            page: 0,
            per_page: 1,
            total_pages: 1,
            arabic_format: "%d/%d".to_string(),
            keymap: PaginatorKeyMap::default(),
            name: String::new(),
            total_rows: None,
            manual_override: None,
        }
    }
}

impl Model {
    /// Creates a coordinator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store key this table's page window lives under
    /// (builder pattern). Two tables sharing a store must use distinct
    /// names.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The store key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the number of items per page, clamped to a minimum of 1
    /// (builder pattern).
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.set_per_page(per_page);
        self
    }

    /// Sets the number of items per page, clamped to a minimum of 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
    }

    /// Sets the local (client-mode) item count and derives the page
    /// count from it (builder pattern).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::paginator::Model;
    ///
    /// let paginator = Model::new().with_per_page(10).with_total_items(95);
    /// assert_eq!(paginator.total_pages, 10);
    /// ```
    pub fn with_total_items(mut self, items: usize) -> Self {
        self.set_total_items(items);
        self
    }

    /// Sets the local item count and recalculates the page count.
    ///
    /// The result is always at least 1, even for 0 items. If the
    /// current page falls out of bounds it is adjusted to the last
    /// valid page. In manual mode the server-known row count takes
    /// precedence and this call only re-clamps.
    pub fn set_total_items(&mut self, items: usize) {
        if self.manual() {
            self.recompute_pages();
            return;
        }
        self.total_pages = page_count(items, self.per_page);
        self.clamp_page();
    }

    /// Sets the server-known total row count, switching the
    /// coordinator to manual mode unless overridden (builder pattern).
    pub fn with_total_rows(mut self, rows: usize) -> Self {
        self.set_total_rows(rows);
        self
    }

    /// Sets the server-known total row count and recalculates the page
    /// count from it.
    pub fn set_total_rows(&mut self, rows: usize) {
        self.total_rows = Some(rows);
        self.recompute_pages();
    }

    /// Forces manual (server-side) or client-side pagination,
    /// overriding the mode inferred from `total_rows` (builder
    /// pattern).
    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual_override = Some(manual);
        self
    }

    /// True when the row slice handed to the table already represents
    /// only the current page: an explicit override wins, otherwise a
    /// supplied `total_rows` implies manual mode.
    pub fn manual(&self) -> bool {
        self.manual_override.unwrap_or(self.total_rows.is_some())
    }

    fn recompute_pages(&mut self) {
        if let Some(rows) = self.total_rows {
            self.total_pages = page_count(rows, self.per_page);
            self.clamp_page();
        }
    }

    fn clamp_page(&mut self) {
        if self.page >= self.total_pages {
            self.page = self.total_pages.saturating_sub(1);
        }
    }

    /// The current page window.
    pub fn window(&self) -> PageWindow {
        PageWindow::from_index(self.page, self.per_page)
    }

    /// Overwrites in-memory pagination state from the store when the
    /// two disagree. The store is authoritative on read; absent or
    /// malformed tokens decode to the first page at the current page
    /// size.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::paginator::Model;
    /// use datatable_widgets::sync::{MemoryStore, PageWindowStore};
    ///
    /// let mut store = MemoryStore::new();
    /// store.write("t", "50-25");
    /// let mut paginator = Model::new().with_name("t").with_per_page(10);
    /// paginator.sync_from_store(&store);
    /// assert_eq!((paginator.page, paginator.per_page), (2, 25));
    /// ```
    pub fn sync_from_store(&mut self, store: &dyn PageWindowStore) {
        let decoded = PageWindow::decode(store.read(&self.name).as_deref(), self.per_page);
        if decoded != self.window() {
            self.per_page = decoded.size;
            self.page = decoded.index();
        }
    }

    /// Writes the current page window to the store under this table's
    /// name. Reads round-trip through the same decode path.
    pub fn write_to_store(&self, store: &mut dyn PageWindowStore) {
        store.write(&self.name, &self.window().encode());
    }

    /// Returns the number of items on the current page, which may be
    /// less than `per_page` on the last page.
    pub fn items_on_page(&self, total_items: usize) -> usize {
        if total_items == 0 {
            return 0;
        }
        let (start, end) = self.get_slice_bounds(total_items);
        end - start
    }

    /// Calculates slice bounds for the current page.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::paginator::Model;
    ///
    /// let mut paginator = Model::new().with_per_page(10).with_total_items(100);
    /// paginator.page = 2;
    /// assert_eq!(paginator.get_slice_bounds(100), (20, 30));
    /// ```
    pub fn get_slice_bounds(&self, length: usize) -> (usize, usize) {
        let start = (self.page * self.per_page).min(length);
        let end = (start + self.per_page).min(length);
        (start, end)
    }

    /// Navigates to the previous page; no-op on the first page.
    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
        }
    }

    /// Navigates to the next page; no-op on the last page.
    pub fn next_page(&mut self) {
        if !self.on_last_page() {
            self.page += 1;
        }
    }

    /// Returns true if the paginator is on the first page.
    pub fn on_first_page(&self) -> bool {
        self.page == 0
    }

    /// Returns true if the paginator is on the last page.
    pub fn on_last_page(&self) -> bool {
        self.page == self.total_pages.saturating_sub(1)
    }

    /// Updates the paginator from key messages.
    pub fn update(&mut self, msg: &Msg) {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.next_page.matches(key_msg) {
                self.next_page();
            } else if self.keymap.prev_page.matches(key_msg) {
                self.prev_page();
            }
        }
    }

    /// Like [`update`](Self::update), but pushes the new page window to
    /// the store when navigation changed the page.
    pub fn update_with_store(&mut self, msg: &Msg, store: &mut dyn PageWindowStore) {
        let before = self.page;
        self.update(msg);
        if self.page != before {
            self.write_to_store(store);
        }
    }

    /// Builds the page list for UI rendering.
    ///
    /// The first and last page are always present, along with a
    /// contiguous `current-1 ..= current+1` window. When the total
    /// exceeds the five inline slots, skipped runs compress into
    /// [`PageItem::Ellipsis`] markers carrying the hidden page numbers.
    /// Totals of at most seven pages render fully inline.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::paginator::{Model, PageItem};
    ///
    /// let mut paginator = Model::new().with_per_page(10).with_total_items(120);
    /// paginator.page = 5;
    /// let items = paginator.page_items();
    /// assert_eq!(items[0], PageItem::Page(0));
    /// assert_eq!(items[1], PageItem::Ellipsis(vec![1, 2, 3]));
    /// assert_eq!(&items[2..5], &[PageItem::Page(4), PageItem::Page(5), PageItem::Page(6)]);
    /// assert_eq!(items[5], PageItem::Ellipsis(vec![7, 8, 9, 10]));
    /// assert_eq!(items[6], PageItem::Page(11));
    /// ```
    pub fn page_items(&self) -> Vec<PageItem> {
        let total = self.total_pages;
        if total <= DISPLAY_BUDGET + 2 {
            return (0..total).map(PageItem::Page).collect();
        }

        let last = total - 1;
        let window_start = self.page.saturating_sub(1);
        let window_end = (self.page + 1).min(last);
        let inline =
            |p: usize| p == 0 || p == last || (window_start..=window_end).contains(&p);

        let mut items = Vec::new();
        let mut skipped = Vec::new();
        for p in 0..total {
            if inline(p) {
                if !skipped.is_empty() {
                    items.push(PageItem::Ellipsis(std::mem::take(&mut skipped)));
                }
                items.push(PageItem::Page(p));
            } else {
                skipped.push(p);
            }
        }
        items
    }

    /// Renders the paginator as a string.
    ///
    /// Renders nothing when there is at most one page (including the
    /// state before any row count is known) rather than a degenerate
    /// single-page control.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use datatable_widgets::paginator::{Model, Type};
    ///
    /// let mut paginator = Model::new().with_per_page(10).with_total_items(50);
    /// assert_eq!(paginator.view(), "1/5");
    ///
    /// paginator.paginator_type = Type::Numbers;
    /// assert_eq!(paginator.view(), "[1] 2 3 4 5");
    ///
    /// let empty = Model::new().with_per_page(10).with_total_items(7);
    /// assert_eq!(empty.view(), "");
    /// ```
    pub fn view(&self) -> String {
        if self.total_pages <= 1 {
            return String::new();
        }
        match self.paginator_type {
            Type::Arabic => self.arabic_view(),
            Type::Numbers => self.numbers_view(),
        }
    }

    fn arabic_view(&self) -> String {
        self.arabic_format
            .replacen("%d", &(self.page + 1).to_string(), 1)
            .replacen("%d", &self.total_pages.to_string(), 1)
    }

    fn numbers_view(&self) -> String {
        self.page_items()
            .iter()
            .map(|item| match item {
                PageItem::Page(p) if *p == self.page => format!("[{}]", p + 1),
                PageItem::Page(p) => (p + 1).to_string(),
                PageItem::Ellipsis(_) => "…".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn page_count(rows: usize, per_page: usize) -> usize {
    if rows == 0 {
        1
    } else {
        rows.div_ceil(per_page.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MemoryStore;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key_msg(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_page_count_floor_of_one() {
        for rows in [0usize, 1, 9, 10, 11, 95] {
            let paginator = Model::new().with_per_page(10).with_total_items(rows);
            assert!(paginator.total_pages >= 1, "rows {rows}");
        }
        assert_eq!(Model::new().with_per_page(10).with_total_items(95).total_pages, 10);
    }

    #[test]
    fn test_manual_mode_inferred_from_total_rows() {
        let paginator = Model::new().with_per_page(10);
        assert!(!paginator.manual());
        let paginator = paginator.with_total_rows(200);
        assert!(paginator.manual());
        assert_eq!(paginator.total_pages, 20);
    }

    #[test]
    fn test_manual_override_beats_inference() {
        let paginator = Model::new().with_total_rows(200).with_manual(false);
        assert!(!paginator.manual());
        let paginator = Model::new().with_manual(true);
        assert!(paginator.manual());
    }

    #[test]
    fn test_manual_mode_ignores_local_count() {
        // The local slice holds one page of rows; the server total
        // drives the page count.
        let mut paginator = Model::new().with_per_page(10).with_total_rows(95);
        paginator.set_total_items(10);
        assert_eq!(paginator.total_pages, 10);
    }

    #[test]
    fn test_out_of_bounds_page_clamped_when_counts_shrink() {
        let mut paginator = Model::new().with_per_page(10).with_total_items(100);
        paginator.page = 9;
        paginator.set_total_items(45);
        assert_eq!(paginator.page, 4);
    }

    #[test]
    fn test_store_is_authoritative_on_read() {
        let mut store = MemoryStore::new();
        store.write("t", "20-10");
        let mut paginator = Model::new().with_name("t").with_per_page(25);
        paginator.sync_from_store(&store);
        assert_eq!((paginator.page, paginator.per_page), (2, 10));
    }

    #[test]
    fn test_malformed_token_degrades_to_defaults() {
        let mut store = MemoryStore::new();
        store.write("t", "garbage");
        let mut paginator = Model::new().with_name("t").with_per_page(25);
        paginator.page = 3;
        paginator.sync_from_store(&store);
        assert_eq!((paginator.page, paginator.per_page), (0, 25));
    }

    #[test]
    fn test_navigation_writes_through_round_trip() {
        let mut store = MemoryStore::new();
        let mut paginator = Model::new()
            .with_name("t")
            .with_per_page(10)
            .with_total_items(100);

        paginator.update_with_store(&key_msg(KeyCode::Right), &mut store);
        assert_eq!(store.read("t").as_deref(), Some("10-10"));

        // Round-trip: a fresh coordinator reading the store lands on
        // the same page.
        let mut other = Model::new().with_name("t").with_per_page(10);
        other.sync_from_store(&store);
        assert_eq!(other.page, 1);
    }

    #[test]
    fn test_boundary_navigation_writes_nothing() {
        let mut store = MemoryStore::new();
        let mut paginator = Model::new()
            .with_name("t")
            .with_per_page(10)
            .with_total_items(100);
        paginator.update_with_store(&key_msg(KeyCode::Left), &mut store);
        assert_eq!(store.read("t"), None);
    }

    #[test]
    fn test_prev_next_clamp_at_bounds() {
        let mut paginator = Model::new().with_per_page(10).with_total_items(30);
        paginator.prev_page();
        assert_eq!(paginator.page, 0);
        paginator.page = 2;
        paginator.next_page();
        assert_eq!(paginator.page, 2);
        assert!(paginator.on_last_page());
    }

    #[test]
    fn test_page_items_all_inline_within_budget() {
        let paginator = Model::new().with_per_page(10).with_total_items(70);
        let items = paginator.page_items();
        assert_eq!(items.len(), 7);
        assert!(items.iter().all(|i| matches!(i, PageItem::Page(_))));
    }

    #[test]
    fn test_page_items_elide_with_hidden_pages() {
        let mut paginator = Model::new().with_per_page(10).with_total_items(120);
        paginator.page = 5;
        let items = paginator.page_items();
        assert_eq!(
            items,
            vec![
                PageItem::Page(0),
                PageItem::Ellipsis(vec![1, 2, 3]),
                PageItem::Page(4),
                PageItem::Page(5),
                PageItem::Page(6),
                PageItem::Ellipsis(vec![7, 8, 9, 10]),
                PageItem::Page(11),
            ]
        );
    }

    #[test]
    fn test_page_items_window_touching_edge() {
        let paginator = Model::new().with_per_page(10).with_total_items(120);
        // Page 0: window is 0..=1, so only the tail elides.
        let items = paginator.page_items();
        assert_eq!(items[0], PageItem::Page(0));
        assert_eq!(items[1], PageItem::Page(1));
        assert_eq!(items[2], PageItem::Ellipsis((2..11).collect()));
        assert_eq!(items[3], PageItem::Page(11));
    }

    #[test]
    fn test_view_hidden_for_single_page() {
        assert_eq!(Model::new().with_per_page(10).with_total_items(5).view(), "");
        // Before any count is known the default single page also hides.
        assert_eq!(Model::new().view(), "");
    }

    #[test]
    fn test_numbers_view_marks_current() {
        let mut paginator = Model::new().with_per_page(10).with_total_items(50);
        paginator.paginator_type = Type::Numbers;
        paginator.page = 2;
        assert_eq!(paginator.view(), "1 2 [3] 4 5");
    }

    #[test]
    fn test_items_on_page_partial_last_page() {
        let mut paginator = Model::new().with_per_page(10).with_total_items(95);
        paginator.page = 9;
        assert_eq!(paginator.items_on_page(95), 5);
        assert_eq!(paginator.items_on_page(0), 0);
    }
}
