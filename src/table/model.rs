//! Table state and interaction.

use super::keys::TableKeyMap;
use super::rendering::RowSeparator;
use super::style::TableStyles;
use crate::column::Column;
use crate::groups::GroupLayout;
use crate::paginator;
use crate::state::{FilterState, SortState, StateCell, VisibilityMap};
use crate::sync::PageWindowStore;
use bubbletea_rs::{KeyMsg, Msg};
use lipgloss_extras::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Computes a separator to insert after a row, from the row and its
/// page-relative index.
pub type SeparatorFn<T> = Arc<dyn Fn(&T, usize) -> Option<RowSeparator> + Send + Sync>;

/// Computes an extra style for a whole row, from the row and its
/// page-relative index.
pub type RowStyleFn<T> = Arc<dyn Fn(&T, usize) -> Option<Style> + Send + Sync>;

/// Narrow pagination capability handle for hosts that render their own
/// pagination controls, instead of handing them the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle {
    /// Total pages, never below 1.
    pub page_count: usize,
    /// Current zero-based page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
}

/// A grouped, paginated data table over rows of type `T`.
pub struct Model<T> {
    pub(super) columns: Vec<Column<T>>,
    pub(super) rows: Vec<T>,
    pub(super) layout: GroupLayout,
    pub(super) visibility: StateCell<VisibilityMap>,
    pub(super) sort: StateCell<SortState>,
    pub(super) filters: StateCell<FilterState>,
    pub(super) paginator: paginator::Model,
    pub(super) styles: TableStyles,
    /// Key bindings.
    pub keymap: TableKeyMap,
    pub(super) separator_fn: Option<SeparatorFn<T>>,
    pub(super) row_style_fn: Option<RowStyleFn<T>>,
    pub(super) pinning: bool,
    pub(super) active_column: usize,
}

impl<T> fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

impl<T> Model<T> {
    /// Creates a table from its column configuration. Group structure
    /// and the initial visibility overrides are resolved here, once.
    pub fn new(columns: Vec<Column<T>>) -> Self {
        let layout = GroupLayout::resolve(&columns);
        let visibility = StateCell::new(layout.initial_visibility());
        Self {
            columns,
            rows: Vec::new(),
            layout,
            visibility,
            sort: StateCell::new(SortState::new()),
            filters: StateCell::new(FilterState::new()),
            paginator: paginator::Model::new(),
            styles: TableStyles::default(),
            keymap: TableKeyMap::default(),
            separator_fn: None,
            row_style_fn: None,
            pinning: false,
            active_column: 0,
        }
    }

    /// Sets the data rows (builder pattern).
    pub fn with_rows(mut self, rows: Vec<T>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Replaces the data rows. In client mode the page count follows
    /// the filtered row count.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.update_pagination();
    }

    /// Sets the store key used for page-window sync (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.paginator = self.paginator.with_name(name);
        self
    }

    /// Sets the page size (builder pattern).
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.paginator = self.paginator.with_per_page(per_page);
        self.update_pagination();
        self
    }

    /// Sets the server-known row count, switching the table to manual
    /// pagination (builder pattern).
    pub fn with_total_rows(mut self, rows: usize) -> Self {
        self.paginator = self.paginator.with_total_rows(rows);
        self
    }

    /// Forces manual or client-side pagination (builder pattern).
    pub fn with_manual(mut self, manual: bool) -> Self {
        self.paginator = self.paginator.with_manual(manual);
        self.update_pagination();
        self
    }

    /// Sets the style bundle (builder pattern).
    pub fn with_styles(mut self, styles: TableStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Sets a computed per-row style function (builder pattern).
    pub fn with_row_style(
        mut self,
        f: impl Fn(&T, usize) -> Option<Style> + Send + Sync + 'static,
    ) -> Self {
        self.row_style_fn = Some(Arc::new(f));
        self
    }

    /// Sets a separator function; rows it yields a separator for get
    /// one inserted after them (builder pattern).
    pub fn with_separators(
        mut self,
        f: impl Fn(&T, usize) -> Option<RowSeparator> + Send + Sync + 'static,
    ) -> Self {
        self.separator_fn = Some(Arc::new(f));
        self
    }

    /// Enables pinned-column ordering (builder pattern). When enabled,
    /// left-pinned columns render first and right-pinned columns last.
    pub fn with_pinning(mut self, pinning: bool) -> Self {
        self.pinning = pinning;
        self
    }

    /// The column configuration.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// The current data rows.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// The resolved group layout.
    pub fn layout(&self) -> &GroupLayout {
        &self.layout
    }

    /// The current visibility map.
    pub fn visibility(&self) -> &VisibilityMap {
        self.visibility.get()
    }

    /// Shows or hides a column explicitly.
    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) {
        self.visibility.update(|v| {
            let mut v = v.clone();
            v.set(column_id, visible);
            v
        });
        self.clamp_active_column();
    }

    /// Flips a column's visibility.
    pub fn toggle_column(&mut self, column_id: &str) {
        self.visibility.update(|v| {
            let mut v = v.clone();
            v.toggle(column_id);
            v
        });
        self.clamp_active_column();
    }

    /// Expands or collapses a group, recomputing membership from the
    /// live column list.
    pub fn toggle_group(&mut self, name: &str) {
        let mut vis = self.visibility.get().clone();
        self.layout.toggle(name, &self.columns, &mut vis);
        self.visibility.set(vis);
        self.clamp_active_column();
    }

    /// The current sort order.
    pub fn sort(&self) -> &SortState {
        self.sort.get()
    }

    /// Replaces the sort order.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort.set(sort);
    }

    /// Cycles a column through ascending, descending, unsorted.
    pub fn sort_cycle(&mut self, column_id: &str) {
        self.sort.update(|s| {
            let mut s = s.clone();
            s.cycle(column_id);
            s
        });
    }

    /// The active column filters.
    pub fn filters(&self) -> &FilterState {
        self.filters.get()
    }

    /// Sets a column's filter value; empty removes it. In client mode
    /// the page count follows the filtered row count.
    pub fn set_filter(&mut self, column_id: &str, value: &str) {
        self.filters.update(|f| {
            let mut f = f.clone();
            f.set(column_id, value);
            f
        });
        self.update_pagination();
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        self.filters.set(FilterState::new());
        self.update_pagination();
    }

    /// The embedded pagination coordinator.
    pub fn paginator(&self) -> &paginator::Model {
        &self.paginator
    }

    /// Mutable access to the pagination coordinator.
    pub fn paginator_mut(&mut self) -> &mut paginator::Model {
        &mut self.paginator
    }

    /// A narrow pagination handle for external pagination controls.
    pub fn page_handle(&self) -> PageHandle {
        PageHandle {
            page_count: self.paginator.total_pages,
            page_index: self.paginator.page,
            page_size: self.paginator.per_page,
        }
    }

    /// Jumps to a page, clamped to the valid range.
    pub fn set_page(&mut self, index: usize) {
        self.paginator.page = index.min(self.paginator.total_pages.saturating_sub(1));
    }

    /// Overwrites pagination state from the store (authoritative on
    /// read).
    pub fn sync_from_store(&mut self, store: &dyn PageWindowStore) {
        self.paginator.sync_from_store(store);
        self.update_pagination();
    }

    /// Writes the current page window to the store.
    pub fn write_to_store(&self, store: &mut dyn PageWindowStore) {
        self.paginator.write_to_store(store);
    }

    /// The focused column's id, in render order.
    pub fn active_column_id(&self) -> Option<String> {
        let visible = self.visible_columns();
        visible
            .get(self.active_column)
            .map(|c| c.id.clone())
    }

    /// Updates the table from key messages: column focus, sorting,
    /// group and column toggles, then page navigation.
    pub fn update(&mut self, msg: &Msg) {
        self.handle_keys(msg);
        self.paginator.update(msg);
    }

    /// Like [`update`](Self::update), but page navigation writes the
    /// new page window through to the store.
    pub fn update_with_store(&mut self, msg: &Msg, store: &mut dyn PageWindowStore) {
        self.handle_keys(msg);
        self.paginator.update_with_store(msg, store);
    }

    fn handle_keys(&mut self, msg: &Msg) {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return;
        };
        if self.keymap.next_column.matches(key_msg) {
            let count = self.visible_columns().len();
            if count > 0 {
                self.active_column = (self.active_column + 1) % count;
            }
        } else if self.keymap.prev_column.matches(key_msg) {
            let count = self.visible_columns().len();
            if count > 0 {
                self.active_column = self.active_column.checked_sub(1).unwrap_or(count - 1);
            }
        } else if self.keymap.sort.matches(key_msg) {
            if let Some(id) = self.active_column_id() {
                self.sort_cycle(&id);
            }
        } else if self.keymap.toggle_group.matches(key_msg) {
            let group = self
                .active_column_id()
                .and_then(|id| self.group_of_column(&id));
            if let Some(name) = group {
                self.toggle_group(&name);
            }
        } else if self.keymap.toggle_column.matches(key_msg) {
            if let Some(id) = self.active_column_id() {
                self.toggle_column(&id);
            }
        }
    }

    fn group_of_column(&self, column_id: &str) -> Option<String> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .and_then(|c| c.group_name())
            .map(|name| name.to_string())
    }

    pub(super) fn update_pagination(&mut self) {
        if !self.paginator.manual() {
            let count = self.client_row_indices().len();
            self.paginator.set_total_items(count);
        }
    }

    fn clamp_active_column(&mut self) {
        let count = self.visible_columns().len();
        if count == 0 {
            self.active_column = 0;
        } else if self.active_column >= count {
            self.active_column = count - 1;
        }
    }
}
