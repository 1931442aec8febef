//! Sort, filter, and visibility state for data tables.
//!
//! These are three independent pieces of UI state. No cross-validation
//! happens here; the render pipeline is the only consumer that
//! reconciles them against live column visibility. Each can be wrapped
//! in a [`StateCell`] to get the value-or-updater setter contract with
//! an optional change callback.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::state::{SortDirection, SortState, StateCell};
//!
//! let mut sort = StateCell::new(SortState::default());
//! sort.update(|s| {
//!     let mut s = s.clone();
//!     s.cycle("price");
//!     s
//! });
//! assert_eq!(sort.get().direction_of("price"), Some(SortDirection::Ascending));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

/// Sort direction for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// One entry in the sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column the entry sorts by.
    pub column_id: String,
    /// Direction for that column.
    pub direction: SortDirection,
}

/// Ordered list of sort keys. Earlier keys take precedence.
///
/// No dedup invariant is enforced beyond what [`cycle`](Self::cycle)
/// itself maintains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    /// Empty sort order.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-key sort order.
    pub fn single(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            keys: vec![SortKey {
                column_id: column_id.into(),
                direction,
            }],
        }
    }

    /// The sort keys in precedence order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Current direction for a column, if it participates in the sort.
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// Cycles a column through unsorted → ascending → descending →
    /// unsorted, leaving other keys untouched.
    pub fn cycle(&mut self, column_id: &str) {
        match self.keys.iter().position(|k| k.column_id == column_id) {
            None => self.keys.push(SortKey {
                column_id: column_id.to_string(),
                direction: SortDirection::Ascending,
            }),
            Some(i) if self.keys[i].direction == SortDirection::Ascending => {
                self.keys[i].direction = SortDirection::Descending;
            }
            Some(i) => {
                self.keys.remove(i);
            }
        }
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

/// A filter value applied to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    /// Column the filter applies to.
    pub column_id: String,
    /// The filter text.
    pub value: String,
}

/// The set of active column filters.
///
/// Equality on this type is what the incremental loader uses as its
/// reset trigger identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    filters: Vec<ColumnFilter>,
}

impl FilterState {
    /// No filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active filters in application order.
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    /// Sets the filter value for a column. An empty value removes the
    /// column's filter.
    pub fn set(&mut self, column_id: impl Into<String>, value: impl Into<String>) {
        let column_id = column_id.into();
        let value = value.into();
        match self.filters.iter().position(|f| f.column_id == column_id) {
            Some(i) if value.is_empty() => {
                self.filters.remove(i);
            }
            Some(i) => self.filters[i].value = value,
            None if value.is_empty() => {}
            None => self.filters.push(ColumnFilter { column_id, value }),
        }
    }

    /// Current filter value for a column, if any.
    pub fn value_of(&self, column_id: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column_id == column_id)
            .map(|f| f.value.as_str())
    }

    /// True when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }
}

/// Column id → shown/hidden. Columns with no entry are visible; only
/// overrides are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    entries: BTreeMap<String, bool>,
}

impl VisibilityMap {
    /// A map with no overrides: everything visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective visibility of a column.
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.entries.get(column_id).copied().unwrap_or(true)
    }

    /// Sets a column's visibility explicitly.
    pub fn set(&mut self, column_id: impl Into<String>, visible: bool) {
        self.entries.insert(column_id.into(), visible);
    }

    /// Flips a column's effective visibility.
    pub fn toggle(&mut self, column_id: &str) {
        let next = !self.is_visible(column_id);
        self.entries.insert(column_id.to_string(), next);
    }

    /// The stored overrides, ordered by column id.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// A piece of UI state with a value-or-updater setter and an optional
/// change callback.
#[derive(Clone)]
pub struct StateCell<V> {
    value: V,
    on_change: Option<Arc<dyn Fn(&V) + Send + Sync>>,
}

impl<V: std::fmt::Debug> std::fmt::Debug for StateCell<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<V> StateCell<V> {
    /// Wraps an initial value.
    pub fn new(value: V) -> Self {
        Self {
            value,
            on_change: None,
        }
    }

    /// Registers a callback invoked after every set/update (builder
    /// pattern).
    pub fn on_change(mut self, f: impl Fn(&V) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// The current value.
    pub fn get(&self) -> &V {
        &self.value
    }

    /// Replaces the value.
    pub fn set(&mut self, value: V) {
        self.value = value;
        if let Some(f) = &self.on_change {
            f(&self.value);
        }
    }

    /// Replaces the value with the result of `f(&old)`.
    pub fn update(&mut self, f: impl FnOnce(&V) -> V) {
        let next = f(&self.value);
        self.set(next);
    }
}
