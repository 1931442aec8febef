//! Column descriptors for data tables.
//!
//! A [`Column`] is immutable configuration supplied once per table: an
//! id, a header title, an accessor that turns a row into cell text, and
//! optional group membership, styling hooks, pinning, and width. Group
//! membership can be given as a bare name (shorthand) or a full
//! [`GroupDescriptor`]; resolution of groups across the column list
//! lives in the [`groups`](crate::groups) module.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::column::{Column, GroupDescriptor, Pin};
//!
//! struct Product {
//!     name: String,
//!     stock: u32,
//! }
//!
//! let columns = vec![
//!     Column::new("name", "Name", |p: &Product| p.name.clone()).with_pin(Pin::Left),
//!     Column::new("stock", "Stock", |p: &Product| p.stock.to_string())
//!         .with_group("Inventory"),
//!     Column::new("reorder", "Reorder at", |_p: &Product| "10".into())
//!         .with_group(GroupDescriptor::new("Inventory").default_expanded(false)),
//! ];
//! assert_eq!(columns[1].group.as_ref().unwrap().name(), "Inventory");
//! ```

use lipgloss_extras::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Turns a row into the display text for one cell.
pub type Accessor<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Computes an extra style for a cell from the row and its index.
pub type ValueStyleFn<T> = Arc<dyn Fn(&T, usize) -> Option<Style> + Send + Sync>;

/// Horizontal pinning for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    /// Stick to the left edge.
    Left,
    /// Stick to the right edge.
    Right,
}

/// Full description of a column group.
#[derive(Debug, Clone)]
pub struct GroupDescriptor {
    /// Group name; the grouping key.
    pub name: String,
    /// Whether the group can be collapsed at all.
    pub collapsible: bool,
    /// Whether the group starts expanded.
    pub default_expanded: bool,
    /// Style applied to the group's header cell.
    pub style: Option<Style>,
}

impl GroupDescriptor {
    /// Creates a descriptor with the shorthand defaults:
    /// collapsible and expanded.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collapsible: true,
            default_expanded: true,
            style: None,
        }
    }

    /// Sets whether the group can be collapsed (builder pattern).
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Sets whether the group starts expanded (builder pattern).
    pub fn default_expanded(mut self, expanded: bool) -> Self {
        self.default_expanded = expanded;
        self
    }

    /// Sets the group header style (builder pattern).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// Group membership as written on a column: a bare name or a full
/// descriptor. A bare name normalizes to the shorthand defaults.
#[derive(Debug, Clone)]
pub enum GroupSpec {
    /// Shorthand: just the group name.
    Name(String),
    /// Full descriptor.
    Descriptor(GroupDescriptor),
}

impl GroupSpec {
    /// The group name this spec refers to.
    pub fn name(&self) -> &str {
        match self {
            GroupSpec::Name(name) => name,
            GroupSpec::Descriptor(desc) => &desc.name,
        }
    }

    /// Normalizes to a full descriptor; shorthand becomes
    /// `collapsible = true, default_expanded = true`.
    pub fn descriptor(&self) -> GroupDescriptor {
        match self {
            GroupSpec::Name(name) => GroupDescriptor::new(name.clone()),
            GroupSpec::Descriptor(desc) => desc.clone(),
        }
    }
}

impl From<&str> for GroupSpec {
    fn from(name: &str) -> Self {
        GroupSpec::Name(name.to_string())
    }
}

impl From<String> for GroupSpec {
    fn from(name: String) -> Self {
        GroupSpec::Name(name)
    }
}

impl From<GroupDescriptor> for GroupSpec {
    fn from(desc: GroupDescriptor) -> Self {
        GroupSpec::Descriptor(desc)
    }
}

/// Immutable configuration for one table column.
pub struct Column<T> {
    /// Stable identifier; the key used in visibility, sort, and filter
    /// state.
    pub id: String,
    /// Header title text.
    pub title: String,
    accessor: Accessor<T>,
    /// Optional group membership.
    pub group: Option<GroupSpec>,
    /// Style for this column's header cell.
    pub header_style: Option<Style>,
    /// Base style for this column's body cells.
    pub cell_style: Option<Style>,
    value_style: Option<ValueStyleFn<T>>,
    /// Optional pinning to the left or right edge.
    pub pin: Option<Pin>,
    /// Fixed rendered width; defaults to content-derived.
    pub width: Option<usize>,
}

impl<T> Column<T> {
    /// Creates a column with an id, header title, and value accessor.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        accessor: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            accessor: Arc::new(accessor),
            group: None,
            header_style: None,
            cell_style: None,
            value_style: None,
            pin: None,
            width: None,
        }
    }

    /// Assigns group membership (builder pattern). Accepts a bare name
    /// or a [`GroupDescriptor`].
    pub fn with_group(mut self, group: impl Into<GroupSpec>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Sets the header cell style (builder pattern).
    pub fn with_header_style(mut self, style: Style) -> Self {
        self.header_style = Some(style);
        self
    }

    /// Sets the base body cell style (builder pattern).
    pub fn with_cell_style(mut self, style: Style) -> Self {
        self.cell_style = Some(style);
        self
    }

    /// Sets a per-value style function of `(row, row_index)` (builder
    /// pattern). The returned style, if any, is applied on top of the
    /// base cell style.
    pub fn with_value_style(
        mut self,
        f: impl Fn(&T, usize) -> Option<Style> + Send + Sync + 'static,
    ) -> Self {
        self.value_style = Some(Arc::new(f));
        self
    }

    /// Pins the column to an edge (builder pattern).
    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pin = Some(pin);
        self
    }

    /// Sets a fixed rendered width (builder pattern).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Returns the display text of this column's cell for `row`.
    pub fn value(&self, row: &T) -> String {
        (self.accessor)(row)
    }

    /// Returns the per-value style for `row` at `index`, if a style
    /// function is set and yields one.
    pub fn value_style(&self, row: &T, index: usize) -> Option<Style> {
        self.value_style.as_ref().and_then(|f| f(row, index))
    }

    /// The group name this column belongs to, if any.
    pub fn group_name(&self) -> Option<&str> {
        self.group.as_ref().map(|g| g.name())
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            accessor: Arc::clone(&self.accessor),
            group: self.group.clone(),
            header_style: self.header_style.clone(),
            cell_style: self.cell_style.clone(),
            value_style: self.value_style.clone(),
            pin: self.pin,
            width: self.width,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("group", &self.group)
            .field("pin", &self.pin)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}
