//! Grouped, paginated data-table component.
//!
//! This module exposes a generic `Model<T>` plus supporting submodules:
//! - `model`: table state (columns, rows, group layout, sort/filter/
//!   visibility cells, and the embedded pagination coordinator)
//! - `rendering`: the render pipeline that turns resolved state into
//!   header runs, header cells, body rows, and separator rows
//! - `keys`: key bindings for column focus, sorting, group toggling,
//!   and page navigation
//! - `style`: lipgloss style bundle for headers, cells, and separators
//!
//! ## Data modes
//!
//! The table follows its pagination coordinator's mode: in client mode
//! the full dataset is in memory and the table filters, sorts, and
//! slices it per page; in manual mode the host supplies exactly the
//! current page's rows (plus a server-known total) and rows pass
//! through untouched.
//!
//! ## Render pipeline
//!
//! 1. An optional group-header row: contiguous runs of same-group
//!    visible columns merge into one spanning cell; ungrouped columns
//!    form their own unlabeled runs.
//! 2. A column header row with sort indicators.
//! 3. One body row per data row, with base, per-column, and computed
//!    per-row styles, pinned columns ordered to the edges.
//! 4. Optional separator rows interleaved after specific data rows.
//!
//! ## Example
//!
//! ```rust
//! use datatable_widgets::column::Column;
//! use datatable_widgets::table::Model;
//!
//! #[derive(Clone)]
//! struct Product {
//!     name: String,
//!     price: u32,
//! }
//!
//! let columns = vec![
//!     Column::new("name", "Name", |p: &Product| p.name.clone()),
//!     Column::new("price", "Price", |p: &Product| p.price.to_string())
//!         .with_group("Pricing"),
//! ];
//! let table = Model::new(columns)
//!     .with_name("products")
//!     .with_per_page(25)
//!     .with_rows(vec![Product { name: "Widget".into(), price: 19 }]);
//! let rendered = table.view();
//! assert!(rendered.contains("Widget"));
//! ```

/// Key bindings for table interaction.
pub mod keys;
mod model;
mod rendering;
/// Styling bundle for table rendering.
pub mod style;

pub use keys::TableKeyMap;
pub use model::{Model, PageHandle};
pub use rendering::{HeaderRun, PinnedColumn, RowSeparator};
pub use style::TableStyles;
