#![warn(missing_docs)]

//! # datatable-widgets
//!
//! Grouped, paginated, and incrementally loaded data-table components
//! for [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! datatable-widgets turns a column specification, rows, and user
//! interactions (sort, filter, paginate, group collapse, scroll-to-load)
//! into consistent rendered state. Components follow the Elm
//! Architecture pattern with `update()` and `view()` methods, so they
//! drop into a bubbletea-rs `Model` without glue.
//!
//! The pieces compose but also stand alone:
//!
//! | Component | Description |
//! |-----------|-------------|
//! | `Table` | Grouped, paginated data table over typed rows |
//! | `Paginator` | Page window coordination, store sync, page lists |
//! | `Loader` | Scroll-triggered append-only data fetching |
//! | `PageWindow` | The `"<skip>-<size>"` token codec |
//! | `GroupLayout` | Column group resolution and collapse state |
//!
//! ## Pagination state lives outside the component
//!
//! Each table is keyed by a `name`, and its page window is kept in a
//! [`sync::PageWindowStore`] under that name, typically a query string
//! such as `products=20-10`. The store is authoritative on read, and
//! page navigation writes the new token back through the same codec, so
//! the current page survives anything the component itself does not.
//!
//! ## Quick start
//!
//! ```rust
//! use datatable_widgets::prelude::*;
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
//!
//! let rows = vec![
//!     Product { name: "Widget".into(), price: 19 },
//!     Product { name: "Gadget".into(), price: 42 },
//! ];
//!
//! let table = Table::new(columns)
//!     .with_name("products")
//!     .with_per_page(25)
//!     .with_rows(rows);
//!
//! println!("{}", table.view());
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use datatable_widgets::prelude::*;
//! use bubbletea_rs::{Model, Cmd, Msg};
//!
//! struct App {
//!     table: Table<Vec<String>>,
//!     store: MemoryStore,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let columns = vec![
//!             Column::new("id", "Id", |r: &Vec<String>| r[0].clone()),
//!             Column::new("label", "Label", |r: &Vec<String>| r[1].clone()),
//!         ];
//!         let store = MemoryStore::new();
//!         let mut table = Table::new(columns).with_name("items").with_per_page(25);
//!         table.sync_from_store(&store);
//!         (Self { table, store }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.table.update_with_store(&msg, &mut self.store);
//!         None
//!     }
//!
//!     fn view(&self) -> String {
//!         self.table.view()
//!     }
//! }
//! ```
//!
//! ## Incremental loading
//!
//! For endless result sets, the [`loader`] component replaces the
//! paginator: it appends fetched pages through an async
//! [`loader::Fetcher`], keeps at most one fetch in flight, and treats a
//! short batch as end-of-data. Fetch failures go to an injected
//! [`loader::Notifier`] and leave the loader retryable.

pub mod column;
pub mod groups;
pub mod key;
pub mod loader;
pub mod pagewindow;
pub mod paginator;
pub mod state;
pub mod sync;
pub mod table;

pub use column::{Column, GroupDescriptor, GroupSpec, Pin};
pub use groups::GroupLayout;
pub use key::{
    new_binding, with_disabled, with_help, with_keys_str, Binding, KeyMap, KeyPress,
};
pub use loader::{
    Batch, BatchErrMsg, BatchMsg, FetchError, FetchRequest, Fetcher, Model as Loader, Notifier,
    Phase as LoaderPhase, ScrollMetrics, TracingNotifier,
};
pub use pagewindow::PageWindow;
pub use paginator::{Model as Paginator, PageItem, PaginatorKeyMap};
pub use state::{
    ColumnFilter, FilterState, SortDirection, SortKey, SortState, StateCell, VisibilityMap,
};
pub use sync::{MemoryStore, PageWindowStore, QueryStringStore};
pub use table::{
    HeaderRun, Model as Table, PageHandle, PinnedColumn, RowSeparator, TableKeyMap, TableStyles,
};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use datatable_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::column::{Column, GroupDescriptor, GroupSpec, Pin};
    pub use crate::groups::GroupLayout;
    pub use crate::key::{new_binding, with_help, with_keys_str, Binding, KeyMap};
    pub use crate::loader::{
        Batch, FetchError, FetchRequest, Fetcher, Model as Loader, Notifier, ScrollMetrics,
    };
    pub use crate::pagewindow::PageWindow;
    pub use crate::paginator::{Model as Paginator, PageItem, PaginatorKeyMap};
    pub use crate::state::{
        FilterState, SortDirection, SortState, StateCell, VisibilityMap,
    };
    pub use crate::sync::{MemoryStore, PageWindowStore, QueryStringStore};
    pub use crate::table::{
        Model as Table, PageHandle, RowSeparator, TableKeyMap, TableStyles,
    };
}
