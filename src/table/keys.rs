//! Key bindings for table interaction.
//!
//! Page navigation keys live on the embedded pagination coordinator's
//! own keymap; this map covers column focus, sorting, group toggling,
//! and column visibility.

use crate::key::{self, KeyMap as KeyMapTrait};

/// Key bindings for column focus, sorting, and group toggling.
#[derive(Debug, Clone)]
pub struct TableKeyMap {
    /// Move column focus right. Default: Tab, ']'
    pub next_column: key::Binding,
    /// Move column focus left. Default: '['
    pub prev_column: key::Binding,
    /// Cycle the focused column's sort direction. Default: 's'
    pub sort: key::Binding,
    /// Expand/collapse the focused column's group. Default: 'g'
    pub toggle_group: key::Binding,
    /// Hide the focused column. Default: 'v'
    pub toggle_column: key::Binding,
}

impl Default for TableKeyMap {
    fn default() -> Self {
        Self {
            next_column: key::new_binding(vec![
                key::with_keys_str(&["tab", "]"]),
                key::with_help("tab/]", "next column"),
            ]),
            prev_column: key::new_binding(vec![
                key::with_keys_str(&["["]),
                key::with_help("[", "prev column"),
            ]),
            sort: key::new_binding(vec![
                key::with_keys_str(&["s"]),
                key::with_help("s", "sort"),
            ]),
            toggle_group: key::new_binding(vec![
                key::with_keys_str(&["g"]),
                key::with_help("g", "toggle group"),
            ]),
            toggle_column: key::new_binding(vec![
                key::with_keys_str(&["v"]),
                key::with_help("v", "hide column"),
            ]),
        }
    }
}

impl KeyMapTrait for TableKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.next_column, &self.sort, &self.toggle_group]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.next_column, &self.prev_column],
            vec![&self.sort, &self.toggle_group, &self.toggle_column],
        ]
    }
}
