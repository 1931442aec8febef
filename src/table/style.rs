//! Styling for table rendering.
//!
//! Defaults use `AdaptiveColor` so they read on both light and dark
//! terminals. Column- and value-level styles from
//! [`Column`](crate::column::Column) are applied on top of these.

use lipgloss_extras::prelude::*;

/// Style bundle for the table's own chrome.
#[derive(Debug, Clone)]
pub struct TableStyles {
    /// Group-header cells.
    pub group_header: Style,
    /// Column-header cells.
    pub header: Style,
    /// The focused column's header cell.
    pub active_header: Style,
    /// Base style for body cells.
    pub cell: Style,
    /// Separator rows.
    pub separator: Style,
}

impl Default for TableStyles {
    fn default() -> Self {
        Self {
            group_header: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#874BFD",
                Dark: "#7D56F4",
            }),
            header: Style::new().bold(true),
            active_header: Style::new().bold(true).foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            cell: Style::new(),
            separator: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
        }
    }
}

impl TableStyles {
    /// The default bundle.
    pub fn new() -> Self {
        Self::default()
    }
}
