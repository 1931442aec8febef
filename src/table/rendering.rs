//! The table render pipeline.
//!
//! Turns resolved state into the ordered sequence of header and body
//! rows: an optional group-header row of span-compressed runs, the
//! column header row with sort indicators, the current page's body rows
//! with style decoration and pin ordering, and any separator rows.

use super::model::Model;
use crate::column::{Column, Pin};
use crate::state::{FilterState, SortDirection, SortState};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use lipgloss_extras::prelude::*;
use std::cmp::Ordering;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Width of the `" | "` joint between adjacent cells.
const JOINT_WIDTH: usize = 3;

/// A synthetic presentation-only row inserted after a data row.
#[derive(Debug, Clone, Default)]
pub struct RowSeparator {
    /// Separator height in lines.
    pub height: usize,
    /// Optional style override for the separator.
    pub style: Option<Style>,
}

impl RowSeparator {
    /// A one-line separator with no style override.
    pub fn new(height: usize) -> Self {
        Self {
            height,
            style: None,
        }
    }

    /// Sets the style override (builder pattern).
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// One cell of the group-header row: a contiguous run of visible
/// columns sharing a group (or sharing the absence of one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRun {
    /// The shared group name; `None` is the "no group" run.
    pub group: Option<String>,
    /// How many visible columns the run spans.
    pub span: usize,
}

/// A pinned column with its sticky offset from the pinned edge, in
/// display-width units including cell joints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedColumn {
    /// The column id.
    pub id: String,
    /// Which edge it sticks to.
    pub side: Pin,
    /// Distance from that edge.
    pub offset: usize,
}

impl<T> Model<T> {
    /// Visible columns in render order. With pinning enabled,
    /// left-pinned columns come first and right-pinned last; order
    /// within each class is column order.
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        let vis = self.visibility.get();
        let shown: Vec<&Column<T>> = self
            .columns
            .iter()
            .filter(|c| vis.is_visible(&c.id))
            .collect();
        if !self.pinning {
            return shown;
        }
        let mut ordered = Vec::with_capacity(shown.len());
        ordered.extend(shown.iter().copied().filter(|c| c.pin == Some(Pin::Left)));
        ordered.extend(shown.iter().copied().filter(|c| c.pin.is_none()));
        ordered.extend(shown.iter().copied().filter(|c| c.pin == Some(Pin::Right)));
        ordered
    }

    /// True when any visible column belongs to a group, i.e. a
    /// group-header row will render.
    pub fn has_group_header(&self) -> bool {
        self.visible_columns().iter().any(|c| c.group.is_some())
    }

    /// The group-header row as span-compressed runs over the visible
    /// columns. A column whose group cannot be resolved falls into the
    /// "no group" run rather than erroring.
    pub fn group_header_runs(&self) -> Vec<HeaderRun> {
        let mut runs: Vec<HeaderRun> = Vec::new();
        for column in self.visible_columns() {
            let group = column.group_name().map(|s| s.to_string());
            match runs.last_mut() {
                Some(run) if run.group == group => run.span += 1,
                _ => runs.push(HeaderRun { group, span: 1 }),
            }
        }
        runs
    }

    /// Pinned columns in render order with their sticky offsets.
    pub fn pinned_columns(&self) -> Vec<PinnedColumn> {
        let visible = self.visible_columns();
        let page = self.page_row_indices();
        let widths = self.column_widths(&visible, &page);

        let mut pinned = Vec::new();
        let mut left_offset = 0;
        for (col, width) in visible.iter().zip(&widths) {
            if col.pin == Some(Pin::Left) {
                pinned.push(PinnedColumn {
                    id: col.id.clone(),
                    side: Pin::Left,
                    offset: left_offset,
                });
            }
            left_offset += width + JOINT_WIDTH;
        }
        let mut right_offset = 0;
        for (col, width) in visible.iter().zip(&widths).rev() {
            if col.pin == Some(Pin::Right) {
                pinned.push(PinnedColumn {
                    id: col.id.clone(),
                    side: Pin::Right,
                    offset: right_offset,
                });
            }
            right_offset += width + JOINT_WIDTH;
        }
        pinned
    }

    /// Row indices after client-side filtering and sorting, in render
    /// order. Manual-mode hosts never call this; their rows pass
    /// through untouched.
    pub(super) fn client_row_indices(&self) -> Vec<usize> {
        let filters = self.filters.get();
        let matcher = SkimMatcherV2::default();
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.row_matches(&matcher, &self.rows[i], filters))
            .collect();
        let sort = self.sort.get();
        if !sort.keys().is_empty() {
            indices.sort_by(|&a, &b| self.compare_rows(&self.rows[a], &self.rows[b], sort));
        }
        indices
    }

    /// Row indices for the current page, in render order.
    pub(super) fn page_row_indices(&self) -> Vec<usize> {
        if self.paginator.manual() {
            (0..self.rows.len()).collect()
        } else {
            let indices = self.client_row_indices();
            let (start, end) = self.paginator.get_slice_bounds(indices.len());
            indices[start..end].to_vec()
        }
    }

    fn row_matches(&self, matcher: &SkimMatcherV2, row: &T, filters: &FilterState) -> bool {
        filters.filters().iter().all(|filter| {
            match self.columns.iter().find(|c| c.id == filter.column_id) {
                Some(column) => matcher
                    .fuzzy_match(&column.value(row), &filter.value)
                    .is_some(),
                // Filters for unknown columns cannot exclude anything.
                None => true,
            }
        })
    }

    fn compare_rows(&self, a: &T, b: &T, sort: &SortState) -> Ordering {
        for key in sort.keys() {
            let Some(column) = self.columns.iter().find(|c| c.id == key.column_id) else {
                continue;
            };
            let ordering = column.value(a).cmp(&column.value(b));
            let ordering = match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    fn header_label(&self, column: &Column<T>) -> String {
        match self.sort.get().direction_of(&column.id) {
            Some(SortDirection::Ascending) => format!("{} ↑", column.title),
            Some(SortDirection::Descending) => format!("{} ↓", column.title),
            None => column.title.clone(),
        }
    }

    fn column_widths(&self, visible: &[&Column<T>], page: &[usize]) -> Vec<usize> {
        visible
            .iter()
            .map(|column| {
                column.width.unwrap_or_else(|| {
                    let header = self.header_label(column).width();
                    page.iter()
                        .map(|&i| column.value(&self.rows[i]).width())
                        .fold(header, usize::max)
                })
            })
            .collect()
    }

    /// Renders the table: group-header row (when any visible column is
    /// grouped), column headers, a rule, the current page's body rows
    /// with separators, and the pagination footer (which hides itself
    /// for a single page).
    pub fn view(&self) -> String {
        let visible = self.visible_columns();
        if visible.is_empty() {
            return String::new();
        }
        let page = self.page_row_indices();
        let widths = self.column_widths(&visible, &page);
        let total_width =
            widths.iter().sum::<usize>() + JOINT_WIDTH * widths.len().saturating_sub(1);

        let mut out = String::new();

        if self.has_group_header() {
            let runs = self.group_header_runs();
            let mut cells = Vec::with_capacity(runs.len());
            let mut column_cursor = 0;
            for run in &runs {
                let run_width = widths[column_cursor..column_cursor + run.span]
                    .iter()
                    .sum::<usize>()
                    + JOINT_WIDTH * (run.span - 1);
                let label = run.group.clone().unwrap_or_default();
                let style = run
                    .group
                    .as_deref()
                    .and_then(|name| self.layout.group(name))
                    .and_then(|g| g.style.clone())
                    .unwrap_or_else(|| self.styles.group_header.clone());
                cells.push(style.render(&fit(&label, run_width)));
                column_cursor += run.span;
            }
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }

        let header_cells: Vec<String> = visible
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (column, &width))| {
                let style = if i == self.active_column {
                    self.styles.active_header.clone()
                } else {
                    column
                        .header_style
                        .clone()
                        .unwrap_or_else(|| self.styles.header.clone())
                };
                style.render(&fit(&self.header_label(column), width))
            })
            .collect();
        out.push_str(&header_cells.join(" | "));
        out.push('\n');

        let rules: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&rules.join("-+-"));
        out.push('\n');

        for (page_index, &row_index) in page.iter().enumerate() {
            let row = &self.rows[row_index];
            let cells: Vec<String> = visible
                .iter()
                .zip(&widths)
                .map(|(column, &width)| {
                    let style = column
                        .value_style(row, page_index)
                        .or_else(|| column.cell_style.clone())
                        .unwrap_or_else(|| self.styles.cell.clone());
                    style.render(&fit(&column.value(row), width))
                })
                .collect();
            let line = cells.join(" | ");
            match self.row_style_fn.as_ref().and_then(|f| f(row, page_index)) {
                Some(style) => out.push_str(&style.render(&line)),
                None => out.push_str(&line),
            }
            out.push('\n');

            if let Some(separator) = self.separator_fn.as_ref().and_then(|f| f(row, page_index))
            {
                let style = separator
                    .style
                    .clone()
                    .unwrap_or_else(|| self.styles.separator.clone());
                for _ in 0..separator.height {
                    out.push_str(&style.render(&" ".repeat(total_width)));
                    out.push('\n');
                }
            }
        }

        let footer = self.paginator.view();
        if !footer.is_empty() {
            out.push_str(&footer);
            out.push('\n');
        }
        out
    }
}

/// Pads or truncates `s` to exactly `width` display columns.
fn fit(s: &str, width: usize) -> String {
    let current = s.width();
    if current <= width {
        return format!("{s}{}", " ".repeat(width - current));
    }
    let mut fitted = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        fitted.push(ch);
        used += w;
    }
    fitted.push_str(&" ".repeat(width - used));
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SortDirection;

    fn row(a: &str, b: &str, c: &str, d: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string(), c.to_string(), d.to_string()]
    }

    fn grouped_columns() -> Vec<Column<Vec<String>>> {
        vec![
            Column::new("a", "A", |r: &Vec<String>| r[0].clone()),
            Column::new("b", "B", |r: &Vec<String>| r[1].clone()).with_group("G"),
            Column::new("c", "C", |r: &Vec<String>| r[2].clone()).with_group("G"),
            Column::new("d", "D", |r: &Vec<String>| r[3].clone()),
        ]
    }

    #[test]
    fn test_group_runs_span_compression() {
        let table = Model::new(grouped_columns());
        let runs = table.group_header_runs();
        assert_eq!(
            runs,
            vec![
                HeaderRun { group: None, span: 1 },
                HeaderRun {
                    group: Some("G".to_string()),
                    span: 2
                },
                HeaderRun { group: None, span: 1 },
            ]
        );
    }

    #[test]
    fn test_group_runs_follow_visibility() {
        let mut table = Model::new(grouped_columns());
        table.set_column_visible("c", false);
        let runs = table.group_header_runs();
        assert_eq!(runs[1].span, 1);
    }

    #[test]
    fn test_adjacent_ungrouped_columns_merge() {
        let columns = vec![
            Column::new("a", "A", |_: &()| String::new()),
            Column::new("b", "B", |_: &()| String::new()),
            Column::new("c", "C", |_: &()| String::new()).with_group("G"),
        ];
        let table = Model::new(columns);
        let runs = table.group_header_runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], HeaderRun { group: None, span: 2 });
    }

    #[test]
    fn test_client_rows_filtered_and_sorted() {
        let rows = vec![
            row("banana", "2", "x", "y"),
            row("apple", "1", "x", "y"),
            row("cherry", "3", "x", "y"),
        ];
        let mut table = Model::new(grouped_columns()).with_per_page(10).with_rows(rows);
        table.set_sort(crate::state::SortState::single("a", SortDirection::Ascending));
        assert_eq!(table.client_row_indices(), vec![1, 0, 2]);

        table.set_sort(crate::state::SortState::single("a", SortDirection::Descending));
        assert_eq!(table.client_row_indices(), vec![2, 0, 1]);

        table.set_filter("a", "an");
        assert_eq!(table.client_row_indices(), vec![0]);
    }

    #[test]
    fn test_page_slice_in_client_mode() {
        let rows: Vec<_> = (0..25)
            .map(|i| row(&format!("{i:02}"), "x", "y", "z"))
            .collect();
        let mut table = Model::new(grouped_columns()).with_per_page(10).with_rows(rows);
        table.set_page(2);
        assert_eq!(table.page_row_indices(), (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_manual_mode_rows_pass_through() {
        let rows: Vec<_> = (0..10).map(|_| row("r", "x", "y", "z")).collect();
        let mut table = Model::new(grouped_columns())
            .with_per_page(10)
            .with_total_rows(95)
            .with_rows(rows);
        table.set_page(5);
        assert_eq!(table.page_row_indices().len(), 10);
        assert_eq!(table.paginator().total_pages, 10);
    }

    #[test]
    fn test_pinned_columns_order_and_offsets() {
        let columns = vec![
            Column::new("a", "A", |_: &()| "aa".to_string()).with_width(2),
            Column::new("b", "B", |_: &()| "bb".to_string())
                .with_width(2)
                .with_pin(Pin::Right),
            Column::new("c", "C", |_: &()| "cc".to_string())
                .with_width(2)
                .with_pin(Pin::Left),
        ];
        let table = Model::new(columns).with_pinning(true);
        let order: Vec<String> = table
            .visible_columns()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);

        let pinned = table.pinned_columns();
        assert!(pinned.contains(&PinnedColumn {
            id: "c".to_string(),
            side: Pin::Left,
            offset: 0
        }));
        assert!(pinned.contains(&PinnedColumn {
            id: "b".to_string(),
            side: Pin::Right,
            offset: 0
        }));
    }

    #[test]
    fn test_view_contains_group_header_and_rule() {
        let table = Model::new(grouped_columns())
            .with_per_page(10)
            .with_rows(vec![row("r1", "v1", "v2", "v3")]);
        let rendered = table.view();
        assert!(rendered.contains('G'));
        assert!(rendered.contains("-+-"));
        assert!(rendered.contains("r1"));
    }

    #[test]
    fn test_view_sort_indicator() {
        let mut table = Model::new(grouped_columns())
            .with_per_page(10)
            .with_rows(vec![row("r1", "v1", "v2", "v3")]);
        table.sort_cycle("a");
        assert!(table.view().contains("A ↑"));
        table.sort_cycle("a");
        assert!(table.view().contains("A ↓"));
    }

    #[test]
    fn test_view_separator_rows() {
        let styles = super::super::style::TableStyles {
            separator: Style::new(),
            ..Default::default()
        };
        let table = Model::new(grouped_columns())
            .with_per_page(10)
            .with_styles(styles)
            .with_rows(vec![row("r1", "v", "v", "v"), row("r2", "v", "v", "v")])
            .with_separators(|_row, index| (index == 0).then(|| RowSeparator::new(2)));
        let rendered = table.view();
        let body_start = rendered.find("r1").unwrap();
        let after = &rendered[body_start..];
        // Two blank separator lines between the first and second row.
        let lines: Vec<&str> = after.lines().collect();
        assert!(lines[1].trim().is_empty());
        assert!(lines[2].trim().is_empty());
        assert!(lines[3].contains("r2"));
    }

    #[test]
    fn test_view_empty_without_visible_columns() {
        let mut table = Model::new(vec![Column::new("a", "A", |_: &()| String::new())]);
        table.set_column_visible("a", false);
        assert_eq!(table.view(), "");
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("", 3), "   ");
    }
}
