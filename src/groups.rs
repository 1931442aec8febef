//! Column group resolution and expand/collapse state.
//!
//! Groups are derived from the column list: the first occurrence of
//! each distinct group name fixes the group's descriptor and its place
//! in header order, and later descriptors for the same name are ignored
//! even when they differ. A group that starts collapsed shows exactly
//! one representative column: its first member in column order.
//!
//! Toggling recomputes membership from the live column list rather than
//! from the layout captured at resolve time, so it reflects runtime
//! column definitions.
//!
//! # Examples
//!
//! ```rust
//! use datatable_widgets::column::{Column, GroupDescriptor};
//! use datatable_widgets::groups::GroupLayout;
//!
//! let columns = vec![
//!     Column::new("a", "A", |_: &()| String::new()),
//!     Column::new("b", "B", |_: &()| String::new())
//!         .with_group(GroupDescriptor::new("G").default_expanded(false)),
//!     Column::new("c", "C", |_: &()| String::new()).with_group("G"),
//! ];
//!
//! let layout = GroupLayout::resolve(&columns);
//! let vis = layout.initial_visibility();
//! assert!(vis.is_visible("b"));  // representative member
//! assert!(!vis.is_visible("c"));
//! ```

use crate::column::{Column, GroupDescriptor};
use crate::state::VisibilityMap;
use std::collections::{HashMap, HashSet};

/// Resolved group structure for a column list.
#[derive(Debug, Clone, Default)]
pub struct GroupLayout {
    groups: Vec<GroupDescriptor>,
    members: HashMap<String, Vec<String>>,
    expanded: HashSet<String>,
    initial_visibility: VisibilityMap,
}

impl GroupLayout {
    /// Resolves groups from a column list.
    ///
    /// Walks columns in order, normalizing string shorthand to full
    /// descriptors and recording the first descriptor seen per name.
    /// Members are collected in column order. Groups whose resolved
    /// descriptor has `default_expanded == false` start collapsed;
    /// everything else starts expanded and contributes no visibility
    /// overrides.
    pub fn resolve<T>(columns: &[Column<T>]) -> Self {
        let mut groups: Vec<GroupDescriptor> = Vec::new();
        let mut members: HashMap<String, Vec<String>> = HashMap::new();

        for column in columns {
            let Some(spec) = &column.group else {
                continue;
            };
            members
                .entry(spec.name().to_string())
                .or_insert_with(|| {
                    groups.push(spec.descriptor());
                    Vec::new()
                })
                .push(column.id.clone());
        }

        let mut expanded = HashSet::new();
        let mut initial_visibility = VisibilityMap::new();
        for group in &groups {
            if group.default_expanded {
                expanded.insert(group.name.clone());
            } else {
                let ids = &members[&group.name];
                for (i, id) in ids.iter().enumerate() {
                    initial_visibility.set(id.clone(), i == 0);
                }
            }
        }

        Self {
            groups,
            members,
            expanded,
            initial_visibility,
        }
    }

    /// The distinct groups in first-occurrence order.
    pub fn groups(&self) -> &[GroupDescriptor] {
        &self.groups
    }

    /// Member column ids for a group, in column order.
    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.members.get(name).map(|ids| ids.as_slice())
    }

    /// Resolved descriptor for a group name.
    pub fn group(&self, name: &str) -> Option<&GroupDescriptor> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Whether a group is currently expanded.
    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded.contains(name)
    }

    /// Visibility overrides implied by the initial expand state:
    /// collapsed groups hide every member but their first.
    pub fn initial_visibility(&self) -> VisibilityMap {
        self.initial_visibility.clone()
    }

    /// Expands a group: every member from the live column list becomes
    /// visible. No-op for unknown groups.
    pub fn expand<T>(
        &mut self,
        name: &str,
        columns: &[Column<T>],
        visibility: &mut VisibilityMap,
    ) {
        if self.group(name).is_none() {
            return;
        }
        for id in live_members(name, columns) {
            visibility.set(id, true);
        }
        self.expanded.insert(name.to_string());
    }

    /// Collapses a group: every member from the live column list is
    /// hidden except the first. No-op for unknown or non-collapsible
    /// groups.
    pub fn collapse<T>(
        &mut self,
        name: &str,
        columns: &[Column<T>],
        visibility: &mut VisibilityMap,
    ) {
        match self.group(name) {
            Some(group) if group.collapsible => {}
            _ => return,
        }
        for (i, id) in live_members(name, columns).into_iter().enumerate() {
            visibility.set(id, i == 0);
        }
        self.expanded.remove(name);
    }

    /// Toggles a group between expanded and collapsed.
    pub fn toggle<T>(
        &mut self,
        name: &str,
        columns: &[Column<T>],
        visibility: &mut VisibilityMap,
    ) {
        if self.is_expanded(name) {
            self.collapse(name, columns, visibility);
        } else {
            self.expand(name, columns, visibility);
        }
    }
}

fn live_members<T>(name: &str, columns: &[Column<T>]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| c.group_name() == Some(name))
        .map(|c| c.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::GroupDescriptor;

    fn col(id: &str) -> Column<()> {
        Column::new(id, id.to_uppercase(), |_: &()| String::new())
    }

    fn spec_columns() -> Vec<Column<()>> {
        vec![
            col("a"),
            col("b").with_group(GroupDescriptor::new("G").default_expanded(false)),
            col("c").with_group("G"),
        ]
    }

    #[test]
    fn test_first_occurrence_order() {
        let columns = vec![
            col("x").with_group("Late"),
            col("y").with_group("Early"),
            col("z").with_group("Late"),
        ];
        let layout = GroupLayout::resolve(&columns);
        let names: Vec<&str> = layout.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Late", "Early"]);
        assert_eq!(layout.members("Late").unwrap(), ["x", "z"]);
    }

    #[test]
    fn test_first_wins_descriptor_policy() {
        let columns = vec![
            col("b").with_group(GroupDescriptor::new("G").default_expanded(false)),
            col("c").with_group(GroupDescriptor::new("G").default_expanded(true)),
        ];
        let layout = GroupLayout::resolve(&columns);
        assert!(!layout.group("G").unwrap().default_expanded);

        // Same columns, opposite declaration order: the first still wins.
        let columns = vec![
            col("c").with_group(GroupDescriptor::new("G").default_expanded(true)),
            col("b").with_group(GroupDescriptor::new("G").default_expanded(false)),
        ];
        let layout = GroupLayout::resolve(&columns);
        assert!(layout.group("G").unwrap().default_expanded);
    }

    #[test]
    fn test_collapsed_group_shows_representative_only() {
        let layout = GroupLayout::resolve(&spec_columns());
        let vis = layout.initial_visibility();
        assert!(vis.is_visible("a"));
        assert!(vis.is_visible("b"));
        assert!(!vis.is_visible("c"));
        assert!(!layout.is_expanded("G"));
    }

    #[test]
    fn test_expanded_group_contributes_no_overrides() {
        let columns = vec![col("b").with_group("G"), col("c").with_group("G")];
        let layout = GroupLayout::resolve(&columns);
        assert_eq!(layout.initial_visibility(), VisibilityMap::new());
        assert!(layout.is_expanded("G"));
    }

    #[test]
    fn test_toggle_round_trip_restores_visibility() {
        let columns = spec_columns();
        let mut layout = GroupLayout::resolve(&columns);
        let mut vis = layout.initial_visibility();

        layout.toggle("G", &columns, &mut vis);
        assert!(vis.is_visible("b") && vis.is_visible("c"));

        layout.toggle("G", &columns, &mut vis);
        assert!(vis.is_visible("b"));
        assert!(!vis.is_visible("c"));
    }

    #[test]
    fn test_toggle_uses_live_column_list() {
        let columns = spec_columns();
        let mut layout = GroupLayout::resolve(&columns);
        let mut vis = layout.initial_visibility();

        // A column added to the group after resolution still gets
        // toggled, because membership is recomputed from the live list.
        let mut live = columns.clone();
        live.push(col("d").with_group("G"));
        layout.expand("G", &live, &mut vis);
        assert!(vis.is_visible("d"));
        layout.collapse("G", &live, &mut vis);
        assert!(!vis.is_visible("d"));
        assert!(vis.is_visible("b"));
    }

    #[test]
    fn test_non_collapsible_group_ignores_collapse() {
        let columns = vec![
            col("b").with_group(GroupDescriptor::new("G").collapsible(false)),
            col("c").with_group("G"),
        ];
        let mut layout = GroupLayout::resolve(&columns);
        let mut vis = layout.initial_visibility();
        layout.collapse("G", &columns, &mut vis);
        assert!(vis.is_visible("c"));
        assert!(layout.is_expanded("G"));
    }

    #[test]
    fn test_unknown_group_toggle_is_noop() {
        let columns = spec_columns();
        let mut layout = GroupLayout::resolve(&columns);
        let mut vis = layout.initial_visibility();
        let before = vis.clone();
        layout.toggle("missing", &columns, &mut vis);
        assert_eq!(vis, before);
    }
}
