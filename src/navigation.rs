//! Builds the two-level navigation tree from flat spreadsheet rows.

use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Target used when a row leaves `target` blank.
pub const DEFAULT_TARGET: &str = "_self";

/// One entry of the navigation menu. Children never carry children of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub name: String,
    pub link: String,
    pub target: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavigationItem>>,
}

impl NavigationItem {
    /// Item for a row, with an empty `target` replaced by [`DEFAULT_TARGET`].
    /// Whitespace-only targets pass through as written.
    pub fn from_row(row: &Row) -> Self {
        let target = if row.target.is_empty() {
            DEFAULT_TARGET.to_string()
        } else {
            row.target.clone()
        };
        NavigationItem {
            name: row.name.clone(),
            link: row.link.clone(),
            target,
            description: row.description.clone(),
            children: None,
        }
    }

    /// Stand-in parent for a name that rows reference but never define.
    pub fn placeholder(name: &str) -> Self {
        NavigationItem {
            name: name.to_string(),
            link: String::new(),
            target: DEFAULT_TARGET.to_string(),
            description: String::new(),
            children: None,
        }
    }

    /// Attaches every row whose trimmed `parent_name` equals this item's trimmed
    /// name. A blank-named item therefore adopts all top-level rows, itself included.
    fn with_children_from(mut self, rows: &[Row]) -> Self {
        let key = self.name.trim();
        let children: Vec<NavigationItem> = rows
            .iter()
            .filter(|r| r.parent_name.trim() == key)
            .map(|r| NavigationItem::from_row(r))
            .collect();
        if !children.is_empty() {
            self.children = Some(children);
        }
        self
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }
}

/// Parent names referenced by some row but not present as any row's name,
/// trimmed and in first-seen order.
pub fn missing_parents(rows: &[Row]) -> Vec<String> {
    let names: HashSet<&str> = rows.iter().map(|r| r.name.trim()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    rows.iter()
        .map(|r| r.parent_name.trim())
        .filter(|p| !p.is_empty() && !names.contains(p) && seen.insert(p))
        .map(str::to_string)
        .collect()
}

/// Converts rows into top-level navigation items.
///
/// Rows with a blank `parent_name` become top-level items in row order, each
/// adopting the rows whose trimmed `parent_name` matches its trimmed name.
/// Parents that are referenced but missing are appended as placeholders.
pub fn build_navigation_items(rows: &[Row]) -> Vec<NavigationItem> {
    let (roots, child_rows): (Vec<&Row>, Vec<&Row>) =
        rows.iter().partition(|r| r.parent_name.trim().is_empty());
    let missing = missing_parents(rows);

    debug!(
        roots = roots.len(),
        children = child_rows.len(),
        missing_parents = missing.len(),
        "Partitioned navigation rows"
    );

    let mut items: Vec<NavigationItem> = roots
        .iter()
        .map(|r| NavigationItem::from_row(r).with_children_from(rows))
        .collect();

    items.extend(
        missing
            .iter()
            .map(|name| NavigationItem::placeholder(name).with_children_from(rows)),
    );

    info!(
        items = items.len(),
        placeholders = missing.len(),
        "Built navigation items"
    );
    items
}
