//! Y-gap paragraph grouping.
//!
//! Page items are sorted by descending top edge (higher on the page first),
//! ties broken by ascending left edge, then split into paragraphs wherever
//! the vertical gap between consecutive items exceeds the configured
//! threshold. This is the whole layout model: no line, column, or table
//! detection sits on top of it.

use std::cmp::Ordering;

/// Anything placeable on a page by its top-left corner.
pub trait Positioned {
    /// Top edge in user space (larger is higher on the page).
    fn top(&self) -> f64;
    /// Left edge in user space.
    fn left(&self) -> f64;
}

/// Sort items into reading order and split them into paragraph groups at
/// vertical gaps larger than `gap`.
pub fn group_by_gap<T: Positioned>(mut items: Vec<T>, gap: f64) -> Vec<Vec<T>> {
    items.sort_by(|a, b| {
        b.top()
            .partial_cmp(&a.top())
            .unwrap_or(Ordering::Equal)
            .then(a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal))
    });

    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut last_top: Option<f64> = None;
    for item in items {
        let top = item.top();
        let split = match last_top {
            Some(prev) => (prev - top).abs() > gap,
            None => true,
        };
        if split {
            groups.push(Vec::new());
        }
        last_top = Some(top);
        if let Some(group) = groups.last_mut() {
            group.push(item);
        }
    }
    groups
}
