//! Derived category projection: the dashboard name filter.

use crate::model::CategorySummary;

/// Keeps categories whose name contains `query` case-insensitively.
/// A blank query keeps everything.
pub fn filter_categories<'a>(
    categories: &'a [CategorySummary],
    query: &str,
) -> Vec<&'a CategorySummary> {
    let needle = query.to_lowercase();
    categories
        .iter()
        .filter(|category| category.name.to_lowercase().contains(&needle))
        .collect()
}
