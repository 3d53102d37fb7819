//! Filtered, sorted projection of a record list for display.
//!
//! [`view`] is pure: the same input, filter and sort always give the same output.

use crate::{
    errors::{Error, Result},
    models::RecordFields,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, str::FromStr};

/// Column a record list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Calendar date
    Date,
    /// Record type name
    Type,
    /// Signed amount
    Amount,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest first
    #[serde(alias = "desc")]
    Descending,
}

/// A sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to compare
    pub key: SortKey,
    /// Direction to apply
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort spec after selecting `key`, given the current one.
    ///
    /// Selecting the column already sorted ascending flips it to descending;
    /// anything else starts ascending.
    #[must_use]
    pub fn toggle(current: Option<Self>, key: SortKey) -> Self {
        let direction = match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        Self { key, direction }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "type" => Ok(Self::Type),
            "amount" => Ok(Self::Amount),
            other => Err(Error::validation(format!(
                "Unknown sort key '{other}': expected date, type or amount"
            ))),
        }
    }
}

fn matches_filter<R: RecordFields>(item: &R, needle: &str) -> bool {
    let record = item.record();
    record.description.to_lowercase().contains(needle)
        || record.record_type.as_str().contains(needle)
}

fn compare<R: RecordFields>(a: &R, b: &R, key: SortKey) -> Ordering {
    let (a, b) = (a.record(), b.record());
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Type => a.record_type.as_str().cmp(b.record_type.as_str()),
        SortKey::Amount => a.amount.cmp(&b.amount),
    }
}

/// Filters `records` by `filter` and optionally sorts the result.
///
/// The filter is a case-insensitive substring match on description or type; an
/// empty filter keeps everything. The sort is stable and, when `sort` is None, the
/// input order is preserved.
#[must_use]
pub fn view<R: RecordFields + Clone>(records: &[R], filter: &str, sort: Option<SortSpec>) -> Vec<R> {
    let needle = filter.to_lowercase();
    let mut items: Vec<R> = if needle.is_empty() {
        records.to_vec()
    } else {
        records
            .iter()
            .filter(|item| matches_filter(*item, &needle))
            .cloned()
            .collect()
    };

    if let Some(spec) = sort {
        items.sort_by(|a, b| {
            let ordering = compare(a, b, spec.key);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    items
}
