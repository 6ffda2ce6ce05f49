//! Row type shared between the feed reader and the normalizers.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// One data row of the feed: column name → cell text, exactly as read.
///
/// The column set is whatever the spreadsheet header says; a renamed or
/// missing column simply reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. The first value stored under a column name wins.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.entry(column.into()).or_insert_with(|| value.into());
    }

    /// The untouched cell text, if the column exists in this row.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// The trimmed cell text, or `None` if the column is missing or blank.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.raw(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// First non-blank value among `columns`, in the order given.
    pub fn first_of(&self, columns: &[&str]) -> Option<&str> {
        columns.iter().find_map(|c| self.get(c))
    }

    /// `true` if `column` holds non-blank text.
    pub fn has(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// `true` when every cell is blank (or the row has no cells at all).
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}
