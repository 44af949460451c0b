//! Row and table shapes shared by sources, the normalizer and attribution.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Column name used for the single value column of flow series.
pub const FLOW_COLUMN: &str = "Power";

/// One time-stamped observation as produced by a source.
///
/// Invariant: `end_time == start_time + resolution`.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Inclusive start of the observation interval.
    pub start_time: DateTime<Utc>,
    /// Exclusive end of the observation interval.
    pub end_time: DateTime<Utc>,
    /// Width of the observation interval.
    pub resolution: TimeDelta,
    /// Average power over the interval (MW).
    pub value: f64,
    /// Production type for generation series; `None` for flows.
    pub category: Option<String>,
}

impl Point {
    /// Build a point, deriving `end_time` from `start_time + resolution`.
    #[must_use]
    pub fn new(
        start_time: DateTime<Utc>,
        resolution: TimeDelta,
        value: f64,
        category: Option<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: start_time + resolution,
            resolution,
            value,
            category,
        }
    }

    /// Category name used when pivoting: the production type, or `Power` for flows.
    #[must_use]
    pub fn column(&self) -> &str {
        self.category.as_deref().unwrap_or(FLOW_COLUMN)
    }
}

/// Wide table: one row per timestamp, one column per category.
///
/// Rows are sorted by timestamp and `rows[i].len() == columns.len()` for all `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Row timestamps, ascending and unique.
    pub index: Vec<DateTime<Utc>>,
    /// Column names.
    pub columns: Vec<String>,
    /// Row-major values.
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table from parts.
    #[must_use]
    pub const fn new(index: Vec<DateTime<Utc>>, columns: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        Self {
            index,
            columns,
            rows,
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Position of a named column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy of a named column's values.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[j]).collect())
    }

    /// Value at row `i` of column `name`, or `0.0` if the column is absent.
    #[must_use]
    pub fn value_or_zero(&self, i: usize, name: &str) -> f64 {
        self.column_index(name)
            .and_then(|j| self.rows.get(i).map(|r| r[j]))
            .unwrap_or(0.0)
    }

    /// Sum of each row.
    #[must_use]
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.iter().sum()).collect()
    }

    /// Keep only the rows whose timestamp satisfies `keep`.
    #[must_use]
    pub fn filter_rows<F>(&self, keep: F) -> Self
    where
        F: Fn(DateTime<Utc>) -> bool,
    {
        let mut out = Self::new(Vec::new(), self.columns.clone(), Vec::new());
        for (ts, row) in self.index.iter().zip(&self.rows) {
            if keep(*ts) {
                out.index.push(*ts);
                out.rows.push(row.clone());
            }
        }
        out
    }

    /// Keep only the columns whose name satisfies `keep`, preserving order.
    #[must_use]
    pub fn select_columns<F>(&self, keep: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let picked: Vec<usize> = (0..self.columns.len())
            .filter(|&j| keep(&self.columns[j]))
            .collect();
        Self {
            index: self.index.clone(),
            columns: picked.iter().map(|&j| self.columns[j].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| picked.iter().map(|&j| r[j]).collect())
                .collect(),
        }
    }
}
