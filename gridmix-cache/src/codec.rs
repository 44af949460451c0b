//! Columnar JSON encoding of cached series.

use chrono::{DateTime, TimeDelta, Utc};
use gridmix_core::{GridmixError, Point};
use serde::{Deserialize, Serialize};

/// One array per field, all of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnarSeries {
    /// Point start times.
    pub start_time: Vec<DateTime<Utc>>,
    /// Point resolutions in seconds.
    pub resolution_secs: Vec<i64>,
    /// Point values.
    pub value: Vec<f64>,
    /// Point categories (`null` for flows).
    pub category: Vec<Option<String>>,
}

impl ColumnarSeries {
    /// Split points into columns.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Self {
        let mut out = Self {
            start_time: Vec::with_capacity(points.len()),
            resolution_secs: Vec::with_capacity(points.len()),
            value: Vec::with_capacity(points.len()),
            category: Vec::with_capacity(points.len()),
        };
        for p in points {
            out.start_time.push(p.start_time);
            out.resolution_secs.push(p.resolution.num_seconds());
            out.value.push(p.value);
            out.category.push(p.category.clone());
        }
        out
    }

    /// Rebuild points, deriving `end_time` from the resolution.
    ///
    /// # Errors
    /// Returns `GridmixError::Data` if the columns differ in length or a
    /// resolution is not positive.
    pub fn into_points(self) -> Result<Vec<Point>, GridmixError> {
        let n = self.start_time.len();
        if self.resolution_secs.len() != n || self.value.len() != n || self.category.len() != n {
            return Err(GridmixError::Data(format!(
                "columnar series has ragged columns: start_time={n} resolution={} value={} category={}",
                self.resolution_secs.len(),
                self.value.len(),
                self.category.len()
            )));
        }
        self.start_time
            .into_iter()
            .zip(self.resolution_secs)
            .zip(self.value)
            .zip(self.category)
            .map(|(((start, secs), value), category)| {
                if secs <= 0 {
                    return Err(GridmixError::Data(format!(
                        "non-positive resolution {secs}s at {start}"
                    )));
                }
                Ok(Point::new(start, TimeDelta::seconds(secs), value, category))
            })
            .collect()
    }
}
