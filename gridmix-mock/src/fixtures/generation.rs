use std::f64::consts::PI;

use chrono::{DateTime, Timelike, Utc};
use gridmix_core::Area;

/// Installed production types per area with a base output in MW.
pub const fn profile(area: Area) -> &'static [(&'static str, f64)] {
    match area {
        Area::Portugal => &[
            ("B01", 350.0),
            ("B04", 1_200.0),
            ("B11", 500.0),
            ("B12", 900.0),
            ("B16", 1_500.0),
            ("B19", 1_800.0),
        ],
        Area::Spain => &[
            ("B01", 450.0),
            ("B04", 4_000.0),
            ("B10", 700.0),
            ("B11", 1_100.0),
            ("B14", 6_500.0),
            ("B16", 9_000.0),
            ("B19", 7_500.0),
        ],
        Area::France => &[
            ("B04", 2_000.0),
            ("B11", 3_000.0),
            ("B12", 2_500.0),
            ("B14", 40_000.0),
            ("B16", 4_000.0),
            ("B19", 6_000.0),
        ],
    }
}

fn fractional_hour(ts: DateTime<Utc>) -> f64 {
    f64::from(ts.hour()) + f64::from(ts.minute()) / 60.0
}

/// Output of `code` at `ts` given its base output.
///
/// Solar follows a daylight bell between 06:00 and 18:00 UTC; everything
/// else varies by ±10% over the day.
pub fn value(code: &str, base: f64, ts: DateTime<Utc>) -> f64 {
    let h = fractional_hour(ts);
    if code == "B16" {
        if (6.0..18.0).contains(&h) {
            base * (PI * (h - 6.0) / 12.0).sin()
        } else {
            0.0
        }
    } else {
        base * 0.1f64.mul_add((2.0 * PI * h / 24.0).cos(), 1.0)
    }
}
