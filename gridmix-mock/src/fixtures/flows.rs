use chrono::{DateTime, Timelike, Utc};
use gridmix_core::Area;

/// Physical flow from `from` to `to` at `ts`, in MW.
///
/// Spain exports to Portugal during the day and imports at night; France
/// exports to Spain around the clock.
pub fn value(from: Area, to: Area, ts: DateTime<Utc>) -> f64 {
    let h = f64::from(ts.hour());
    let daytime = (8.0..20.0).contains(&h);
    match (from, to) {
        (Area::Spain, Area::Portugal) => {
            if daytime {
                1_400.0 + 20.0 * h
            } else {
                0.0
            }
        }
        (Area::Portugal, Area::Spain) => {
            if daytime {
                0.0
            } else {
                600.0 + 10.0 * h
            }
        }
        (Area::France, Area::Spain) => 2_000.0 + 25.0 * h,
        (Area::Spain, Area::France) => {
            if daytime {
                500.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
