use crate::mix::attribution::OriginParts;
use crate::{Area, BreakdownRow, SourceShare, Table, label_for};

/// Per-row percentages of each column.
///
/// Negative shares are clamped to zero and the row is renormalized to 100.
/// Rows summing to zero (before or after clamping) yield zeros.
#[must_use]
pub fn percentages(table: &Table) -> Table {
    let mut out = table.clone();
    for row in &mut out.rows {
        let total: f64 = row.iter().sum();
        if total == 0.0 {
            row.iter_mut().for_each(|v| *v = 0.0);
            continue;
        }
        for v in row.iter_mut() {
            *v = (*v / total * 100.0).max(0.0);
        }
        let clamped: f64 = row.iter().sum();
        for v in row.iter_mut() {
            *v = if clamped == 0.0 {
                0.0
            } else {
                *v / clamped * 100.0
            };
        }
    }
    out
}

/// Column-wise mean over all rows, skipping columns that are zero everywhere.
#[must_use]
pub fn time_aggregation(table: &Table) -> Vec<(String, f64)> {
    if table.is_empty() {
        return Vec::new();
    }
    let n = table.len() as f64;
    table
        .columns
        .iter()
        .enumerate()
        .filter(|(j, _)| table.rows.iter().any(|r| r[*j] != 0.0))
        .map(|(j, name)| {
            let sum: f64 = table.rows.iter().map(|r| r[j]).sum();
            (name.clone(), sum / n)
        })
        .collect()
}

/// Rename production-type columns to their human labels.
#[must_use]
pub fn label_columns(table: &Table) -> Table {
    let mut out = table.clone();
    for c in &mut out.columns {
        *c = label_for(c).to_string();
    }
    out
}

/// Mean power per source with its share of the positive total, largest first.
#[must_use]
pub fn summarize(table: &Table) -> Vec<SourceShare> {
    let means: Vec<(String, f64)> = time_aggregation(table)
        .into_iter()
        .filter(|(_, m)| *m > 0.0)
        .collect();
    let total: f64 = means.iter().map(|(_, m)| m).sum();
    let mut out: Vec<SourceShare> = means
        .into_iter()
        .map(|(source, mean_mw)| SourceShare {
            source: label_for(&source).to_string(),
            mean_mw,
            percent: if total == 0.0 { 0.0 } else { mean_mw / total * 100.0 },
        })
        .collect();
    out.sort_by(|a, b| b.mean_mw.total_cmp(&a.mean_mw));
    out
}

/// Format an energy amount with a MWh, GWh or TWh unit.
#[must_use]
pub fn format_energy(mwh: f64) -> String {
    let abs = mwh.abs();
    if abs >= 1e6 {
        format!("{:.2} TWh", mwh / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2} GWh", mwh / 1e3)
    } else {
        format!("{mwh:.2} MWh")
    }
}

/// One row per (origin, source) describing how Portugal's mix is composed.
///
/// `hours` is the number of hours the means were taken over and converts mean
/// power into energy.
#[must_use]
pub fn breakdown(parts: &OriginParts, hours: usize) -> Vec<BreakdownRow> {
    let per_origin: Vec<(Area, Vec<(String, f64)>)> = [
        (Area::Portugal, &parts.pt),
        (Area::Spain, &parts.es),
        (Area::France, &parts.fr),
    ]
    .into_iter()
    .map(|(area, table)| (area, time_aggregation(table)))
    .collect();

    let global: f64 = per_origin
        .iter()
        .flat_map(|(_, means)| means.iter().map(|(_, m)| m))
        .sum();

    let mut rows = Vec::new();
    for (origin, means) in per_origin {
        let national: f64 = means.iter().map(|(_, m)| m).sum();
        for (source, power_mw) in means {
            let energy_mwh = power_mw * hours as f64;
            rows.push(BreakdownRow {
                origin,
                source: label_for(&source).to_string(),
                power_mw,
                national_percent: if national == 0.0 {
                    0.0
                } else {
                    power_mw / national * 100.0
                },
                global_percent: if global == 0.0 {
                    0.0
                } else {
                    power_mw / global * 100.0
                },
                energy_mwh,
                energy: format_energy(energy_mwh),
            });
        }
    }
    rows
}
