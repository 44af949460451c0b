//! Aligned set of series consumed by the attribution engine.

use chrono::{DateTime, Utc};

use crate::{FLOW_COLUMN, GridmixError, SeriesKey, Table};

/// Generation tables and directed flows for one request, on one hourly index.
///
/// France is optional: two-country requests leave the FR fields empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataBundle {
    /// Shared hourly index.
    pub index: Vec<DateTime<Utc>>,
    /// PT generation per production type (MW).
    pub generation_pt: Table,
    /// ES generation per production type (MW).
    pub generation_es: Table,
    /// FR generation per production type (MW).
    pub generation_fr: Option<Table>,
    /// Flow PT -> ES (MW).
    pub flow_pt_to_es: Vec<f64>,
    /// Flow ES -> PT (MW).
    pub flow_es_to_pt: Vec<f64>,
    /// Flow FR -> ES (MW).
    pub flow_fr_to_es: Option<Vec<f64>>,
    /// Flow ES -> FR (MW).
    pub flow_es_to_fr: Option<Vec<f64>>,
}

/// Check that every table shares the index of the first one.
///
/// # Errors
/// Returns `IndexMismatch` naming the first misaligned series and the reference.
pub fn assert_aligned(series: &[(SeriesKey, Table)]) -> Result<(), GridmixError> {
    let Some((ref_key, reference)) = series.first() else {
        return Ok(());
    };
    for (key, table) in &series[1..] {
        if table.index != reference.index {
            return Err(GridmixError::IndexMismatch {
                series: key.cache_name(),
                reference: ref_key.cache_name(),
            });
        }
    }
    Ok(())
}

fn flow_values(key: SeriesKey, table: &Table) -> Result<Vec<f64>, GridmixError> {
    if table.is_empty() {
        return Ok(Vec::new());
    }
    table.column(FLOW_COLUMN).ok_or_else(|| {
        GridmixError::Data(format!("{key} has no {FLOW_COLUMN} column"))
    })
}

impl DataBundle {
    /// Assemble a bundle from normalized tables.
    ///
    /// PT/ES generation and the PT<->ES flows are required; the French series
    /// are taken when present. Indices are compared before anything else and a
    /// mismatch is never repaired.
    ///
    /// # Errors
    /// Returns `IndexMismatch` when indices differ, or `Data` when a required
    /// series is missing or a flow table lacks its value column.
    pub fn assemble(series: Vec<(SeriesKey, Table)>) -> Result<Self, GridmixError> {
        assert_aligned(&series)?;

        let index = series
            .first()
            .map(|(_, t)| t.index.clone())
            .unwrap_or_default();
        let mut bundle = Self {
            index,
            ..Self::default()
        };
        let mut seen: Vec<SeriesKey> = Vec::with_capacity(series.len());
        for (key, table) in series {
            seen.push(key);
            match key {
                SeriesKey::GENERATION_PT => bundle.generation_pt = table,
                SeriesKey::GENERATION_ES => bundle.generation_es = table,
                SeriesKey::GENERATION_FR => bundle.generation_fr = Some(table),
                SeriesKey::FLOW_PT_TO_ES => bundle.flow_pt_to_es = flow_values(key, &table)?,
                SeriesKey::FLOW_ES_TO_PT => bundle.flow_es_to_pt = flow_values(key, &table)?,
                SeriesKey::FLOW_FR_TO_ES => bundle.flow_fr_to_es = Some(flow_values(key, &table)?),
                SeriesKey::FLOW_ES_TO_FR => bundle.flow_es_to_fr = Some(flow_values(key, &table)?),
                other => {
                    return Err(GridmixError::Data(format!(
                        "{other} is not part of the PT/ES/FR bundle"
                    )));
                }
            }
        }

        for required in [
            SeriesKey::GENERATION_PT,
            SeriesKey::GENERATION_ES,
            SeriesKey::FLOW_PT_TO_ES,
            SeriesKey::FLOW_ES_TO_PT,
        ] {
            if !seen.contains(&required) {
                return Err(GridmixError::Data(format!("bundle is missing {required}")));
            }
        }
        Ok(bundle)
    }

    /// Number of hours in the bundle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the bundle holds no hours.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// True when all French series are present.
    #[must_use]
    pub const fn has_france(&self) -> bool {
        self.generation_fr.is_some() && self.flow_fr_to_es.is_some() && self.flow_es_to_fr.is_some()
    }

    /// Keep only the hours whose timestamp satisfies `keep`.
    #[must_use]
    pub fn filter_hours<F>(&self, keep: F) -> Self
    where
        F: Fn(DateTime<Utc>) -> bool,
    {
        let mask: Vec<bool> = self.index.iter().map(|ts| keep(*ts)).collect();
        let pick = |v: &Vec<f64>| -> Vec<f64> {
            v.iter()
                .zip(&mask)
                .filter_map(|(x, m)| m.then_some(*x))
                .collect()
        };
        Self {
            index: self.index.iter().zip(&mask).filter_map(|(t, m)| m.then_some(*t)).collect(),
            generation_pt: self.generation_pt.filter_rows(&keep),
            generation_es: self.generation_es.filter_rows(&keep),
            generation_fr: self.generation_fr.as_ref().map(|t| t.filter_rows(&keep)),
            flow_pt_to_es: pick(&self.flow_pt_to_es),
            flow_es_to_pt: pick(&self.flow_es_to_pt),
            flow_fr_to_es: self.flow_fr_to_es.as_ref().map(pick),
            flow_es_to_fr: self.flow_es_to_fr.as_ref().map(pick),
        }
    }
}
