use std::collections::BTreeSet;

use crate::{AttributionStrategy, DataBundle, GridmixError, Table, is_psr_code};

/// Attributed mix of Portugal.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribution {
    /// Per-hour, per-source power (MW).
    pub total: Table,
    /// Per-origin contributions; only produced by the discriminated strategy.
    pub origins: Option<OriginParts>,
}

/// Contributions to Portugal's mix split by the country that generated them.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginParts {
    /// Power generated in Portugal and consumed there.
    pub pt: Table,
    /// Power generated in Spain and imported.
    pub es: Table,
    /// Power generated in France and imported through Spain.
    pub fr: Table,
}

fn guard(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { x }
}

/// Keep only production-type columns.
fn generation_only(t: &Table) -> Table {
    t.select_columns(is_psr_code)
}

/// Row-wise shares `X / ΣX`, with a zero row sum replaced by 1.
#[must_use]
pub fn row_fractions(t: &Table) -> Table {
    let mut out = t.clone();
    for row in &mut out.rows {
        let total = guard(row.iter().sum());
        for v in row.iter_mut() {
            *v /= total;
        }
    }
    out
}

/// Multiply row `i` by `factors[i]`.
fn scale_rows(t: &Table, factors: &[f64]) -> Table {
    let mut out = t.clone();
    for (row, f) in out.rows.iter_mut().zip(factors) {
        for v in row.iter_mut() {
            *v *= f;
        }
    }
    out
}

/// Reindex `t` onto `columns`, filling absent columns with zeros.
fn with_columns(t: &Table, columns: &[String]) -> Table {
    let map: Vec<Option<usize>> = columns.iter().map(|c| t.column_index(c)).collect();
    let rows = t
        .rows
        .iter()
        .map(|r| map.iter().map(|j| j.map_or(0.0, |j| r[j])).collect())
        .collect();
    Table::new(t.index.clone(), columns.to_vec(), rows)
}

/// Element-wise `Σ sign_k * t_k`, aligned by column name (union, sorted).
fn combine(terms: &[(f64, &Table)]) -> Table {
    let columns: Vec<String> = terms
        .iter()
        .flat_map(|(_, t)| t.columns.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let index = terms.first().map(|(_, t)| t.index.clone()).unwrap_or_default();
    let mut rows = vec![vec![0.0; columns.len()]; index.len()];
    for (sign, t) in terms {
        let aligned = with_columns(t, &columns);
        for (acc, row) in rows.iter_mut().zip(&aligned.rows) {
            for (a, v) in acc.iter_mut().zip(row) {
                *a += sign * v;
            }
        }
    }
    Table::new(index, columns, rows)
}

/// `G_local - F_out * frac(G_local) + F_in * frac(G_remote)`.
fn exchange(local: &Table, outflow: &[f64], inflow: &[f64], remote: &Table) -> Table {
    let exported = scale_rows(&row_fractions(local), outflow);
    let imported = scale_rows(&row_fractions(remote), inflow);
    combine(&[(1.0, local), (-1.0, &exported), (1.0, &imported)])
}

fn require_france(bundle: &DataBundle) -> Result<(&Table, &[f64], &[f64]), GridmixError> {
    match (&bundle.generation_fr, &bundle.flow_fr_to_es, &bundle.flow_es_to_fr) {
        (Some(g), Some(fr_es), Some(es_fr)) => Ok((g, fr_es.as_slice(), es_fr.as_slice())),
        _ => Err(GridmixError::invalid_arg(
            "three-country attribution requires FR generation and FR<->ES flows",
        )),
    }
}

/// PT and ES only:
/// `PT = G_pt - F_pt_es * frac(G_pt) + F_es_pt * frac(G_es)`.
#[must_use]
pub fn two_country(bundle: &DataBundle) -> Table {
    exchange(
        &generation_only(&bundle.generation_pt),
        &bundle.flow_pt_to_es,
        &bundle.flow_es_to_pt,
        &generation_only(&bundle.generation_es),
    )
}

/// Spain's mix after exchanging with France:
/// `ES' = G_es - F_es_fr * frac(G_es) + F_fr_es * frac(G_fr)`.
///
/// # Errors
/// Returns `InvalidArg` if the bundle carries no French series.
pub fn spain_adjusted(bundle: &DataBundle) -> Result<Table, GridmixError> {
    let (g_fr, fr_es, es_fr) = require_france(bundle)?;
    Ok(exchange(
        &generation_only(&bundle.generation_es),
        es_fr,
        fr_es,
        &generation_only(g_fr),
    ))
}

/// Spain's effective mix: [`spain_adjusted`] when the bundle carries the
/// French series, otherwise Spain's own generation.
#[must_use]
pub fn spain_mix(bundle: &DataBundle) -> Table {
    spain_adjusted(bundle).unwrap_or_else(|_| generation_only(&bundle.generation_es))
}

/// Three-country chain following FR -> ES -> PT: first fold France into
/// Spain, then attribute the adjusted Spanish mix to Portugal's imports.
///
/// # Errors
/// Returns `InvalidArg` if the bundle carries no French series.
pub fn chain(bundle: &DataBundle) -> Result<Table, GridmixError> {
    let es_adjusted = spain_adjusted(bundle)?;
    Ok(exchange(
        &generation_only(&bundle.generation_pt),
        &bundle.flow_pt_to_es,
        &bundle.flow_es_to_pt,
        &es_adjusted,
    ))
}

/// Keep Portugal's own, Spanish and French contributions separate.
///
/// - `PT_part = G_pt * (1 - F_pt_es / ΣG_pt)`
/// - `Avail = ΣG_es - F_es_fr + F_fr_es`, with `ΣG_es` already guarded
/// - `ES_part = G_es * F_es_pt * (1 - F_es_fr / ΣG_es) / Avail`
/// - `FR_part = G_fr * F_es_pt * (F_fr_es / ΣG_fr) / Avail`
///
/// Every sum and `Avail` is replaced by 1 when zero.
///
/// # Errors
/// Returns `InvalidArg` if the bundle carries no French series.
pub fn discriminated(bundle: &DataBundle) -> Result<Attribution, GridmixError> {
    let (g_fr, fr_es, es_fr) = require_france(bundle)?;
    let g_pt = generation_only(&bundle.generation_pt);
    let g_es = generation_only(&bundle.generation_es);
    let g_fr = generation_only(g_fr);

    let sum_pt = g_pt.row_sums();
    let sum_es = g_es.row_sums();
    let sum_fr = g_fr.row_sums();

    let mut pt_factor = Vec::with_capacity(bundle.len());
    let mut es_factor = Vec::with_capacity(bundle.len());
    let mut fr_factor = Vec::with_capacity(bundle.len());
    for i in 0..bundle.len() {
        let es_total = guard(sum_es[i]);
        let avail = guard(es_total - es_fr[i] + fr_es[i]);
        let imported = bundle.flow_es_to_pt[i];
        pt_factor.push(1.0 - bundle.flow_pt_to_es[i] / guard(sum_pt[i]));
        es_factor.push(imported * (1.0 - es_fr[i] / es_total) / avail);
        fr_factor.push(imported * (fr_es[i] / guard(sum_fr[i])) / avail);
    }

    let pt = scale_rows(&g_pt, &pt_factor);
    let es = scale_rows(&g_es, &es_factor);
    let fr = scale_rows(&g_fr, &fr_factor);
    let total = combine(&[(1.0, &pt), (1.0, &es), (1.0, &fr)]);
    Ok(Attribution {
        total,
        origins: Some(OriginParts { pt, es, fr }),
    })
}

/// Run the selected attribution strategy over `bundle`.
///
/// # Errors
/// Returns `InvalidArg` when a three-country strategy is requested for a
/// bundle without French series.
pub fn attribute(
    bundle: &DataBundle,
    strategy: AttributionStrategy,
) -> Result<Attribution, GridmixError> {
    match strategy {
        AttributionStrategy::TwoCountry => Ok(Attribution {
            total: two_country(bundle),
            origins: None,
        }),
        AttributionStrategy::Chain => Ok(Attribution {
            total: chain(bundle)?,
            origins: None,
        }),
        AttributionStrategy::Discriminated => discriminated(bundle),
    }
}
