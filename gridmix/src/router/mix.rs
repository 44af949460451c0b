use gridmix_core::mix::summary::{breakdown, percentages, summarize};
use gridmix_core::timeseries::aggregate::aggregate_mean;
use gridmix_core::{
    AttributionStrategy, DataBundle, GridmixError, MixReport, Table, TimePattern, TimeWindow,
    attribute, detect_gaps, spain_mix,
};

use crate::Gridmix;

/// What a mix request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixQuery {
    /// Every hour of a window.
    Window(TimeWindow),
    /// Only the hours a recurring pattern selects.
    Pattern(TimePattern),
}

impl From<TimeWindow> for MixQuery {
    fn from(w: TimeWindow) -> Self {
        Self::Window(w)
    }
}

impl From<TimePattern> for MixQuery {
    fn from(p: TimePattern) -> Self {
        Self::Pattern(p)
    }
}

fn empty_report(window: TimeWindow, strategy: AttributionStrategy, gm: &Gridmix) -> MixReport {
    MixReport {
        window,
        strategy,
        granularity: gm.cfg.granularity,
        power: Table::default(),
        percentages: Table::default(),
        spain_power: Table::default(),
        spain_percentages: Table::default(),
        summary: Vec::new(),
        breakdown: Vec::new(),
        warnings: Vec::new(),
    }
}

impl Gridmix {
    /// Compute Portugal's attributed electricity mix with the configured
    /// strategy.
    ///
    /// Behavior:
    /// - Two-country requests (`include_france == false`) always use the
    ///   two-country strategy; three-country requests use the configured one.
    /// - Pattern requests fetch the window enclosing the pattern and keep
    ///   only the hours it selects.
    /// - Spain's effective mix is reported alongside Portugal's: adjusted for
    ///   its exchange with France when France is included.
    /// - When no data exists the report carries empty tables.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a malformed pattern or an out-of-bounds
    /// window before any I/O, plus any fetch, alignment or resolution error.
    pub async fn compute_mix(
        &self,
        query: impl Into<MixQuery>,
        include_france: bool,
    ) -> Result<MixReport, GridmixError> {
        let strategy = if include_france {
            self.cfg.strategy
        } else {
            AttributionStrategy::TwoCountry
        };
        self.compute_mix_with(query, include_france, strategy).await
    }

    /// Compute the attributed mix with an explicit strategy.
    ///
    /// # Errors
    /// Same as [`Self::compute_mix`]; additionally `InvalidArg` when a
    /// three-country strategy is requested without France.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "gridmix::mix::compute_mix",
            skip_all,
            fields(include_france = include_france, strategy = ?strategy),
        )
    )]
    pub async fn compute_mix_with(
        &self,
        query: impl Into<MixQuery>,
        include_france: bool,
        strategy: AttributionStrategy,
    ) -> Result<MixReport, GridmixError> {
        if !include_france && strategy != AttributionStrategy::TwoCountry {
            return Err(GridmixError::invalid_arg(format!(
                "{strategy:?} attribution needs the French series; set include_france"
            )));
        }

        let (window, rules) = match query.into() {
            MixQuery::Window(w) => (w, None),
            MixQuery::Pattern(p) => {
                let rules = p.rules()?;
                (p.window(self.cfg.records_start, self.max_end())?, Some(rules))
            }
        };

        let bundle = self.fetch_bundle(window, include_france).await?;
        let mut warnings = Vec::new();
        let gaps = detect_gaps(&bundle.index, window);
        if !gaps.is_complete() {
            #[cfg(feature = "tracing")]
            tracing::warn!(missing = gaps.missing, expected = gaps.expected, "bundle has gaps");
            warnings.push(GridmixError::Data(format!(
                "{} of {} hours missing in {window}",
                gaps.missing, gaps.expected
            )));
        }

        let bundle: DataBundle = match rules {
            Some(r) => bundle.filter_hours(|ts| r.matches(ts)),
            None => bundle,
        };
        if bundle.is_empty() {
            let mut report = empty_report(window, strategy, self);
            report.warnings = warnings;
            return Ok(report);
        }

        let attribution = attribute(&bundle, strategy)?;
        let power = aggregate_mean(&attribution.total, self.cfg.granularity, self.cfg.timezone);
        let pct = percentages(&power);
        let spain_power =
            aggregate_mean(&spain_mix(&bundle), self.cfg.granularity, self.cfg.timezone);
        let spain_percentages = percentages(&spain_power);
        let summary = summarize(&attribution.total);
        let rows = attribution
            .origins
            .as_ref()
            .map(|parts| breakdown(parts, bundle.len()))
            .unwrap_or_default();

        Ok(MixReport {
            window,
            strategy,
            granularity: self.cfg.granularity,
            power,
            percentages: pct,
            spain_power,
            spain_percentages,
            summary,
            breakdown: rows,
            warnings,
        })
    }
}
