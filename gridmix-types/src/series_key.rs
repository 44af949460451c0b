//! Typed identifiers for the series the orchestrator fetches and caches.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::area::Area;

/// ENTSO-E document type for actual generation per production type.
pub const DOCUMENT_GENERATION: &str = "A75";
/// ENTSO-E document type for cross-border physical flows.
pub const DOCUMENT_FLOW: &str = "A11";
/// ENTSO-E process type for realised values.
pub const PROCESS_REALISED: &str = "A16";

/// Identity of one cached series: a document type plus its domain(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeriesKey {
    /// Actual generation per production type for one area.
    Generation(Area),
    /// Physical flow leaving `from` and entering `to`.
    Flow {
        /// Exporting area (`out_Domain`).
        from: Area,
        /// Importing area (`in_Domain`).
        to: Area,
    },
}

impl SeriesKey {
    /// PT generation.
    pub const GENERATION_PT: Self = Self::Generation(Area::Portugal);
    /// ES generation.
    pub const GENERATION_ES: Self = Self::Generation(Area::Spain);
    /// FR generation.
    pub const GENERATION_FR: Self = Self::Generation(Area::France);
    /// Flow PT -> ES.
    pub const FLOW_PT_TO_ES: Self = Self::Flow {
        from: Area::Portugal,
        to: Area::Spain,
    };
    /// Flow ES -> PT.
    pub const FLOW_ES_TO_PT: Self = Self::Flow {
        from: Area::Spain,
        to: Area::Portugal,
    };
    /// Flow FR -> ES.
    pub const FLOW_FR_TO_ES: Self = Self::Flow {
        from: Area::France,
        to: Area::Spain,
    };
    /// Flow ES -> FR.
    pub const FLOW_ES_TO_FR: Self = Self::Flow {
        from: Area::Spain,
        to: Area::France,
    };

    /// Every series of a full three-country bundle, in bundle order.
    pub const BUNDLE: [Self; 7] = [
        Self::GENERATION_PT,
        Self::GENERATION_ES,
        Self::GENERATION_FR,
        Self::FLOW_PT_TO_ES,
        Self::FLOW_ES_TO_PT,
        Self::FLOW_FR_TO_ES,
        Self::FLOW_ES_TO_FR,
    ];

    /// Every series that can be named, one generation key per area and one
    /// flow key per ordered pair of distinct areas.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let flows = Area::ALL.into_iter().flat_map(|from| {
            Area::ALL
                .into_iter()
                .filter(move |&to| to != from)
                .map(move |to| Self::Flow { from, to })
        });
        Area::ALL.into_iter().map(Self::Generation).chain(flows).collect()
    }

    /// Deterministic cache entry name (e.g. `generation_pt`, `flow_es_to_fr`).
    #[must_use]
    pub fn cache_name(self) -> String {
        match self {
            Self::Generation(area) => format!("generation_{}", area.slug()),
            Self::Flow { from, to } => format!("flow_{}_to_{}", from.slug(), to.slug()),
        }
    }

    /// ENTSO-E `documentType` for this series.
    #[must_use]
    pub const fn document_type(self) -> &'static str {
        match self {
            Self::Generation(_) => DOCUMENT_GENERATION,
            Self::Flow { .. } => DOCUMENT_FLOW,
        }
    }

    /// True for generation series, which carry one column per production type.
    #[must_use]
    pub const fn is_generation(self) -> bool {
        matches!(self, Self::Generation(_))
    }

    /// Query parameters identifying this series at the remote API, excluding
    /// the period and the security token.
    ///
    /// These are also persisted in cache metadata for provenance.
    #[must_use]
    pub fn request_params(self) -> Vec<(&'static str, String)> {
        match self {
            Self::Generation(area) => vec![
                ("documentType", DOCUMENT_GENERATION.to_string()),
                ("processType", PROCESS_REALISED.to_string()),
                ("in_Domain", area.eic_code().to_string()),
                ("outBiddingZone_Domain", area.eic_code().to_string()),
            ],
            Self::Flow { from, to } => vec![
                ("documentType", DOCUMENT_FLOW.to_string()),
                ("in_Domain", to.eic_code().to_string()),
                ("out_Domain", from.eic_code().to_string()),
            ],
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_name())
    }
}
