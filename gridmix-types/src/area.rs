//! Bidding areas covered by the three-country chain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GridmixError;

/// A bidding area (country) on the FR -> ES -> PT interconnection chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    /// Portugal (REN).
    #[serde(rename = "PT")]
    Portugal,
    /// Spain (REE).
    #[serde(rename = "ES")]
    Spain,
    /// France (RTE).
    #[serde(rename = "FR")]
    France,
}

impl Area {
    /// All areas, ordered along the attribution chain from the consuming end.
    pub const ALL: [Self; 3] = [Self::Portugal, Self::Spain, Self::France];

    /// ENTSO-E EIC domain code for this area.
    #[must_use]
    pub const fn eic_code(self) -> &'static str {
        match self {
            Self::Portugal => "10YPT-REN------W",
            Self::Spain => "10YES-REE------0",
            Self::France => "10YFR-RTE------C",
        }
    }

    /// Two-letter ISO country code.
    #[must_use]
    pub const fn iso_code(self) -> &'static str {
        match self {
            Self::Portugal => "PT",
            Self::Spain => "ES",
            Self::France => "FR",
        }
    }

    /// Lowercase suffix used in cache entry names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Portugal => "pt",
            Self::Spain => "es",
            Self::France => "fr",
        }
    }

    /// Resolve an area from its EIC domain code.
    #[must_use]
    pub fn from_eic_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.eic_code() == code)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.iso_code())
    }
}

impl FromStr for Area {
    type Err = GridmixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PT" => Ok(Self::Portugal),
            "ES" => Ok(Self::Spain),
            "FR" => Ok(Self::France),
            other => Self::from_eic_code(other)
                .ok_or_else(|| GridmixError::invalid_arg(format!("unknown area: {s}"))),
        }
    }
}
