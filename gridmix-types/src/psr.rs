//! Power System Resource (production type) codes.

use serde::{Deserialize, Serialize};

/// Category used for generation rows that carry no `psrType`.
pub const UNKNOWN_PSR: &str = "Unknown";

/// ENTSO-E production type code (B01..B20).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum PsrType {
    B01,
    B02,
    B03,
    B04,
    B05,
    B06,
    B07,
    B08,
    B09,
    B10,
    B11,
    B12,
    B13,
    B14,
    B15,
    B16,
    B17,
    B18,
    B19,
    B20,
}

impl PsrType {
    /// All production types in code order.
    pub const ALL: [Self; 20] = [
        Self::B01,
        Self::B02,
        Self::B03,
        Self::B04,
        Self::B05,
        Self::B06,
        Self::B07,
        Self::B08,
        Self::B09,
        Self::B10,
        Self::B11,
        Self::B12,
        Self::B13,
        Self::B14,
        Self::B15,
        Self::B16,
        Self::B17,
        Self::B18,
        Self::B19,
        Self::B20,
    ];

    /// The wire code, e.g. `"B16"`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::B01 => "B01",
            Self::B02 => "B02",
            Self::B03 => "B03",
            Self::B04 => "B04",
            Self::B05 => "B05",
            Self::B06 => "B06",
            Self::B07 => "B07",
            Self::B08 => "B08",
            Self::B09 => "B09",
            Self::B10 => "B10",
            Self::B11 => "B11",
            Self::B12 => "B12",
            Self::B13 => "B13",
            Self::B14 => "B14",
            Self::B15 => "B15",
            Self::B16 => "B16",
            Self::B17 => "B17",
            Self::B18 => "B18",
            Self::B19 => "B19",
            Self::B20 => "B20",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::B01 => "Biomass",
            Self::B02 => "Fossil Brown coal/Lignite",
            Self::B03 => "Fossil Coal-derived gas",
            Self::B04 => "Fossil Gas",
            Self::B05 => "Fossil Hard coal",
            Self::B06 => "Fossil Oil",
            Self::B07 => "Fossil Oil shale",
            Self::B08 => "Fossil Peat",
            Self::B09 => "Geothermal",
            Self::B10 => "Hydro Pumped Storage",
            Self::B11 => "Hydro Run-of-river and poundage",
            Self::B12 => "Hydro Water Reservoir",
            Self::B13 => "Marine",
            Self::B14 => "Nuclear",
            Self::B15 => "Other renewable",
            Self::B16 => "Solar",
            Self::B17 => "Waste",
            Self::B18 => "Wind Offshore",
            Self::B19 => "Wind Onshore",
            Self::B20 => "Other",
        }
    }

    /// Parse a wire code such as `"B04"`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

/// Label for a category column: the production-type label when the column is a
/// known code, the raw column name otherwise.
#[must_use]
pub fn label_for(category: &str) -> &str {
    match PsrType::from_code(category) {
        Some(psr) => psr.label(),
        None => category,
    }
}

/// True when `category` is one of the twenty production-type codes.
#[must_use]
pub fn is_psr_code(category: &str) -> bool {
    PsrType::from_code(category).is_some()
}
