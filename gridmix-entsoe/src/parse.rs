//! ENTSO-E market document parsing.
//!
//! Generation (`GL_MarketDocument`) and flow (`Publication_MarketDocument`)
//! payloads share the `TimeSeries/Period/Point` layout, so a single set of
//! serde structs covers both. Refusals arrive as an
//! `Acknowledgement_MarketDocument` instead.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use gridmix_core::{GridmixError, Point, SeriesKey, UNKNOWN_PSR};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Deserialize;
use serde::de::IgnoredAny;

/// Acknowledgement reason code for "No matching data found".
pub const NO_DATA_REASON: &str = "999";

const ACKNOWLEDGEMENT_ROOT: &[u8] = b"Acknowledgement_MarketDocument";

#[derive(Debug, Deserialize)]
struct MarketDocument {
    #[serde(rename = "TimeSeries", default)]
    time_series: Vec<XmlTimeSeries>,
}

#[derive(Debug, Deserialize)]
struct XmlTimeSeries {
    #[serde(rename = "outBiddingZone_Domain.mRID", default)]
    out_bidding_zone: Option<IgnoredAny>,
    #[serde(rename = "MktPSRType", default)]
    psr: Option<MktPsrType>,
    #[serde(rename = "Period", default)]
    periods: Vec<XmlPeriod>,
}

#[derive(Debug, Deserialize)]
struct MktPsrType {
    #[serde(rename = "psrType")]
    psr_type: String,
}

#[derive(Debug, Deserialize)]
struct XmlPeriod {
    #[serde(rename = "timeInterval")]
    time_interval: TimeInterval,
    resolution: String,
    #[serde(rename = "Point", default)]
    points: Vec<XmlPoint>,
}

#[derive(Debug, Deserialize)]
struct TimeInterval {
    start: String,
}

#[derive(Debug, Deserialize)]
struct XmlPoint {
    position: u32,
    quantity: f64,
}

#[derive(Debug, Deserialize)]
struct AcknowledgementDocument {
    #[serde(rename = "Reason", default)]
    reasons: Vec<XmlReason>,
}

#[derive(Debug, Deserialize)]
struct XmlReason {
    code: String,
    #[serde(default)]
    text: Option<String>,
}

/// A refusal returned in place of a market document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// Reason code (e.g. `999`).
    pub code: String,
    /// Reason text, if any.
    pub text: String,
}

impl Acknowledgement {
    /// True when the API simply has no data for the request.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        self.code == NO_DATA_REASON
    }
}

impl fmt::Display for Acknowledgement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request refused (reason {}): {}", self.code, self.text)
    }
}

fn xml_err(e: impl fmt::Display) -> GridmixError {
    GridmixError::Data(format!("malformed ENTSO-E document: {e}"))
}

fn root_name(xml: &str) -> Result<Option<Vec<u8>>, GridmixError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(e.local_name().as_ref().to_vec()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Detect and decode an acknowledgement document.
///
/// Returns `None` for any other document.
///
/// # Errors
/// Returns `GridmixError::Data` if the body is not well-formed XML.
pub fn acknowledgement(xml: &str) -> Result<Option<Acknowledgement>, GridmixError> {
    if root_name(xml)?.as_deref() != Some(ACKNOWLEDGEMENT_ROOT) {
        return Ok(None);
    }
    let doc: AcknowledgementDocument = quick_xml::de::from_str(xml).map_err(xml_err)?;
    let ack = doc
        .reasons
        .into_iter()
        .next()
        .map_or_else(
            || Acknowledgement {
                code: String::new(),
                text: "acknowledgement without reason".to_string(),
            },
            |r| Acknowledgement {
                code: r.code.trim().to_string(),
                text: r.text.unwrap_or_default().trim().to_string(),
            },
        );
    Ok(Some(ack))
}

/// Parse an ISO 8601 duration as used for `Period/resolution`
/// (`PT15M`, `PT60M`, `PT1H`, `P1D`, `P7D`).
///
/// # Errors
/// Returns `GridmixError::Data` for other forms, including calendar units
/// (`P1M`, `P1Y`) that have no fixed length.
pub fn parse_resolution(s: &str) -> Result<TimeDelta, GridmixError> {
    let bad = || GridmixError::Data(format!("unsupported resolution: {s}"));
    let s = s.trim();
    let (digits, unit, timed) = if let Some(rest) = s.strip_prefix("PT") {
        let unit = rest.chars().last().ok_or_else(bad)?;
        (&rest[..rest.len() - unit.len_utf8()], unit, true)
    } else if let Some(rest) = s.strip_prefix('P') {
        let unit = rest.chars().last().ok_or_else(bad)?;
        (&rest[..rest.len() - unit.len_utf8()], unit, false)
    } else {
        return Err(bad());
    };
    let n: i64 = digits.parse().map_err(|_| bad())?;
    if n <= 0 {
        return Err(bad());
    }
    let delta = match (timed, unit) {
        (true, 'S') => TimeDelta::try_seconds(n),
        (true, 'M') => TimeDelta::try_minutes(n),
        (true, 'H') => TimeDelta::try_hours(n),
        (false, 'D') => TimeDelta::try_days(n),
        (false, 'W') => TimeDelta::try_weeks(n),
        _ => return Err(bad()),
    };
    delta.ok_or_else(|| GridmixError::Data(format!("resolution out of range: {s}")))
}

/// Parse an interval boundary such as `2023-08-14T22:00Z`.
///
/// # Errors
/// Returns `GridmixError::Data` if the timestamp is not recognized.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, GridmixError> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| GridmixError::Data(format!("invalid timestamp: {s}")))
}

/// Decode a market document into raw points.
///
/// Every `Period` of every `TimeSeries` contributes points at
/// `start + resolution * (position - 1)`. For generation documents, series
/// tagged with an `outBiddingZone_Domain` (consumption) are skipped and a
/// missing `psrType` is reported as `Unknown`. Flow points carry no category.
///
/// # Errors
/// Returns `GridmixError::Data` for malformed XML, timestamps or resolutions,
/// and for a zero position or one whose start falls outside the calendar.
pub fn parse_points(key: SeriesKey, xml: &str) -> Result<Vec<Point>, GridmixError> {
    let doc: MarketDocument = quick_xml::de::from_str(xml).map_err(xml_err)?;
    let generation = key.is_generation();
    let mut out = Vec::new();

    for series in doc.time_series {
        if generation && series.out_bidding_zone.is_some() {
            continue;
        }
        let category = if generation {
            Some(
                series
                    .psr
                    .map_or_else(|| UNKNOWN_PSR.to_string(), |p| p.psr_type.trim().to_string()),
            )
        } else {
            None
        };

        for period in series.periods {
            let start = parse_timestamp(&period.time_interval.start)?;
            let resolution = parse_resolution(&period.resolution)?;
            for point in period.points {
                if point.position == 0 {
                    return Err(GridmixError::Data(format!(
                        "position 0 in period starting {start}"
                    )));
                }
                let out_of_range = || {
                    GridmixError::Data(format!(
                        "position {} out of range in period starting {start}",
                        point.position
                    ))
                };
                let steps = i32::try_from(point.position - 1).map_err(|_| out_of_range())?;
                let point_start = resolution
                    .checked_mul(steps)
                    .and_then(|offset| start.checked_add_signed(offset))
                    .ok_or_else(out_of_range)?;
                out.push(Point::new(
                    point_start,
                    resolution,
                    point.quantity,
                    category.clone(),
                ));
            }
        }
    }

    out.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(out)
}
