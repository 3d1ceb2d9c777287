use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::search::RawSiteRecord;

// Attribute names in order of preference for each unified field.
const CAMPSITE_ID: &[&str] = &["campsite_id"];
const CAMPSITE_NAME: &[&str] = &["campsite_title", "campsite_name", "campsite_site_name"];
const FACILITY_NAME: &[&str] = &["facility_name"];
const FACILITY_ID: &[&str] = &["facility_id"];
const SITE_TYPE: &[&str] = &["campsite_site_type"];
const CAMPSITE_TYPE: &[&str] = &["campsite_type"];
const OCCUPANCY: &[&str] = &["campsite_occupancy"];
const AVAILABILITY_STATUS: &[&str] = &["availability_status"];
const RECREATION_AREA: &[&str] = &["recreation_area"];
const RECREATION_AREA_ID: &[&str] = &["recreation_area_id"];
const LOOP: &[&str] = &["loop", "campsite_loop"];
const BOOKING_URL: &[&str] = &["booking_url"];
const START_DATE: &[&str] = &["start_date", "booking_date"];
const END_DATE: &[&str] = &["end_date"];

/// How many people a site holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Occupancy {
    /// Single maximum
    Limit(u32),
    /// Minimum and maximum, serialized as `[min, max]`
    Range(u32, u32),
}

/// One available site in the provider-independent schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSite {
    /// Site id, empty when the provider gave none
    pub campsite_id: String,
    /// Site name, empty when the provider gave none
    pub campsite_name: String,
    /// Facility name, empty when the provider gave none
    pub facility_name: String,
    /// Facility id, empty when the provider gave none
    pub facility_id: String,
    /// Site type as the provider words it
    pub campsite_site_type: Option<String>,
    /// Site category
    pub campsite_type: Option<String>,
    /// Occupancy limit; never defaulted
    pub campsite_occupancy: Option<Occupancy>,
    /// Provider's availability wording
    pub availability_status: Option<String>,
    /// Recreation area name
    pub recreation_area: Option<String>,
    /// Recreation area id, widened to text
    pub recreation_area_id: Option<String>,
    /// Loop or section within the facility
    #[serde(rename = "loop")]
    pub campsite_loop: Option<String>,
    /// Where to book the site
    pub booking_url: Option<String>,
    /// First night of the stay
    pub start_date: Option<String>,
    /// Departure date of the stay
    pub end_date: Option<String>,
}

/// Maps raw provider records onto [`AvailableSite`]; never fails
pub fn normalize(records: &[RawSiteRecord]) -> Vec<AvailableSite> {
    records.iter().map(normalize_record).collect()
}

/// Maps one raw record, leaving absent attributes empty or `None`
pub fn normalize_record(record: &RawSiteRecord) -> AvailableSite {
    AvailableSite {
        campsite_id: text(record, CAMPSITE_ID).unwrap_or_default(),
        campsite_name: text(record, CAMPSITE_NAME).unwrap_or_default(),
        facility_name: text(record, FACILITY_NAME).unwrap_or_default(),
        facility_id: text(record, FACILITY_ID).unwrap_or_default(),
        campsite_site_type: text(record, SITE_TYPE),
        campsite_type: text(record, CAMPSITE_TYPE),
        campsite_occupancy: occupancy(record),
        availability_status: text(record, AVAILABILITY_STATUS),
        recreation_area: text(record, RECREATION_AREA),
        recreation_area_id: text(record, RECREATION_AREA_ID),
        campsite_loop: text(record, LOOP),
        booking_url: text(record, BOOKING_URL),
        start_date: text(record, START_DATE),
        end_date: text(record, END_DATE),
    }
}

/// First usable attribute as text; numbers and booleans are widened to strings
fn text(record: &RawSiteRecord, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        let value = record.get(name)?;
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                debug!("Ignoring non-scalar {} attribute: {}", name, other);
                None
            }
        }
    })
}

fn occupancy(record: &RawSiteRecord) -> Option<Occupancy> {
    let (name, value) = record.first_of(OCCUPANCY)?;
    let parsed = match value {
        Value::Array(bounds) => match bounds.as_slice() {
            [max] => count(max).map(Occupancy::Limit),
            [min, max] => match (count(min), count(max)) {
                (Some(min), Some(max)) => Some(Occupancy::Range(min, max)),
                (None, Some(max)) => Some(Occupancy::Limit(max)),
                _ => None,
            },
            _ => None,
        },
        other => count(other).map(Occupancy::Limit),
    };

    if parsed.is_none() {
        debug!("Ignoring unusable {} attribute: {}", name, value);
    }
    parsed
}

fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
