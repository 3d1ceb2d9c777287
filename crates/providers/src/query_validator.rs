use chrono::NaiveDate;

use crate::error::ValidationError;

/// Date pattern accepted on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar dates to search, `end` strictly after `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SearchWindow {
    /// Builds a window, rejecting empty or inverted ranges
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidWindow);
        }
        Ok(Self { start, end })
    }

    /// First night
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Departure date
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` is one of the window's nights
    pub fn contains_night(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Facility or recreation area id as typed by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityIdentifier {
    raw: String,
    id: u64,
}

impl FacilityIdentifier {
    /// Parses a non-negative integer id; surrounding whitespace is ignored
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let id = value
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidFacilityId {
                value: value.to_string(),
            })?;

        Ok(Self {
            raw: value.to_string(),
            id,
        })
    }

    /// The string the caller sent
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric id
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Exactly `dddd-dd-dd`; chrono alone tolerates padding and signed years
fn has_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if !has_date_shape(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Turns raw query strings into typed search inputs.
///
/// Checks run in order: start date, end date, window, facility id. The first
/// failure wins.
pub fn validate(
    start_date: &str,
    end_date: &str,
    facility_id: &str,
) -> Result<(SearchWindow, FacilityIdentifier), ValidationError> {
    let start = parse_date("start_date", start_date)?;
    let end = parse_date("end_date", end_date)?;
    let window = SearchWindow::new(start, end)?;
    let facility = FacilityIdentifier::parse(facility_id)?;

    Ok((window, facility))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_query() {
        let (window, facility) = validate("2025-07-01", "2025-07-04", "2725").unwrap();

        assert_eq!(window.start(), date(2025, 7, 1));
        assert_eq!(window.end(), date(2025, 7, 4));
        assert_eq!(facility.id(), 2725);
        assert_eq!(facility.as_str(), "2725");
    }

    #[test]
    fn test_rejects_malformed_dates() {
        assert_eq!(
            validate("07/01/2025", "2025-07-04", "1").unwrap_err(),
            ValidationError::InvalidDate {
                field: "start_date",
                value: "07/01/2025".into()
            }
        );
        assert_eq!(
            validate("2025-07-01", "2025-02-30", "1").unwrap_err(),
            ValidationError::InvalidDate {
                field: "end_date",
                value: "2025-02-30".into()
            }
        );
        assert!(validate("2025-07-01T00:00:00", "2025-07-04", "1").is_err());
    }

    #[test]
    fn test_rejects_padded_or_signed_dates() {
        for bad in [" 2025-07-01", "2025-07-01 ", "+2025-07-01", "-2025-07-01", "2025-7-01", ""] {
            assert_eq!(
                validate(bad, "2025-07-09", "1").unwrap_err(),
                ValidationError::InvalidDate {
                    field: "start_date",
                    value: bad.into()
                }
            );
        }
    }

    #[test]
    fn test_rejects_inverted_or_empty_window() {
        assert_eq!(
            validate("2025-07-04", "2025-07-01", "2725").unwrap_err(),
            ValidationError::InvalidWindow
        );
        assert_eq!(
            validate("2025-07-04", "2025-07-04", "2725").unwrap_err(),
            ValidationError::InvalidWindow
        );
    }

    #[test]
    fn test_window_checked_before_facility() {
        assert_eq!(
            validate("2025-07-04", "2025-07-01", "abc").unwrap_err(),
            ValidationError::InvalidWindow
        );
    }

    #[test]
    fn test_rejects_non_integer_facility() {
        for bad in ["abc123", "12.5", "", "-4"] {
            assert_eq!(
                validate("2025-07-01", "2025-07-04", bad).unwrap_err(),
                ValidationError::InvalidFacilityId { value: bad.into() }
            );
        }
    }

    #[test]
    fn test_facility_keeps_raw_text() {
        let facility = FacilityIdentifier::parse(" 718 ").unwrap();

        assert_eq!(facility.id(), 718);
        assert_eq!(facility.as_str(), " 718 ");
    }

    #[test]
    fn test_nights_exclude_departure() {
        let window = SearchWindow::new(date(2025, 6, 29), date(2025, 7, 2)).unwrap();

        assert!(window.contains_night(date(2025, 6, 29)));
        assert!(!window.contains_night(date(2025, 6, 28)));
        assert!(window.contains_night(date(2025, 7, 1)));
        assert!(!window.contains_night(date(2025, 7, 2)));
    }
}
