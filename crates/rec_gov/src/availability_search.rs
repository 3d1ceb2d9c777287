use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use futures_util::{StreamExt, TryStreamExt, stream};
use providers::{
    CampsiteQuery, DATE_FORMAT, RawSiteRecord, RawSiteStream, SearchCapability, SearchFailure,
    SearchWindow,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Default base URL of Recreation.gov's internal API
pub const DEFAULT_BASE_URL: &str = "https://www.recreation.gov/api";

const CAMPSITE_BOOKING_URL: &str = "https://www.recreation.gov/camping/campsites";

/// Most calendar months fetched for one search; each month is one request per campground
pub const MAX_MONTHS: usize = 13;

/// Search capability for Recreation.gov campgrounds
#[derive(Debug, Clone)]
pub struct RecGovSearch {
    client: Client,
    base_url: String,
}

/// Response structure from the month availability endpoint
#[derive(Debug, Deserialize)]
pub struct RecGovMonthResponse {
    #[serde(default)]
    pub campsites: BTreeMap<String, CampsiteMonth>,
}

/// One campsite's month of availability
#[derive(Debug, Deserialize)]
pub struct CampsiteMonth {
    #[serde(default)]
    pub availabilities: BTreeMap<String, String>,
    pub campsite_id: Option<String>,
    pub campsite_type: Option<String>,
    #[serde(rename = "loop")]
    pub campsite_loop: Option<String>,
    pub site: Option<String>,
    pub type_of_use: Option<String>,
    pub max_num_people: Option<u32>,
    pub min_num_people: Option<u32>,
}

impl RecGovSearch {
    /// Create a search capability that sends requests through `client`
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one campground month and keep the nights inside `window`
    async fn fetch_month(
        &self,
        facility_id: u64,
        month_start: NaiveDate,
        window: SearchWindow,
    ) -> Result<Vec<RawSiteRecord>, SearchFailure> {
        let url = format!(
            "{}/camps/availability/campground/{}/month",
            self.base_url, facility_id
        );
        let start_date_param = format!("{}T00:00:00.000Z", month_start.format(DATE_FORMAT));

        debug!("Making request to: {}?start_date={}", url, start_date_param);

        let response = self
            .client
            .get(&url)
            .query(&[("start_date", start_date_param.as_str())])
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("API request failed with status {}: {}", status, body);

            return Err(SearchFailure::from_status(status.as_u16(), body));
        }

        let month: RecGovMonthResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::Parse(e.to_string()))?;

        Ok(month_records(facility_id, month, window))
    }
}

impl SearchCapability for RecGovSearch {
    fn search(&self, query: CampsiteQuery) -> RawSiteStream {
        let window = query.window;
        let months = months_in_window(window);
        if months.len() > MAX_MONTHS {
            warn!(
                "Refusing search over {} months between {} and {}",
                months.len(),
                window.start(),
                window.end()
            );
            return stream::once(async move {
                Err(SearchFailure::WindowTooLong {
                    months: months.len(),
                    limit: MAX_MONTHS,
                })
            })
            .boxed();
        }

        let requests: Vec<(u64, NaiveDate)> = query
            .recreation_areas
            .iter()
            .flat_map(|&facility_id| months.iter().map(move |&month| (facility_id, month)))
            .collect();

        let search = self.clone();
        stream::iter(requests)
            .then(move |(facility_id, month)| {
                let search = search.clone();
                async move { search.fetch_month(facility_id, month, window).await }
            })
            .map_ok(|records| stream::iter(records.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }
}

/// First day of every month holding at least one night of `window`
pub fn months_in_window(window: SearchWindow) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = first_of_month(window.start());

    while current < window.end() {
        months.push(current);
        current = match current.checked_add_months(chrono::Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    months
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Whether a Recreation.gov status string means the night can be booked
pub fn is_available(status: &str) -> bool {
    match status {
        "Available" | "A" => true,
        s if s.starts_with('$') => true,
        "Reserved" | "Not Available" | "Not Reservable" | "Walk-up" | "Open" => false,
        _ => {
            debug!("Unknown availability status: {}", status);
            false
        }
    }
}

/// Flatten a month response into one raw record per available night in `window`
pub fn month_records(
    facility_id: u64,
    month: RecGovMonthResponse,
    window: SearchWindow,
) -> Vec<RawSiteRecord> {
    let mut records = Vec::new();

    for (key, campsite) in month.campsites {
        let campsite_id = campsite.campsite_id.clone().unwrap_or(key);
        let occupancy = match (campsite.min_num_people, campsite.max_num_people) {
            (Some(min), Some(max)) => Some(json!([min, max])),
            (None, Some(max)) => Some(json!(max)),
            _ => None,
        };

        for (date_str, status) in &campsite.availabilities {
            // Keys look like "2024-01-15T00:00:00Z"
            let date = match date_str
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
            {
                Some(date) => date,
                None => {
                    warn!("Failed to parse date: {}", date_str);
                    continue;
                }
            };

            if !window.contains_night(date) || !is_available(status) {
                continue;
            }

            records.push(
                RawSiteRecord::new()
                    .with("campsite_id", campsite_id.clone())
                    .with_opt("campsite_name", campsite.site.clone())
                    .with_opt("campsite_type", campsite.campsite_type.clone())
                    .with_opt("campsite_site_type", campsite.type_of_use.clone())
                    .with_opt("campsite_occupancy", occupancy.clone())
                    .with("availability_status", status.clone())
                    .with("facility_id", facility_id)
                    .with_opt("loop", campsite.campsite_loop.clone())
                    .with(
                        "booking_url",
                        format!("{}/{}", CAMPSITE_BOOKING_URL, campsite_id),
                    )
                    .with("start_date", date.format(DATE_FORMAT).to_string())
                    .with_opt(
                        "end_date",
                        date.succ_opt()
                            .map(|next| next.format(DATE_FORMAT).to_string()),
                    ),
            );
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use providers::normalize_record;

    fn window(start: &str, end: &str) -> SearchWindow {
        providers::validate(start, end, "1").unwrap().0
    }

    #[test]
    fn test_is_available() {
        // Internal API format
        assert!(is_available("Available"));
        assert!(!is_available("Reserved"));
        assert!(!is_available("Not Available"));
        assert!(!is_available("Not Reservable"));
        assert!(!is_available("Walk-up"));

        // Legacy RIDB format
        assert!(is_available("A"));
        assert!(is_available("$25.00"));
        assert!(!is_available("unknown"));
    }

    #[test]
    fn test_months_in_window() {
        let months = months_in_window(window("2025-06-29", "2025-08-01"));

        assert_eq!(
            months,
            vec![
                NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            ]
        );
        assert_eq!(months_in_window(window("2025-07-01", "2025-07-02")).len(), 1);
    }

    #[tokio::test]
    async fn test_long_window_is_refused_before_any_request() {
        let search = RecGovSearch::new(Client::new(), "http://127.0.0.1:9");
        let query = CampsiteQuery {
            window: window("2025-01-15", "2027-01-15"),
            recreation_areas: vec![232447],
        };

        let results: Vec<_> = search.search(query).collect().await;

        assert_eq!(
            results,
            vec![Err(SearchFailure::WindowTooLong {
                months: 25,
                limit: MAX_MONTHS
            })]
        );
    }

    #[test]
    fn test_year_long_window_is_allowed() {
        assert_eq!(months_in_window(window("2025-01-15", "2026-01-15")).len(), MAX_MONTHS);
    }

    #[test]
    fn test_month_records_keep_available_nights_in_window() {
        let month: RecGovMonthResponse = serde_json::from_value(json!({
            "campsites": {
                "84512": {
                    "availabilities": {
                        "2025-06-30T00:00:00Z": "Available",
                        "2025-07-01T00:00:00Z": "Available",
                        "2025-07-02T00:00:00Z": "Reserved",
                        "2025-07-03T00:00:00Z": "Available",
                        "2025-07-04T00:00:00Z": "Available"
                    },
                    "campsite_id": "84512",
                    "campsite_type": "STANDARD NONELECTRIC",
                    "loop": "Upper Pines",
                    "site": "A012",
                    "type_of_use": "Overnight",
                    "max_num_people": 6,
                    "min_num_people": 1
                },
                "99": {
                    "availabilities": { "bad": "Available" }
                }
            },
            "count": 2
        }))
        .unwrap();

        let records = month_records(232447, month, window("2025-07-01", "2025-07-04"));

        assert_eq!(records.len(), 2);
        let site = normalize_record(&records[0]);
        assert_eq!(site.campsite_id, "84512");
        assert_eq!(site.campsite_name, "A012");
        assert_eq!(site.facility_id, "232447");
        assert_eq!(site.campsite_site_type.as_deref(), Some("Overnight"));
        assert_eq!(site.campsite_occupancy, Some(providers::Occupancy::Range(1, 6)));
        assert_eq!(site.start_date.as_deref(), Some("2025-07-01"));
        assert_eq!(site.end_date.as_deref(), Some("2025-07-02"));
        assert_eq!(
            site.booking_url.as_deref(),
            Some("https://www.recreation.gov/camping/campsites/84512")
        );
        assert_eq!(
            normalize_record(&records[1]).start_date.as_deref(),
            Some("2025-07-03")
        );
    }
}
