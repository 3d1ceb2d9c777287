use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures_util::{StreamExt, TryStreamExt, stream};
use providers::{
    CampsiteQuery, DATE_FORMAT, Provider, RawSiteRecord, RawSiteStream, SearchCapability,
    SearchFailure, SearchWindow, UseDirectEndpoint,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Date format the grid endpoint expects in requests
const REQUEST_DATE_FORMAT: &str = "%m-%d-%Y";

/// Search capability for one UseDirect-hosted provider
#[derive(Debug, Clone)]
pub struct UseDirectSearch {
    client: Client,
    endpoint: UseDirectEndpoint,
    label: &'static str,
}

/// Body of a grid search request
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct GridRequest {
    pub facility_id: u64,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "IsADA")]
    pub is_ada: bool,
    pub min_vehicle_length: u32,
    pub unit_category_id: u32,
    pub unit_types_group_ids: Vec<u32>,
    pub sleeping_unit_id: u32,
    pub web_only: bool,
    pub in_season_only: bool,
    #[serde(rename = "RestrictADA")]
    pub restrict_ada: bool,
}

impl GridRequest {
    /// Grid request covering every night of `window` at `facility_id`
    pub fn new(facility_id: u64, window: SearchWindow) -> Self {
        Self {
            facility_id,
            start_date: window.start().format(REQUEST_DATE_FORMAT).to_string(),
            end_date: window.end().format(REQUEST_DATE_FORMAT).to_string(),
            is_ada: false,
            min_vehicle_length: 0,
            unit_category_id: 0,
            unit_types_group_ids: Vec::new(),
            sleeping_unit_id: 0,
            web_only: true,
            in_season_only: true,
            restrict_ada: false,
        }
    }
}

/// Response structure from the grid endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridResponse {
    pub facility: Option<GridFacility>,
    pub message: Option<String>,
}

/// Facility section of a grid response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridFacility {
    pub facility_id: Option<u64>,
    pub name: Option<String>,
    #[serde(default)]
    pub units: BTreeMap<String, GridUnit>,
}

/// A bookable unit (campsite, cabin, yurt...)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridUnit {
    pub unit_id: Option<u64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub max_occupancy: Option<u32>,
    #[serde(default)]
    pub slices: BTreeMap<String, GridSlice>,
}

/// One night of one unit
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridSlice {
    pub date: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    pub is_blocked: bool,
}

impl UseDirectSearch {
    /// Create a search capability for `provider`; `None` outside the UseDirect family
    pub fn for_provider(client: Client, provider: Provider) -> Option<Self> {
        let endpoint = provider.use_direct_endpoint()?;
        Some(Self {
            client,
            endpoint,
            label: provider.label(),
        })
    }

    async fn fetch_grid(
        &self,
        facility_id: u64,
        window: SearchWindow,
    ) -> Result<Vec<RawSiteRecord>, SearchFailure> {
        let url = format!("{}/search/grid", self.endpoint.rdr_base_url);
        debug!("Making grid request to {} for facility {}", url, facility_id);

        let response = self
            .client
            .post(&url)
            .json(&GridRequest::new(facility_id, window))
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            warn!("Grid request to {} failed with status {}: {}", self.label, status, body);

            return Err(SearchFailure::from_status(status.as_u16(), body));
        }

        let grid: GridResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::Parse(e.to_string()))?;

        grid_records(&self.endpoint, self.label, facility_id, grid, window)
    }
}

impl SearchCapability for UseDirectSearch {
    fn search(&self, query: CampsiteQuery) -> RawSiteStream {
        let window = query.window;
        let search = self.clone();

        stream::iter(query.recreation_areas)
            .then(move |facility_id| {
                let search = search.clone();
                async move { search.fetch_grid(facility_id, window).await }
            })
            .map_ok(|records| stream::iter(records.into_iter().map(Ok)))
            .try_flatten()
            .boxed()
    }
}

/// Flatten a grid response into one raw record per free night in `window`.
///
/// A response without a facility section is an upstream error, not an empty
/// result.
pub fn grid_records(
    endpoint: &UseDirectEndpoint,
    label: &str,
    facility_id: u64,
    grid: GridResponse,
    window: SearchWindow,
) -> Result<Vec<RawSiteRecord>, SearchFailure> {
    let facility = grid.facility.ok_or_else(|| {
        SearchFailure::Parse(
            grid.message
                .unwrap_or_else(|| "grid response has no facility".to_string()),
        )
    })?;

    let facility_id = facility.facility_id.unwrap_or(facility_id);
    let mut records = Vec::new();

    for (unit_key, unit) in &facility.units {
        for slice in unit.slices.values() {
            if !slice.is_free || slice.is_blocked {
                continue;
            }

            let Some(date) = slice
                .date
                .as_deref()
                .and_then(|day| day.get(..10))
                .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
            else {
                warn!("Failed to parse slice date: {:?}", slice.date);
                continue;
            };

            if !window.contains_night(date) {
                continue;
            }

            let campsite_id = unit
                .unit_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| unit_key.clone());

            records.push(
                RawSiteRecord::new()
                    .with("campsite_id", campsite_id)
                    .with_opt(
                        "campsite_title",
                        unit.name.clone().or_else(|| unit.short_name.clone()),
                    )
                    .with_opt("facility_name", facility.name.clone())
                    .with("facility_id", facility_id)
                    .with_opt("campsite_occupancy", unit.max_occupancy)
                    .with("availability_status", "Available")
                    .with("recreation_area", label)
                    .with("booking_url", endpoint.booking_url)
                    .with("start_date", date.format(DATE_FORMAT).to_string())
                    .with_opt(
                        "end_date",
                        date.succ_opt()
                            .map(|next| next.format(DATE_FORMAT).to_string()),
                    ),
            );
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use providers::{Occupancy, normalize_record};
    use serde_json::json;

    fn window(start: &str, end: &str) -> SearchWindow {
        providers::validate(start, end, "1").unwrap().0
    }

    fn california() -> UseDirectEndpoint {
        Provider::ReserveCalifornia.use_direct_endpoint().unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GridRequest::new(718, window("2025-07-01", "2025-07-04")))
            .unwrap();

        assert_eq!(body["FacilityId"], json!(718));
        assert_eq!(body["StartDate"], json!("07-01-2025"));
        assert_eq!(body["EndDate"], json!("07-04-2025"));
        assert_eq!(body["UnitTypesGroupIds"], json!([]));
    }

    #[test]
    fn test_only_regional_providers_get_a_capability() {
        let client = Client::new();

        assert!(UseDirectSearch::for_provider(client.clone(), Provider::OhioStateParks).is_some());
        assert!(UseDirectSearch::for_provider(client, Provider::RecreationDotGov).is_none());
    }

    #[test]
    fn test_grid_records_keep_free_nights_in_window() {
        let grid: GridResponse = serde_json::from_value(json!({
            "Message": null,
            "Facility": {
                "FacilityId": 718,
                "Name": "Doheny SB",
                "Units": {
                    "1021": {
                        "UnitId": 1021,
                        "Name": "Site 14",
                        "ShortName": "14",
                        "MaxOccupancy": 8,
                        "Slices": {
                            "2025-07-01T00:00:00": { "Date": "2025-07-01", "IsFree": true, "IsBlocked": false },
                            "2025-07-02T00:00:00": { "Date": "2025-07-02", "IsFree": false, "IsBlocked": false },
                            "2025-07-03T00:00:00": { "Date": "2025-07-03", "IsFree": true, "IsBlocked": true },
                            "2025-07-04T00:00:00": { "Date": "2025-07-04", "IsFree": true, "IsBlocked": false }
                        }
                    }
                }
            }
        }))
        .unwrap();

        let records = grid_records(
            &california(),
            "ReserveCalifornia (CA State Parks)",
            718,
            grid,
            window("2025-07-01", "2025-07-04"),
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        let site = normalize_record(&records[0]);
        assert_eq!(site.campsite_id, "1021");
        assert_eq!(site.campsite_name, "Site 14");
        assert_eq!(site.facility_name, "Doheny SB");
        assert_eq!(site.facility_id, "718");
        assert_eq!(site.campsite_occupancy, Some(Occupancy::Limit(8)));
        assert_eq!(
            site.recreation_area.as_deref(),
            Some("ReserveCalifornia (CA State Parks)")
        );
        assert_eq!(site.booking_url.as_deref(), Some("https://www.reservecalifornia.com"));
        assert_eq!(site.end_date.as_deref(), Some("2025-07-02"));
    }

    #[test]
    fn test_missing_facility_is_an_error() {
        let grid: GridResponse =
            serde_json::from_value(json!({ "Message": "Facility not found" })).unwrap();

        let err = grid_records(&california(), "x", 1, grid, window("2025-07-01", "2025-07-02"))
            .unwrap_err();

        assert_eq!(err, SearchFailure::Parse("Facility not found".into()));
    }
}
