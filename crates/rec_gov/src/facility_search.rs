use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use providers::{Campground, CampgroundLookup, CampgroundQuery, SearchFailure};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

/// Default base URL of the RIDB public API
pub const RIDB_BASE_URL: &str = "https://ridb.recreation.gov/api/v1";

const SEARCH_LIMIT: &str = "50";

/// Campground lookup against the RIDB facility directory
#[derive(Debug, Clone)]
pub struct RidbLookup {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

/// Facility search response from RIDB
#[derive(Debug, Deserialize)]
pub struct RidbFacilityResponse {
    #[serde(rename = "RECDATA", default)]
    pub rec_data: Vec<RidbFacility>,
}

/// One RIDB facility, as returned with `full=true`
#[derive(Debug, Deserialize)]
pub struct RidbFacility {
    #[serde(rename = "FacilityID")]
    pub facility_id: String,

    #[serde(rename = "FacilityName")]
    pub facility_name: String,

    #[serde(rename = "ParentRecAreaID")]
    pub parent_rec_area_id: Option<String>,

    #[serde(rename = "FacilityLatitude")]
    pub latitude: Option<f64>,

    #[serde(rename = "FacilityLongitude")]
    pub longitude: Option<f64>,

    #[serde(rename = "RECAREA", default)]
    pub rec_areas: Vec<RidbRecArea>,

    #[serde(rename = "FACILITYADDRESS", default)]
    pub addresses: Vec<RidbAddress>,
}

#[derive(Debug, Deserialize)]
pub struct RidbRecArea {
    #[serde(rename = "RecAreaName")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RidbAddress {
    #[serde(rename = "City")]
    pub city: Option<String>,

    #[serde(rename = "AddressStateCode")]
    pub state_code: Option<String>,
}

impl RidbLookup {
    /// Create a lookup; `api_key` is sent as the `apikey` header when present
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(api_key) => request.header("apikey", api_key),
            None => request,
        }
    }

    /// Search camping facilities by name or location
    async fn search_facilities(
        &self,
        query: CampgroundQuery,
    ) -> Result<Vec<Campground>, SearchFailure> {
        debug!("Searching facilities with query: {}", query.text);

        let url = format!("{}/facilities", self.base_url);

        let mut params = vec![
            ("query", query.text),
            ("activity", "CAMPING".to_string()),
            ("full", "true".to_string()),
            ("limit", SEARCH_LIMIT.to_string()),
            ("offset", "0".to_string()),
        ];
        if let Some(state_code) = query.state {
            params.push(("state", state_code));
        }

        let response = self
            .authorized(self.client.get(&url).query(&params))
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Facility search failed with status {}: {}", status, body);
            return Err(SearchFailure::from_status(status.as_u16(), body));
        }

        let facilities: RidbFacilityResponse = response
            .json()
            .await
            .map_err(|e| SearchFailure::Parse(e.to_string()))?;

        Ok(facilities.rec_data.into_iter().map(campground_from).collect())
    }

    /// Get one facility; a 404 means the id is unknown
    async fn get_facility_details(
        &self,
        facility_id: u64,
    ) -> Result<Option<Campground>, SearchFailure> {
        debug!("Getting facility details for {}", facility_id);

        let url = format!("{}/facilities/{}", self.base_url, facility_id);

        let response = self
            .authorized(self.client.get(&url).query(&[("full", "true")]))
            .send()
            .await
            .map_err(|e| SearchFailure::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return match SearchFailure::from_status(status.as_u16(), body) {
                SearchFailure::NotFound => Ok(None),
                failure => {
                    warn!("Facility details request failed: {}", failure);
                    Err(failure)
                }
            };
        }

        let facility: RidbFacility = response
            .json()
            .await
            .map_err(|e| SearchFailure::Parse(e.to_string()))?;

        Ok(Some(campground_from(facility)))
    }
}

impl CampgroundLookup for RidbLookup {
    fn search(
        &self,
        query: CampgroundQuery,
    ) -> BoxFuture<'static, Result<Vec<Campground>, SearchFailure>> {
        let lookup = self.clone();
        async move { lookup.search_facilities(query).await }.boxed()
    }

    fn details(
        &self,
        facility_id: u64,
    ) -> BoxFuture<'static, Result<Option<Campground>, SearchFailure>> {
        let lookup = self.clone();
        async move { lookup.get_facility_details(facility_id).await }.boxed()
    }
}

/// Maps a RIDB facility onto the directory schema.
///
/// RIDB reports unknown coordinates as `0`, which is kept as absent.
pub fn campground_from(facility: RidbFacility) -> Campground {
    let address = facility.addresses.into_iter().next();
    let coordinate = |value: Option<f64>| value.filter(|v| *v != 0.0);

    Campground {
        facility_id: facility.facility_id,
        facility_name: facility.facility_name,
        recreation_area: facility
            .rec_areas
            .into_iter()
            .find_map(|area| area.name.filter(|name| !name.is_empty())),
        recreation_area_id: facility.parent_rec_area_id.filter(|id| !id.is_empty()),
        city: address
            .as_ref()
            .and_then(|a| a.city.clone())
            .filter(|city| !city.is_empty()),
        state: address
            .and_then(|a| a.state_code)
            .filter(|state| !state.is_empty()),
        latitude: coordinate(facility.latitude),
        longitude: coordinate(facility.longitude),
    }
}
