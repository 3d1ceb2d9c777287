use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::alias_index::AliasIndex;
use crate::search::SearchCapability;

/// Key of the provider answering queries that name no provider at all.
pub const DEFAULT_PROVIDER_KEY: &str = "recreation.gov";

/// Reservation platform protocol spoken by a provider's search capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProviderFamily {
    /// Recreation.gov, the US federal reservation system
    #[serde(rename = "recreationdotgov")]
    RecreationDotGov,
    /// UseDirect, the platform shared by many state and county park systems
    #[serde(rename = "usedirect")]
    UseDirect,
}

impl ProviderFamily {
    /// Wire tag used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::RecreationDotGov => "recreationdotgov",
            ProviderFamily::UseDirect => "usedirect",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hosts a UseDirect-backed provider is reachable on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseDirectEndpoint {
    /// Base URL of the RDR JSON API
    pub rdr_base_url: &'static str,
    /// Public site campers book on
    pub booking_url: &'static str,
}

/// Every reservation backend the service knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Recreation.gov
    RecreationDotGov,
    /// ReserveCalifornia
    ReserveCalifornia,
    /// ReserveAlaPark
    AlabamaStateParks,
    /// AZStateParks
    ArizonaStateParks,
    /// Florida State Parks
    FloridaStateParks,
    /// Minnesota State Parks
    MinnesotaStateParks,
    /// Missouri State Parks
    MissouriStateParks,
    /// Ohio State Parks
    OhioStateParks,
    /// Virginia State Parks
    VirginiaStateParks,
    /// Australian Northern Territory parks
    NorthernTerritory,
    /// Fairfax County Parks, Virginia
    FairfaxCountyParks,
    /// Maricopa County Parks, Arizona
    MaricopaCountyParks,
    /// Oregon Metro parks around Portland
    OregonMetro,
}

impl Provider {
    /// All providers in catalog order
    pub const ALL: [Provider; 13] = [
        Provider::RecreationDotGov,
        Provider::ReserveCalifornia,
        Provider::AlabamaStateParks,
        Provider::ArizonaStateParks,
        Provider::FloridaStateParks,
        Provider::MinnesotaStateParks,
        Provider::MissouriStateParks,
        Provider::OhioStateParks,
        Provider::VirginiaStateParks,
        Provider::NorthernTerritory,
        Provider::FairfaxCountyParks,
        Provider::MaricopaCountyParks,
        Provider::OregonMetro,
    ];

    /// Canonical key
    pub fn key(&self) -> &'static str {
        match self {
            Provider::RecreationDotGov => "recreation.gov",
            Provider::ReserveCalifornia => "reservecalifornia",
            Provider::AlabamaStateParks => "alabama_state_parks",
            Provider::ArizonaStateParks => "arizona_state_parks",
            Provider::FloridaStateParks => "florida_state_parks",
            Provider::MinnesotaStateParks => "minnesota_state_parks",
            Provider::MissouriStateParks => "missouri_state_parks",
            Provider::OhioStateParks => "ohio_state_parks",
            Provider::VirginiaStateParks => "virginia_state_parks",
            Provider::NorthernTerritory => "northern_territory",
            Provider::FairfaxCountyParks => "fairfax_county_parks",
            Provider::MaricopaCountyParks => "maricopa_county_parks",
            Provider::OregonMetro => "oregon_metro",
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Provider::RecreationDotGov => "Recreation.gov (US Federal)",
            Provider::ReserveCalifornia => "ReserveCalifornia (CA State Parks)",
            Provider::AlabamaStateParks => "Alabama State Parks",
            Provider::ArizonaStateParks => "Arizona State Parks",
            Provider::FloridaStateParks => "Florida State Parks",
            Provider::MinnesotaStateParks => "Minnesota State Parks",
            Provider::MissouriStateParks => "Missouri State Parks",
            Provider::OhioStateParks => "Ohio State Parks",
            Provider::VirginiaStateParks => "Virginia State Parks",
            Provider::NorthernTerritory => "Northern Territory (AU)",
            Provider::FairfaxCountyParks => "Fairfax County Parks (VA)",
            Provider::MaricopaCountyParks => "Maricopa County Parks (AZ)",
            Provider::OregonMetro => "Oregon Metro (Portland area)",
        }
    }

    /// Platform family
    pub fn family(&self) -> ProviderFamily {
        match self {
            Provider::RecreationDotGov => ProviderFamily::RecreationDotGov,
            _ => ProviderFamily::UseDirect,
        }
    }

    /// Alternate names users type for this provider
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Provider::RecreationDotGov => {
                &["recdotgov", "recreationdotgov", "rec.gov", "recreation"]
            }
            Provider::ReserveCalifornia => &["reserve_california", "reserve california", "rc"],
            Provider::AlabamaStateParks => &["alabama", "alabama parks", "alabamastateparks"],
            Provider::ArizonaStateParks => &["arizona", "az", "azstateparks", "arizonastateparks"],
            Provider::FloridaStateParks => &["florida", "fl", "floridastateparks"],
            Provider::MinnesotaStateParks => &["minnesota", "mn", "minnesotastateparks"],
            Provider::MissouriStateParks => &["missouri", "mo", "missouristateparks"],
            Provider::OhioStateParks => &["ohio", "oh", "ohiostateparks"],
            Provider::VirginiaStateParks => &["virginia", "va", "virginiastateparks"],
            Provider::NorthernTerritory => &["nt", "australia_nt", "northernterritory"],
            Provider::FairfaxCountyParks => &["fairfax", "fairfaxcounty", "fairfaxparks"],
            Provider::MaricopaCountyParks => &["maricopa", "maricopacounty", "maricopaparks"],
            Provider::OregonMetro => &["oregonmetro", "portland", "portland_metro"],
        }
    }

    /// Human description
    pub fn description(&self) -> Option<&'static str> {
        Some(match self {
            Provider::RecreationDotGov => "US federal campgrounds via Recreation.gov",
            Provider::ReserveCalifornia => "California State Parks via ReserveCalifornia",
            Provider::AlabamaStateParks => "Alabama State Parks via ReserveAlaPark.com",
            Provider::ArizonaStateParks => "Arizona State Parks via AZStateParks.com",
            Provider::FloridaStateParks => "Florida State Parks",
            Provider::MinnesotaStateParks => "Minnesota State Parks",
            Provider::MissouriStateParks => "Missouri State Parks",
            Provider::OhioStateParks => "Ohio State Parks",
            Provider::VirginiaStateParks => "Virginia State Parks",
            Provider::NorthernTerritory => "Australian Northern Territory parks",
            Provider::FairfaxCountyParks => "Fairfax County Parks, Virginia",
            Provider::MaricopaCountyParks => "Maricopa County Parks, Arizona",
            Provider::OregonMetro => "Oregon Metro parks (Portland Metro region)",
        })
    }

    /// UseDirect hosts, `None` for providers outside that family
    pub fn use_direct_endpoint(&self) -> Option<UseDirectEndpoint> {
        let (rdr_base_url, booking_url) = match self {
            Provider::RecreationDotGov => return None,
            Provider::ReserveCalifornia => (
                "https://calirdr.usedirect.com/rdr/rdr",
                "https://www.reservecalifornia.com",
            ),
            Provider::AlabamaStateParks => (
                "https://alabamardr.usedirect.com/alabamardr/rdr",
                "https://www.reservealapark.com",
            ),
            Provider::ArizonaStateParks => (
                "https://azrdr.usedirect.com/azrdr/rdr",
                "https://www.azstateparks.com",
            ),
            Provider::FloridaStateParks => (
                "https://floridardr.usedirect.com/floridardr/rdr",
                "https://reserve.floridastateparks.org",
            ),
            Provider::MinnesotaStateParks => (
                "https://mnrdr.usedirect.com/minnesotardr/rdr",
                "https://reservemn.usedirect.com",
            ),
            Provider::MissouriStateParks => (
                "https://icampmo1.usedirect.com/MORDR/rdr",
                "https://icampmo1.usedirect.com",
            ),
            Provider::OhioStateParks => (
                "https://ohiordr.usedirect.com/ohiordr/rdr",
                "https://reserveohio.com",
            ),
            Provider::VirginiaStateParks => (
                "https://virginiardr.usedirect.com/virginiardr/rdr",
                "https://reservevaparks.com",
            ),
            Provider::NorthernTerritory => (
                "https://ntrdr.usedirect.com/ntrdr/rdr",
                "https://parkbookings.nt.gov.au",
            ),
            Provider::FairfaxCountyParks => (
                "https://fairfaxrdr.usedirect.com/fairfaxrdr/rdr",
                "https://fairfax.usedirect.com",
            ),
            Provider::MaricopaCountyParks => (
                "https://maricopardr.usedirect.com/maricopardr/rdr",
                "https://maricopacountyparks.usedirect.com",
            ),
            Provider::OregonMetro => (
                "https://oregonmetrordr.usedirect.com/oregonmetrordr/rdr",
                "https://oregonmetro.usedirect.com",
            ),
        };

        Some(UseDirectEndpoint {
            rdr_base_url,
            booking_url,
        })
    }

    /// Builds the catalog entry for this provider around its search capability
    pub fn descriptor(self, search: Arc<dyn SearchCapability>) -> ProviderDescriptor {
        ProviderDescriptor {
            key: self.key(),
            label: self.label(),
            family: self.family(),
            aliases: self.aliases(),
            description: self.description(),
            search,
        }
    }
}

/// Immutable catalog entry for one provider
#[derive(Clone)]
pub struct ProviderDescriptor {
    /// Canonical key: lowercase, no whitespace, unique in the catalog
    pub key: &'static str,
    /// Display name
    pub label: &'static str,
    /// Platform family
    pub family: ProviderFamily,
    /// Case-insensitive alternate names
    pub aliases: &'static [&'static str],
    /// Optional free text
    pub description: Option<&'static str>,
    /// Search implementation for this provider
    pub search: Arc<dyn SearchCapability>,
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("family", &self.family)
            .field("aliases", &self.aliases)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Reasons a catalog refuses to build
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// Key has uppercase characters or whitespace
    #[error("Provider key {0:?} must be lowercase without whitespace")]
    InvalidKey(String),

    /// Key or alias claimed by two providers
    #[error("Name {name:?} is claimed by both {first:?} and {second:?}")]
    Collision {
        /// The colliding key or alias, lower-cased
        name: String,
        /// Provider that registered it first
        first: String,
        /// Provider that tried to register it again
        second: String,
    },

    /// Default provider missing from the catalog
    #[error("Default provider {0:?} is not in the catalog")]
    MissingDefault(String),
}

/// Ordered, read-only collection of providers with its derived alias index
#[derive(Debug)]
pub struct ProviderCatalog {
    descriptors: Vec<ProviderDescriptor>,
    positions: HashMap<&'static str, usize>,
    alias_index: AliasIndex,
    default_key: &'static str,
}

impl ProviderCatalog {
    /// Validates the descriptors and builds the alias index
    pub fn new(
        descriptors: Vec<ProviderDescriptor>,
        default_key: &'static str,
    ) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(descriptors.len());

        for (position, descriptor) in descriptors.iter().enumerate() {
            let key = descriptor.key;
            if key.is_empty()
                || key.chars().any(char::is_whitespace)
                || key.to_lowercase() != key
            {
                return Err(CatalogError::InvalidKey(key.to_string()));
            }
            if let Some(&previous) = positions.get(key) {
                let previous: &ProviderDescriptor = &descriptors[previous];
                return Err(CatalogError::Collision {
                    name: key.to_string(),
                    first: previous.key.to_string(),
                    second: key.to_string(),
                });
            }
            positions.insert(key, position);
        }

        if !positions.contains_key(default_key) {
            return Err(CatalogError::MissingDefault(default_key.to_string()));
        }

        let alias_index = AliasIndex::build(&descriptors)?;
        debug!(
            "Provider catalog built with {} providers and {} names",
            descriptors.len(),
            alias_index.len()
        );

        Ok(Self {
            descriptors,
            positions,
            alias_index,
            default_key,
        })
    }

    /// Builds the full provider table, asking `capability_for` for each search implementation
    pub fn standard<F>(mut capability_for: F) -> Result<Self, CatalogError>
    where
        F: FnMut(Provider) -> Arc<dyn SearchCapability>,
    {
        let descriptors = Provider::ALL
            .into_iter()
            .map(|provider| provider.descriptor(capability_for(provider)))
            .collect();

        Self::new(descriptors, DEFAULT_PROVIDER_KEY)
    }

    /// Providers in insertion order
    pub fn descriptors(&self) -> &[ProviderDescriptor] {
        &self.descriptors
    }

    /// Looks a provider up by canonical key
    pub fn get(&self, key: &str) -> Option<&ProviderDescriptor> {
        self.positions
            .get(key)
            .map(|&position| &self.descriptors[position])
    }

    /// Provider used when the caller names none
    pub fn default_provider(&self) -> &ProviderDescriptor {
        &self.descriptors[self.positions[self.default_key]]
    }

    /// Alias index derived from this catalog
    pub fn alias_index(&self) -> &AliasIndex {
        &self.alias_index
    }

    /// All canonical keys, sorted
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .descriptors
            .iter()
            .map(|descriptor| descriptor.key.to_string())
            .collect();
        keys.sort();
        keys
    }
}
