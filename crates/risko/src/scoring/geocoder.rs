//! Address resolution with a strict fallback ladder.
//!
//! 1. external lookup of `"{address}, {country}"`, skipped when the address
//!    already names the country
//! 2. external lookup of the bare address
//! 3. substring match against a fixed city table (after diacritic folding)
//! 4. the country centroid, unless strict mode is enabled
//!
//! External failures are logged and swallowed; they never reach callers.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::Coordinate;

/// Geographic centre of Turkey, the last resort for unknown addresses.
pub const COUNTRY_CENTROID: Coordinate = Coordinate::new(39.0, 35.0);

/// Ordered city table; the first substring hit wins.
const KNOWN_CITIES: &[(&str, Coordinate)] = &[
    ("istanbul", Coordinate::new(41.0082, 28.9784)),
    ("ankara", Coordinate::new(39.9334, 32.8597)),
    ("izmir", Coordinate::new(38.4237, 27.1428)),
    ("bursa", Coordinate::new(40.1885, 29.0610)),
    ("antalya", Coordinate::new(36.8969, 30.7133)),
    ("adana", Coordinate::new(37.0000, 35.3213)),
    ("konya", Coordinate::new(37.8746, 32.4932)),
    ("gaziantep", Coordinate::new(37.0662, 37.3833)),
    ("kocaeli", Coordinate::new(40.8533, 29.8815)),
    ("mersin", Coordinate::new(36.8121, 34.6415)),
    ("diyarbakir", Coordinate::new(37.9144, 40.2306)),
    ("kayseri", Coordinate::new(38.7312, 35.4787)),
    ("eskisehir", Coordinate::new(39.7767, 30.5206)),
    ("samsun", Coordinate::new(41.2928, 36.3313)),
    ("trabzon", Coordinate::new(41.0027, 39.7168)),
    ("erzurum", Coordinate::new(39.9043, 41.2679)),
];

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodeSource {
    External,
    CityTable,
    CountryCentroid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeMatch {
    pub coordinate: Coordinate,
    pub source: GeocodeSource,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding service returned status {0}")]
    Status(u16),
    #[error("could not decode geocoding response: {0}")]
    Decode(String),
    #[error("geocoding request timed out after {0:?}")]
    Timeout(Duration),
    #[error("external geocoding is disabled")]
    Disabled,
    #[error("could not build geocoding client: {0}")]
    Client(String),
}

/// External geocoding backend.
pub trait GeocodingProvider: Send + Sync {
    /// Resolve a free-text query; `Ok(None)` means the service had no match.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, GeocodeError>> + Send;
}

/// Client for a Nominatim-compatible `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimProvider {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|err| GeocodeError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl GeocodingProvider for NominatimProvider {
    async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| GeocodeError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|err| GeocodeError::Decode(err.to_string()))?;

        places
            .into_iter()
            .next()
            .map(|place| parse_place(&place))
            .transpose()
    }
}

fn parse_place(place: &NominatimPlace) -> Result<Coordinate, GeocodeError> {
    let latitude = place
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|err| GeocodeError::Decode(format!("latitude '{}': {err}", place.lat)))?;
    let longitude = place
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|err| GeocodeError::Decode(format!("longitude '{}': {err}", place.lon)))?;
    Ok(Coordinate::new(latitude, longitude))
}

/// Provider used when external lookups are switched off; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl GeocodingProvider for OfflineProvider {
    async fn search(&self, _query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Err(GeocodeError::Disabled)
    }
}

/// Configuration-selected provider.
#[derive(Debug, Clone)]
pub enum GeocoderBackend {
    Nominatim(NominatimProvider),
    Offline(OfflineProvider),
}

impl GeocodingProvider for GeocoderBackend {
    async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        match self {
            Self::Nominatim(provider) => provider.search(query).await,
            Self::Offline(provider) => provider.search(query).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    /// Country qualifier appended to the first external query.
    pub country: String,
    pub timeout: Duration,
    /// Report unknown addresses as unresolved instead of using the centroid.
    pub strict: bool,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            country: "Turkey".to_string(),
            timeout: Duration::from_secs(10),
            strict: false,
        }
    }
}

pub struct Geocoder<P> {
    provider: P,
    settings: GeocoderSettings,
}

impl<P> Geocoder<P>
where
    P: GeocodingProvider,
{
    pub fn new(provider: P, settings: GeocoderSettings) -> Self {
        Self { provider, settings }
    }

    pub async fn geocode(&self, address: &str) -> Option<GeocodeMatch> {
        let address = address.trim();

        for query in self.queries(address) {
            let query = query.as_str();
            match self.lookup(query).await {
                Ok(Some(coordinate)) => {
                    debug!(query, "address resolved by external geocoder");
                    return Some(GeocodeMatch {
                        coordinate,
                        source: GeocodeSource::External,
                    });
                }
                Ok(None) => debug!(query, "external geocoder returned no match"),
                Err(err) => warn!(query, error = %err, "external geocoding attempt failed"),
            }
        }

        if let Some(coordinate) = city_table_lookup(address) {
            debug!(address, "address resolved from city table");
            return Some(GeocodeMatch {
                coordinate,
                source: GeocodeSource::CityTable,
            });
        }

        if self.settings.strict {
            debug!(address, "address unresolved in strict mode");
            return None;
        }

        debug!(address, "address defaulted to country centroid");
        Some(GeocodeMatch {
            coordinate: COUNTRY_CENTROID,
            source: GeocodeSource::CountryCentroid,
        })
    }

    /// External queries in attempt order.
    fn queries(&self, address: &str) -> Vec<String> {
        let country = normalize_address(&self.settings.country);
        let mut queries = Vec::with_capacity(2);
        if !normalize_address(address).contains(&country) {
            queries.push(format!("{address}, {}", self.settings.country));
        }
        queries.push(address.to_string());
        queries
    }

    async fn lookup(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let timeout = self.settings.timeout;
        let outcome = tokio::time::timeout(timeout, self.provider.search(query))
            .await
            .map_err(|_| GeocodeError::Timeout(timeout))??;
        Ok(outcome.filter(Coordinate::is_valid))
    }
}

/// Lowercase and fold Turkish diacritics to ASCII.
pub fn normalize_address(address: &str) -> String {
    address
        .chars()
        .flat_map(|ch| {
            let folded = match ch {
                'ı' | 'İ' | 'I' => 'i',
                'ş' | 'Ş' => 's',
                'ğ' | 'Ğ' => 'g',
                'ü' | 'Ü' => 'u',
                'ö' | 'Ö' => 'o',
                'ç' | 'Ç' => 'c',
                other => other,
            };
            folded.to_lowercase()
        })
        .collect()
}

pub fn city_table_lookup(address: &str) -> Option<Coordinate> {
    let normalized = normalize_address(address);
    KNOWN_CITIES
        .iter()
        .find(|(name, _)| normalized.contains(name))
        .map(|&(_, coordinate)| coordinate)
}
