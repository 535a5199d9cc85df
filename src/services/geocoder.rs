use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::GeocoderSettings;
use crate::models::GeoPoint;

/// Errors that can occur when talking to the place-search service
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One entry of a Nominatim-style search response
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Address to coordinate resolver
///
/// Tries the full address first, then city and state only, then falls back
/// to a fixed default point. Lookup failures never reach the caller.
pub struct Geocoder {
    base_url: String,
    country: String,
    fallback: GeoPoint,
    client: Client,
    cache: Cache<String, GeoPoint>,
}

impl Geocoder {
    pub fn new(settings: &GeocoderSettings) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()?;

        let cache = Cache::builder()
            .max_capacity(settings.cache_size)
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
            .build();

        Ok(Self {
            base_url: settings.base_url.clone(),
            country: settings.country.clone(),
            fallback: GeoPoint::new(settings.default_latitude, settings.default_longitude),
            client,
            cache,
        })
    }

    /// Point returned when neither lookup finds anything
    pub fn default_point(&self) -> GeoPoint {
        self.fallback
    }

    /// Resolve an address to coordinates, degrading to the default point
    pub async fn resolve_coordinates(&self, address: &str, city: &str, state: &str) -> GeoPoint {
        let full_query = self.format_query(&[address, city, state]);
        if let Some(point) = self.try_lookup(&full_query).await {
            return point;
        }

        let city_query = self.format_query(&[city, state]);
        if city_query != full_query {
            if let Some(point) = self.try_lookup(&city_query).await {
                tracing::debug!("Geocoded {:?} at city level", full_query);
                return point;
            }
        }

        tracing::warn!(
            "No geocoding result for {:?}, using default point {:?}",
            full_query,
            self.fallback
        );
        self.fallback
    }

    async fn try_lookup(&self, query: &str) -> Option<GeoPoint> {
        match self.lookup(query).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!("Geocoding lookup for {:?} failed: {}", query, e);
                None
            }
        }
    }

    /// Run a single place search, returning the first hit if any
    pub async fn lookup(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        if let Some(point) = self.cache.get(query).await {
            tracing::trace!("Geocoder cache hit: {}", query);
            return Ok(Some(point));
        }

        let url = format!(
            "{}/search?format=json&limit=1&q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::ApiError(format!(
                "Place search returned {}",
                response.status()
            )));
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let point = parse_place(&place)?;
        self.cache.insert(query.to_string(), point).await;

        Ok(Some(point))
    }

    fn format_query(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .map(|part| part.trim())
            .chain(std::iter::once(self.country.trim()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn parse_place(place: &Place) -> Result<GeoPoint, GeocodeError> {
    let latitude = place
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse(format!("bad latitude {:?}: {}", place.lat, e)))?;
    let longitude = place
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|e| GeocodeError::InvalidResponse(format!("bad longitude {:?}: {}", place.lon, e)))?;

    Ok(GeoPoint::new(latitude, longitude))
}
