//! Nominatim geocoder
//!
//! Forward and reverse geocoding over the public Nominatim API. Reverse
//! lookups are best-effort naming for generated candidates; callers treat
//! failures as cosmetic.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use shared::{Coordinates, DataSourceError};

use crate::traits::Geocoder;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .user_agent("ev-site-optimizer/0.1")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at an alternate endpoint, used by tests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json(&self, url: String, query: &[(&str, String)]) -> Result<Value, DataSourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    DataSourceError::Timeout
                } else {
                    DataSourceError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::from_status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|err| DataSourceError::InvalidResponse(err.to_string()))
    }
}

impl Default for NominatimGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, name: &str) -> Result<Coordinates, DataSourceError> {
        let body = self
            .get_json(
                format!("{}/search", self.base_url),
                &[
                    ("q", name.to_string()),
                    ("format", "json".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let first = body
            .as_array()
            .and_then(|results| results.first())
            .ok_or_else(|| DataSourceError::Geocoding(format!("no results for {name}")))?;
        let latitude = first
            .get("lat")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or_else(|| DataSourceError::InvalidResponse("missing lat field".to_string()))?;
        let longitude = first
            .get("lon")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or_else(|| DataSourceError::InvalidResponse("missing lon field".to_string()))?;

        let coordinates = Coordinates::new(latitude, longitude);
        debug!(place = name, lat = latitude, lon = longitude, "place resolved");
        Ok(coordinates)
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<String, DataSourceError> {
        let body = self
            .get_json(
                format!("{}/reverse", self.base_url),
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                    ("format", "json".to_string()),
                    ("zoom", "14".to_string()),
                ],
            )
            .await?;

        // Prefer the most specific locality field present
        let address = body.get("address");
        let name = ["suburb", "town", "village", "city", "county"]
            .iter()
            .find_map(|field| {
                address
                    .and_then(|a| a.get(field))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .or_else(|| {
                body.get("display_name")
                    .and_then(Value::as_str)
                    .and_then(|full| full.split(',').next())
                    .map(str::to_string)
            });

        name.ok_or_else(|| {
            DataSourceError::Geocoding(format!("no display name for {coordinates}"))
        })
    }
}
