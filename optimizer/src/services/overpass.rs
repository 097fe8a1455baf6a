//! OpenStreetMap-backed geo-data source
//!
//! Area facts come from the Overpass API (roads, power, chargers, fuel,
//! amenities) and GeoNames (population). Every fetch is independent and
//! maps HTTP failures onto `DataSourceError` so providers can contain them
//! per dimension.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use shared::{Coordinates, DataSourceError};

use crate::traits::GeoDataSource;
use crate::types::{
    AmenitySummary, ChargingStation, FuelStation, PopulationInfo, PowerInfrastructure, RoadNetwork,
};

const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const DEFAULT_GEONAMES_URL: &str = "http://api.geonames.org/findNearbyPlaceNameJSON";
const HTTP_TIMEOUT: Duration = Duration::from_secs(25);

const ROAD_CLASSES: &str = "motorway|trunk|primary|secondary|tertiary|residential|service";

/// Geo-data source over the public Overpass and GeoNames APIs.
pub struct OsmGeoData {
    client: reqwest::Client,
    overpass_url: String,
    geonames_url: String,
    geonames_username: String,
}

impl OsmGeoData {
    pub fn new(geonames_username: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .user_agent("ev-site-optimizer/0.1")
                .build()
                .unwrap_or_default(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            geonames_url: DEFAULT_GEONAMES_URL.to_string(),
            geonames_username: geonames_username.into(),
        }
    }

    /// Point the client at alternate endpoints, used by tests
    pub fn with_endpoints(mut self, overpass_url: impl Into<String>, geonames_url: impl Into<String>) -> Self {
        self.overpass_url = overpass_url.into();
        self.geonames_url = geonames_url.into();
        self
    }

    /// Run one Overpass QL query and return the `elements` array
    async fn overpass(&self, query: String) -> Result<Vec<Value>, DataSourceError> {
        let response = self
            .client
            .post(&self.overpass_url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::from_status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| DataSourceError::InvalidResponse(err.to_string()))?;
        match body.get("elements").and_then(Value::as_array) {
            Some(elements) => Ok(elements.clone()),
            None => Err(DataSourceError::InvalidResponse(
                "response has no elements array".to_string(),
            )),
        }
    }

    fn around(center: Coordinates, radius_km: f64) -> String {
        format!(
            "around:{:.0},{:.6},{:.6}",
            radius_km * 1000.0,
            center.latitude,
            center.longitude
        )
    }
}

/// Translate a transport-level reqwest failure
fn request_error(err: reqwest::Error) -> DataSourceError {
    if err.is_timeout() {
        DataSourceError::Timeout
    } else {
        DataSourceError::Network(err.to_string())
    }
}

fn element_coordinates(element: &Value) -> Option<Coordinates> {
    let latitude = element.get("lat").and_then(Value::as_f64)?;
    let longitude = element.get("lon").and_then(Value::as_f64)?;
    Some(Coordinates::new(latitude, longitude))
}

fn element_tag(element: &Value, key: &str) -> Option<String> {
    element
        .get("tags")
        .and_then(|tags| tags.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl GeoDataSource for OsmGeoData {
    async fn fetch_road_network(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<RoadNetwork, DataSourceError> {
        let query = format!(
            "[out:json][timeout:25];way[\"highway\"~\"^({ROAD_CLASSES})$\"]({});out tags;",
            Self::around(center, radius_km)
        );
        let elements = self.overpass(query).await?;

        let mut segments_by_class: BTreeMap<String, u32> = BTreeMap::new();
        for element in &elements {
            if let Some(class) = element_tag(element, "highway") {
                *segments_by_class.entry(class).or_insert(0) += 1;
            }
        }
        let total_segments = segments_by_class.values().sum();
        debug!(total_segments, "road network fetched");
        Ok(RoadNetwork {
            segments_by_class,
            total_segments,
            // Overpass `out tags` omits geometry; assume a typical urban
            // segment length rather than paying for full geometry
            estimated_length_km: total_segments as f64 * 0.5,
        })
    }

    async fn fetch_power_infrastructure(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PowerInfrastructure, DataSourceError> {
        let around = Self::around(center, radius_km);
        let query = format!(
            "[out:json][timeout:25];(\
             node[\"power\"=\"substation\"]({around});\
             way[\"power\"=\"substation\"]({around});\
             way[\"power\"=\"line\"]({around}););out tags;"
        );
        let elements = self.overpass(query).await?;

        let mut infrastructure = PowerInfrastructure::default();
        for element in &elements {
            match element_tag(element, "power").as_deref() {
                Some("substation") => {
                    infrastructure.substations += 1;
                    let voltage = element_tag(element, "voltage")
                        .and_then(|v| v.split(';').next().and_then(|part| part.trim().parse::<u64>().ok()))
                        .unwrap_or(0);
                    if voltage >= 110_000 {
                        infrastructure.high_voltage_substations += 1;
                    }
                }
                Some("line") => infrastructure.power_lines += 1,
                _ => {}
            }
        }
        Ok(infrastructure)
    }

    async fn fetch_charging_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<ChargingStation>, DataSourceError> {
        let query = format!(
            "[out:json][timeout:25];node[\"amenity\"=\"charging_station\"]({});out;",
            Self::around(center, radius_km)
        );
        let elements = self.overpass(query).await?;
        Ok(elements
            .iter()
            .filter_map(|element| {
                Some(ChargingStation {
                    name: element_tag(element, "name").unwrap_or_else(|| "Charging Station".to_string()),
                    operator: element_tag(element, "operator"),
                    coordinates: element_coordinates(element)?,
                })
            })
            .collect())
    }

    async fn fetch_fuel_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<FuelStation>, DataSourceError> {
        let query = format!(
            "[out:json][timeout:25];node[\"amenity\"=\"fuel\"]({});out;",
            Self::around(center, radius_km)
        );
        let elements = self.overpass(query).await?;
        Ok(elements
            .iter()
            .filter_map(|element| {
                Some(FuelStation {
                    name: element_tag(element, "name").unwrap_or_else(|| "Fuel Station".to_string()),
                    brand: element_tag(element, "brand"),
                    coordinates: element_coordinates(element)?,
                })
            })
            .collect())
    }

    async fn fetch_population(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PopulationInfo, DataSourceError> {
        let response = self
            .client
            .get(&self.geonames_url)
            .query(&[
                ("lat", center.latitude.to_string()),
                ("lng", center.longitude.to_string()),
                ("radius", format!("{:.0}", radius_km.min(300.0))),
                ("maxRows", "10".to_string()),
                ("cityMin", "cities1000".to_string()),
                ("username", self.geonames_username.clone()),
            ])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::from_status(status.as_u16()));
        }
        let body: Value = response
            .json()
            .await
            .map_err(|err| DataSourceError::InvalidResponse(err.to_string()))?;

        let places = body.get("geonames").and_then(Value::as_array).ok_or_else(|| {
            DataSourceError::InvalidResponse("response has no geonames array".to_string())
        })?;
        if places.is_empty() {
            return Err(DataSourceError::NoData(format!(
                "no populated places within {radius_km}km"
            )));
        }

        let mut population: u64 = 0;
        let mut largest_place: Option<(String, u64)> = None;
        for place in places {
            let count = place.get("population").and_then(Value::as_u64).unwrap_or(0);
            population += count;
            let name = place.get("name").and_then(Value::as_str).unwrap_or_default();
            if largest_place.as_ref().map_or(true, |(_, best)| count > *best) {
                largest_place = Some((name.to_string(), count));
            }
        }

        let area_km2 = std::f64::consts::PI * radius_km * radius_km;
        Ok(PopulationInfo {
            population,
            density_per_km2: population as f64 / area_km2.max(1.0),
            largest_place: largest_place.map(|(name, _)| name),
        })
    }

    async fn fetch_amenities(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<AmenitySummary, DataSourceError> {
        let around = Self::around(center, radius_km);
        let query = format!(
            "[out:json][timeout:25];(\
             node[\"amenity\"~\"^(bank|atm|hospital|clinic|pharmacy|school|college|university)$\"]({around});\
             node[\"shop\"]({around});\
             node[\"amenity\"=\"car_repair\"]({around});\
             way[\"landuse\"~\"^(industrial|commercial)$\"]({around}););out tags;"
        );
        let elements = self.overpass(query).await?;

        let mut summary = AmenitySummary::default();
        for element in &elements {
            if let Some(amenity) = element_tag(element, "amenity") {
                match amenity.as_str() {
                    "bank" | "atm" => summary.banks += 1,
                    "hospital" | "clinic" | "pharmacy" => summary.healthcare += 1,
                    "school" | "college" | "university" => summary.education += 1,
                    "car_repair" => summary.automotive += 1,
                    _ => {}
                }
            } else if element_tag(element, "shop").is_some() {
                summary.retail += 1;
            } else if let Some(landuse) = element_tag(element, "landuse") {
                match landuse.as_str() {
                    "industrial" => summary.industrial += 1,
                    "commercial" => summary.commercial += 1,
                    _ => {}
                }
            }
        }
        Ok(summary)
    }
}
