//! Deterministic offline geo-data backend
//!
//! Produces plausible, repeatable area facts from the coordinates alone so
//! the engine can run end to end without network access. The same point
//! always yields the same data within a process and across processes.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use tracing::debug;

use shared::{geo, Coordinates, DataSourceError};

use crate::traits::{GeoDataSource, Geocoder};
use crate::types::{
    AmenitySummary, ChargingStation, FuelStation, PopulationInfo, PowerInfrastructure, RoadNetwork,
};

/// Known urban centers used for name resolution and for biasing synthetic
/// density upwards near real cities.
const CITY_PROFILES: &[(&str, f64, f64, f64)] = &[
    // (name, latitude, longitude, density per km^2)
    ("Chennai", 13.0827, 80.2707, 11_000.0),
    ("Coimbatore", 11.0168, 76.9558, 7_100.0),
    ("Madurai", 9.9252, 78.1198, 6_400.0),
    ("Salem", 11.6643, 78.1460, 4_500.0),
    ("Tiruchirappalli", 10.7905, 78.7047, 5_600.0),
    ("Erode", 11.3410, 77.7172, 3_800.0),
    ("Vellore", 12.9165, 79.1325, 4_200.0),
];

/// Stable per-point seed. Coordinates are rounded to four decimals (about
/// eleven meters) so nearby lookups from the same candidate agree; the salt
/// decorrelates the different data concerns.
fn point_seed(center: Coordinates, salt: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    ((center.latitude * 1e4).round() as i64).hash(&mut hasher);
    ((center.longitude * 1e4).round() as i64).hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish()
}

/// Map a seed into [lo, hi]
fn spread(seed: u64, lo: f64, hi: f64) -> f64 {
    lo + (seed % 10_000) as f64 / 10_000.0 * (hi - lo)
}

fn nearest_city(center: Coordinates) -> (&'static str, f64, f64) {
    let mut best = (CITY_PROFILES[0].0, f64::INFINITY, CITY_PROFILES[0].3);
    for (name, lat, lon, density) in CITY_PROFILES {
        let distance = geo::haversine_km(center, Coordinates::new(*lat, *lon));
        if distance < best.1 {
            best = (name, distance, *density);
        }
    }
    best
}

/// Urban factor in [0.15, 1.0], decaying with distance from the nearest
/// known city.
fn urban_factor(center: Coordinates) -> f64 {
    let (_, distance_km, _) = nearest_city(center);
    (1.0 - distance_km / 120.0).clamp(0.15, 1.0)
}

/// Offline geo-data source with repeatable per-point output.
#[derive(Clone, Debug, Default)]
pub struct SyntheticGeoData;

impl SyntheticGeoData {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GeoDataSource for SyntheticGeoData {
    async fn fetch_road_network(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<RoadNetwork, DataSourceError> {
        let seed = point_seed(center, "roads");
        let urban = urban_factor(center);
        let scale = (radius_km / 50.0).max(0.2) * urban;

        let mut segments_by_class = BTreeMap::new();
        let classes: [(&str, f64); 7] = [
            ("motorway", 3.0),
            ("trunk", 5.0),
            ("primary", 12.0),
            ("secondary", 18.0),
            ("tertiary", 25.0),
            ("residential", 90.0),
            ("service", 45.0),
        ];
        let mut total = 0u32;
        for (index, (class, ceiling)) in classes.iter().enumerate() {
            let class_seed = seed.rotate_left(index as u32 * 7);
            let count = spread(class_seed, ceiling * 0.2, *ceiling) * scale;
            let count = count.round() as u32;
            if count > 0 {
                segments_by_class.insert((*class).to_string(), count);
                total += count;
            }
        }

        debug!(lat = center.latitude, lon = center.longitude, total, "synthetic road network");
        Ok(RoadNetwork {
            segments_by_class,
            total_segments: total,
            estimated_length_km: total as f64 * spread(seed, 0.4, 1.2),
        })
    }

    async fn fetch_power_infrastructure(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PowerInfrastructure, DataSourceError> {
        let seed = point_seed(center, "power");
        let scale = (radius_km / 50.0).max(0.2) * urban_factor(center);
        Ok(PowerInfrastructure {
            substations: (spread(seed, 1.0, 8.0) * scale).round() as u32,
            high_voltage_substations: (spread(seed.rotate_left(11), 0.0, 2.6) * scale).round() as u32,
            power_lines: (spread(seed.rotate_left(23), 6.0, 40.0) * scale).round() as u32,
        })
    }

    async fn fetch_charging_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<ChargingStation>, DataSourceError> {
        let seed = point_seed(center, "chargers");
        let count =
            (spread(seed, 0.0, 6.0) * urban_factor(center) * (radius_km / 50.0).max(0.2)).round() as usize;
        let stations = (0..count)
            .map(|index| {
                let bearing_seed = seed.rotate_left(index as u32 * 5 + 3);
                let east = spread(bearing_seed, -0.6, 0.6) * radius_km;
                let north = spread(bearing_seed.rotate_left(13), -0.6, 0.6) * radius_km;
                ChargingStation {
                    name: format!("Charging Point {}", index + 1),
                    operator: None,
                    coordinates: geo::offset_km(center, north, east),
                }
            })
            .collect();
        Ok(stations)
    }

    async fn fetch_fuel_stations(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<Vec<FuelStation>, DataSourceError> {
        let seed = point_seed(center, "fuel");
        let count =
            (spread(seed, 2.0, 12.0) * urban_factor(center) * (radius_km / 50.0).max(0.2)).round() as usize;
        let stations = (0..count)
            .map(|index| {
                let bearing_seed = seed.rotate_left(index as u32 * 5 + 7);
                let east = spread(bearing_seed, -0.7, 0.7) * radius_km;
                let north = spread(bearing_seed.rotate_left(17), -0.7, 0.7) * radius_km;
                FuelStation {
                    name: format!("Fuel Station {}", index + 1),
                    brand: None,
                    coordinates: geo::offset_km(center, north, east),
                }
            })
            .collect();
        Ok(stations)
    }

    async fn fetch_population(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<PopulationInfo, DataSourceError> {
        let seed = point_seed(center, "population");
        let (city, distance_km, city_density) = nearest_city(center);
        let urban = urban_factor(center);
        let density = (city_density * urban * spread(seed, 0.6, 1.1)).max(150.0);
        let area_km2 = std::f64::consts::PI * radius_km * radius_km;
        // Only a slice of the circle is settled; larger radii dilute faster
        let settled_fraction = (8.0 / radius_km.max(8.0)).min(1.0) * 0.25;
        let population = (density * area_km2 * settled_fraction) as u64;
        Ok(PopulationInfo {
            population,
            density_per_km2: density,
            largest_place: (distance_km < 100.0).then(|| city.to_string()),
        })
    }

    async fn fetch_amenities(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> Result<AmenitySummary, DataSourceError> {
        let seed = point_seed(center, "amenities");
        let scale = (radius_km / 50.0).max(0.2) * urban_factor(center);
        let pick = |salt: u32, lo: f64, hi: f64| (spread(seed.rotate_left(salt), lo, hi) * scale).round() as u32;
        Ok(AmenitySummary {
            banks: pick(3, 2.0, 18.0),
            healthcare: pick(7, 2.0, 14.0),
            education: pick(11, 3.0, 20.0),
            retail: pick(13, 5.0, 35.0),
            automotive: pick(17, 2.0, 12.0),
            industrial: pick(19, 0.0, 9.0),
            commercial: pick(23, 3.0, 22.0),
        })
    }
}

/// Offline geocoder over the known city table.
#[derive(Clone, Debug, Default)]
pub struct SyntheticGeocoder;

impl SyntheticGeocoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Geocoder for SyntheticGeocoder {
    async fn resolve(&self, name: &str) -> Result<Coordinates, DataSourceError> {
        let needle = name.trim().to_lowercase();
        CITY_PROFILES
            .iter()
            .find(|(city, _, _, _)| needle.contains(&city.to_lowercase()))
            .map(|(_, lat, lon, _)| Coordinates::new(*lat, *lon))
            .ok_or_else(|| DataSourceError::Geocoding(format!("unknown place: {name}")))
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<String, DataSourceError> {
        let (city, distance_km, _) = nearest_city(coordinates);
        if distance_km < 5.0 {
            Ok(city.to_string())
        } else if distance_km < 100.0 {
            Ok(format!("{city} Region"))
        } else {
            Err(DataSourceError::Geocoding(format!(
                "no known place near {coordinates}"
            )))
        }
    }
}
