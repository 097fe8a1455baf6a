//! Geographic helpers shared by candidate generation and scoring

use crate::types::Coordinates;

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points in kilometers
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Offset a point by the given distances north and east.
///
/// Uses the flat approximation (1 degree latitude ~ 111 km, longitude scaled
/// by cos(latitude)), which is adequate at search-radius scale.
pub fn offset_km(origin: Coordinates, north_km: f64, east_km: f64) -> Coordinates {
    let lat_offset = north_km / KM_PER_DEGREE;
    let lon_offset = east_km / (KM_PER_DEGREE * origin.latitude.to_radians().cos().abs().max(1e-6));
    Coordinates::new(origin.latitude + lat_offset, origin.longitude + lon_offset)
}

/// Whether `point` lies within `radius_km` of `center`
pub fn is_within_radius(center: Coordinates, point: Coordinates, radius_km: f64) -> bool {
    haversine_km(center, point) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHENNAI: Coordinates = Coordinates {
        latitude: 13.0827,
        longitude: 80.2707,
    };
    const COIMBATORE: Coordinates = Coordinates {
        latitude: 11.0168,
        longitude: 76.9558,
    };

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert!(haversine_km(CHENNAI, CHENNAI) < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Chennai to Coimbatore is roughly 430 km as the crow flies
        let d = haversine_km(CHENNAI, COIMBATORE);
        assert!((400.0..460.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_offset_round_trip_distance() {
        let moved = offset_km(CHENNAI, 15.0, 0.0);
        let d = haversine_km(CHENNAI, moved);
        assert!((d - 15.0).abs() < 0.2, "got {d}");

        let moved = offset_km(CHENNAI, 0.0, 15.0);
        let d = haversine_km(CHENNAI, moved);
        assert!((d - 15.0).abs() < 0.2, "got {d}");
    }

    #[test]
    fn test_is_within_radius() {
        let near = offset_km(CHENNAI, 5.0, 5.0);
        assert!(is_within_radius(CHENNAI, near, 10.0));
        assert!(!is_within_radius(CHENNAI, COIMBATORE, 100.0));
    }
}
