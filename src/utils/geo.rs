// src/utils/geo.rs
use crate::models::tracking::LatLng;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometres (haversine)
pub fn haversine_km(from: &LatLng, to: &LatLng) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Smallest box containing both points, as `(south_west, north_east)`
pub fn bounds(a: &LatLng, b: &LatLng) -> (LatLng, LatLng) {
    (
        LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
        LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let damascus = LatLng::new(33.5138, 36.2765);
        assert_eq!(haversine_km(&damascus, &damascus), 0.0);
    }

    #[test]
    fn test_damascus_to_aleppo() {
        let damascus = LatLng::new(33.5138, 36.2765);
        let aleppo = LatLng::new(36.2021, 37.1343);
        let distance = haversine_km(&damascus, &aleppo);
        assert!((distance - 310.0).abs() < 10.0, "distance was {}", distance);
    }

    #[test]
    fn test_bounds_orders_corners() {
        let (sw, ne) = bounds(&LatLng::new(33.6, 36.2), &LatLng::new(33.5, 36.4));
        assert_eq!(sw, LatLng::new(33.5, 36.2));
        assert_eq!(ne, LatLng::new(33.6, 36.4));
    }
}
