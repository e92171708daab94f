//! Great-circle distance on a spherical Earth.

use accident_map_coordinates_models::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two latitude/longitude pairs
/// given in degrees.
#[must_use]
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // rounding can push `a` a hair past 1 for antipodal points
    EARTH_RADIUS_KM * 2.0 * a.sqrt().min(1.0).asin()
}

/// Haversine distance in kilometers between two points.
#[must_use]
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    haversine(from.latitude, from.longitude, to.latitude, to.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEW_DELHI: GeoPoint = GeoPoint::new(28.6139, 77.2090);
    const MUMBAI: GeoPoint = GeoPoint::new(19.0760, 72.8777);
    const PUNE: GeoPoint = GeoPoint::new(18.5204, 73.8567);

    #[test]
    fn same_point_is_zero() {
        for p in [NEW_DELHI, MUMBAI, PUNE, GeoPoint::new(0.0, 0.0)] {
            assert!(distance_km(p, p).abs() < 1e-12);
        }
    }

    #[test]
    fn is_symmetric() {
        let pairs = [(NEW_DELHI, MUMBAI), (MUMBAI, PUNE), (PUNE, NEW_DELHI)];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn new_delhi_to_mumbai() {
        let d = distance_km(NEW_DELHI, MUMBAI);
        assert!((1135.0..=1175.0).contains(&d), "got {d}");
        assert!((d - 1155.0).abs() < 20.0, "got {d}");
    }

    #[test]
    fn mumbai_to_pune() {
        let d = distance_km(MUMBAI, PUNE);
        assert!((115.0..=125.0).contains(&d), "got {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * R / 360
        let d = haversine(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111.194_926_6).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
